use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::JwtConfig;
use crate::entities::{Role, User};
use crate::error::{AppError, AppResult};

/// Token type enumeration
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenType {
    /// Access token for API authentication (short-lived)
    Access,
    /// Refresh token for obtaining new token pairs (long-lived)
    Refresh,
}

/// JWT claims. The payload mirrors the public identity of the user so a
/// client can read it without another round trip.
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub role: Role,
    pub token_type: TokenType,
    /// Issued at (timestamp)
    pub iat: i64,
    /// Expiration time (timestamp)
    pub exp: i64,
}

impl Claims {
    fn for_user(user: &User, token_type: TokenType, ttl: Duration) -> Self {
        let now = Utc::now();
        Self {
            sub: user.id().to_string(),
            email: user.email().to_string(),
            name: user.name().map(str::to_string),
            role: user.role(),
            token_type,
            iat: now.timestamp(),
            exp: (now + ttl).timestamp(),
        }
    }
}

/// Access and refresh tokens issued together on login, registration and refresh.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Signs and verifies HS256 tokens with a shared secret.
#[derive(Clone)]
pub struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    access_ttl: Duration,
    refresh_ttl: Duration,
}

impl std::fmt::Debug for JwtService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtService")
            .field("access_ttl", &self.access_ttl)
            .field("refresh_ttl", &self.refresh_ttl)
            .finish_non_exhaustive()
    }
}

impl JwtService {
    pub fn new(secret: &str, access_ttl: Duration, refresh_ttl: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            access_ttl,
            refresh_ttl,
        }
    }

    /// Builds the service from validated configuration.
    pub fn from_config(config: &JwtConfig) -> AppResult<Self> {
        let parse = |key: &str, value: &str| {
            parse_duration(value).ok_or_else(|| AppError::Configuration {
                key: key.to_string(),
                source: anyhow::anyhow!("Invalid duration '{}'", value),
            })
        };

        Ok(Self::new(
            &config.secret,
            parse("jwt.access_expires_in", &config.access_expires_in)?,
            parse("jwt.refresh_expires_in", &config.refresh_expires_in)?,
        ))
    }

    pub fn generate_token(&self, user: &User, token_type: TokenType) -> AppResult<String> {
        let ttl = match token_type {
            TokenType::Access => self.access_ttl,
            TokenType::Refresh => self.refresh_ttl,
        };
        let claims = Claims::for_user(user, token_type, ttl);

        encode(&Header::default(), &claims, &self.encoding_key).map_err(|e| AppError::Internal {
            source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
        })
    }

    pub fn generate_token_pair(&self, user: &User) -> AppResult<TokenPair> {
        Ok(TokenPair {
            access_token: self.generate_token(user, TokenType::Access)?,
            refresh_token: self.generate_token(user, TokenType::Refresh)?,
        })
    }

    /// Verifies signature and expiry, then the token type when one is expected.
    pub fn validate_token(
        &self,
        token: &str,
        expected_type: Option<TokenType>,
    ) -> AppResult<Claims> {
        let claims = decode::<Claims>(token, &self.decoding_key, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| match e.kind() {
                jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
                    AppError::unauthorized("Token has expired")
                }
                jsonwebtoken::errors::ErrorKind::InvalidSignature => {
                    AppError::unauthorized("Invalid token signature")
                }
                _ => AppError::unauthorized("Invalid token"),
            })?;

        if let Some(expected) = expected_type {
            if claims.token_type != expected {
                return Err(AppError::unauthorized(format!(
                    "Invalid token type: expected {:?}, got {:?}",
                    expected, claims.token_type
                )));
            }
        }

        Ok(claims)
    }

    pub fn validate_access_token(&self, token: &str) -> AppResult<Claims> {
        self.validate_token(token, Some(TokenType::Access))
    }

    pub fn validate_refresh_token(&self, token: &str) -> AppResult<Claims> {
        self.validate_token(token, Some(TokenType::Refresh))
    }
}

/// Parses a compact duration such as `90s`, `15m`, `1h`, `7d` or `2w`.
/// A bare number is read as seconds.
pub fn parse_duration(input: &str) -> Option<Duration> {
    let input = input.trim();
    let split = input
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(input.len());
    let (digits, unit) = input.split_at(split);
    let amount: i64 = digits.parse().ok()?;
    if amount <= 0 {
        return None;
    }

    match unit.trim() {
        "" | "s" => Duration::try_seconds(amount),
        "m" => Duration::try_minutes(amount),
        "h" => Duration::try_hours(amount),
        "d" => Duration::try_days(amount),
        "w" => Duration::try_weeks(amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::UserProps;

    const TEST_SECRET: &str = "test_secret_key_for_jwt_testing_0123456789";

    fn service() -> JwtService {
        JwtService::new(TEST_SECRET, Duration::hours(1), Duration::days(7))
    }

    fn user(role: Role) -> User {
        let now = Utc::now();
        User::hydrate(UserProps {
            id: "0190a1b2-0000-7000-8000-000000000001".to_string(),
            email: "jane@example.com".to_string(),
            name: Some("Jane".to_string()),
            role,
            password_hash: "$argon2id$stub".to_string(),
            created_at: now,
            updated_at: now,
        })
        .expect("valid user")
    }

    #[test]
    fn test_generate_and_validate_access_token() {
        let service = service();
        let token = service
            .generate_token(&user(Role::Admin), TokenType::Access)
            .unwrap();

        let claims = service.validate_access_token(&token).unwrap();
        assert_eq!(claims.sub, "0190a1b2-0000-7000-8000-000000000001");
        assert_eq!(claims.email, "jane@example.com");
        assert_eq!(claims.name.as_deref(), Some("Jane"));
        assert_eq!(claims.role, Role::Admin);
        assert_eq!(claims.token_type, TokenType::Access);
        assert_eq!(claims.exp - claims.iat, 3600);
    }

    #[test]
    fn test_token_pair_is_distinct() {
        let pair = service().generate_token_pair(&user(Role::User)).unwrap();

        assert!(!pair.access_token.is_empty());
        assert!(!pair.refresh_token.is_empty());
        assert_ne!(pair.access_token, pair.refresh_token);
    }

    #[test]
    fn test_wrong_token_type_is_rejected() {
        let service = service();
        let pair = service.generate_token_pair(&user(Role::User)).unwrap();

        let err = service.validate_access_token(&pair.refresh_token).unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
        assert!(service.validate_refresh_token(&pair.refresh_token).is_ok());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let token = service()
            .generate_token(&user(Role::User), TokenType::Access)
            .unwrap();
        let other = JwtService::new(
            "another_secret_that_is_long_enough_000",
            Duration::hours(1),
            Duration::days(7),
        );

        match other.validate_access_token(&token) {
            Err(AppError::Unauthorized { message }) => {
                assert_eq!(message, "Invalid token signature")
            }
            other => panic!("Expected Unauthorized error, got: {:?}", other),
        }
    }

    #[test]
    fn test_expired_token() {
        let service = JwtService::new(TEST_SECRET, Duration::hours(-2), Duration::days(7));
        let token = service
            .generate_token(&user(Role::User), TokenType::Access)
            .unwrap();

        match service.validate_access_token(&token) {
            Err(AppError::Unauthorized { message }) => assert_eq!(message, "Token has expired"),
            other => panic!("Expected Unauthorized error, got: {:?}", other),
        }
    }

    #[test]
    fn test_garbage_token() {
        let err = service().validate_access_token("not.a.token").unwrap_err();
        assert!(matches!(err, AppError::Unauthorized { .. }));
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("1h"), Some(Duration::hours(1)));
        assert_eq!(parse_duration("7d"), Some(Duration::days(7)));
        assert_eq!(parse_duration("15m"), Some(Duration::minutes(15)));
        assert_eq!(parse_duration("3600"), Some(Duration::seconds(3600)));
        assert_eq!(parse_duration("2w"), Some(Duration::weeks(2)));
        assert_eq!(parse_duration("0h"), None);
        assert_eq!(parse_duration("h"), None);
        assert_eq!(parse_duration("1y"), None);
        assert_eq!(parse_duration(""), None);
    }
}
