use argon2::{
    Algorithm, Argon2, Params, Version,
    password_hash::{
        PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString, rand_core::OsRng,
    },
};
use async_trait::async_trait;

use crate::error::{AppError, AppResult};

/// Hashing capability injected into the user factory and the login flow.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    /// Hashes a plain text password into a PHC string.
    async fn hash(&self, password: &str) -> AppResult<String>;

    /// Returns `false` when the password does not match. A malformed hash is
    /// an error rather than a mismatch.
    async fn verify(&self, password: &str, password_hash: &str) -> AppResult<bool>;
}

/// Argon2id hasher. Hashing runs on the blocking pool so request tasks are
/// not stalled by the key derivation.
#[derive(Clone)]
pub struct Argon2Hasher {
    params: Params,
}

impl Argon2Hasher {
    /// Creates a hasher whose cost is the Argon2 iteration count.
    pub fn new(cost: u32) -> AppResult<Self> {
        Self::with_memory(Params::DEFAULT_M_COST, cost)
    }

    /// Creates a hasher with an explicit memory size in KiB.
    pub fn with_memory(memory_kib: u32, cost: u32) -> AppResult<Self> {
        let params = Params::new(memory_kib, cost, Params::DEFAULT_P_COST, None).map_err(|e| {
            AppError::Configuration {
                key: "password.hash_cost".to_string(),
                source: anyhow::anyhow!("Invalid Argon2 parameters: {}", e),
            }
        })?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

#[async_trait]
impl PasswordHasher for Argon2Hasher {
    async fn hash(&self, password: &str) -> AppResult<String> {
        let argon2 = self.argon2();
        let password = password.to_owned();

        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|e| AppError::Internal {
                    source: anyhow::anyhow!("Failed to hash password: {}", e),
                })
        })
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
    }

    async fn verify(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        let argon2 = self.argon2();
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&password_hash).map_err(|e| AppError::Internal {
                source: anyhow::anyhow!("Stored password hash is malformed: {}", e),
            })?;
            Ok(argon2.verify_password(password.as_bytes(), &parsed).is_ok())
        })
        .await
        .map_err(|e| AppError::Internal {
            source: anyhow::Error::from(e),
        })?
    }
}

/// Deterministic hasher for unit tests that do not exercise Argon2 itself.
#[cfg(test)]
pub(crate) struct PlainHasher;

#[cfg(test)]
#[async_trait]
impl PasswordHasher for PlainHasher {
    async fn hash(&self, password: &str) -> AppResult<String> {
        Ok(format!("plain${}", password))
    }

    async fn verify(&self, password: &str, password_hash: &str) -> AppResult<bool> {
        Ok(password_hash == format!("plain${}", password))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hasher() -> Argon2Hasher {
        Argon2Hasher::with_memory(1024, 1).expect("valid params")
    }

    #[tokio::test]
    async fn test_hash_password() {
        let hash = hasher().hash("test_password_123").await.unwrap();

        assert!(hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn test_verify_password() {
        let hasher = hasher();
        let hash = hasher.hash("test_password_123").await.unwrap();

        assert!(hasher.verify("test_password_123", &hash).await.unwrap());
        assert!(!hasher.verify("wrong_password", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_different_hashes_for_same_password() {
        let hasher = hasher();
        let hash1 = hasher.hash("test_password_123").await.unwrap();
        let hash2 = hasher.hash("test_password_123").await.unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("test_password_123", &hash1).await.unwrap());
        assert!(hasher.verify("test_password_123", &hash2).await.unwrap());
    }

    #[tokio::test]
    async fn test_verify_rejects_malformed_hash() {
        let result = hasher().verify("whatever", "not-a-phc-string").await;
        assert!(matches!(result, Err(AppError::Internal { .. })));
    }

    #[test]
    fn test_zero_cost_is_rejected() {
        assert!(matches!(
            Argon2Hasher::new(0),
            Err(AppError::Configuration { .. })
        ));
    }
}
