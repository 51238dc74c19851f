//! Startup seeding of the initial administrator account.

use crate::entities::{NewUser, Role, User};
use crate::error::AppResult;
use crate::repositories::UserRepository;
use crate::utils::password::PasswordHasher;

/// Creates an admin with the given credentials unless the email is taken.
/// The account has no name, so it cannot collide with a registered one.
///
/// Returns `true` when a new account was stored.
pub async fn seed_admin(
    users: &dyn UserRepository,
    hasher: &dyn PasswordHasher,
    email: &str,
    password: &str,
) -> AppResult<bool> {
    if users.find_by_email(email).await?.is_some() {
        tracing::debug!(email = %email, "Admin account already present, skipping seed");
        return Ok(false);
    }

    let admin = User::create(
        NewUser {
            email: email.to_string(),
            name: None,
            password: password.to_string(),
            role: Some(Role::Admin.as_str().to_string()),
        },
        hasher,
    )
    .await?;
    let admin = users.add(admin).await?;

    tracing::info!(user_id = %admin.id(), email = %admin.email(), "Seeded admin account");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::{InMemoryRepository, Repository};
    use crate::utils::password::PlainHasher;

    #[tokio::test]
    async fn test_seed_creates_admin_once() {
        let users = InMemoryRepository::<User>::new();
        let hasher = PlainHasher;

        let created = seed_admin(&users, &hasher, "admin@example.com", "changeme")
            .await
            .unwrap();
        assert!(created);

        let again = seed_admin(&users, &hasher, "admin@example.com", "changeme")
            .await
            .unwrap();
        assert!(!again);

        let all = users.find_all().await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].role(), Role::Admin);
    }

    #[tokio::test]
    async fn test_seed_ignores_taken_names() {
        let users = InMemoryRepository::<User>::new();
        for name in ["Administrator", "admin"] {
            let user = User::create(
                NewUser {
                    email: format!("{}@example.com", name.to_lowercase()),
                    name: Some(name.to_string()),
                    password: "secret1".to_string(),
                    role: None,
                },
                &PlainHasher,
            )
            .await
            .unwrap();
            users.add(user).await.unwrap();
        }

        let created = seed_admin(&users, &PlainHasher, "root@example.com", "changeme")
            .await
            .unwrap();
        assert!(created);
        assert_eq!(users.find_all().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_seed_rejects_invalid_credentials() {
        let users = InMemoryRepository::<User>::new();
        let result = seed_admin(&users, &PlainHasher, "not-an-email", "changeme").await;
        assert!(result.is_err());
        assert!(users.is_empty().await);
    }
}
