//! Server module for managing HTTP server lifecycle
//!
//! Builds the storage backend and the application state from the validated
//! settings, seeds the admin account, then serves until a shutdown signal.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::signal;

use crate::api::create_router;
use crate::config::{Settings, StorageBackend};
use crate::db::{establish_async_connection_pool, run_migrations};
use crate::repositories::{Repositories, seed_admin};
use crate::state::AppState;
use crate::utils::jwt::JwtService;
use crate::utils::password::{Argon2Hasher, PasswordHasher};

/// HTTP server manager
pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Connects the selected storage backend, running pending migrations
    /// first when `database.auto_migrate` is set.
    async fn repositories(&self) -> anyhow::Result<Repositories> {
        let database = &self.settings.database;
        match database.backend {
            StorageBackend::InMemory => {
                tracing::warn!("Using the in-memory store; data is lost on shutdown");
                Ok(Repositories::in_memory())
            }
            StorageBackend::Postgres => {
                if database.auto_migrate {
                    let applied = run_migrations(&database.url).await?;
                    tracing::info!(count = applied.len(), "Applied pending migrations");
                }
                let pool = establish_async_connection_pool(database).await?;
                Ok(Repositories::postgres(pool))
            }
        }
    }

    /// Build the application state. Split from [`Server::run`] so startup can
    /// be exercised without binding a socket.
    pub async fn build_state(&self) -> anyhow::Result<AppState> {
        let settings = &self.settings;

        let hasher: Arc<dyn PasswordHasher> = Arc::new(
            Argon2Hasher::new(settings.password.hash_cost)
                .context("Invalid password hashing configuration")?,
        );
        let jwt = Arc::new(JwtService::from_config(&settings.jwt).context("Invalid JWT configuration")?);

        let repositories = self.repositories().await?;

        if let (Some(email), Some(password)) =
            (&settings.seed.admin_email, &settings.seed.admin_password)
        {
            seed_admin(repositories.users.as_ref(), hasher.as_ref(), email, password)
                .await
                .context("Failed to seed admin account")?;
        }

        Ok(AppState::new(
            repositories,
            settings.database.backend,
            hasher,
            jwt,
        ))
    }

    /// Start the server and run until shutdown signal
    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!(
            app_name = %self.settings.application.name,
            app_version = %self.settings.application.version,
            backend = %self.settings.database.backend,
            "Application starting"
        );
        tracing::debug!(
            access_expires_in = %self.settings.jwt.access_expires_in,
            refresh_expires_in = %self.settings.jwt.refresh_expires_in,
            hash_cost = self.settings.password.hash_cost,
            "Auth configuration loaded"
        );

        let state = self.build_state().await?;
        let router = create_router(state);

        let address = self.settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM. If a handler cannot be installed the
/// error is logged and that signal is ignored.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings() -> Settings {
        let mut settings = Settings::default();
        settings.jwt.secret = "0123456789abcdef0123456789abcdef".to_string();
        settings.password.hash_cost = 1;
        settings
    }

    #[tokio::test]
    async fn test_build_state_in_memory() {
        let state = Server::new(settings()).build_state().await.unwrap();
        assert_eq!(state.backend, StorageBackend::InMemory);
        assert!(state.repositories.users.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_build_state_seeds_admin() {
        let mut settings = settings();
        settings.seed.admin_email = Some("admin@example.com".to_string());
        settings.seed.admin_password = Some("changeme".to_string());

        let state = Server::new(settings).build_state().await.unwrap();
        let admin = state
            .repositories
            .users
            .find_by_email("admin@example.com")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(admin.role(), crate::entities::Role::Admin);
    }
}
