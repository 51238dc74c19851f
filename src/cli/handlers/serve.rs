//! Serve command handler

use crate::config::Settings;
use crate::server::Server;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    pub async fn execute(self, dry_run: bool) -> anyhow::Result<()> {
        if dry_run {
            self.print_summary();
            return Ok(());
        }
        Server::new(self.config).run().await
    }

    /// Prints what `serve` would do; the configuration is already validated.
    fn print_summary(&self) {
        let config = &self.config;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", config.server.address());
        println!("✓ Storage backend: {}", config.database.backend);
        if config.seed.admin_email.is_some() {
            println!("✓ Admin account will be seeded on startup");
        }
        println!(
            "✓ Logging at '{}' (console: {}, file: {})",
            config.logger.level, config.logger.console.enabled, config.logger.file.enabled
        );
        println!("Dry run completed successfully");
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}
