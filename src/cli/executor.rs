//! Command executor for dispatching CLI commands

use super::handlers::{MigrateCommandHandler, ServeCommandHandler};
use super::parser::{Cli, Commands};
use crate::config::Settings;
use crate::error::AppError;

/// Runs the parsed command against the merged settings. No command means `serve`.
pub async fn execute_command(cli: &Cli, settings: Settings) -> anyhow::Result<()> {
    validate_command_args(cli)?;

    match &cli.command {
        Some(Commands::Serve { dry_run, .. }) => {
            ServeCommandHandler::new(settings).execute(*dry_run).await
        }
        None => ServeCommandHandler::new(settings).execute(false).await,
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(())
        }
    }
}

/// Checks argument combinations clap cannot express, for `Cli` values built
/// without going through the parser.
fn validate_command_args(cli: &Cli) -> Result<(), AppError> {
    if cli.verbose && cli.quiet {
        return Err(AppError::validation(
            "cli_arguments",
            "Cannot use --verbose and --quiet together",
        ));
    }

    if let Some(Commands::Migrate {
        dry_run: true,
        rollback: Some(_),
    }) = cli.command
    {
        return Err(AppError::validation(
            "cli_arguments",
            "Cannot use --dry-run and --rollback together",
        ));
    }

    Ok(())
}
