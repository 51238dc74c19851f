use clap::Parser;

use postboard::cli::{Cli, execute_command, init_logger_from_settings, load_and_merge_config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let settings = load_and_merge_config(&cli)?;
    let _logger_guard = init_logger_from_settings(&settings)?;

    if let Err(e) = execute_command(&cli, settings).await {
        tracing::error!(error = %format!("{:#}", e), "Command failed");
        return Err(e);
    }
    Ok(())
}
