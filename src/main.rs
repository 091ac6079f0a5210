use anyhow::Result;
use clap::Parser;
use job_board::app_log;
use job_board::cli::{handle_command, Cli};
use job_board::logging::init_logging;
use job_board::ConfigManager;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Configuration decides where logs go, so it loads first
    let config = ConfigManager::load()?;
    init_logging(&config.log)?;

    app_log!(info, "Environment: {}", config.environment);
    app_log!(info, "Job board API: {}", config.api.base_url);
    app_log!(info, "Search debounce: {}ms", config.query.debounce_ms);

    handle_command(cli, config).await
}
