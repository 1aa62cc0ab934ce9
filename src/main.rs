use anyhow::Result;
use tracing::info;

use card_collector_lib::infrastructure::{AppConfig, init_logging_with_config, log_system_info};

#[tokio::main]
async fn main() -> Result<()> {
    let config = AppConfig::load()?;
    let _log_guard = init_logging_with_config(&config.logging)?;
    log_system_info();

    let summary = card_collector_lib::run(&config).await?;
    info!("Sync outcome: {:?}", summary.outcome);
    println!("\n{summary}");
    Ok(())
}
