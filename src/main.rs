use matchsync::startup;
use tracing::info;

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting matchsync");

    // Load configuration
    let config = startup::load_config()?;

    // Mirror the confirmed matches onto the calendar
    startup::run_sync(config).await?;

    Ok(())
}
