use crate::components::{
    sync_matches, GoogleCalendarHandle, LeagueApiClient, MatchService, Reconciler, SyncSummary,
};
use crate::config::Config;
use crate::error::Error;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Initialize logging with environment-based configuration
pub fn init_logging() -> miette::Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,reqwest=warn,hyper=warn")),
        )
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| Error::Other(format!("Failed to set up logging: {}", e)))?;

    Ok(())
}

/// Load and initialize the application config
pub fn load_config() -> miette::Result<Arc<Config>> {
    match Config::load() {
        Ok(config) => {
            info!(
                "Loaded configuration for team {} and calendar {}",
                config.team_number, config.calendar_id
            );
            Ok(Arc::new(config))
        }
        Err(e) => {
            error!("Failed to load configuration: {:?}", e);
            Err(e.into())
        }
    }
}

/// Wire up the live collaborators and run one sync
pub async fn run_sync(config: Arc<Config>) -> miette::Result<SyncSummary> {
    let source = LeagueApiClient::from_config(&config)?;
    let matches = MatchService::from_config(source, &config);

    let calendar = GoogleCalendarHandle::new(Arc::clone(&config))?;
    let reconciler = Reconciler::new(calendar.clone(), config.source_url.clone());

    let result = sync_matches(&matches, &reconciler).await;

    calendar.shutdown().await?;

    Ok(result?)
}
