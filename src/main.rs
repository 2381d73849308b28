use std::sync::Arc;

use clap::Parser;
use linkshelf::{
    api::{start_api_server, ApiState},
    auth::SessionCleanupService,
    cli::{Cli, Commands},
    config::DatabaseConfig,
    observability::{init_observability, log_config_info},
    services::HttpMetadataExtractor,
    storage::{create_pool, run_migrations, session_store_from_config},
    Config, Result, APP_NAME, VERSION,
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Must happen before any config is read from the environment
    cli.load_env_file()?;

    let mut config = Config::from_env()?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    init_observability(&config.observability).await?;
    info!(app_name = APP_NAME, version = VERSION, "Starting Linkshelf");
    log_config_info(&config);

    match cli.command() {
        Commands::Migrate => {
            let pool =
                create_pool(&DatabaseConfig { auto_migrate: false, ..config.database.clone() })
                    .await?;
            run_migrations(&pool).await?;
            pool.close().await;
            Ok(())
        }
        Commands::PurgeSessions => {
            let store = session_store_from_config(&config.session, &config.database).await?;
            let purged = SessionCleanupService::new(store).run_once().await?;
            info!(purged, "Expired session purge complete");
            Ok(())
        }
        Commands::Serve => serve(config).await,
    }
}

async fn serve(config: Config) -> Result<()> {
    let store = session_store_from_config(&config.session, &config.database).await?;
    let extractor = Arc::new(HttpMetadataExtractor::new(&config.metadata)?);

    let cleanup = SessionCleanupService::new(store.clone()).spawn(config.session.cleanup_interval());
    info!(
        interval_seconds = config.session.cleanup_interval_seconds,
        "Session cleanup task started"
    );

    let state = ApiState::new(store, config.session.clone(), extractor);
    let result = start_api_server(config.api.clone(), state).await;

    cleanup.abort();
    result
}
