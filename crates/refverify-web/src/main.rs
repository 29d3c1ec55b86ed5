use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use refverify_core::{Config, Verifier, config_file};
use refverify_web::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let mut config = Config::from_config_file(&config_file::load_config());
    config.apply_env();
    tracing::debug!(?config, "loaded configuration");

    let verifier = Verifier::from_config(&config)?;
    tracing::info!(
        db = verifier.backend_name(),
        endpoint = %config.search_endpoint,
        concurrency = config.max_concurrent_lookups,
        "search backend ready"
    );
    let bind_addr = config.bind_addr.clone();
    let state = Arc::new(AppState { config, verifier });

    let app = refverify_web::app(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install Ctrl-C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
