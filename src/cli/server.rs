use std::sync::Arc;

use anyhow::Result;
use chefdeck_recipe::HttpScrapeClient;
use chefdeck_shopping::HttpMergeClient;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use crate::{config::Config, routes::AppState};

pub async fn serve(
    config: Config,
    host_override: Option<String>,
    port_override: Option<u16>,
) -> Result<()> {
    tracing::info!("Starting chefdeck server...");

    // Use CLI overrides if provided, otherwise use config
    let host = host_override.unwrap_or(config.server.host.to_owned());
    let port = port_override.unwrap_or(config.server.port);

    // Write pool first: it creates the database file the read pool opens
    let write_pool = crate::db::create_write_pool(&config.database.url).await?;
    super::migrate::run_migrations(&write_pool).await?;

    let read_pool =
        crate::db::create_read_pool(&config.database.url, config.database.max_connections).await?;

    if config.merge.api_key.is_empty() {
        tracing::warn!("merge.api_key is empty, grocery merging and recipe import will fail");
    }

    let merger = Arc::new(HttpMergeClient::new(
        config.merge.url.to_owned(),
        config.merge.api_key.to_owned(),
    ));

    let scraper = Arc::new(HttpScrapeClient::new(
        config.merge.url.to_owned(),
        config.merge.api_key.to_owned(),
    ));

    let state = AppState::new(
        chefdeck_shared::State::new(read_pool.clone(), write_pool.clone()),
        merger,
        scraper,
        config.auth.jwt_secret.as_str(),
    );

    let app = crate::routes::router(state)
        .layer(CompressionLayer::new().br(true).gzip(true))
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Closing database pools...");
    futures::join!(read_pool.close(), write_pool.close());
    tracing::info!("Graceful shutdown complete");

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal");
        },
    }

    tracing::info!("Starting graceful shutdown...");
}
