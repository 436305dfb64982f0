//! labeling-server: serve the labeling API over PostgreSQL.
//!
//! Configuration comes from the environment (or `.env`); see `ServerConfig`.

use labeling_api::{app, default_registry, ensure_database_exists, ensure_schema, AppState, PgStore, ServerConfig};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("labeling_api=info,tower_http=info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    if config.auto_migrate {
        ensure_database_exists(&config.database_url).await?;
    }
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    let registry = default_registry();
    if config.auto_migrate {
        ensure_schema(&pool, &registry).await?;
    }

    let state = AppState::new(Arc::new(PgStore::new(pool)), registry).with_status_policy(config.status_policy);
    let router = app(state, config.body_limit);

    let listener = TcpListener::bind(config.bind_addr).await?;
    tracing::info!(
        addr = %listener.local_addr()?,
        status_mapping = ?config.status_policy,
        "labeling-server listening"
    );
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
