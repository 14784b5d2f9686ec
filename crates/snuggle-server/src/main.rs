use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tracing::info;

use snuggle_core::{
    config::{Config, StoreMode},
    MemoryVisitorStore, VisitorStore,
};
use snuggle_redis::RedisVisitorStore;
use snuggle_server::state::AppState;

/// `snuggle health`: liveness probe for Docker HEALTHCHECK.
///
/// Calls `GET http://localhost:$SNUGGLE_PORT/health`.
/// Exits 0 if the server responds with HTTP 200, exits 1 otherwise.
fn run_health_check() -> ! {
    let port = std::env::var("SNUGGLE_PORT").unwrap_or_else(|_| "3000".to_string());
    let url = format!("http://localhost:{}/health", port);
    match ureq::get(&url).call() {
        Ok(resp) if resp.status() == 200 => std::process::exit(0),
        _ => std::process::exit(1),
    }
}

async fn build_store(cfg: &Config) -> Result<Arc<dyn VisitorStore>> {
    match cfg.store {
        StoreMode::Redis => {
            let store = RedisVisitorStore::connect(&cfg.redis_url).await?;
            Ok(Arc::new(store))
        }
        StoreMode::Memory => {
            tracing::warn!(
                "Using in-memory visitor store (SNUGGLE_STORE=memory). \
                 Counts are lost on restart and not shared between instances."
            );
            Ok(Arc::new(MemoryVisitorStore::new()))
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.get(1).map(|s| s.as_str()) == Some("health") {
        run_health_check();
    }

    // Structured JSON logging. Level controlled via RUST_LOG.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("snuggle=info".parse()?),
        )
        .json()
        .init();

    let cfg = Config::from_env()?;
    let store = build_store(&cfg).await?;

    let state = Arc::new(AppState::new(store, cfg.clone()));
    let app = snuggle_server::app::build_app(state);

    let addr = format!("0.0.0.0:{}", cfg.port);
    info!(port = cfg.port, store = ?cfg.store, "Snuggle listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
