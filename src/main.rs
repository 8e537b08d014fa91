use mimalloc::MiMalloc;
use tracing::{error, info, warn};

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::broadcast;

use waitroom::config::WaitroomConfig;
use waitroom::http::{self, AppState};
use waitroom::queue::{AdmissionScheduler, QueueManager};
use waitroom::telemetry;

/// Create a shutdown signal handler
async fn shutdown_signal(shutdown_tx: broadcast::Sender<()>) {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => {}
            Err(e) => {
                warn!(error = %e, "Failed to install Ctrl+C handler, continuing without it");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler, continuing without it");
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

    info!("Shutdown signal received, starting graceful shutdown...");
    let _ = shutdown_tx.send(());
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    telemetry::init();

    let config = WaitroomConfig::from_env();
    let queue_manager = QueueManager::new();

    let (shutdown_tx, mut shutdown_rx) = broadcast::channel::<()>(1);
    tokio::spawn(async move {
        shutdown_signal(shutdown_tx).await;
    });

    // The loop always runs; a disabled config turns every tick into a no-op.
    let scheduler =
        AdmissionScheduler::new(queue_manager.clone(), config.scheduler.clone()).start();

    let state = AppState {
        qm: queue_manager,
        token_cookie_max_age_secs: config.token_cookie_max_age_secs,
        scheduler_stats: Some(scheduler.stats_handle()),
    };
    let router = http::create_router(state);

    let addr = format!("0.0.0.0:{}", config.http_port);
    let listener = match TcpListener::bind(&addr).await {
        Ok(l) => l,
        Err(e) => {
            error!(addr = %addr, error = %e, "Failed to bind HTTP listener");
            scheduler.shutdown().await;
            return Err(e.into());
        }
    };

    info!(
        version = env!("CARGO_PKG_VERSION"),
        port = config.http_port,
        scheduler_enabled = config.scheduler.enabled,
        batch_size = config.scheduler.batch_size,
        endpoint = %format!("http://{}", addr),
        "waitroom ready"
    );

    if let Err(e) = axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.recv().await;
        })
        .await
    {
        error!(error = %e, "HTTP server error");
    }

    scheduler.shutdown().await;
    info!("Shutdown complete");

    Ok(())
}
