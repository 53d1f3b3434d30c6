use anyhow::Context;
use contra_server::{
    app::{create_router, AppState},
    config, logging,
    simulation::Simulation,
};
use std::time::{Duration, Instant};
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    #[cfg(debug_assertions)]
    dotenvy::from_path(std::path::PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(".env")).ok();
    #[cfg(not(debug_assertions))]
    dotenvy::dotenv().ok();

    logging::setup_logging();

    let config = config::load_config().context("Failed to load config")?;
    let addr = std::net::SocketAddr::new(config.host, config.port);
    let shutdown_timeout = Duration::from_secs(config.shutdown_timeout_seconds as u64);

    let mut simulation = Simulation::spawn(&config);
    let router = create_router(AppState::new(config, simulation.status()));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "Listening");

    let (tx_signal, mut rx_signal) = watch::channel::<Option<Instant>>(None);
    tokio::spawn(async move {
        let signaled_at = shutdown_signal().await;
        let _ = tx_signal.send(Some(signaled_at));
    });

    let mut rx_for_server = rx_signal.clone();
    let server = axum::serve(listener, router).with_graceful_shutdown(async move {
        let _ = rx_for_server.wait_for(Option::is_some).await;
    });

    let timeout_task = async move {
        if rx_signal.wait_for(Option::is_some).await.is_err() {
            return;
        }
        tokio::time::sleep(shutdown_timeout).await;
    };

    tokio::select! {
        res = server => {
            res.context("Server error")?;
            info!("Graceful shutdown complete");
        }
        _ = timeout_task => {
            error!(timeout = ?shutdown_timeout, "Shutdown timeout elapsed, forcing exit");
            std::process::exit(1);
        }
    }

    tokio::task::spawn_blocking(move || simulation.shutdown())
        .await
        .context("Simulation shutdown task failed")?;
    Ok(())
}

async fn shutdown_signal() -> Instant {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let sigterm = async {
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                info!("Received SIGTERM, shutting down");
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => Instant::now(),
        _ = sigterm => Instant::now(),
    }
}
