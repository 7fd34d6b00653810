//! `seclink serve`: run the public and admin servers.

use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use tokio::net::TcpListener;
use tokio::sync::watch;

use seclink_api::{AppState, admin_router, public_router};
use seclink_core::config::AppConfig;
use seclink_core::error::{AppError, ErrorKind};
use seclink_core::traits::clock::{Clock, SystemClock};
use seclink_core::traits::store::ExpiringKeyValueStore;
use seclink_service::{LinkService, SecureIdGenerator};
use seclink_storage::FileRoot;
use seclink_store::{Reclaimer, SledLinkStore};

/// Arguments for `seclink serve`
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Override the configured log level (trace, debug, info, warn, error)
    #[arg(short, long)]
    pub verbose: Option<String>,
}

/// Execute the serve command
pub async fn execute(args: &ServeArgs, mut config: AppConfig) -> Result<(), AppError> {
    if let Some(level) = &args.verbose {
        config.logging.level = level.clone();
    }
    crate::logging::init_logging(&config.logging);

    run(config).await
}

/// Main server run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Seclink v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Create data directories ──────────────────────────
    let store_path = config.storage.store_path();
    let files_path = config.storage.files_path();
    for dir in [&store_path, &files_path] {
        tokio::fs::create_dir_all(dir).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Configuration,
                format!("Failed to create dir '{}'", dir.display()),
                e,
            )
        })?;
    }

    // ── Step 2: Files root ───────────────────────────────────────
    let files = Arc::new(FileRoot::open(&files_path).await?);
    files.ensure_disjoint(&store_path).await?;

    // ── Step 3: Link store ───────────────────────────────────────
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let store: Arc<dyn ExpiringKeyValueStore> =
        Arc::new(SledLinkStore::open(&store_path, Arc::clone(&clock))?);

    // ── Step 4: Services ─────────────────────────────────────────
    let links = Arc::new(LinkService::new(
        Arc::clone(&store),
        Arc::clone(&files),
        Arc::new(SecureIdGenerator::new(config.links.id_length)),
        clock,
        config.links.clone(),
    ));

    // ── Step 5: Shutdown channel & reclaimer ─────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let shutdown_tx = Arc::new(shutdown_tx);

    let reclaimer = match config.links.reclaim_interval_seconds {
        0 => {
            tracing::info!("Expired link reclamation disabled");
            None
        }
        secs => Some(
            Reclaimer::new(Arc::clone(&store), Duration::from_secs(secs))
                .spawn(shutdown_rx.clone()),
        ),
    };

    // ── Step 6: HTTP servers ─────────────────────────────────────
    let state = AppState {
        config: Arc::new(config.clone()),
        links,
        files,
        store: Arc::clone(&store),
    };

    let public_addr = format!("{}:{}", config.server.host, config.server.port);
    let admin_addr = format!("{}:{}", config.server.host, config.server.admin_port);
    let public_listener = bind(&public_addr).await?;
    let admin_listener = bind(&admin_addr).await?;

    tracing::info!("Public server listening on {}", public_addr);
    tracing::info!("Admin server listening on {}", admin_addr);

    tokio::spawn({
        let shutdown_tx = Arc::clone(&shutdown_tx);
        async move {
            shutdown_signal().await;
            tracing::info!("Shutdown signal received");
            let _ = shutdown_tx.send(true);
        }
    });

    let public_server = {
        let shutdown_tx = Arc::clone(&shutdown_tx);
        let server = axum::serve(public_listener, public_router(state.clone()))
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));
        async move {
            let result = server.await;
            let _ = shutdown_tx.send(true);
            result
        }
    };
    let admin_server = {
        let shutdown_tx = Arc::clone(&shutdown_tx);
        let server = axum::serve(admin_listener, admin_router(state))
            .with_graceful_shutdown(wait_for_shutdown(shutdown_rx.clone()));
        async move {
            let result = server.await;
            let _ = shutdown_tx.send(true);
            result
        }
    };

    let servers = async { tokio::join!(public_server, admin_server) };
    let grace = Duration::from_secs(config.server.shutdown_grace_seconds);
    let (public_result, admin_result) = tokio::select! {
        results = servers => results,
        _ = grace_expired(shutdown_rx.clone(), grace) => {
            tracing::warn!("Grace period elapsed, dropping open connections");
            (Ok(()), Ok(()))
        }
    };

    // ── Step 7: Drain background work and close the store ────────
    let _ = shutdown_tx.send(true);
    if let Some(handle) = reclaimer {
        if let Err(e) = handle.await {
            tracing::warn!(error = %e, "Reclaimer task ended abnormally");
        }
    }
    store.close().await?;

    public_result.map_err(|e| AppError::with_source(ErrorKind::Io, "Public server error", e))?;
    admin_result.map_err(|e| AppError::with_source(ErrorKind::Io, "Admin server error", e))?;

    tracing::info!("Seclink stopped");
    Ok(())
}

async fn bind(addr: &str) -> Result<TcpListener, AppError> {
    TcpListener::bind(addr).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Configuration,
            format!("Failed to bind {addr}"),
            e,
        )
    })
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    // A dropped sender also means shut down.
    let _ = rx.wait_for(|stop| *stop).await;
}

async fn grace_expired(rx: watch::Receiver<bool>, grace: Duration) {
    wait_for_shutdown(rx).await;
    tokio::time::sleep(grace).await;
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
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
