mod catalog;
mod config;
mod handlers;
mod models;
mod planning;
mod render;
mod router;
mod utils;

use anyhow::Context;
use std::sync::Arc;
use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use catalog::{build_catalog, CatalogHandle, CatalogReloader};
use config::Config;

/// Application state shared across handlers
pub struct AppState {
    pub catalog: CatalogHandle,
    pub config: Config,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "nac_forge=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let cfg = Config::load();
    tracing::info!("Starting NAC Forge Server");
    match &cfg.templates_dir {
        Some(dir) => tracing::info!("Templates Dir: {}", dir.display()),
        None => tracing::info!("Templates Dir: none (built-in catalog only)"),
    }
    tracing::info!("Listen: {}", cfg.listen_addr);

    // Fingerprint the template directory before reading it
    let baseline = cfg
        .templates_dir
        .as_deref()
        .and_then(|dir| catalog::watcher::fingerprint(dir).ok());

    // Build the template catalog
    let catalog = build_catalog(cfg.templates_dir.as_deref())
        .context("Failed to build template catalog")?;
    tracing::info!(
        "Catalog loaded: {} templates from {} vendors",
        catalog.len(),
        catalog.vendors().len()
    );
    let handle = CatalogHandle::new(catalog);

    // Watch the template directory for changes
    let mut reloader = cfg.templates_dir.clone().map(|dir| {
        let mut reloader =
            CatalogReloader::new(dir, handle.clone(), cfg.catalog_poll_secs, baseline);
        reloader.start();
        reloader
    });

    // Create app state
    let state = Arc::new(AppState {
        catalog: handle,
        config: cfg.clone(),
    });

    // Build router
    let app = router::build(state, cfg.frontend_origin.as_deref());

    // Start server
    let listener = tokio::net::TcpListener::bind(&cfg.listen_addr)
        .await
        .with_context(|| format!("Failed to bind {}", cfg.listen_addr))?;
    tracing::info!("NAC Forge listening on {}", cfg.listen_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(reloader) = reloader.as_mut() {
        reloader.stop();
    }
    tracing::info!("NAC Forge shutting down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => { sig.recv().await; }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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
