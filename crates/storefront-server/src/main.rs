mod api;
mod backend;
mod catalog_store;
mod middleware;
mod scheduler;
mod session;
#[cfg(test)]
mod test_support;
mod views;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use storefront_client::StorefrontClient;
use storefront_core::KeywordClassifier;
use tracing_subscriber::EnvFilter;

use crate::{
    api::{build_app, default_rate_limit_state, AppState},
    backend::StorefrontBackend,
    catalog_store::CatalogStore,
    session::SessionStore,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefront_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(
        env = %config.env,
        store = %config.store_domain,
        api_version = %config.api_version,
        "starting storefront server"
    );

    let client = StorefrontClient::from_config(&config)?;
    let backend: Arc<dyn StorefrontBackend> = Arc::new(client);

    let catalog = backend
        .fetch_catalog()
        .await
        .context("initial catalog fetch failed")?;
    tracing::info!(
        products = catalog.products.len(),
        collections = catalog.collections.len(),
        "catalog loaded"
    );

    let catalog = CatalogStore::new(catalog);
    let sessions = SessionStore::new();

    let _scheduler = scheduler::build_scheduler(
        catalog.clone(),
        sessions.clone(),
        Arc::clone(&backend),
        &config,
    )
    .await?;

    let state = AppState {
        catalog,
        sessions,
        backend,
        classifier: Arc::new(KeywordClassifier),
        success_display: Duration::from_millis(config.success_display_ms),
    };
    let app = build_app(state, default_rate_limit_state());

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    tracing::info!(addr = %config.bind_addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to listen for ctrl-c");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
