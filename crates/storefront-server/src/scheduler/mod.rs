//! Background job scheduler.
//!
//! Initialises a [`JobScheduler`] at server startup and registers the
//! catalog refresh and quick-view sweep jobs.

use std::sync::Arc;
use std::time::Duration;

use storefront_core::AppConfig;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};

use crate::backend::StorefrontBackend;
use crate::catalog_store::CatalogStore;
use crate::session::SessionStore;

/// Every minute, on the minute.
const SESSION_SWEEP_CRON: &str = "0 * * * * *";

/// Builds and starts the background job scheduler.
///
/// Returns the running [`JobScheduler`] handle, which must be kept alive for
/// the lifetime of the process. Dropping it shuts down all scheduled jobs.
///
/// # Errors
///
/// Returns [`JobSchedulerError`] if the scheduler cannot be initialised,
/// a cron expression is rejected, or the scheduler fails to start.
pub async fn build_scheduler(
    catalog: CatalogStore,
    sessions: SessionStore,
    backend: Arc<dyn StorefrontBackend>,
    config: &AppConfig,
) -> Result<JobScheduler, JobSchedulerError> {
    let scheduler = JobScheduler::new().await?;

    register_catalog_refresh_job(&scheduler, &config.catalog_refresh_cron, catalog, backend)
        .await?;
    register_session_sweep_job(
        &scheduler,
        sessions,
        Duration::from_secs(config.session_idle_secs),
    )
    .await?;

    scheduler.start().await?;
    Ok(scheduler)
}

async fn register_catalog_refresh_job(
    scheduler: &JobScheduler,
    cron: &str,
    catalog: CatalogStore,
    backend: Arc<dyn StorefrontBackend>,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(cron, move |_uuid, _lock| {
        let catalog = catalog.clone();
        let backend = Arc::clone(&backend);

        Box::pin(async move {
            run_catalog_refresh(&catalog, backend.as_ref()).await;
        })
    })?;

    scheduler.add(job).await?;
    tracing::info!(cron, "scheduler: catalog refresh registered");
    Ok(())
}

async fn register_session_sweep_job(
    scheduler: &JobScheduler,
    sessions: SessionStore,
    max_idle: Duration,
) -> Result<(), JobSchedulerError> {
    let job = Job::new_async(SESSION_SWEEP_CRON, move |_uuid, _lock| {
        let sessions = sessions.clone();

        Box::pin(async move {
            run_session_sweep(&sessions, max_idle).await;
        })
    })?;

    scheduler.add(job).await?;
    Ok(())
}

/// Re-fetches the catalog. A failed fetch keeps serving the previous
/// snapshot.
async fn run_catalog_refresh(catalog: &CatalogStore, backend: &dyn StorefrontBackend) {
    tracing::info!("scheduler: starting catalog refresh");
    match catalog.refresh(backend).await {
        Ok(products) => tracing::info!(products, "scheduler: catalog refresh complete"),
        Err(e) => tracing::error!(error = %e, "scheduler: catalog refresh failed"),
    }
}

async fn run_session_sweep(sessions: &SessionStore, max_idle: Duration) -> usize {
    let closed = sessions.sweep_idle(max_idle).await;
    if closed > 0 {
        tracing::info!(closed, "scheduler: closed idle quick views");
    }
    closed
}

#[cfg(test)]
mod tests {
    use storefront_core::{Shop, SuccessAction};

    use super::*;
    use crate::backend::fake::FakeBackend;
    use crate::test_support::{catalog, gpu};

    #[tokio::test]
    async fn refresh_failure_keeps_previous_snapshot() {
        let store = CatalogStore::new(catalog());
        let mut changed = catalog();
        changed.shop = Shop {
            name: "Renamed".to_owned(),
            description: None,
        };
        let backend = FakeBackend::new(changed);
        backend.fail_catalog_fetches();

        run_catalog_refresh(&store, &backend).await;
        assert_eq!(store.catalog().await.shop.name, "Demo Store");
    }

    #[tokio::test]
    async fn refresh_success_swaps_snapshot() {
        let store = CatalogStore::new(catalog());
        let mut changed = catalog();
        changed.products.truncate(1);
        let backend = FakeBackend::new(changed);

        run_catalog_refresh(&store, &backend).await;
        assert_eq!(store.catalog().await.products.len(), 1);
    }

    #[tokio::test]
    async fn sweep_closes_idle_quick_views() {
        let sessions = SessionStore::new();
        sessions.open(gpu(), SuccessAction::Close).await;

        assert_eq!(run_session_sweep(&sessions, Duration::from_secs(900)).await, 0);
        assert_eq!(run_session_sweep(&sessions, Duration::ZERO).await, 1);
        assert_eq!(sessions.len().await, 0);
    }
}
