use std::sync::Arc;

use chrono::{DateTime, Utc};
use storefront_client::ClientError;
use storefront_core::Catalog;
use tokio::sync::RwLock;

use crate::backend::StorefrontBackend;

/// An immutable catalog plus when it was fetched.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub catalog: Arc<Catalog>,
    pub refreshed_at: DateTime<Utc>,
}

/// Holds the current catalog snapshot.
///
/// Refreshes swap the `Arc`; requests that already cloned the previous
/// snapshot keep reading it until they finish.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    inner: Arc<RwLock<CatalogSnapshot>>,
}

impl CatalogStore {
    #[must_use]
    pub fn new(catalog: Catalog) -> Self {
        Self {
            inner: Arc::new(RwLock::new(CatalogSnapshot {
                catalog: Arc::new(catalog),
                refreshed_at: Utc::now(),
            })),
        }
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.inner.read().await.clone()
    }

    pub async fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.inner.read().await.catalog)
    }

    pub async fn replace(&self, catalog: Catalog) {
        let mut guard = self.inner.write().await;
        *guard = CatalogSnapshot {
            catalog: Arc::new(catalog),
            refreshed_at: Utc::now(),
        };
    }

    /// Fetches a fresh catalog and swaps it in. Returns the product count.
    ///
    /// On failure the current snapshot is left untouched.
    ///
    /// # Errors
    ///
    /// Propagates the backend error.
    pub async fn refresh(&self, backend: &dyn StorefrontBackend) -> Result<usize, ClientError> {
        let catalog = backend.fetch_catalog().await?;
        let count = catalog.products.len();
        self.replace(catalog).await;
        Ok(count)
    }
}
