//! The commerce backend as seen by the server.
//!
//! Handlers and background jobs talk to [`StorefrontBackend`] rather than
//! to [`StorefrontClient`] directly so router tests can run against an
//! in-memory catalog.

use futures::future::BoxFuture;
use storefront_client::{Cart, ClientError, StorefrontClient};
use storefront_core::{BagLine, Catalog};

pub trait StorefrontBackend: Send + Sync {
    fn fetch_catalog(&self) -> BoxFuture<'_, Result<Catalog, ClientError>>;

    fn create_cart(&self, lines: Vec<BagLine>) -> BoxFuture<'_, Result<Cart, ClientError>>;

    fn add_cart_lines<'a>(
        &'a self,
        cart_id: &'a str,
        lines: Vec<BagLine>,
    ) -> BoxFuture<'a, Result<Cart, ClientError>>;
}

impl StorefrontBackend for StorefrontClient {
    fn fetch_catalog(&self) -> BoxFuture<'_, Result<Catalog, ClientError>> {
        Box::pin(StorefrontClient::fetch_catalog(self))
    }

    fn create_cart(&self, lines: Vec<BagLine>) -> BoxFuture<'_, Result<Cart, ClientError>> {
        Box::pin(async move { StorefrontClient::create_cart(self, &lines).await })
    }

    fn add_cart_lines<'a>(
        &'a self,
        cart_id: &'a str,
        lines: Vec<BagLine>,
    ) -> BoxFuture<'a, Result<Cart, ClientError>> {
        Box::pin(async move { StorefrontClient::add_cart_lines(self, cart_id, &lines).await })
    }
}

/// Message shown to the shopper when a cart submission fails.
///
/// Cart `userErrors` are already written for shoppers; everything else is
/// replaced with a generic retry hint.
pub fn shopper_message(err: &ClientError) -> String {
    match err {
        ClientError::CartUserErrors { message } => message.clone(),
        ClientError::RateLimited { .. } => {
            "The store is busy right now. Please try again in a moment.".to_owned()
        }
        _ => "Could not add to bag. Please try again.".to_owned(),
    }
}

#[cfg(test)]
pub(crate) mod fake {
    //! In-memory backend for router and session tests.

    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use tokio::sync::Notify;

    use super::*;

    /// Sets its flag when dropped, i.e. when the future holding it is
    /// completed or cancelled.
    struct DropFlag(Arc<AtomicBool>);

    impl Drop for DropFlag {
        fn drop(&mut self) {
            self.0.store(true, Ordering::SeqCst);
        }
    }

    pub struct FakeBackend {
        pub catalog: Mutex<Catalog>,
        pub cart_error: Mutex<Option<String>>,
        pub catalog_unavailable: AtomicBool,
        /// When set, cart calls wait for a notification before answering.
        pub gate: Option<Arc<Notify>>,
        pub cart_calls: AtomicUsize,
        pub cart_future_dropped: Arc<AtomicBool>,
        pub last_lines: Mutex<Vec<BagLine>>,
    }

    impl FakeBackend {
        pub fn new(catalog: Catalog) -> Self {
            Self {
                catalog: Mutex::new(catalog),
                cart_error: Mutex::new(None),
                catalog_unavailable: AtomicBool::new(false),
                gate: None,
                cart_calls: AtomicUsize::new(0),
                cart_future_dropped: Arc::new(AtomicBool::new(false)),
                last_lines: Mutex::new(Vec::new()),
            }
        }

        pub fn gated(catalog: Catalog, gate: Arc<Notify>) -> Self {
            Self {
                gate: Some(gate),
                ..Self::new(catalog)
            }
        }

        pub fn fail_carts_with(&self, message: &str) {
            *self.cart_error.lock().unwrap() = Some(message.to_owned());
        }

        pub fn fail_catalog_fetches(&self) {
            self.catalog_unavailable.store(true, Ordering::SeqCst);
        }

        fn cart(&self, lines: Vec<BagLine>) -> BoxFuture<'_, Result<Cart, ClientError>> {
            self.cart_calls.fetch_add(1, Ordering::SeqCst);
            let flag = DropFlag(Arc::clone(&self.cart_future_dropped));
            Box::pin(async move {
                let _flag = flag;
                if let Some(gate) = &self.gate {
                    gate.notified().await;
                }
                let quantity = lines.iter().map(|l| l.quantity).sum();
                *self.last_lines.lock().unwrap() = lines;
                if let Some(message) = self.cart_error.lock().unwrap().clone() {
                    return Err(ClientError::CartUserErrors { message });
                }
                Ok(Cart {
                    id: "gid://shopify/Cart/test".to_owned(),
                    checkout_url: "https://demo-store.myshopify.com/cart/c/test".to_owned(),
                    total_quantity: quantity,
                })
            })
        }
    }

    impl StorefrontBackend for FakeBackend {
        fn fetch_catalog(&self) -> BoxFuture<'_, Result<Catalog, ClientError>> {
            if self.catalog_unavailable.load(Ordering::SeqCst) {
                return Box::pin(async {
                    Err(ClientError::UnexpectedStatus {
                        status: 503,
                        url: "https://demo-store.myshopify.com/api/2025-01/graphql.json"
                            .to_owned(),
                    })
                });
            }
            let catalog = self.catalog.lock().unwrap().clone();
            Box::pin(async move { Ok(catalog) })
        }

        fn create_cart(&self, lines: Vec<BagLine>) -> BoxFuture<'_, Result<Cart, ClientError>> {
            self.cart(lines)
        }

        fn add_cart_lines<'a>(
            &'a self,
            _cart_id: &'a str,
            lines: Vec<BagLine>,
        ) -> BoxFuture<'a, Result<Cart, ClientError>> {
            self.cart(lines)
        }
    }
}
