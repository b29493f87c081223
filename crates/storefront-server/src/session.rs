//! Quick-view sessions.
//!
//! A session is opened for one product and owns its option selection, its
//! add-to-bag state and at most one pending submission task. Removing a
//! session from the store (close request, success-close, idle sweep) drops
//! the last strong reference, and [`QuickView`]'s `Drop` aborts the pending
//! task. Submission tasks hold only a [`Weak`] reference plus the
//! generation they were started with, so a completion that arrives after
//! close or after a reset never writes state.

use std::collections::HashMap;
use std::sync::{Arc, Weak};
use std::time::{Duration, Instant};

use serde::Serialize;
use storefront_client::Cart;
use storefront_core::{
    display_image, display_price, option_picker, resolve_variant, AddToBag, BagState,
    OptionChoices, OptionSelection, Product, Submission, SuccessAction,
};
use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::backend::{shopper_message, StorefrontBackend};
use crate::views::{ImageView, VariantView};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("quick view {0} not found")]
    NotFound(Uuid),

    #[error("product has no option named \"{0}\"")]
    UnknownOption(String),

    #[error("\"{value}\" is not a value of option \"{name}\"")]
    UnknownValue { name: String, value: String },
}

pub struct QuickView {
    id: Uuid,
    product: Product,
    selection: OptionSelection,
    bag: AddToBag,
    on_success: SuccessAction,
    cart: Option<Cart>,
    last_seen: Instant,
    pending: Option<JoinHandle<()>>,
}

/// What a client renders for an open quick view.
#[derive(Debug, Serialize)]
pub struct QuickViewData {
    pub id: Uuid,
    pub handle: String,
    pub title: String,
    pub selection: OptionSelection,
    pub options: Vec<OptionChoices>,
    pub variant: Option<VariantView>,
    pub price: String,
    pub image: Option<ImageView>,
    pub bag: BagState,
    pub button_label: &'static str,
    pub can_add_to_bag: bool,
    pub on_success: SuccessAction,
    pub cart: Option<Cart>,
}

impl QuickView {
    fn new(product: Product, on_success: SuccessAction) -> Self {
        Self {
            id: Uuid::new_v4(),
            product,
            selection: OptionSelection::new(),
            bag: AddToBag::new(),
            on_success,
            cart: None,
            last_seen: Instant::now(),
            pending: None,
        }
    }

    fn touch(&mut self) {
        self.last_seen = Instant::now();
    }

    fn cancel_pending(&mut self) {
        if let Some(handle) = self.pending.take() {
            handle.abort();
        }
    }

    fn view(&self) -> QuickViewData {
        let variant = resolve_variant(&self.product, &self.selection);
        let title = &self.product.title;
        QuickViewData {
            id: self.id,
            handle: self.product.handle.clone(),
            title: title.clone(),
            selection: self.selection.clone(),
            options: option_picker(&self.product, &self.selection),
            variant: variant.map(|v| VariantView::new(v, title)),
            price: display_price(&self.product, variant).display(),
            image: display_image(&self.product, variant).map(|img| ImageView::new(img, title)),
            bag: self.bag.state().clone(),
            button_label: self.bag.button_label(),
            can_add_to_bag: self.bag.can_submit(variant),
            on_success: self.on_success,
            cart: self.cart.clone(),
        }
    }
}

impl Drop for QuickView {
    fn drop(&mut self) {
        if self.pending.is_some() {
            tracing::debug!(quick_view = %self.id, "quick view released, aborting pending task");
        }
        self.cancel_pending();
    }
}

/// Open quick views keyed by id.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<Mutex<HashMap<Uuid, Arc<Mutex<QuickView>>>>>,
}

impl SessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    async fn session(&self, id: Uuid) -> Result<Arc<Mutex<QuickView>>, SessionError> {
        self.sessions
            .lock()
            .await
            .get(&id)
            .cloned()
            .ok_or(SessionError::NotFound(id))
    }

    pub async fn open(&self, product: Product, on_success: SuccessAction) -> QuickViewData {
        let quick_view = QuickView::new(product, on_success);
        let data = quick_view.view();
        self.sessions
            .lock()
            .await
            .insert(quick_view.id, Arc::new(Mutex::new(quick_view)));
        tracing::debug!(quick_view = %data.id, handle = %data.handle, "quick view opened");
        data
    }

    /// # Errors
    ///
    /// [`SessionError::NotFound`] if no such session is open.
    pub async fn view(&self, id: Uuid) -> Result<QuickViewData, SessionError> {
        let session = self.session(id).await?;
        let mut qv = session.lock().await;
        qv.touch();
        Ok(qv.view())
    }

    /// Chooses `value` for option `name`, replacing any earlier choice.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`], or [`SessionError::UnknownOption`] /
    /// [`SessionError::UnknownValue`] when the pair is not declared on the
    /// product.
    pub async fn select_option(
        &self,
        id: Uuid,
        name: &str,
        value: &str,
    ) -> Result<QuickViewData, SessionError> {
        let session = self.session(id).await?;
        let mut qv = session.lock().await;
        qv.touch();

        let option = qv
            .product
            .option(name)
            .ok_or_else(|| SessionError::UnknownOption(name.to_owned()))?;
        if !option.values.iter().any(|v| v == value) {
            return Err(SessionError::UnknownValue {
                name: name.to_owned(),
                value: value.to_owned(),
            });
        }

        qv.selection.set(name, value);
        Ok(qv.view())
    }

    /// Clears the selection and resets the bag, discarding any pending
    /// submission.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] if no such session is open.
    pub async fn clear_selection(&self, id: Uuid) -> Result<QuickViewData, SessionError> {
        let session = self.session(id).await?;
        let mut qv = session.lock().await;
        qv.touch();
        qv.selection.clear();
        qv.bag.reset();
        qv.cancel_pending();
        Ok(qv.view())
    }

    /// Starts an add-to-bag submission for the resolved variant.
    ///
    /// A no-op (returning the unchanged view) unless the bag is idle and a
    /// variant is resolved. The first submission creates a cart; later ones
    /// add lines to it.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] if no such session is open.
    pub async fn submit(
        &self,
        id: Uuid,
        backend: Arc<dyn StorefrontBackend>,
        quantity: u32,
        success_display: Duration,
    ) -> Result<QuickViewData, SessionError> {
        let session = self.session(id).await?;
        let mut guard = session.lock().await;
        let qv = &mut *guard;
        qv.touch();

        let variant = resolve_variant(&qv.product, &qv.selection);
        let Some(submission) = qv.bag.begin(variant, quantity) else {
            tracing::debug!(quick_view = %id, state = ?qv.bag.state(), "add to bag ignored");
            return Ok(qv.view());
        };

        tracing::info!(
            quick_view = %id,
            variant_id = %submission.line.variant_id,
            quantity,
            "add to bag submitted"
        );

        let task = SubmissionTask {
            store: self.clone(),
            session: Arc::downgrade(&session),
            backend,
            cart_id: qv.cart.as_ref().map(|c| c.id.clone()),
            submission,
            success_display,
        };
        if let Some(previous) = qv.pending.replace(tokio::spawn(task.run())) {
            previous.abort();
        }

        Ok(qv.view())
    }

    /// `error → idle`.
    ///
    /// # Errors
    ///
    /// [`SessionError::NotFound`] if no such session is open.
    pub async fn dismiss_error(&self, id: Uuid) -> Result<QuickViewData, SessionError> {
        let session = self.session(id).await?;
        let mut qv = session.lock().await;
        qv.touch();
        qv.bag.dismiss_error();
        Ok(qv.view())
    }

    /// Removes the session. Returns `false` if it was not open.
    pub async fn close(&self, id: Uuid) -> bool {
        let removed = self.sessions.lock().await.remove(&id);
        let closed = removed.is_some();
        drop(removed);
        if closed {
            tracing::debug!(quick_view = %id, "quick view closed");
        }
        closed
    }

    /// Closes the session only if it is still showing the success of
    /// `generation`.
    async fn close_after_success(&self, id: Uuid, generation: u64) {
        let Ok(session) = self.session(id).await else {
            return;
        };
        let still_showing = {
            let qv = session.lock().await;
            qv.bag.generation() == generation && *qv.bag.state() == BagState::Success
        };
        drop(session);
        if still_showing {
            self.close(id).await;
        }
    }

    /// Closes every session untouched for at least `max_idle`. Returns the
    /// number closed.
    pub async fn sweep_idle(&self, max_idle: Duration) -> usize {
        let open: Vec<(Uuid, Arc<Mutex<QuickView>>)> = self
            .sessions
            .lock()
            .await
            .iter()
            .map(|(id, s)| (*id, Arc::clone(s)))
            .collect();

        let mut expired = Vec::new();
        for (id, session) in open {
            if session.lock().await.last_seen.elapsed() >= max_idle {
                expired.push(id);
            }
        }

        let removed: Vec<_> = {
            let mut sessions = self.sessions.lock().await;
            expired.iter().filter_map(|id| sessions.remove(id)).collect()
        };
        removed.len()
    }
}

/// A cart submission running in the background for one quick view.
struct SubmissionTask {
    store: SessionStore,
    session: Weak<Mutex<QuickView>>,
    backend: Arc<dyn StorefrontBackend>,
    cart_id: Option<String>,
    submission: Submission,
    success_display: Duration,
}

impl SubmissionTask {
    async fn run(self) {
        let generation = self.submission.generation;
        let lines = vec![self.submission.line.clone()];
        let result = match self.cart_id.as_deref() {
            Some(cart_id) => self.backend.add_cart_lines(cart_id, lines).await,
            None => self.backend.create_cart(lines).await,
        };

        let Some(session) = self.session.upgrade() else {
            return;
        };
        let (succeeded, action, id) = {
            let mut qv = session.lock().await;
            if qv.bag.generation() != generation {
                tracing::debug!(quick_view = %qv.id, "discarding stale submission result");
                return;
            }
            let outcome = match result {
                Ok(cart) => {
                    qv.cart = Some(cart);
                    Ok(())
                }
                Err(err) => {
                    tracing::warn!(quick_view = %qv.id, error = %err, "add to bag failed");
                    Err(shopper_message(&err))
                }
            };
            let succeeded = outcome.is_ok();
            qv.bag.finish(generation, outcome);
            (succeeded, qv.on_success, qv.id)
        };
        drop(session);

        if !succeeded {
            return;
        }

        tokio::time::sleep(self.success_display).await;
        match action {
            SuccessAction::Reset => {
                if let Some(session) = self.session.upgrade() {
                    session.lock().await.bag.settle(generation);
                }
            }
            SuccessAction::Close => self.store.close_after_success(id, generation).await,
        }
    }
}

#[cfg(test)]
#[path = "session_test.rs"]
mod tests;
