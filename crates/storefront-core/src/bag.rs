//! Add-to-bag button state.
//!
//! ```text
//! idle ──begin──▶ submitting ──finish(Ok)──▶ success ──settle──▶ idle
//!                     │
//!                     └──finish(Err)──▶ error ──dismiss_error──▶ idle
//! ```
//!
//! Transitions that do not apply in the current state are no-ops and report
//! `false` (or `None`). The machine performs no I/O: callers run the cart
//! submission described by the returned [`Submission`] and feed the outcome
//! back through [`AddToBag::finish`].

use serde::{Deserialize, Serialize};

use crate::catalog::Variant;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum BagState {
    #[default]
    Idle,
    Submitting,
    Success,
    Error {
        message: String,
    },
}

/// What happens once `success` has been shown for the display delay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuccessAction {
    /// Return to `idle` and stay on the product.
    Reset,
    /// Close the hosting quick view.
    #[default]
    Close,
}

/// A cart line: which variant and how many.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BagLine {
    pub variant_id: String,
    pub quantity: u32,
}

/// Work handed out by [`AddToBag::begin`].
///
/// `generation` ties the eventual outcome to this exact attempt; outcomes for
/// an older generation are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub line: BagLine,
    pub generation: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddToBag {
    state: BagState,
    generation: u64,
}

impl AddToBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> &BagState {
        &self.state
    }

    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns `true` if [`begin`](Self::begin) would start a submission for
    /// `variant`.
    #[must_use]
    pub fn can_submit(&self, variant: Option<&Variant>) -> bool {
        self.state == BagState::Idle && variant.is_some()
    }

    /// `idle → submitting`.
    ///
    /// No-op unless the state is `idle`, a variant is resolved, and
    /// `quantity` is positive.
    pub fn begin(&mut self, variant: Option<&Variant>, quantity: u32) -> Option<Submission> {
        if quantity == 0 || !self.can_submit(variant) {
            return None;
        }
        let variant = variant?;

        self.generation += 1;
        self.state = BagState::Submitting;
        Some(Submission {
            line: BagLine {
                variant_id: variant.id.clone(),
                quantity,
            },
            generation: self.generation,
        })
    }

    /// `submitting → success | error`.
    ///
    /// Ignored when `generation` is stale or the machine is not submitting.
    pub fn finish(&mut self, generation: u64, outcome: Result<(), String>) -> bool {
        if generation != self.generation || self.state != BagState::Submitting {
            return false;
        }
        self.state = match outcome {
            Ok(()) => BagState::Success,
            Err(message) => BagState::Error { message },
        };
        true
    }

    /// `success → idle` once the success message has been displayed.
    pub fn settle(&mut self, generation: u64) -> bool {
        if generation != self.generation || self.state != BagState::Success {
            return false;
        }
        self.state = BagState::Idle;
        true
    }

    /// `error → idle` when the shopper acknowledges the failure.
    pub fn dismiss_error(&mut self) -> bool {
        if !matches!(self.state, BagState::Error { .. }) {
            return false;
        }
        self.state = BagState::Idle;
        true
    }

    /// Back to `idle`, invalidating any outstanding submission.
    pub fn reset(&mut self) {
        self.generation += 1;
        self.state = BagState::Idle;
    }

    /// Text for the add-to-bag button.
    #[must_use]
    pub fn button_label(&self) -> &'static str {
        match self.state {
            BagState::Submitting => "Adding...",
            BagState::Success => "Added!",
            BagState::Idle | BagState::Error { .. } => "Add to Bag",
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::catalog::Money;

    fn variant() -> Variant {
        Variant {
            id: "gid://shopify/ProductVariant/11".to_string(),
            title: "M".to_string(),
            price: Money::new(Decimal::new(2_500, 2), "USD"),
            selected_options: Vec::new(),
            image: None,
            available_for_sale: true,
        }
    }

    #[test]
    fn begin_from_idle_with_variant_submits() {
        let v = variant();
        let mut bag = AddToBag::new();

        let submission = bag.begin(Some(&v), 2).expect("submission");
        assert_eq!(bag.state(), &BagState::Submitting);
        assert_eq!(submission.line.variant_id, v.id);
        assert_eq!(submission.line.quantity, 2);
        assert_eq!(submission.generation, bag.generation());
        assert_eq!(bag.button_label(), "Adding...");
    }

    #[test]
    fn begin_without_variant_is_noop() {
        let mut bag = AddToBag::new();
        assert!(bag.begin(None, 1).is_none());
        assert_eq!(bag.state(), &BagState::Idle);
        assert_eq!(bag.generation(), 0);
    }

    #[test]
    fn begin_with_zero_quantity_is_noop() {
        let v = variant();
        let mut bag = AddToBag::new();
        assert!(bag.begin(Some(&v), 0).is_none());
        assert_eq!(bag.state(), &BagState::Idle);
    }

    #[test]
    fn begin_while_submitting_is_noop() {
        let v = variant();
        let mut bag = AddToBag::new();
        let first = bag.begin(Some(&v), 1).expect("submission");
        assert!(bag.begin(Some(&v), 1).is_none());
        assert_eq!(bag.generation(), first.generation);
    }

    #[test]
    fn begin_while_success_is_noop() {
        let v = variant();
        let mut bag = AddToBag::new();
        let s = bag.begin(Some(&v), 1).expect("submission");
        assert!(bag.finish(s.generation, Ok(())));
        assert_eq!(bag.button_label(), "Added!");

        assert!(bag.begin(Some(&v), 1).is_none());
        assert_eq!(bag.state(), &BagState::Success);
    }

    #[test]
    fn success_settles_back_to_idle() {
        let v = variant();
        let mut bag = AddToBag::new();
        let s = bag.begin(Some(&v), 1).expect("submission");
        bag.finish(s.generation, Ok(()));

        assert!(bag.settle(s.generation));
        assert_eq!(bag.state(), &BagState::Idle);
        assert!(bag.can_submit(Some(&v)));
    }

    #[test]
    fn failure_then_dismiss_allows_retry() {
        let v = variant();
        let mut bag = AddToBag::new();
        let s = bag.begin(Some(&v), 1).expect("submission");
        assert!(bag.finish(s.generation, Err("Out of stock".to_string())));
        assert_eq!(
            bag.state(),
            &BagState::Error {
                message: "Out of stock".to_string()
            }
        );
        assert!(bag.begin(Some(&v), 1).is_none());

        assert!(bag.dismiss_error());
        assert!(bag.begin(Some(&v), 1).is_some());
    }

    #[test]
    fn dismiss_error_outside_error_is_noop() {
        let mut bag = AddToBag::new();
        assert!(!bag.dismiss_error());
    }

    #[test]
    fn stale_completion_after_reset_is_ignored() {
        let v = variant();
        let mut bag = AddToBag::new();
        let s = bag.begin(Some(&v), 1).expect("submission");

        bag.reset();
        assert!(!bag.finish(s.generation, Ok(())));
        assert_eq!(bag.state(), &BagState::Idle);
    }

    #[test]
    fn settle_with_stale_generation_is_ignored() {
        let v = variant();
        let mut bag = AddToBag::new();
        let s = bag.begin(Some(&v), 1).expect("submission");
        bag.finish(s.generation, Ok(()));

        assert!(!bag.settle(s.generation + 1));
        assert_eq!(bag.state(), &BagState::Success);
    }

    #[test]
    fn state_serializes_with_status_tag() {
        let json = serde_json::to_value(BagState::Error {
            message: "nope".to_string(),
        })
        .unwrap();
        assert_eq!(json, serde_json::json!({"status": "error", "message": "nope"}));

        let idle = serde_json::to_value(BagState::Idle).unwrap();
        assert_eq!(idle, serde_json::json!({"status": "idle"}));
    }

    #[test]
    fn success_action_defaults_to_close() {
        assert_eq!(SuccessAction::default(), SuccessAction::Close);
        let parsed: SuccessAction = serde_json::from_str("\"reset\"").unwrap();
        assert_eq!(parsed, SuccessAction::Reset);
    }
}
