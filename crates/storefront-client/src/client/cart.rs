//! Cart mutations used by the add-to-bag flow.

use serde_json::json;
use storefront_core::BagLine;

use crate::error::ClientError;
use crate::normalize::user_error_message;
use crate::queries::{CART_CREATE_MUTATION, CART_LINES_ADD_MUTATION};
use crate::types::{Cart, CartCreateData, CartLinesAddData, CartPayload};

use super::StorefrontClient;

fn line_inputs(lines: &[BagLine]) -> serde_json::Value {
    lines
        .iter()
        .map(|line| json!({ "merchandiseId": line.variant_id, "quantity": line.quantity }))
        .collect()
}

/// Turns a mutation payload into a cart, surfacing `userErrors`.
fn into_cart(operation: &str, payload: Option<CartPayload>) -> Result<Cart, ClientError> {
    let payload = payload.ok_or_else(|| ClientError::EmptyResponse {
        operation: operation.to_owned(),
    })?;

    if !payload.user_errors.is_empty() {
        return Err(ClientError::CartUserErrors {
            message: user_error_message(&payload.user_errors),
        });
    }

    payload
        .cart
        .map(Cart::from)
        .ok_or_else(|| ClientError::EmptyResponse {
            operation: operation.to_owned(),
        })
}

impl StorefrontClient {
    /// Creates a new cart containing `lines`.
    ///
    /// Sent once: a mutation whose response was lost may already have
    /// applied, so transient failures are returned instead of retried.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::CartUserErrors`] if the backend rejects the
    /// lines (unknown or sold-out merchandise, bad quantity), or any error
    /// from the GraphQL request.
    pub async fn create_cart(&self, lines: &[BagLine]) -> Result<Cart, ClientError> {
        let variables = json!({ "input": { "lines": line_inputs(lines) } });
        let data: CartCreateData = self
            .execute_once("cartCreate", CART_CREATE_MUTATION, &variables)
            .await?;
        let cart = into_cart("cartCreate", data.cart_create)?;
        tracing::info!(cart_id = %cart.id, quantity = cart.total_quantity, "cart created");
        Ok(cart)
    }

    /// Adds `lines` to an existing cart.
    ///
    /// # Errors
    ///
    /// Same as [`Self::create_cart`]. Also sent once.
    pub async fn add_cart_lines(
        &self,
        cart_id: &str,
        lines: &[BagLine],
    ) -> Result<Cart, ClientError> {
        let variables = json!({ "cartId": cart_id, "lines": line_inputs(lines) });
        let data: CartLinesAddData = self
            .execute_once("cartLinesAdd", CART_LINES_ADD_MUTATION, &variables)
            .await?;
        let cart = into_cart("cartLinesAdd", data.cart_lines_add)?;
        tracing::info!(cart_id = %cart.id, quantity = cart.total_quantity, "cart lines added");
        Ok(cart)
    }
}
