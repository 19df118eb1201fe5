//! Turning a cart into an order.
//!
//! Checkout validates the shopper's contact details and the cart locally
//! before anything is sent. The backend prices the order itself from the
//! product IDs and quantities; cart snapshots are for display only.

use lumina_core::PaymentMethod;
use thiserror::Error;
use tracing::{info, instrument};

use crate::api::{ApiClient, ApiError, Order, OrderLine, OrderRequest};
use crate::auth::TokenStore;
use crate::cart::Cart;
use crate::storage::Storage;

/// Reasons a checkout can fail.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("A phone number is required")]
    MissingPhone,

    #[error("A delivery address is required")]
    MissingAddress,

    #[error("The cart is empty")]
    EmptyCart,

    #[error("Sign in to place an order")]
    NotAuthenticated,

    #[error(transparent)]
    Api(#[from] ApiError),
}

/// Contact and payment details collected at checkout.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    pub phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
}

impl CheckoutForm {
    /// Check that phone and address are present.
    ///
    /// # Errors
    ///
    /// Returns `MissingPhone` or `MissingAddress` for blank fields, phone first.
    pub fn validate(&self) -> Result<(), CheckoutError> {
        if self.phone.trim().is_empty() {
            return Err(CheckoutError::MissingPhone);
        }
        if self.address.trim().is_empty() {
            return Err(CheckoutError::MissingAddress);
        }
        Ok(())
    }
}

/// Build the order body for `cart`.
///
/// # Errors
///
/// Returns a validation error if the form is incomplete or the cart is empty.
pub fn build_order_request(cart: &Cart, form: &CheckoutForm) -> Result<OrderRequest, CheckoutError> {
    form.validate()?;
    if cart.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    Ok(OrderRequest {
        products: cart
            .items()
            .iter()
            .map(|item| OrderLine {
                product_id: item.product_id.clone(),
                qty: item.qty,
            })
            .collect(),
        phone: form.phone.trim().to_string(),
        address: form.address.trim().to_string(),
        payment_method: form.payment_method,
    })
}

/// Place an order for `cart` as the signed-in shopper.
///
/// The cart is left untouched; callers clear it once the order is confirmed.
///
/// # Errors
///
/// Returns a validation error, `NotAuthenticated` when no token is stored, or
/// `Api` if the backend rejects the order.
#[instrument(skip_all, fields(lines = cart.len(), payment = %form.payment_method))]
pub async fn place_order<S: Storage>(
    api: &ApiClient,
    tokens: &TokenStore<S>,
    cart: &Cart,
    form: &CheckoutForm,
) -> Result<Order, CheckoutError> {
    let request = build_order_request(cart, form)?;
    let token = tokens.get().ok_or(CheckoutError::NotAuthenticated)?;

    let order = api.place_order(&token, &request).await?;
    info!(order_id = %order.order_id, total = %order.total, "Order placed");
    Ok(order)
}
