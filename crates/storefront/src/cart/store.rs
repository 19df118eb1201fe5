//! Persisted cart store.

use lumina_core::Price;
use tracing::{debug, error, warn};

use super::{Cart, CartChange, CartProduct};
use crate::storage::{Storage, keys};

/// Owns the persisted cart and exposes the operations views call.
///
/// Every operation reads the cart fresh from storage, so the store never
/// serves stale state. Mutations are a single read-modify-write and return
/// the resulting cart so callers can re-render without another read.
///
/// No operation returns an error. Unreadable stored data is treated as an
/// empty cart; a failed write is logged and the computed cart is still
/// returned.
#[derive(Debug)]
pub struct CartStore<S> {
    storage: S,
}

impl<S: Storage> CartStore<S> {
    /// Wrap a storage backend.
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// The current cart, in stored order. Empty if nothing is stored.
    #[must_use]
    pub fn get_cart(&self) -> Cart {
        match self.storage.get(keys::CART) {
            Ok(Some(raw)) => Cart::from_stored(&raw),
            Ok(None) => Cart::new(),
            Err(e) => {
                warn!(error = %e, "Cart storage unavailable, treating cart as empty");
                Cart::new()
            }
        }
    }

    /// Add `delta` units of `product` (negative to take units away).
    ///
    /// See [`Cart::apply_delta`] for the merge rules.
    pub fn add_to_cart(&mut self, product: &impl CartProduct, delta: i64) -> Cart {
        let mut cart = self.get_cart();
        let change = cart.apply_delta(product, delta);
        debug!(product_id = %product.product_id(), delta, ?change, "Cart updated");
        self.commit(&cart, change);
        cart
    }

    /// Remove the line item for `product_id`, if present.
    pub fn remove_from_cart(&mut self, product_id: &str) -> Cart {
        let mut cart = self.get_cart();
        let change = if cart.remove(product_id) {
            CartChange::Removed
        } else {
            CartChange::Unchanged
        };
        debug!(product_id, ?change, "Cart line removed");
        self.commit(&cart, change);
        cart
    }

    /// Remove every line item.
    pub fn clear(&mut self) -> Cart {
        if let Err(e) = self.storage.remove(keys::CART) {
            error!(error = %e, "Failed to clear stored cart");
        }
        Cart::new()
    }

    /// Sum of `price * qty` over the current cart.
    #[must_use]
    pub fn get_total(&self) -> Price {
        self.get_cart().total()
    }

    /// Number of units in the current cart.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.get_cart().item_count()
    }

    /// The underlying storage.
    pub const fn storage(&self) -> &S {
        &self.storage
    }

    /// Consume the store, returning the storage backend.
    pub fn into_inner(self) -> S {
        self.storage
    }

    fn commit(&mut self, cart: &Cart, change: CartChange) {
        if !change.is_change() {
            return;
        }

        let raw = match cart.to_stored() {
            Ok(raw) => raw,
            Err(e) => {
                error!(error = %e, "Failed to encode cart");
                return;
            }
        };

        if let Err(e) = self.storage.set(keys::CART, &raw) {
            error!(error = %e, "Failed to persist cart");
        }
    }
}
