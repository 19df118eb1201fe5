//! Shopping cart state.
//!
//! A [`Cart`] is an ordered list of [`CartLineItem`]s keyed by product ID.
//! Line items carry a snapshot of the product's display fields taken when the
//! product was first added, so the cart renders without a network round-trip.
//! Later quantity changes never refresh the snapshot.
//!
//! Invariants upheld by every mutation:
//! - no two line items share a product ID
//! - every line item has `qty >= 1`; driving a quantity to zero or below
//!   removes the line item
//!
//! [`CartStore`] persists a cart in [`Storage`](crate::storage::Storage).

mod store;

pub use store::CartStore;

use lumina_core::{Price, ProductId};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::Product;

/// Anything that can be put into a cart.
///
/// Implemented by catalogue [`Product`]s and by [`CartLineItem`] itself, so a
/// cart page can re-add an existing line with `+1` / `-1`.
pub trait CartProduct {
    /// Merge key.
    fn product_id(&self) -> &ProductId;
    /// Display name.
    fn name(&self) -> &str;
    /// Primary image URL.
    fn image(&self) -> Option<&str>;
    /// Selling price.
    fn price(&self) -> Price;
    /// List price.
    fn labelled_price(&self) -> Price;
}

impl CartProduct for Product {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        self.primary_image()
    }

    fn price(&self) -> Price {
        self.price
    }

    fn labelled_price(&self) -> Price {
        self.labelled_price
    }
}

/// One product in the cart and how many of it the shopper wants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLineItem {
    pub product_id: ProductId,
    pub name: String,
    #[serde(default)]
    pub image: String,
    pub price: Price,
    pub labelled_price: Price,
    pub qty: u32,
}

impl CartLineItem {
    /// Snapshot `product` into a new line item.
    #[must_use]
    pub fn snapshot(product: &impl CartProduct, qty: u32) -> Self {
        Self {
            product_id: product.product_id().clone(),
            name: product.name().to_string(),
            image: product.image().unwrap_or_default().to_string(),
            price: product.price(),
            labelled_price: product.labelled_price(),
            qty,
        }
    }

    /// `price * qty`.
    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.qty)
    }

    /// `labelled_price * qty`.
    #[must_use]
    pub fn labelled_line_total(&self) -> Price {
        self.labelled_price.times(self.qty)
    }

    /// Whether the line sells below its list price.
    #[must_use]
    pub fn is_discounted(&self) -> bool {
        lumina_core::is_discounted(self.price, self.labelled_price)
    }
}

impl CartProduct for CartLineItem {
    fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn image(&self) -> Option<&str> {
        Some(self.image.as_str()).filter(|s| !s.is_empty())
    }

    fn price(&self) -> Price {
        self.price
    }

    fn labelled_price(&self) -> Price {
        self.labelled_price
    }
}

/// What a mutation did to the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartChange {
    /// A new line item was inserted with this quantity.
    Inserted(u32),
    /// An existing line item now has this quantity.
    Updated(u32),
    /// A line item was removed.
    Removed,
    /// Nothing changed.
    Unchanged,
}

impl CartChange {
    /// Whether the cart contents changed.
    #[must_use]
    pub const fn is_change(&self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

/// An ordered collection of line items with unique product IDs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// A detached one-line cart holding a single unit of `product`.
    ///
    /// Used by "Buy Now", which checks out a product without touching the
    /// persisted cart.
    #[must_use]
    pub fn single(product: &impl CartProduct) -> Self {
        let mut cart = Self::new();
        cart.apply_delta(product, 1);
        cart
    }

    /// Decode a persisted cart.
    ///
    /// Never fails: a value that is not a JSON array yields an empty cart,
    /// records that do not parse or have `qty == 0` or a blank product ID
    /// are dropped, and duplicate product IDs are merged into the first
    /// occurrence.
    #[must_use]
    pub fn from_stored(raw: &str) -> Self {
        let records: Vec<serde_json::Value> = match serde_json::from_str(raw) {
            Ok(records) => records,
            Err(e) => {
                warn!(error = %e, "Stored cart is unreadable, treating it as empty");
                return Self::new();
            }
        };

        let mut cart = Self::new();
        for record in records {
            let item: CartLineItem = match serde_json::from_value(record) {
                Ok(item) => item,
                Err(e) => {
                    warn!(error = %e, "Dropping malformed cart line item");
                    continue;
                }
            };
            if item.product_id.is_blank() || item.qty == 0 {
                warn!(product_id = %item.product_id, qty = item.qty, "Dropping invalid cart line item");
                continue;
            }
            match cart.position(&item.product_id) {
                Some(idx) => {
                    if let Some(existing) = cart.items.get_mut(idx) {
                        existing.qty = existing.qty.saturating_add(item.qty);
                    }
                }
                None => cart.items.push(item),
            }
        }
        cart
    }

    /// Encode for persistence.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_stored(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&self.items)
    }

    /// Line items in insertion order.
    #[must_use]
    pub fn items(&self) -> &[CartLineItem] {
        &self.items
    }

    /// Consume the cart, returning its line items.
    #[must_use]
    pub fn into_items(self) -> Vec<CartLineItem> {
        self.items
    }

    /// Number of distinct line items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the cart has no line items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Look up the line item for a product.
    #[must_use]
    pub fn get(&self, product_id: &str) -> Option<&CartLineItem> {
        self.items
            .iter()
            .find(|item| item.product_id.as_str() == product_id)
    }

    /// Total number of units across all line items.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.qty)).sum()
    }

    /// Sum of `price * qty` using the selling price.
    #[must_use]
    pub fn total(&self) -> Price {
        self.items.iter().map(CartLineItem::line_total).sum()
    }

    /// Sum of `labelled_price * qty`.
    #[must_use]
    pub fn labelled_total(&self) -> Price {
        self.items.iter().map(CartLineItem::labelled_line_total).sum()
    }

    /// How much the shopper saves against list prices, never negative.
    #[must_use]
    pub fn savings(&self) -> Price {
        let (labelled, total) = (self.labelled_total(), self.total());
        if labelled > total {
            labelled - total
        } else {
            Price::ZERO
        }
    }

    /// Add `delta` units of `product`, which may be negative.
    ///
    /// - absent product, positive delta: inserts a new line item
    /// - present product: adjusts the quantity, removing the line item if it
    ///   drops to zero or below; snapshot fields are left untouched
    /// - absent product, zero or negative delta: no-op
    ///
    /// A product with a blank ID is ignored.
    pub fn apply_delta(&mut self, product: &impl CartProduct, delta: i64) -> CartChange {
        let product_id = product.product_id();
        if product_id.is_blank() {
            warn!(delta, "Ignoring cart update for a product without an ID");
            return CartChange::Unchanged;
        }

        match self.position(product_id) {
            Some(idx) => self.adjust_at(idx, delta),
            None if delta > 0 => {
                let qty = clamp_qty(delta);
                self.items.push(CartLineItem::snapshot(product, qty));
                CartChange::Inserted(qty)
            }
            None => CartChange::Unchanged,
        }
    }

    /// Adjust the quantity of a line already in the cart.
    ///
    /// Unlike [`apply_delta`](Self::apply_delta) this never inserts.
    pub fn change_qty(&mut self, product_id: &str, delta: i64) -> CartChange {
        match self
            .items
            .iter()
            .position(|item| item.product_id.as_str() == product_id)
        {
            Some(idx) => self.adjust_at(idx, delta),
            None => CartChange::Unchanged,
        }
    }

    /// Remove the line item for a product. Returns whether one was removed.
    pub fn remove(&mut self, product_id: &str) -> bool {
        let before = self.items.len();
        self.items
            .retain(|item| item.product_id.as_str() != product_id);
        self.items.len() != before
    }

    /// Remove every line item.
    pub fn clear(&mut self) {
        self.items.clear();
    }

    fn position(&self, product_id: &ProductId) -> Option<usize> {
        self.items
            .iter()
            .position(|item| &item.product_id == product_id)
    }

    fn adjust_at(&mut self, idx: usize, delta: i64) -> CartChange {
        let Some(item) = self.items.get_mut(idx) else {
            return CartChange::Unchanged;
        };

        let qty = i64::from(item.qty).saturating_add(delta);
        if qty <= 0 {
            self.items.remove(idx);
            return CartChange::Removed;
        }

        let qty = clamp_qty(qty);
        if qty == item.qty {
            return CartChange::Unchanged;
        }
        item.qty = qty;
        CartChange::Updated(qty)
    }
}

/// Convert a positive quantity to `u32`, saturating at `u32::MAX`.
fn clamp_qty(qty: i64) -> u32 {
    u32::try_from(qty).unwrap_or(u32::MAX)
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl From<Vec<CartLineItem>> for Cart {
    /// Build a cart from line items, enforcing the cart invariants.
    fn from(items: Vec<CartLineItem>) -> Self {
        let mut cart = Self::new();
        for item in items {
            let qty = i64::from(item.qty);
            cart.apply_delta(&item, qty);
        }
        cart
    }
}
