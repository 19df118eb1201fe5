//! Cart commands.
//!
//! # Usage
//!
//! ```bash
//! lumina cart add COSM24001 --qty 2
//! lumina cart list
//! lumina cart remove COSM24001
//! ```

#![allow(clippy::print_stdout)]

use lumina_core::ProductId;
use lumina_storefront::cart::Cart;
use lumina_storefront::error::AppError;

use super::Context;

pub fn list(ctx: &Context) {
    print_cart(&ctx.cart().get_cart());
}

/// Add `qty` units of a product.
///
/// A product already in the cart is adjusted from its stored snapshot;
/// otherwise it is fetched from the catalogue first.
pub async fn add(ctx: &Context, product_id: &ProductId, qty: i64) -> Result<(), AppError> {
    let mut store = ctx.cart();
    let existing = store.get_cart().get(product_id.as_str()).cloned();

    let cart = if let Some(line) = existing {
        store.add_to_cart(&line, qty)
    } else {
        if qty <= 0 {
            println!("{product_id} is not in the cart");
            return Ok(());
        }
        let product = ctx.api.get_product(product_id).await?;
        if !product.in_stock() {
            return Err(AppError::BadRequest(format!(
                "{} is out of stock",
                product.name
            )));
        }
        store.add_to_cart(&product, qty)
    };

    print_cart(&cart);
    Ok(())
}

pub fn remove(ctx: &Context, product_id: &ProductId) {
    print_cart(&ctx.cart().remove_from_cart(product_id.as_str()));
}

pub fn clear(ctx: &Context) {
    ctx.cart().clear();
    println!("Cart cleared");
}

pub fn total(ctx: &Context) {
    println!("{}", ctx.cart().get_total());
}

pub(super) fn print_cart(cart: &Cart) {
    if cart.is_empty() {
        println!("Your cart is empty");
        return;
    }

    for item in cart {
        let was = if item.is_discounted() {
            format!(" (was {})", item.labelled_line_total())
        } else {
            String::new()
        };
        println!(
            "{:<12} {:<40} {:>3} x {:>9} = {:>10}{was}",
            item.product_id.as_str(),
            item.name,
            item.qty,
            item.price.display(),
            item.line_total().display(),
        );
    }

    println!();
    println!("Items:    {}", cart.item_count());
    if !cart.savings().is_zero() {
        println!("Subtotal: {}", cart.labelled_total());
        println!("Savings:  {}", cart.savings());
    }
    println!("Total:    {}", cart.total());
}
