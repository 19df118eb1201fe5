//! Checkout and order commands.

#![allow(clippy::print_stdout)]

use lumina_core::{OrderId, OrderStatus, PaymentMethod};
use lumina_storefront::api::Order;
use lumina_storefront::checkout::{self, CheckoutForm};
use lumina_storefront::error::AppError;
use lumina_storefront::orders::{self, StatusFilter};

use super::Context;

/// Place an order for the cart, then empty it.
pub async fn checkout(
    ctx: &Context,
    phone: String,
    address: String,
    payment_method: PaymentMethod,
) -> Result<(), AppError> {
    let mut cart_store = ctx.cart();
    let cart = cart_store.get_cart();
    let form = CheckoutForm {
        phone,
        address,
        payment_method,
    };

    let order = checkout::place_order(&ctx.api, &ctx.tokens(), &cart, &form).await?;
    cart_store.clear();

    println!("Order {} placed", order.order_id);
    println!("Total:   {}", order.total);
    println!("Payment: {}", payment_method.label());
    Ok(())
}

pub async fn list(ctx: &Context, filter: StatusFilter) -> Result<(), AppError> {
    let token = ctx.require_token()?;
    let all = ctx.api.list_orders(&token).await?;
    let shown = orders::filter_orders(&all, filter);

    if shown.is_empty() {
        println!("No {filter} orders");
        return Ok(());
    }

    for order in &shown {
        print_order(order);
    }
    println!();
    println!("{} orders, {} total", shown.len(), orders::revenue(shown.iter().copied()));
    Ok(())
}

pub async fn set_status(
    ctx: &Context,
    order_id: &OrderId,
    status: OrderStatus,
) -> Result<(), AppError> {
    let token = ctx.require_token()?;
    ctx.api.update_order_status(&token, order_id, status).await?;
    println!("Order {order_id} is now {status}");
    Ok(())
}

fn print_order(order: &Order) {
    println!(
        "{:<10} {:<10} {:>10}  {}  {} <{}>",
        order.order_id.as_str(),
        order.status.as_str(),
        order.total.display(),
        order.date.format("%Y-%m-%d"),
        order.name,
        order.email
    );
    for item in &order.products {
        println!(
            "    {} x {:<36} {:>10}",
            item.quantity,
            item.product_info.name,
            item.line_total().display()
        );
    }
}
