//! Catalogue browsing commands.

#![allow(clippy::print_stdout)]

use lumina_core::ProductId;
use lumina_storefront::api::Product;
use lumina_storefront::error::AppError;

use super::Context;

pub async fn list(ctx: &Context) -> Result<(), AppError> {
    print_products(&ctx.api.list_products().await?);
    Ok(())
}

pub async fn search(ctx: &Context, query: &str) -> Result<(), AppError> {
    let products = ctx.api.search_products(query).await?;
    if products.is_empty() {
        println!("No products match \"{}\"", query.trim());
        return Ok(());
    }
    print_products(&products);
    Ok(())
}

pub async fn show(ctx: &Context, product_id: &ProductId) -> Result<(), AppError> {
    let product = ctx.api.get_product(product_id).await?;

    println!("{} ({})", product.name, product.product_id);
    if !product.alt_names.is_empty() {
        println!("Also known as: {}", product.alt_names.join(", "));
    }
    println!("Price: {}", price_label(&product));
    println!(
        "Stock: {}",
        if product.in_stock() {
            format!("{} available", product.stock)
        } else {
            "out of stock".to_string()
        }
    );
    if let Some(image) = product.primary_image() {
        println!("Image: {image}");
    }
    if !product.description.is_empty() {
        println!();
        println!("{}", product.description);
    }
    Ok(())
}

fn print_products(products: &[Product]) {
    for product in products {
        println!(
            "{:<12} {:<40} {}",
            product.product_id.as_str(),
            product.name,
            price_label(product)
        );
    }
}

fn price_label(product: &Product) -> String {
    match product.discount_percent() {
        Some(pct) => format!(
            "{} (was {}, -{pct}%)",
            product.price, product.labelled_price
        ),
        None => product.price.display(),
    }
}
