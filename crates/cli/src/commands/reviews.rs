//! Review commands.

#![allow(clippy::print_stdout)]

use lumina_core::{ProductId, ReviewId};
use lumina_storefront::error::AppError;
use lumina_storefront::reviews::{self, ReviewDraft, ReviewSort};

use super::Context;

/// Who a new review is attributed to.
pub struct Author<'a> {
    pub name: &'a str,
    pub email: &'a str,
}

pub async fn list(
    ctx: &Context,
    product_id: &ProductId,
    sort: ReviewSort,
    page: usize,
) -> Result<(), AppError> {
    let mut all = ctx.api.list_reviews(product_id).await?;
    if all.is_empty() {
        println!("No reviews yet");
        return Ok(());
    }

    reviews::sort_reviews(&mut all, sort);
    let pages = reviews::page_count(all.len());
    println!(
        "{} reviews, average {} / 5 (page {page} of {pages}, {sort})",
        all.len(),
        reviews::average_rating(&all)
    );

    for review in reviews::page(&all, page) {
        println!();
        println!(
            "[{}] {}{} by {} on {}",
            review.id,
            "*".repeat(usize::from(review.rating)),
            " ".repeat(5_usize.saturating_sub(usize::from(review.rating))),
            review.user_name,
            review.date.format("%Y-%m-%d")
        );
        println!("  {}", review.comment);
        println!(
            "  helpful: {} yes / {} no",
            review.helpful_yes, review.helpful_no
        );
    }
    Ok(())
}

pub async fn add(
    ctx: &Context,
    product_id: ProductId,
    rating: u8,
    comment: String,
    author: &Author<'_>,
) -> Result<(), AppError> {
    let draft = ReviewDraft {
        rating: Some(rating),
        comment,
    };
    // Validate before demanding a sign-in
    let review = draft.into_new_review(product_id, author.name, author.email)?;
    let token = ctx.require_token()?;

    ctx.api.create_review(&token, &review).await?;
    println!("Thanks! Your review of {} was posted", review.product_id);
    Ok(())
}

pub async fn vote(ctx: &Context, review_id: &ReviewId, is_helpful: bool) -> Result<(), AppError> {
    let token = ctx.require_token()?;
    ctx.api.vote_review(&token, review_id, is_helpful).await?;
    println!("Vote recorded");
    Ok(())
}

pub async fn delete(ctx: &Context, review_id: &ReviewId) -> Result<(), AppError> {
    let token = ctx.require_token()?;
    ctx.api.delete_review(&token, review_id).await?;
    println!("Review {review_id} deleted");
    Ok(())
}
