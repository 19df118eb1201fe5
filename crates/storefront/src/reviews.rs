//! Review listing and submission helpers.

use std::fmt;
use std::str::FromStr;

use lumina_core::{ProductId, UserRole};
use rust_decimal::{Decimal, RoundingStrategy};
use thiserror::Error;

use crate::api::{NewReview, Review};

/// Reviews shown per page.
pub const REVIEWS_PER_PAGE: usize = 5;

/// Longest accepted review comment, in characters.
pub const MAX_COMMENT_CHARS: usize = 500;

/// Review form validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReviewError {
    #[error("Please choose a rating")]
    MissingRating,

    #[error("Rating must be between 1 and 5, got {0}")]
    RatingOutOfRange(u8),

    #[error("Please write a comment")]
    EmptyComment,

    #[error("Comment must be at most {max} characters")]
    CommentTooLong { max: usize },

    #[error("Unknown review sort: {0}")]
    UnknownSort(String),
}

/// Review list ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReviewSort {
    /// Most recent first.
    #[default]
    Newest,
    /// Highest rating first.
    Highest,
    /// Lowest rating first.
    Lowest,
}

impl ReviewSort {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Highest => "highest",
            Self::Lowest => "lowest",
        }
    }
}

impl fmt::Display for ReviewSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReviewSort {
    type Err = ReviewError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "newest" => Ok(Self::Newest),
            "highest" => Ok(Self::Highest),
            "lowest" => Ok(Self::Lowest),
            other => Err(ReviewError::UnknownSort(other.to_string())),
        }
    }
}

/// Sort reviews in place. Equal keys keep their backend order.
pub fn sort_reviews(reviews: &mut [Review], sort: ReviewSort) {
    match sort {
        ReviewSort::Newest => reviews.sort_by(|a, b| b.date.cmp(&a.date)),
        ReviewSort::Highest => reviews.sort_by(|a, b| b.rating.cmp(&a.rating)),
        ReviewSort::Lowest => reviews.sort_by(|a, b| a.rating.cmp(&b.rating)),
    }
}

/// Mean star rating rounded to one decimal place, zero when there are none.
#[must_use]
pub fn average_rating(reviews: &[Review]) -> Decimal {
    if reviews.is_empty() {
        return Decimal::ZERO;
    }
    let sum: u64 = reviews.iter().map(|r| u64::from(r.rating)).sum();
    let mean = Decimal::from(sum) / Decimal::from(reviews.len());
    mean.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero)
}

/// Number of pages needed for `total` reviews.
#[must_use]
pub const fn page_count(total: usize) -> usize {
    total.div_ceil(REVIEWS_PER_PAGE)
}

/// The reviews on 1-based page `page`. Out-of-range pages are empty.
#[must_use]
pub fn page(reviews: &[Review], page: usize) -> &[Review] {
    let Some(start) = page
        .checked_sub(1)
        .and_then(|p| p.checked_mul(REVIEWS_PER_PAGE))
    else {
        return &[];
    };
    let end = start.saturating_add(REVIEWS_PER_PAGE).min(reviews.len());
    reviews.get(start..end).unwrap_or(&[])
}

/// Apply a successful helpful / not helpful vote to the local copy.
pub fn record_vote(review: &mut Review, is_helpful: bool) {
    if is_helpful {
        review.helpful_yes = review.helpful_yes.saturating_add(1);
    } else {
        review.helpful_no = review.helpful_no.saturating_add(1);
    }
}

/// Whether the signed-in user may delete `review`.
#[must_use]
pub fn can_delete(review: &Review, user_email: Option<&str>, role: UserRole) -> bool {
    role.is_admin()
        || user_email.is_some_and(|email| email.eq_ignore_ascii_case(&review.user_email))
}

/// An unsubmitted review as entered in the form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewDraft {
    /// Selected stars; `None` until the shopper picks one.
    pub rating: Option<u8>,
    pub comment: String,
}

impl ReviewDraft {
    /// Check the rating and comment.
    ///
    /// # Errors
    ///
    /// Returns the first failing rule: rating, then comment.
    pub fn validate(&self) -> Result<(), ReviewError> {
        match self.rating {
            None | Some(0) => return Err(ReviewError::MissingRating),
            Some(r) if r > 5 => return Err(ReviewError::RatingOutOfRange(r)),
            Some(_) => {}
        }

        let comment = self.comment.trim();
        if comment.is_empty() {
            return Err(ReviewError::EmptyComment);
        }
        if comment.chars().count() > MAX_COMMENT_CHARS {
            return Err(ReviewError::CommentTooLong {
                max: MAX_COMMENT_CHARS,
            });
        }
        Ok(())
    }

    /// Validate and build the submission body.
    ///
    /// # Errors
    ///
    /// Returns a `ReviewError` if the draft is invalid.
    pub fn into_new_review(
        self,
        product_id: ProductId,
        user_name: &str,
        user_email: &str,
    ) -> Result<NewReview, ReviewError> {
        self.validate()?;
        Ok(NewReview {
            product_id,
            rating: self.rating.unwrap_or_default(),
            comment: self.comment.trim().to_string(),
            user_name: user_name.trim().to_string(),
            user_email: user_email.trim().to_string(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use lumina_core::ReviewId;

    fn review(id: &str, rating: u8, day: u32) -> Review {
        Review {
            id: ReviewId::new(id),
            product_id: ProductId::new("COSM24001"),
            user_name: "Ann".to_string(),
            user_email: "ann@example.com".to_string(),
            rating,
            comment: "Lovely".to_string(),
            date: Utc.with_ymd_and_hms(2025, 5, day, 9, 0, 0).unwrap(),
            helpful_yes: 0,
            helpful_no: 0,
        }
    }

    fn ids(reviews: &[Review]) -> Vec<&str> {
        reviews.iter().map(|r| r.id.as_str()).collect()
    }

    #[test]
    fn test_sort_orders() {
        let mut reviews = vec![review("a", 3, 1), review("b", 5, 3), review("c", 3, 2)];

        sort_reviews(&mut reviews, ReviewSort::Newest);
        assert_eq!(ids(&reviews), ["b", "c", "a"]);

        sort_reviews(&mut reviews, ReviewSort::Lowest);
        assert_eq!(ids(&reviews), ["c", "a", "b"]);

        sort_reviews(&mut reviews, ReviewSort::Highest);
        assert_eq!(ids(&reviews), ["b", "c", "a"]);
    }

    #[test]
    fn test_sort_parse() {
        assert_eq!("Highest".parse::<ReviewSort>().unwrap(), ReviewSort::Highest);
        assert!("best".parse::<ReviewSort>().is_err());
        assert_eq!(ReviewSort::default().to_string(), "newest");
    }

    #[test]
    fn test_average_rating() {
        assert_eq!(average_rating(&[]), Decimal::ZERO);
        let reviews = [review("a", 5, 1), review("b", 4, 1), review("c", 4, 1)];
        // 13 / 3 = 4.333..
        assert_eq!(average_rating(&reviews), Decimal::new(43, 1));
        let reviews = [review("a", 5, 1), review("b", 4, 1)];
        assert_eq!(average_rating(&reviews), Decimal::new(45, 1));
    }

    #[test]
    fn test_pagination() {
        let reviews: Vec<Review> = (1..=12).map(|d| review(&d.to_string(), 4, d)).collect();
        assert_eq!(page_count(reviews.len()), 3);
        assert_eq!(page_count(0), 0);
        assert_eq!(page(&reviews, 1).len(), 5);
        assert_eq!(ids(page(&reviews, 3)), ["11", "12"]);
        assert!(page(&reviews, 0).is_empty());
        assert!(page(&reviews, 4).is_empty());
    }

    #[test]
    fn test_draft_validation() {
        let mut draft = ReviewDraft::default();
        assert_eq!(draft.validate(), Err(ReviewError::MissingRating));

        draft.rating = Some(6);
        assert_eq!(draft.validate(), Err(ReviewError::RatingOutOfRange(6)));

        draft.rating = Some(4);
        draft.comment = "   ".to_string();
        assert_eq!(draft.validate(), Err(ReviewError::EmptyComment));

        draft.comment = "x".repeat(MAX_COMMENT_CHARS + 1);
        assert_eq!(
            draft.validate(),
            Err(ReviewError::CommentTooLong {
                max: MAX_COMMENT_CHARS
            })
        );

        draft.comment = " Great glow ".to_string();
        let new = draft
            .into_new_review(ProductId::new("P1"), "Ann", "ann@example.com")
            .unwrap();
        assert_eq!(new.comment, "Great glow");
        assert_eq!(new.rating, 4);
    }

    #[test]
    fn test_votes_and_delete_permission() {
        let mut r = review("a", 5, 1);
        record_vote(&mut r, true);
        record_vote(&mut r, false);
        record_vote(&mut r, true);
        assert_eq!((r.helpful_yes, r.helpful_no), (2, 1));

        assert!(can_delete(&r, Some("ANN@example.com"), UserRole::Customer));
        assert!(!can_delete(&r, Some("bob@example.com"), UserRole::Customer));
        assert!(!can_delete(&r, None, UserRole::Customer));
        assert!(can_delete(&r, None, UserRole::Admin));
    }
}
