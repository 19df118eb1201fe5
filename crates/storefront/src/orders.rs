//! Order list filtering for the admin orders view.

use std::fmt;
use std::str::FromStr;

use lumina_core::{OrderStatus, Price, StatusParseError};

use crate::api::Order;

/// Which orders to show.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(OrderStatus),
}

impl StatusFilter {
    #[must_use]
    pub fn matches(self, order: &Order) -> bool {
        match self {
            Self::All => true,
            Self::Only(status) => order.status == status,
        }
    }
}

impl fmt::Display for StatusFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Only(status) => status.fmt(f),
        }
    }
}

impl FromStr for StatusFilter {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse().map(Self::Only)
    }
}

impl From<OrderStatus> for StatusFilter {
    fn from(status: OrderStatus) -> Self {
        Self::Only(status)
    }
}

/// Orders matching `filter`, in their original order.
#[must_use]
pub fn filter_orders(orders: &[Order], filter: StatusFilter) -> Vec<&Order> {
    orders.iter().filter(|o| filter.matches(o)).collect()
}

/// Sum of order totals.
#[must_use]
pub fn revenue<'a>(orders: impl IntoIterator<Item = &'a Order>) -> Price {
    orders.into_iter().map(|o| o.total).sum()
}
