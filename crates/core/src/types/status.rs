//! Status and role enums shared by the storefront and admin surfaces.
//!
//! All of these travel over the wire as lowercase strings, matching the
//! backend's representation.

use serde::{Deserialize, Serialize};

/// Error returned when a status string is not recognised.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct StatusParseError {
    /// What was being parsed (e.g. "order status").
    pub kind: &'static str,
    /// The rejected input.
    pub value: String,
}

/// Order lifecycle status, as managed from the admin orders page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    #[default]
    Pending,
    Completed,
    Cancelled,
    Returned,
}

impl OrderStatus {
    /// Every status, in display order.
    pub const ALL: [Self; 4] = [
        Self::Pending,
        Self::Completed,
        Self::Cancelled,
        Self::Returned,
    ];

    /// Wire representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Returned => "returned",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "returned" => Ok(Self::Returned),
            _ => Err(StatusParseError {
                kind: "order status",
                value: s.to_string(),
            }),
        }
    }
}

/// How the shopper pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Cash on delivery.
    #[default]
    Cash,
    /// Credit or debit card.
    Card,
    /// Bank transfer.
    Bank,
}

impl PaymentMethod {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Cash => "Cash on Delivery",
            Self::Card => "Credit/Debit Card",
            Self::Bank => "Bank Transfer",
        }
    }
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Cash => write!(f, "cash"),
            Self::Card => write!(f, "card"),
            Self::Bank => write!(f, "bank"),
        }
    }
}

impl std::str::FromStr for PaymentMethod {
    type Err = StatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(Self::Cash),
            "card" => Ok(Self::Card),
            "bank" => Ok(Self::Bank),
            _ => Err(StatusParseError {
                kind: "payment method",
                value: s.to_string(),
            }),
        }
    }
}

/// Role attached to a signed-in account.
///
/// Unknown roles from the backend deserialize as `Customer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// Store administrator with access to the back-office.
    Admin,
    /// Regular shopper.
    #[default]
    #[serde(other)]
    Customer,
}

impl UserRole {
    /// Whether this role may use the admin back-office.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_order_status_round_trips_through_str() {
        for status in OrderStatus::ALL {
            assert_eq!(status.to_string().parse::<OrderStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_order_status_parse_is_case_insensitive() {
        assert_eq!(" Completed ".parse::<OrderStatus>(), Ok(OrderStatus::Completed));
        let err = "shipped".parse::<OrderStatus>().unwrap_err();
        assert_eq!(err.to_string(), "invalid order status: shipped");
    }

    #[test]
    fn test_payment_method_default_is_cash() {
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert_eq!(PaymentMethod::Cash.label(), "Cash on Delivery");
        assert_eq!(
            serde_json::to_string(&PaymentMethod::Bank).unwrap(),
            "\"bank\""
        );
    }

    #[test]
    fn test_user_role_unknown_is_customer() {
        let role: UserRole = serde_json::from_str("\"user\"").unwrap();
        assert_eq!(role, UserRole::Customer);
        let admin: UserRole = serde_json::from_str("\"admin\"").unwrap();
        assert!(admin.is_admin());
    }
}
