//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. The backend issues
//! string identifiers (`COSM24001`, `ORD00042`, Mongo object ids), so every
//! ID wraps a `String`.

/// Errors that can occur when parsing an ID.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum IdError {
    /// The input is empty or only whitespace.
    #[error("id cannot be blank")]
    Blank,
}

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `parse()`, `as_str()`, `into_inner()`
/// - `From<String>`, `From<&str>`, `FromStr` and `AsRef<str>` implementations
///
/// Deserialization does not reject blank values; stored data is tolerated
/// and callers check [`is_blank`](ProductId::is_blank) where it matters.
///
/// # Example
///
/// ```rust
/// # use lumina_core::define_id;
/// define_id!(CouponId);
///
/// let id = CouponId::parse("SPRING25").unwrap();
/// assert_eq!(id.as_str(), "SPRING25");
/// assert!(CouponId::parse("   ").is_err());
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            Default,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID without validation.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse an ID, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`IdError::Blank`]($crate::IdError::Blank) if the
            /// trimmed input is empty.
            pub fn parse(s: &str) -> Result<Self, $crate::IdError> {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Blank);
                }
                Ok(Self(trimmed.to_owned()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return its inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }

            /// Whether the ID is empty or only whitespace.
            #[must_use]
            pub fn is_blank(&self) -> bool {
                self.0.trim().is_empty()
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = $crate::IdError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

// Define standard entity IDs
define_id!(ProductId);
define_id!(OrderId);
define_id!(ReviewId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = ProductId::parse("  COSM24001 ").unwrap();
        assert_eq!(id.as_str(), "COSM24001");
    }

    #[test]
    fn test_parse_rejects_blank() {
        assert_eq!(ProductId::parse(""), Err(IdError::Blank));
        assert_eq!(OrderId::parse("   "), Err(IdError::Blank));
    }

    #[test]
    fn test_new_does_not_validate() {
        let id = ProductId::new("");
        assert!(id.is_blank());
    }

    #[test]
    fn test_serde_transparent() {
        let id = ReviewId::new("681065ea54de3394cbf222d0");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"681065ea54de3394cbf222d0\"");

        let back: ReviewId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_display() {
        assert_eq!(ProductId::new("P12345").to_string(), "P12345");
    }
}
