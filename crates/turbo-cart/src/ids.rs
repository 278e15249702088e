//! Newtype IDs for type-safe identifiers.
//!
//! A `ProductId` names a catalog product; an `ItemIdentity` names one cart
//! line (a product at a particular customization). Keeping them apart stops
//! a product reference from being passed where a line identity is expected.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Macro to generate newtype ID structs.
macro_rules! define_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from a string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume and return the inner string.
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<String> for $name {
            fn from(s: String) -> Self {
                Self(s)
            }
        }

        impl From<&str> for $name {
            fn from(s: &str) -> Self {
                Self(s.to_string())
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(
    /// Opaque, stable reference to a catalog product.
    ProductId
);
define_id!(
    /// Derived key of a cart line. Built by [`identity`](crate::cart::identity).
    ItemIdentity
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_creation() {
        let id = ProductId::new("prod-123");
        assert_eq!(id.as_str(), "prod-123");
    }

    #[test]
    fn test_id_from_string() {
        let id: ProductId = "prod-456".into();
        assert_eq!(id.into_inner(), "prod-456");
    }

    #[test]
    fn test_id_display() {
        let id = ItemIdentity::new("p1#{\"size\":\"M\"}");
        assert_eq!(format!("{}", id), "p1#{\"size\":\"M\"}");
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let id = ProductId::new("mug");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"mug\"");
    }
}
