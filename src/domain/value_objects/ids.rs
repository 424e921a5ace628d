//! # Identifiers
//!
//! Strongly typed identifiers.
//!
//! Backend-assigned identifiers are opaque strings wrapped in newtypes so a
//! [`ProviderId`] can never be passed where a [`ServiceId`] is expected.
//! [`CartItemId`] is generated locally.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier.
            #[must_use]
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            /// Returns the identifier as a string slice.
            #[inline]
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }

        impl From<String> for $name {
            fn from(value: String) -> Self {
                Self(value)
            }
        }
    };
}

string_id!(
    /// Identifier of a service provider (clinic, groomer, shop).
    ProviderId
);

string_id!(
    /// Identifier of a single offer published by a provider.
    OfferId
);

string_id!(
    /// Identifier of a procedure (e.g. "vaccination"), shared across providers.
    ProcedureId
);

string_id!(
    /// Identifier of a bookable service definition.
    ServiceId
);

string_id!(
    /// Identifier of a pet owned by the signed-in user.
    PetId
);

/// Identifier of a cart line, unique within a cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CartItemId(Uuid);

impl CartItemId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new_v4() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[inline]
    #[must_use]
    pub fn get(&self) -> Uuid {
        self.0
    }
}

impl From<Uuid> for CartItemId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl fmt::Display for CartItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_order_lexicographically() {
        let mut ids = vec![ProviderId::new("v2"), ProviderId::new("v10"), ProviderId::new("v1")];
        ids.sort();
        let names: Vec<&str> = ids.iter().map(ProviderId::as_str).collect();
        assert_eq!(names, vec!["v1", "v10", "v2"]);
    }

    #[test]
    fn string_id_serializes_transparently() {
        let id = ProcedureId::new("grooming");
        assert_eq!(serde_json::to_string(&id).ok().as_deref(), Some("\"grooming\""));
    }

    #[test]
    fn cart_item_ids_are_unique() {
        assert_ne!(CartItemId::new_v4(), CartItemId::new_v4());
    }
}
