//! # Pets
//!
//! The subject a service is booked for.

use crate::domain::value_objects::PetId;
use serde::{Deserialize, Serialize};

/// A pet owned by the signed-in user.
///
/// Weight is not part of the pet record: it is supplied at booking time,
/// since it changes and drives weight-banded pricing.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pet {
    id: PetId,
    name: String,
}

impl Pet {
    /// Creates a new pet reference.
    #[must_use]
    pub fn new(id: impl Into<PetId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// Returns the pet ID.
    #[inline]
    #[must_use]
    pub fn id(&self) -> &PetId {
        &self.id
    }

    /// Returns the pet's name.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_backend_record() {
        let pet: Pet = serde_json::from_str(r#"{"id": "pet-7", "name": "Luna"}"#).unwrap();
        assert_eq!(pet, Pet::new("pet-7", "Luna"));
        assert_eq!(pet.id().as_str(), "pet-7");
    }
}
