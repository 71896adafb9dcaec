use serde::{Deserialize, Serialize};
use std::fmt;

/// Server-issued identifiers are opaque strings; each entity gets its own
/// newtype so a category id can never be passed where an allergy id is expected.
macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<$name> for String {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

string_id!(
    /// Identifier of a recipe
    RecipeId
);
string_id!(
    /// Identifier of a registered user
    UserId
);
string_id!(
    /// Identifier of a recipe category
    CategoryId
);
string_id!(
    /// Identifier of an allergen
    AllergyId
);
string_id!(
    /// Identifier of a preparation difficulty level
    DifficultyId
);
string_id!(
    /// Identifier of a review
    ReviewId
);
