//! Newtype IDs for type-safe entity references.
//!
//! Catalog identifiers are opaque strings assigned by the catalog API. Use the
//! `define_id!` macro to wrap them so a game ID can't be mixed up with any
//! other string.

use thiserror::Error;

/// Error returned when parsing an ID from untrusted input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdError {
    /// The ID was empty or only whitespace.
    #[error("ID cannot be empty")]
    Empty,
}

/// Macro to define a type-safe string ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `parse()`, `as_str()`
/// - `From<String>`, `From<&str>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use gamershop_core::define_id;
/// define_id!(GameId);
/// define_id!(PublisherId);
///
/// let game_id = GameId::new("g-1");
/// let publisher_id = PublisherId::new("g-1");
///
/// // These are different types, so this won't compile:
/// // let _: GameId = publisher_id;
/// assert_eq!(game_id.as_str(), publisher_id.as_str());
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
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Create a new ID from any string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Parse an ID from untrusted input, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns `IdError::Empty` if nothing is left after trimming.
            pub fn parse(raw: &str) -> ::core::result::Result<Self, $crate::IdError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err($crate::IdError::Empty);
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
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

define_id!(GameId);

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = GameId::parse("  g-42 ").unwrap();
        assert_eq!(id.as_str(), "g-42");
    }

    #[test]
    fn test_parse_empty() {
        assert_eq!(GameId::parse(""), Err(IdError::Empty));
        assert_eq!(GameId::parse("   "), Err(IdError::Empty));
    }

    #[test]
    fn test_serde_transparent() {
        let id = GameId::new("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        let back: GameId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(back, id);
    }
}
