//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types. IDs are strings so
//! that documents written by earlier storefront versions (`"1"`,
//! `"google-1718000000000"`) keep loading.

/// Macro to define a type-safe, string-backed ID wrapper.
///
/// Creates a newtype wrapper around `String` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `PartialEq`, `Eq`, `Hash`, `PartialOrd`, `Ord`
/// - Conversion methods: `new()`, `as_str()`, `into_inner()`
/// - `generate()` for fresh UUID v4 based IDs, optionally prefixed
/// - `From<&str>`, `From<String>` and `Display` implementations
///
/// # Example
///
/// ```rust
/// # use metamart_core::define_id;
/// define_id!(UserId);
/// define_id!(OrderId, "ORD");
///
/// let user_id = UserId::new("1");
/// let order_id = OrderId::generate();
/// assert!(order_id.as_str().starts_with("ORD-"));
///
/// // These are different types, so this won't compile:
/// // let _: UserId = order_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        $crate::define_id!(@base $name);

        impl $name {
            /// Generate a fresh, unique ID.
            #[must_use]
            pub fn generate() -> Self {
                Self(::uuid::Uuid::new_v4().to_string())
            }
        }
    };
    ($name:ident, $prefix:literal) => {
        $crate::define_id!(@base $name);

        impl $name {
            /// Generate a fresh, unique, prefixed ID.
            #[must_use]
            pub fn generate() -> Self {
                let raw = ::uuid::Uuid::new_v4().simple().to_string().to_uppercase();
                Self(format!("{}-{}", $prefix, raw))
            }
        }
    };
    (@base $name:ident) => {
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
            /// Create an ID from an existing string value.
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Get the underlying string value.
            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }

            /// Consume the ID and return the inner string.
            #[must_use]
            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_owned())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

define_id!(ProductId);
define_id!(UserId);
define_id!(OrderId, "ORD");

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ProductId::generate();
        let b = ProductId::generate();
        assert_ne!(a, b);
    }

    #[test]
    fn test_order_id_prefix() {
        let id = OrderId::generate();
        assert!(id.as_str().starts_with("ORD-"));
        assert_eq!(id.as_str().len(), "ORD-".len() + 32);
    }

    #[test]
    fn test_legacy_ids_round_trip() {
        let id: ProductId = serde_json::from_str("\"1\"").unwrap();
        assert_eq!(id, ProductId::new("1"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"1\"");
    }
}
