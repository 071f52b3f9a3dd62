// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity-level `#[entlite(...)]` attribute parsing with darling.
//!
//! # Supported Attributes
//!
//! | Attribute | Default | Effect |
//! |-----------|---------|--------|
//! | `table = "account"` | snake_case of the struct name | table name in SQL |
//! | `plural = "people"` | pluralized table name | list query / response naming |
//!
//! Doc comments are forwarded so the struct's `///` text can become the
//! message comment.

use darling::FromDeriveInput;
use syn::{Attribute, DeriveInput, Ident, ItemStruct};

/// Parsed entity attributes.
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(entlite), forward_attrs(doc))]
pub struct EntityAttrs {
    /// Struct identifier.
    pub ident: Ident,

    /// Forwarded doc attributes.
    pub attrs: Vec<Attribute>,

    /// Table name override.
    #[darling(default)]
    pub table: Option<String>,

    /// Plural name override.
    #[darling(default)]
    pub plural: Option<String>
}

impl EntityAttrs {
    /// Parse the attributes of an entity struct.
    ///
    /// # Errors
    ///
    /// Returns darling's error for unknown keys or non-string values.
    pub fn from_item(item: &ItemStruct) -> darling::Result<Self> {
        Self::from_derive_input(&DeriveInput::from(item.clone()))
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    #[test]
    fn defaults_when_absent() {
        let item: ItemStruct = parse_quote! {
            pub struct User(entlite::Schema);
        };
        let attrs = EntityAttrs::from_item(&item).unwrap();
        assert_eq!(attrs.ident, "User");
        assert!(attrs.table.is_none());
        assert!(attrs.plural.is_none());
    }

    #[test]
    fn overrides() {
        let item: ItemStruct = parse_quote! {
            /// A person.
            #[entlite(table = "people", plural = "people")]
            pub struct Person(entlite::Schema);
        };
        let attrs = EntityAttrs::from_item(&item).unwrap();
        assert_eq!(attrs.table.as_deref(), Some("people"));
        assert_eq!(attrs.plural.as_deref(), Some("people"));
        assert_eq!(attrs.attrs.len(), 1);
    }

    #[test]
    fn unknown_key_is_error() {
        let item: ItemStruct = parse_quote! {
            #[entlite(schema = "core")]
            pub struct User(entlite::Schema);
        };
        assert!(EntityAttrs::from_item(&item).is_err());
    }
}
