// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Doc comment extraction.
//!
//! `///` comments on an entity struct become `#[doc = "..."]` attributes in
//! the syntax tree. They are collected here and carried into the proto
//! message comment.
//!
//! ```rust,ignore
//! /// Registered account.
//! ///
//! /// One row per login.
//! pub struct User(entlite::Schema);
//!
//! // Extracts to: "Registered account.\n\nOne row per login."
//! ```

use syn::Attribute;

/// Combine all `#[doc = "..."]` attributes into one trimmed string.
///
/// Returns `None` when there are no doc attributes or they are blank.
pub fn extract_doc_comments(attrs: &[Attribute]) -> Option<String> {
    let doc_lines: Vec<String> = attrs
        .iter()
        .filter(|attr| attr.path().is_ident("doc"))
        .filter_map(|attr| {
            if let syn::Meta::NameValue(meta) = &attr.meta
                && let syn::Expr::Lit(syn::ExprLit {
                    lit: syn::Lit::Str(lit_str),
                    ..
                }) = &meta.value
            {
                return Some(lit_str.value());
            }
            None
        })
        .collect();

    let combined = doc_lines
        .iter()
        .map(|line| line.trim())
        .collect::<Vec<_>>()
        .join("\n");

    let trimmed = combined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_attrs(input: &str) -> Vec<Attribute> {
        let item: syn::ItemStruct = syn::parse_str(input).unwrap();
        item.attrs
    }

    #[test]
    fn single_line() {
        let attrs = parse_attrs(
            r#"
            /// Registered account.
            struct User(entlite::Schema);
        "#
        );
        assert_eq!(
            extract_doc_comments(&attrs),
            Some("Registered account.".to_string())
        );
    }

    #[test]
    fn keeps_paragraph_breaks() {
        let attrs = parse_attrs(
            r#"
            /// Summary.
            ///
            /// Details here.
            struct User(entlite::Schema);
        "#
        );
        assert_eq!(
            extract_doc_comments(&attrs),
            Some("Summary.\n\nDetails here.".to_string())
        );
    }

    #[test]
    fn ignores_other_attributes() {
        let attrs = parse_attrs(
            r#"
            #[entlite(table = "accounts")]
            struct User(entlite::Schema);
        "#
        );
        assert_eq!(extract_doc_comments(&attrs), None);
    }

    #[test]
    fn blank_doc_is_none() {
        let attrs = parse_attrs(
            r#"
            ///
            struct User(entlite::Schema);
        "#
        );
        assert_eq!(extract_doc_comments(&attrs), None);
    }
}
