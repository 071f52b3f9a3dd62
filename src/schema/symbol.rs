// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! References to user functions named in declarations.

use std::fmt;

use proc_macro2::Span;
use syn::{Ident, Path, PathSegment, punctuated::Punctuated};

use crate::error::{Error, Result};

/// Path keywords that are valid segments but can never be raw.
const PATH_KEYWORDS: [&str; 4] = ["crate", "self", "super", "Self"];

/// A function named by `default_func(..)` or `validate(..)`.
///
/// Generators only ever emit a call to the referenced function, so the
/// reference is kept as path segments rather than anything resolvable.
/// `logic::now` has qualifier `["logic"]` and name `now`. Segments are
/// stored without the `r#` prefix; `rules::r#match` is kept as
/// `["rules"]` and `match`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SymbolRef {
    /// Leading path segments (module alias first).
    pub qualifier: Vec<String>,
    /// Function name.
    pub name:      String
}

impl SymbolRef {
    /// Build from unraw path segments.
    ///
    /// `None` for an empty path or when a segment is not an identifier.
    #[must_use]
    pub fn from_segments(segments: &[String]) -> Option<Self> {
        if !segments.iter().all(|segment| segment_ident(segment).is_some()) {
            return None;
        }
        let (name, qualifier) = segments.split_last()?;
        Some(Self {
            qualifier: qualifier.to_vec(),
            name:      name.clone()
        })
    }

    /// The identifier that must be in scope for the call to resolve.
    ///
    /// This is the module alias for qualified references (`logic` in
    /// `logic::now`) and the function itself for bare ones. Path keywords
    /// (`crate`, `self`, `super`) need no import and yield `None`.
    #[must_use]
    pub fn scope_alias(&self) -> Option<&str> {
        let first = self.qualifier.first().unwrap_or(&self.name);
        (!PATH_KEYWORDS.contains(&first.as_str())).then_some(first.as_str())
    }

    /// The reference as a `syn::Path` for use in `quote!`.
    ///
    /// Keyword segments come out raw (`rules::r#match`).
    ///
    /// # Errors
    ///
    /// [`Error::InvalidPath`] when a segment is not an identifier.
    pub fn to_path(&self) -> Result<Path> {
        let segments = self
            .qualifier
            .iter()
            .chain(std::iter::once(&self.name))
            .map(|segment| {
                segment_ident(segment)
                    .map(PathSegment::from)
                    .ok_or_else(|| Error::InvalidPath {
                        path:    self.to_string(),
                        message: format!("`{segment}` is not an identifier")
                    })
            })
            .collect::<Result<Punctuated<PathSegment, syn::Token![::]>>>()?;

        Ok(Path {
            leading_colon: None,
            segments
        })
    }
}

/// Identifier for one unraw segment, raw when it is a keyword.
fn segment_ident(segment: &str) -> Option<Ident> {
    if PATH_KEYWORDS.contains(&segment) {
        return Some(Ident::new(segment, Span::call_site()));
    }
    syn::parse_str::<Ident>(segment)
        .or_else(|_| syn::parse_str::<Ident>(&format!("r#{segment}")))
        .ok()
}

impl fmt::Display for SymbolRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for segment in &self.qualifier {
            write!(f, "{segment}::")?;
        }
        f.write_str(&self.name)
    }
}

#[cfg(test)]
mod tests {
    use quote::quote;

    use super::*;

    fn symbol(path: &[&str]) -> SymbolRef {
        let segments: Vec<String> = path.iter().map(ToString::to_string).collect();
        SymbolRef::from_segments(&segments).unwrap()
    }

    #[test]
    fn qualified_reference() {
        let s = symbol(&["logic", "now"]);
        assert_eq!(s.name, "now");
        assert_eq!(s.scope_alias(), Some("logic"));
        assert_eq!(s.to_string(), "logic::now");
    }

    #[test]
    fn bare_reference_needs_function_in_scope() {
        let s = symbol(&["now"]);
        assert_eq!(s.scope_alias(), Some("now"));
    }

    #[test]
    fn crate_rooted_needs_no_import() {
        let s = symbol(&["crate", "logic", "now"]);
        assert_eq!(s.scope_alias(), None);
    }

    #[test]
    fn empty_path() {
        assert!(SymbolRef::from_segments(&[]).is_none());
    }

    #[test]
    fn renders_as_path() {
        let path = symbol(&["logic", "now"]).to_path().unwrap();
        assert_eq!(quote!(#path).to_string(), "logic :: now");

        let path = symbol(&["crate", "logic", "now"]).to_path().unwrap();
        assert_eq!(quote!(#path).to_string(), "crate :: logic :: now");
    }

    #[test]
    fn keyword_segments_render_raw() {
        let s = symbol(&["rules", "match"]);
        assert_eq!(s.scope_alias(), Some("rules"));
        let path = s.to_path().unwrap();
        assert_eq!(quote!(#path).to_string(), "rules :: r#match");

        let path = symbol(&["type", "check"]).to_path().unwrap();
        assert_eq!(quote!(#path).to_string(), "r#type :: check");
    }

    #[test]
    fn non_identifier_segments_rejected() {
        let segments = vec!["rules".to_string(), "first-name".to_string()];
        assert!(SymbolRef::from_segments(&segments).is_none());

        let hand_built = SymbolRef {
            qualifier: vec!["a b".into()],
            name:      "f".into()
        };
        assert!(matches!(hand_built.to_path(), Err(Error::InvalidPath { .. })));
    }
}
