// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Backend generators.
//!
//! Every generator is a pure function of the finalized entity list and its
//! options. Text backends (proto, SQL) build strings directly; Rust backends
//! build token streams with `quote!`, re-parse them with `syn` and format
//! them with `prettyplease`.
//!
//! # Submodules
//!
//! | Module | Output |
//! |--------|--------|
//! | [`proto`] | proto3 IDL |
//! | [`sql`] | `CREATE TABLE` schema and sqlc queries |
//! | [`convert`] | row ↔ wire conversion functions |
//! | [`wrap`] | access-layer wrapper over upstream query code |
//! | [`validate`] | `validate()` on wire request messages |
//! | [`pipeline`] | configured end-to-end run with atomic writes |

pub mod convert;
pub mod pipeline;
pub mod proto;
pub mod sql;
pub mod validate;
pub mod wrap;

use std::{collections::BTreeSet, path::PathBuf};

use proc_macro2::{Ident, Span, TokenStream};
use quote::quote;
use serde::Deserialize;
use tracing::debug;

pub use pipeline::Pipeline;

use crate::{
    error::{Error, Result},
    parse::ImportMap,
    schema::{Field, SymbolRef},
    utils::naming::GENERATED_NOTICE
};

/// How optional fields are represented on the wire.
///
/// | Policy | proto3 | Rust wire type |
/// |--------|--------|----------------|
/// | `presence` | `optional int32 age = 4;` | `Option<i32>` |
/// | `zero_value` | `int32 age = 4;` | `i32` (zero means absent) |
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OptionalPolicy {
    /// Explicit presence tracking.
    #[default]
    Presence,
    /// Zero value stands for absence.
    #[serde(alias = "zerovalue")]
    ZeroValue
}

/// One rendered output file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// Destination path.
    pub path:     PathBuf,
    /// Full file contents.
    pub contents: String
}

impl Artifact {
    /// Pair contents with their destination.
    pub fn new(path: impl Into<PathBuf>, contents: String) -> Self {
        Self {
            path: path.into(),
            contents
        }
    }
}

/// Identifier for a field in generated Rust, raw when it is a keyword.
pub(crate) fn field_ident(entity: &str, field: &Field) -> Result<Ident> {
    if !field.has_valid_name() {
        return Err(Error::InvalidFieldName {
            entity: entity.to_string(),
            field:  field.name.clone()
        });
    }
    Ok(syn::parse_str::<Ident>(&field.name)
        .unwrap_or_else(|_| Ident::new_raw(&field.name, Span::call_site())))
}

/// Parse a configured module path (`pb`, `crate::db`).
pub(crate) fn module_path(path: &str) -> Result<syn::Path> {
    syn::parse_str(path).map_err(|err| Error::InvalidPath {
        path:    path.to_string(),
        message: err.to_string()
    })
}

/// `use` items for collaborator-supplied import paths.
pub(crate) fn use_items<'a>(paths: impl IntoIterator<Item = &'a str>) -> Result<Vec<TokenStream>> {
    paths
        .into_iter()
        .map(|path| {
            let tree: syn::UseTree = syn::parse_str(path).map_err(|err| Error::InvalidPath {
                path:    path.to_string(),
                message: err.to_string()
            })?;
            Ok(quote!(use #tree;))
        })
        .collect()
}

/// `use` items bringing the aliases of `symbols` into scope.
///
/// Aliases missing from `imports` are assumed to be in scope already.
pub(crate) fn symbol_imports<'a>(
    symbols: impl IntoIterator<Item = &'a SymbolRef>,
    imports: &ImportMap
) -> Result<Vec<TokenStream>> {
    let aliases: BTreeSet<&str> = symbols.into_iter().filter_map(SymbolRef::scope_alias).collect();

    let mut trees = Vec::with_capacity(aliases.len());
    for alias in aliases {
        let Some(path) = imports.get(alias) else {
            debug!(alias, "no import recorded, assuming alias is in scope");
            continue;
        };
        let alias = if syn::parse_str::<Ident>(alias).is_ok() {
            alias.to_string()
        } else {
            format!("r#{alias}")
        };
        let binds_alias = *path == alias || path.ends_with(&format!("::{alias}"));
        trees.push(if binds_alias {
            path.clone()
        } else {
            format!("{path} as {alias}")
        });
    }

    use_items(trees.iter().map(String::as_str))
}

/// Re-parse, format and stamp generated Rust code.
pub(crate) fn render(artifact: &'static str, tokens: TokenStream) -> Result<String> {
    let file = syn::parse2::<syn::File>(tokens).map_err(|err| Error::InvalidGeneratedCode {
        artifact,
        message: err.to_string()
    })?;
    Ok(format!("// {GENERATED_NOTICE}\n\n{}", prettyplease::unparse(&file)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn symbol(path: &[&str]) -> SymbolRef {
        let segments: Vec<String> = path.iter().map(ToString::to_string).collect();
        SymbolRef::from_segments(&segments).unwrap()
    }

    fn rendered(items: &[TokenStream]) -> Vec<String> {
        items.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn optional_policy_from_config_strings() {
        #[derive(Deserialize)]
        struct Wrapper {
            policy: OptionalPolicy
        }

        let parse = |s: &str| toml::from_str::<Wrapper>(&format!("policy = \"{s}\"")).map(|w| w.policy);
        assert_eq!(parse("presence").unwrap(), OptionalPolicy::Presence);
        assert_eq!(parse("zero_value").unwrap(), OptionalPolicy::ZeroValue);
        assert_eq!(parse("zerovalue").unwrap(), OptionalPolicy::ZeroValue);
        assert!(parse("sometimes").is_err());
    }

    #[test]
    fn field_idents() {
        let plain = Field::builder("email", FieldType::Text).build();
        assert_eq!(field_ident("User", &plain).unwrap().to_string(), "email");

        let keyword = Field::builder("type", FieldType::Text).build();
        assert_eq!(field_ident("User", &keyword).unwrap().to_string(), "r#type");

        let invalid = Field::builder("first-name", FieldType::Text).build();
        assert!(matches!(
            field_ident("User", &invalid).unwrap_err(),
            Error::InvalidFieldName { .. }
        ));
    }

    #[test]
    fn symbol_imports_resolve_aliases() {
        let mut imports = ImportMap::new();
        imports.insert("logic".into(), "crate::logic".into());
        imports.insert("r".into(), "crate::rules".into());

        let symbols = [
            symbol(&["logic", "now"]),
            symbol(&["logic", "starts_with_capital"]),
            symbol(&["r", "non_empty"]),
            symbol(&["crate", "util", "check"]),
            symbol(&["unknown", "f"]),
        ];
        let items = rendered(&symbol_imports(&symbols, &imports).unwrap());
        assert_eq!(
            items,
            vec!["use crate :: logic ;", "use crate :: rules as r ;"]
        );
    }

    #[test]
    fn keyword_aliases_rendered_raw() {
        let mut imports = ImportMap::new();
        imports.insert("match".into(), "crate::r#match".into());
        imports.insert("type".into(), "crate::rules".into());

        let symbols = [symbol(&["match", "f"]), symbol(&["type", "g"])];
        let items = rendered(&symbol_imports(&symbols, &imports).unwrap());
        assert_eq!(
            items,
            vec!["use crate :: r#match ;", "use crate :: rules as r#type ;"]
        );
    }

    #[test]
    fn invalid_paths() {
        assert!(matches!(module_path("a b").unwrap_err(), Error::InvalidPath { .. }));
        assert!(use_items(["crate::{"]).is_err());
        assert_eq!(rendered(&use_items(["crate::db::*"]).unwrap()), vec!["use crate :: db :: * ;"]);
    }

    #[test]
    fn render_stamps_notice() {
        let code = render("test", quote!(pub fn f() {})).unwrap();
        assert!(code.starts_with("// Code generated by entlite. DO NOT EDIT.\n\n"));
        assert!(code.contains("pub fn f() {}"));
    }
}
