// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Import extraction from declaration files.
//!
//! Generated code calls the functions referenced by `default_func(..)` and
//! `validate(..)`, so it needs the same `use` items the declarations had.
//!
//! ```rust,ignore
//! use crate::logic;                 // "logic"  → "crate::logic"
//! use crate::rules::{self as r};    // "r"      → "crate::rules"
//! use crate::time::now as clock;    // "clock"  → "crate::time::now"
//! use entlite::{Field, Method};     // skipped: marker namespace
//! use crate::prelude::*;            // skipped: glob
//! ```

use std::{collections::BTreeMap, path::PathBuf};

use syn::{Expr, ExprMethodCall, Item, UseTree, ext::IdentExt, visit::Visit};

use super::discover::read_source;
use crate::schema::{MARKER_NAMESPACE, SymbolRef};

/// Alias in scope → full path it was imported from.
pub type ImportMap = BTreeMap<String, String>;

/// Every non-glob `use` binding across `paths`.
///
/// Later files win on alias clashes. Unreadable or malformed files are
/// skipped.
#[must_use]
pub fn extract_imports(paths: &[PathBuf]) -> ImportMap {
    let mut imports = ImportMap::new();
    for path in paths {
        if let Some(file) = read_source(path) {
            imports.extend(file_imports(&file));
        }
    }
    imports
}

/// Imports needed by `validate(..)` / `default_func(..)` references.
///
/// Restricted per file to aliases actually used as such arguments.
#[must_use]
pub fn extract_reference_imports(paths: &[PathBuf]) -> ImportMap {
    let mut imports = ImportMap::new();
    for path in paths {
        let Some(file) = read_source(path) else {
            continue;
        };

        let mut visitor = ReferenceVisitor::default();
        visitor.visit_file(&file);

        imports.extend(
            file_imports(&file)
                .into_iter()
                .filter(|(alias, _)| visitor.aliases.contains(alias))
        );
    }
    imports
}

/// `use` bindings of one parsed file.
#[must_use]
pub fn file_imports(file: &syn::File) -> ImportMap {
    let mut imports = ImportMap::new();
    for item in &file.items {
        if let Item::Use(item) = item {
            collect_tree(&item.tree, &mut Vec::new(), &mut imports);
        }
    }
    imports
}

fn collect_tree(tree: &UseTree, prefix: &mut Vec<String>, imports: &mut ImportMap) {
    match tree {
        UseTree::Path(path) => {
            prefix.push(path.ident.to_string());
            collect_tree(&path.tree, prefix, imports);
            prefix.pop();
        }
        UseTree::Name(name) => {
            let ident = name.ident.to_string();
            if ident == "self" {
                if let Some(last) = prefix.last() {
                    let alias = last.strip_prefix("r#").unwrap_or(last).to_string();
                    insert(prefix, alias, prefix.join("::"), imports);
                }
            } else {
                let full = join(prefix, &ident);
                insert(prefix, name.ident.unraw().to_string(), full, imports);
            }
        }
        UseTree::Rename(rename) => {
            let ident = rename.ident.to_string();
            let full = if ident == "self" {
                prefix.join("::")
            } else {
                join(prefix, &ident)
            };
            insert(prefix, rename.rename.unraw().to_string(), full, imports);
        }
        UseTree::Group(group) => {
            for item in &group.items {
                collect_tree(item, prefix, imports);
            }
        }
        UseTree::Glob(_) => {}
    }
}

fn join(prefix: &[String], ident: &str) -> String {
    prefix
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(ident))
        .collect::<Vec<_>>()
        .join("::")
}

fn insert(prefix: &[String], alias: String, full: String, imports: &mut ImportMap) {
    let root = prefix.first().map_or(alias.as_str(), String::as_str);
    if root == MARKER_NAMESPACE || alias == "_" || full.is_empty() {
        return;
    }
    imports.insert(alias, full);
}

/// Collects scope aliases of `validate` / `default_func` arguments.
#[derive(Default)]
struct ReferenceVisitor {
    aliases: Vec<String>
}

impl<'ast> Visit<'ast> for ReferenceVisitor {
    fn visit_expr_method_call(&mut self, call: &'ast ExprMethodCall) {
        if (call.method == "validate" || call.method == "default_func")
            && let Some(Expr::Path(arg)) = call.args.first()
        {
            let segments: Vec<String> = arg
                .path
                .segments
                .iter()
                .map(|s| s.ident.unraw().to_string())
                .collect();
            if let Some(alias) = SymbolRef::from_segments(&segments)
                .as_ref()
                .and_then(SymbolRef::scope_alias)
            {
                self.aliases.push(alias.to_string());
            }
        }
        syn::visit::visit_expr_method_call(self, call);
    }
}
