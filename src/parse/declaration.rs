// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declaration parsing: from a discovered struct to an [`Entity`].
//!
//! For entity `User` the declaring file is re-parsed and every `impl` block
//! whose self type is `User` (inherent or trait impl) is searched for two
//! argument-free methods:
//!
//! | Method | Returns | Parsed by |
//! |--------|---------|-----------|
//! | `annotations` | list of annotation calls | [`parse_annotation`] |
//! | `fields` | list of field builder chains | [`parse_field`] |
//!
//! The returned list is taken from the tail expression of the body or from
//! its first `return` statement. Missing methods leave the corresponding
//! list empty.

use std::{fs, path::Path};

use syn::{Block, Expr, FnArg, ImplItem, ImplItemFn, Item, ItemImpl, Stmt, Type};
use tracing::{debug, warn};

use super::{
    annotation::parse_annotation, attrs::EntityAttrs, discover::DiscoveredEntity, expr::DslExpr,
    field::parse_field
};
use crate::{
    error::{Error, Result},
    schema::Entity,
    utils::{docs::extract_doc_comments, naming::pluralize}
};

/// Parse one discovered entity from its declaring file.
///
/// # Errors
///
/// - [`Error::Io`] if the file cannot be read
/// - [`Error::MalformedDeclaration`] if the file does not parse, the struct
///   is gone, or its `#[entlite(...)]` attribute is invalid
pub fn parse_entity(discovered: &DiscoveredEntity) -> Result<Entity> {
    let source =
        fs::read_to_string(&discovered.path).map_err(|e| Error::io(&discovered.path, e))?;
    let file = syn::parse_file(&source).map_err(|e| Error::malformed(&discovered.path, e))?;
    parse_entity_in(&file, &discovered.name, &discovered.path)
}

/// Parse every discovered entity, skipping malformed declarations.
///
/// Skipped declarations are logged at warn level; the remaining entities
/// keep discovery order.
#[must_use]
pub fn parse_entities(discovered: &[DiscoveredEntity]) -> Vec<Entity> {
    discovered
        .iter()
        .filter_map(|d| match parse_entity(d) {
            Ok(entity) => Some(entity),
            Err(err) => {
                warn!(entity = %d.name, error = %err, "skipping entity declaration");
                None
            }
        })
        .collect()
}

/// Parse entity `name` from an already parsed file.
///
/// # Errors
///
/// [`Error::MalformedDeclaration`] if the struct is missing or its
/// attributes are invalid.
pub fn parse_entity_in(file: &syn::File, name: &str, path: &Path) -> Result<Entity> {
    let item = file
        .items
        .iter()
        .find_map(|item| match item {
            Item::Struct(s) if s.ident == name => Some(s),
            _ => None
        })
        .ok_or_else(|| Error::malformed(path, format!("struct `{name}` not found")))?;

    let attrs = EntityAttrs::from_item(item).map_err(|e| Error::malformed(path, e))?;

    let mut entity = Entity::new(name);
    entity.doc = extract_doc_comments(&attrs.attrs);
    if let Some(table) = attrs.table {
        entity.plural = pluralize(&table);
        entity.table = table;
    }
    if let Some(plural) = attrs.plural {
        entity.plural = plural;
    }

    for method in entity_methods(file, name) {
        let Some(list) = returned_list(&method.block) else {
            debug!(entity = name, method = %method.sig.ident, "method does not return a list");
            continue;
        };

        if method.sig.ident == "annotations" {
            entity
                .annotations
                .extend(list.iter().filter_map(parse_annotation));
        } else {
            for element in &list {
                match parse_field(element) {
                    Some(field) => entity.fields.push(field),
                    None => warn!(entity = name, "discarding field without a recognized constructor")
                }
            }
        }
    }

    debug!(
        entity = name,
        fields = entity.fields.len(),
        annotations = entity.annotations.len(),
        "parsed entity"
    );
    Ok(entity)
}

/// `annotations` / `fields` methods of impl blocks for `name`.
fn entity_methods<'a>(file: &'a syn::File, name: &'a str) -> impl Iterator<Item = &'a ImplItemFn> {
    file.items
        .iter()
        .filter_map(move |item| match item {
            Item::Impl(imp) if self_type_is(imp, name) => Some(imp),
            _ => None
        })
        .flat_map(|imp| imp.items.iter())
        .filter_map(|item| match item {
            ImplItem::Fn(method) => Some(method),
            _ => None
        })
        .filter(|method| {
            (method.sig.ident == "annotations" || method.sig.ident == "fields")
                && method.sig.inputs.iter().all(|arg| matches!(arg, FnArg::Receiver(_)))
        })
}

fn self_type_is(imp: &ItemImpl, name: &str) -> bool {
    match imp.self_ty.as_ref() {
        Type::Path(type_path) => type_path
            .path
            .segments
            .last()
            .is_some_and(|segment| segment.ident == name),
        _ => false
    }
}

/// Elements of the list a method body returns.
fn returned_list(block: &Block) -> Option<Vec<DslExpr>> {
    let expr = returned_expr(block)?;
    match DslExpr::from_syn(expr) {
        DslExpr::List(items) => Some(items),
        _ => None
    }
}

fn returned_expr(block: &Block) -> Option<&Expr> {
    if let Some(Stmt::Expr(expr, None)) = block.stmts.last()
        && !matches!(expr, Expr::Return(_))
    {
        return Some(expr);
    }

    block.stmts.iter().find_map(|stmt| match stmt {
        Stmt::Expr(Expr::Return(ret), _) => ret.expr.as_deref(),
        _ => None
    })
}
