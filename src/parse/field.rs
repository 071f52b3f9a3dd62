// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field builder-chain parsing.
//!
//! A field element is a chain rooted at a type constructor:
//!
//! ```text
//! entlite::string("email").unique().proto_field(2)
//!
//! MethodCall(proto_field, 2)
//! └── MethodCall(unique)
//!     └── Call(entlite::string, "email")     ← root: fixes name and type
//! ```
//!
//! The walk recurses from the outermost call down to the root, then applies
//! modifiers in source order while unwinding.
//!
//! # Lossy Arguments
//!
//! Modifier arguments that must be literals (`comment`, `proto_field`,
//! `default`) or paths (`default_func`, `validate`) are dropped when they are
//! anything else, e.g. a constant or a computed expression. The modifier is
//! then treated as absent. Declarations are read, never evaluated, so there
//! is no value to recover.

use tracing::debug;

use super::expr::{DslExpr, DslLit};
use crate::schema::{DefaultValue, Field, FieldBuilder, FieldType, SymbolRef, is_marker_path};

/// Parse one element of the `fields()` list.
///
/// Returns `None` when the chain does not end at a recognized constructor
/// with a string-literal name.
#[must_use]
pub fn parse_field(expr: &DslExpr) -> Option<Field> {
    build(expr).map(FieldBuilder::build)
}

fn build(expr: &DslExpr) -> Option<FieldBuilder> {
    match expr {
        DslExpr::Call { path, args } => constructor(path, args),
        DslExpr::MethodCall {
            receiver,
            method,
            args
        } => build(receiver).map(|builder| apply_modifier(builder, method, args)),
        _ => None
    }
}

fn constructor(path: &[String], args: &[DslExpr]) -> Option<FieldBuilder> {
    let constructor = path.last()?;
    if !is_marker_path(path, constructor) {
        return None;
    }
    let ty = FieldType::from_constructor(constructor)?;
    let name = args.first()?.as_str()?;
    Some(FieldBuilder::new(name, ty))
}

fn apply_modifier(builder: FieldBuilder, method: &str, args: &[DslExpr]) -> FieldBuilder {
    let arg = args.first();
    match method {
        "unique" => builder.unique(),
        "optional" => builder.optional(),
        "immutable" => builder.immutable(),
        "comment" => match arg.and_then(DslExpr::as_str) {
            Some(text) => builder.comment(text),
            None => lossy(builder, method)
        },
        "proto_field" => match arg
            .and_then(DslExpr::as_int)
            .and_then(|n| u32::try_from(n).ok())
        {
            Some(tag) => builder.tag(tag),
            None => lossy(builder, method)
        },
        "default" => match arg
            .and_then(DslExpr::as_lit)
            .and_then(|lit| default_for(builder.ty(), lit))
        {
            Some(value) => builder.default_value(value),
            None => lossy(builder, method)
        },
        "default_func" => match symbol(arg) {
            Some(func) => builder.default_func(func),
            None => lossy(builder, method)
        },
        "validate" => match symbol(arg) {
            Some(func) => builder.validate(func),
            None => lossy(builder, method)
        },
        other => {
            debug!(modifier = other, "ignoring unknown field modifier");
            builder
        }
    }
}

fn lossy(builder: FieldBuilder, method: &str) -> FieldBuilder {
    debug!(
        modifier = method,
        "modifier argument is not a literal or path; treated as absent"
    );
    builder
}

fn symbol(arg: Option<&DslExpr>) -> Option<SymbolRef> {
    arg.and_then(DslExpr::as_path)
        .and_then(SymbolRef::from_segments)
}

/// Static default compatible with the field type.
///
/// Time fields take a string, emitted as a raw SQL expression
/// (`CURRENT_TIMESTAMP`).
fn default_for(ty: FieldType, lit: &DslLit) -> Option<DefaultValue> {
    match (ty, lit) {
        (FieldType::Text | FieldType::Time, DslLit::Str(s)) => Some(DefaultValue::Text(s.clone())),
        (FieldType::Int32, DslLit::Int(n)) if i32::try_from(*n).is_ok() => Some(DefaultValue::Int(*n)),
        (FieldType::Bool, DslLit::Bool(b)) => Some(DefaultValue::Bool(*b)),
        _ => None
    }
}
