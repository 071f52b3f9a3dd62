// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Annotation parsing.
//!
//! | Declaration | Result |
//! |-------------|--------|
//! | `entlite::message()` | `Message` |
//! | `entlite::service()` | `Service(None)`: all methods |
//! | `entlite::service(entlite::methods(Method::Get \| Method::List))` | `Service({Get, List})` |
//! | `entlite::service(Method::Create \| Method::Get)` | `Service({Create, Get})` |
//!
//! Method expressions may be OR chains, single paths or lists; they are
//! flattened into a set, so order and repetition do not matter.

use std::collections::BTreeSet;

use tracing::debug;

use super::expr::DslExpr;
use crate::schema::{Annotation, Method, is_marker_path};

/// Parse one element of the `annotations()` list.
#[must_use]
pub fn parse_annotation(expr: &DslExpr) -> Option<Annotation> {
    let DslExpr::Call { path, args } = expr else {
        return None;
    };

    if is_marker_path(path, "message") {
        return Some(Annotation::Message);
    }
    if !is_marker_path(path, "service") {
        return None;
    }
    if args.is_empty() {
        return Some(Annotation::Service(None));
    }

    let mut methods = BTreeSet::new();
    for arg in args {
        match arg {
            DslExpr::Call { path, args } if is_marker_path(path, "methods") => {
                args.iter().for_each(|a| collect_methods(a, &mut methods));
            }
            other => collect_methods(other, &mut methods)
        }
    }
    Some(Annotation::service(methods))
}

fn collect_methods(expr: &DslExpr, methods: &mut BTreeSet<Method>) {
    match expr {
        DslExpr::BitOr(left, right) => {
            collect_methods(left, methods);
            collect_methods(right, methods);
        }
        DslExpr::List(items) => items.iter().for_each(|item| collect_methods(item, methods)),
        DslExpr::Path(segments) => match segments.last().and_then(|s| Method::from_name(s)) {
            Some(method) => {
                methods.insert(method);
            }
            None => debug!(path = %segments.join("::"), "unknown method constant ignored")
        },
        _ => debug!("non-constant method expression ignored")
    }
}
