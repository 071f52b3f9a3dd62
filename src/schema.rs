// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared entity model consumed by every generator.
//!
//! # Structure
//!
//! ```text
//! Entity
//! ├── name / table / plural / doc
//! ├── annotations: Vec<Annotation>     Message | Service(Option<{Method}>)
//! └── fields: Vec<Field>               declaration order
//!     ├── ty: FieldType                Text | Int32 | Bool | Time
//!     ├── unique / immutable / optional
//!     ├── default: Option<DefaultValue>
//!     ├── default_func: Option<SymbolRef>
//!     ├── validate: Option<SymbolRef>
//!     ├── tag: Option<u32>             wire tag, always Some after allocation
//!     └── comment: Option<String>
//! ```
//!
//! Entities are built once by [`crate::parse`], finalized by
//! [`crate::tags`] and never mutated afterwards.

mod annotation;
mod entity;
mod field;
mod symbol;

pub use annotation::{Annotation, Method};
pub use entity::Entity;
pub use field::{DefaultValue, Field, FieldBuilder, FieldType};
pub use symbol::SymbolRef;

/// Namespace the declaration DSL lives in (`entlite::string(..)`).
pub const MARKER_NAMESPACE: &str = "entlite";

/// Type embedded by entity declarations (`struct User(entlite::Schema)`).
pub const MARKER_TYPE: &str = "Schema";

/// Name of the identifier field.
pub const ID_FIELD: &str = "id";

/// Whether `segments` names `name` inside the marker namespace.
///
/// Accepts the bare name (`string`, imported with `use entlite::*`) and the
/// namespaced form (`entlite::string`, `::entlite::string`).
#[must_use]
pub fn is_marker_path<S: AsRef<str>>(segments: &[S], name: &str) -> bool {
    match segments {
        [last] => last.as_ref() == name,
        [namespace, last] => namespace.as_ref() == MARKER_NAMESPACE && last.as_ref() == name,
        _ => false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_path_bare_and_namespaced() {
        assert!(is_marker_path(&["string"], "string"));
        assert!(is_marker_path(&["entlite", "string"], "string"));
    }

    #[test]
    fn marker_path_rejects_foreign_namespace() {
        assert!(!is_marker_path(&["other", "string"], "string"));
        assert!(!is_marker_path(&["entlite", "inner", "string"], "string"));
        assert!(!is_marker_path::<&str>(&[], "string"));
    }
}
