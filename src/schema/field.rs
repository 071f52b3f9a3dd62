// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Field descriptors and their builder.
//!
//! # Builder Semantics
//!
//! [`FieldBuilder`] is a value type: every modifier consumes the builder and
//! returns a new one, mirroring the chained calls in a declaration.
//!
//! ```rust,ignore
//! let field = FieldBuilder::new("email", FieldType::Text)
//!     .unique()
//!     .tag(2)
//!     .build();
//! ```
//!
//! `default_value` and `default_func` exclude each other; whichever is
//! applied last wins.

use super::{ID_FIELD, SymbolRef};

/// Primitive field type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldType {
    /// UTF-8 text.
    Text,
    /// 32-bit signed integer.
    Int32,
    /// Boolean.
    Bool,
    /// Point in time (UTC).
    Time
}

impl FieldType {
    /// Resolve a declaration constructor name (`string`, `int32`, ...).
    #[must_use]
    pub fn from_constructor(name: &str) -> Option<Self> {
        match name {
            "string" | "text" => Some(Self::Text),
            "int32" | "int" => Some(Self::Int32),
            "bool" | "boolean" => Some(Self::Bool),
            "time" | "timestamp" => Some(Self::Time),
            _ => None
        }
    }

    /// Whether this is [`FieldType::Time`].
    #[must_use]
    pub const fn is_time(self) -> bool {
        matches!(self, Self::Time)
    }
}

/// Static column default.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefaultValue {
    /// Text literal, or a raw SQL expression for time fields.
    Text(String),
    /// Integer literal.
    Int(i64),
    /// Boolean literal.
    Bool(bool)
}

/// One field of an entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Field name as declared (snake_case by convention).
    pub name:         String,
    /// Primitive type.
    pub ty:           FieldType,
    /// Column carries a UNIQUE constraint.
    pub unique:       bool,
    /// Field cannot be changed by updates.
    pub immutable:    bool,
    /// Field may be absent / NULL.
    pub optional:     bool,
    /// Static default value.
    pub default:      Option<DefaultValue>,
    /// Function computing the value at creation time.
    pub default_func: Option<SymbolRef>,
    /// Validation function applied to caller input.
    pub validate:     Option<SymbolRef>,
    /// Wire tag; explicit from the declaration or assigned by allocation.
    pub tag:          Option<u32>,
    /// Doc comment carried into generated schemas.
    pub comment:      Option<String>
}

impl Field {
    /// Start building a field.
    pub fn builder(name: impl Into<String>, ty: FieldType) -> FieldBuilder {
        FieldBuilder::new(name, ty)
    }

    /// Synthesized identifier field with the given tag.
    #[must_use]
    pub fn identifier(tag: u32) -> Self {
        FieldBuilder::new(ID_FIELD, FieldType::Int32)
            .unique()
            .tag(tag)
            .build()
    }

    /// Whether this is the identifier field (`id`, case-insensitive).
    #[must_use]
    pub fn is_id(&self) -> bool {
        self.name.eq_ignore_ascii_case(ID_FIELD)
    }

    /// Whether the name can become a Rust field or proto field identifier.
    ///
    /// ASCII letters, digits and underscores, not starting with a digit.
    /// Path keywords and `_` cannot be escaped with `r#` and are rejected.
    #[must_use]
    pub fn has_valid_name(&self) -> bool {
        let mut chars = self.name.chars();
        let starts_well = chars
            .next()
            .is_some_and(|c| c.is_ascii_alphabetic() || c == '_');
        starts_well
            && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !matches!(self.name.as_str(), "_" | "self" | "Self" | "super" | "crate")
    }

    /// Whether the value is computed by a default function.
    #[must_use]
    pub fn is_computed(&self) -> bool {
        self.default_func.is_some()
    }
}

/// Immutable builder for [`Field`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use]
pub struct FieldBuilder {
    field: Field
}

impl FieldBuilder {
    /// Builder for a field with no modifiers applied.
    pub fn new(name: impl Into<String>, ty: FieldType) -> Self {
        Self {
            field: Field {
                name: name.into(),
                ty,
                unique: false,
                immutable: false,
                optional: false,
                default: None,
                default_func: None,
                validate: None,
                tag: None,
                comment: None
            }
        }
    }

    /// Mark as unique.
    pub fn unique(self) -> Self {
        Self {
            field: Field {
                unique: true,
                ..self.field
            }
        }
    }

    /// Mark as immutable.
    pub fn immutable(self) -> Self {
        Self {
            field: Field {
                immutable: true,
                ..self.field
            }
        }
    }

    /// Mark as optional.
    pub fn optional(self) -> Self {
        Self {
            field: Field {
                optional: true,
                ..self.field
            }
        }
    }

    /// Attach a comment.
    pub fn comment(self, comment: impl Into<String>) -> Self {
        Self {
            field: Field {
                comment: Some(comment.into()),
                ..self.field
            }
        }
    }

    /// Set an explicit wire tag.
    pub fn tag(self, tag: u32) -> Self {
        Self {
            field: Field {
                tag: Some(tag),
                ..self.field
            }
        }
    }

    /// Set a static default, clearing any default function.
    pub fn default_value(self, value: DefaultValue) -> Self {
        Self {
            field: Field {
                default: Some(value),
                default_func: None,
                ..self.field
            }
        }
    }

    /// Set a default function, clearing any static default.
    pub fn default_func(self, func: SymbolRef) -> Self {
        Self {
            field: Field {
                default: None,
                default_func: Some(func),
                ..self.field
            }
        }
    }

    /// Set a validation function.
    pub fn validate(self, func: SymbolRef) -> Self {
        Self {
            field: Field {
                validate: Some(func),
                ..self.field
            }
        }
    }

    /// Type of the field being built.
    #[must_use]
    pub fn ty(&self) -> FieldType {
        self.field.ty
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> Field {
        self.field
    }
}
