// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! proto3 IDL generation.
//!
//! # Output Layout
//!
//! ```text
//! syntax = "proto3";
//! package <package>;
//! option ...;                                   configured options
//! import "google/protobuf/empty.proto";         iff an entity permits Delete
//! import "google/protobuf/timestamp.proto";     iff an emitted field is Time
//!
//! message User { ... }                          message or service entities
//!
//! message CreateUserRequest { ... }             per permitted method
//! ...
//! service UserService { rpc ... }
//! ```
//!
//! # Request Messages
//!
//! | Method | Request fields | Response |
//! |--------|----------------|----------|
//! | Create | all but `id` | `User` |
//! | Get | `id` | `User` |
//! | Update | `id` + mutable fields | `User` |
//! | Delete | `id` | `google.protobuf.Empty` |
//! | List | `limit = 1`, `offset = 2` | `ListUserResponse { repeated User users = 1; }` |
//!
//! Request fields keep the entity's wire tags.

use std::{
    collections::BTreeMap,
    fmt::{self, Write}
};

use serde::Deserialize;

use super::OptionalPolicy;
use crate::{
    error::{Error, Result},
    schema::{Entity, Field, FieldType, Method},
    utils::naming::GENERATED_NOTICE
};

const TIMESTAMP_IMPORT: &str = "google/protobuf/timestamp.proto";
const EMPTY_IMPORT: &str = "google/protobuf/empty.proto";

/// IDL generator options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtoOptions {
    /// Proto package name.
    #[serde(default = "default_package")]
    pub package:         String,
    /// File options (`option <key> = <value>;`).
    #[serde(default)]
    pub options:         BTreeMap<String, OptionValue>,
    /// How optional fields are represented on the wire.
    #[serde(default)]
    pub optional_policy: OptionalPolicy
}

/// Value of a file option.
///
/// | TOML | Emitted |
/// |------|---------|
/// | `java_multiple_files = true` | `true` |
/// | `max_size = 10` | `10` |
/// | `optimize_for = "SPEED"` | `SPEED` (enum constant) |
/// | `go_package = "example.com/pb"` | `"example.com/pb"` |
///
/// Text made only of uppercase letters, digits and `_` is taken to be an
/// enum constant.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    /// Boolean option.
    Bool(bool),
    /// Integer option.
    Int(i64),
    /// String option or enum constant.
    Text(String)
}

impl OptionValue {
    fn is_enum_constant(text: &str) -> bool {
        text.chars().next().is_some_and(|c| c.is_ascii_uppercase())
            && text
                .chars()
                .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "{value}"),
            Self::Int(value) => write!(f, "{value}"),
            Self::Text(text) if Self::is_enum_constant(text) => f.write_str(text),
            Self::Text(text) => write!(f, "\"{}\"", escape(text))
        }
    }
}

fn default_package() -> String {
    "entlite".to_string()
}

impl Default for ProtoOptions {
    fn default() -> Self {
        Self {
            package:         default_package(),
            options:         BTreeMap::new(),
            optional_policy: OptionalPolicy::default()
        }
    }
}

/// Generate the `.proto` file.
///
/// # Errors
///
/// [`Error::NoTaggedEntities`] when no entity carries `message` or
/// `service`.
pub fn generate(entities: &[Entity], options: &ProtoOptions) -> Result<String> {
    let emitted: Vec<&Entity> = entities.iter().filter(|e| e.emits_message()).collect();
    if emitted.is_empty() {
        return Err(Error::NoTaggedEntities {
            artifact:   "proto schema",
            annotation: "message or service"
        });
    }

    let mut out = String::new();
    let _ = writeln!(out, "// {GENERATED_NOTICE}\n");
    let _ = writeln!(out, "syntax = \"proto3\";\n");
    let _ = writeln!(out, "package {};\n", options.package);

    if !options.options.is_empty() {
        for (key, value) in &options.options {
            let _ = writeln!(out, "option {key} = {value};");
        }
        out.push('\n');
    }

    let imports = imports(&emitted);
    if !imports.is_empty() {
        for import in &imports {
            let _ = writeln!(out, "import \"{import}\";");
        }
        out.push('\n');
    }

    let mut blocks: Vec<String> = emitted
        .iter()
        .map(|entity| message_block(entity, options.optional_policy))
        .collect();

    for entity in emitted.iter().filter(|e| e.has_service()) {
        blocks.extend(request_blocks(entity, options.optional_policy));
        blocks.push(service_block(entity));
    }

    out.push_str(&blocks.join("\n"));
    Ok(out)
}

/// Proto type for a field type.
#[must_use]
pub fn proto_type(ty: FieldType) -> &'static str {
    match ty {
        FieldType::Text => "string",
        FieldType::Int32 => "int32",
        FieldType::Bool => "bool",
        FieldType::Time => "google.protobuf.Timestamp"
    }
}

fn imports(entities: &[&Entity]) -> Vec<&'static str> {
    let mut imports = Vec::new();
    if entities.iter().any(|e| e.permits(Method::Delete)) {
        imports.push(EMPTY_IMPORT);
    }
    if entities
        .iter()
        .flat_map(|e| e.fields.iter())
        .any(|f| f.ty.is_time())
    {
        imports.push(TIMESTAMP_IMPORT);
    }
    imports
}

fn message_block(entity: &Entity, policy: OptionalPolicy) -> String {
    let mut out = String::new();
    match &entity.doc {
        Some(doc) => write_comment(&mut out, "", doc),
        None => {
            let _ = writeln!(out, "// {} represents a {} entity.", entity.name, entity.snake_name());
        }
    }
    let fields: Vec<&Field> = entity.fields.iter().collect();
    write_message(&mut out, &entity.name, &fields, policy);
    out
}

fn request_blocks(entity: &Entity, policy: OptionalPolicy) -> Vec<String> {
    let name = &entity.name;
    let id: Vec<&Field> = entity.id_field().into_iter().collect();

    entity
        .methods()
        .into_iter()
        .map(|method| {
            let mut out = String::new();
            match method {
                Method::Create => {
                    let fields: Vec<&Field> = entity.create_fields().collect();
                    write_message(&mut out, &format!("Create{name}Request"), &fields, policy);
                }
                Method::Get => write_message(&mut out, &format!("Get{name}Request"), &id, policy),
                Method::Update => {
                    let fields: Vec<&Field> = entity
                        .fields
                        .iter()
                        .filter(|f| f.is_id() || !f.immutable)
                        .collect();
                    write_message(&mut out, &format!("Update{name}Request"), &fields, policy);
                }
                Method::Delete => write_message(&mut out, &format!("Delete{name}Request"), &id, policy),
                Method::List => {
                    let _ = writeln!(
                        out,
                        "message List{name}Request {{\n  int32 limit = 1;\n  int32 offset = 2;\n}}\n"
                    );
                    let _ = writeln!(
                        out,
                        "message List{name}Response {{\n  repeated {name} {} = 1;\n}}",
                        entity.plural
                    );
                }
            }
            out
        })
        .collect()
}

fn write_message(out: &mut String, name: &str, fields: &[&Field], policy: OptionalPolicy) {
    let _ = writeln!(out, "message {name} {{");
    for field in fields {
        if let Some(comment) = &field.comment {
            write_comment(out, "  ", comment);
        }
        let label = if field.optional && !field.ty.is_time() && policy == OptionalPolicy::Presence {
            "optional "
        } else {
            ""
        };
        let _ = writeln!(
            out,
            "  {label}{} {} = {};",
            proto_type(field.ty),
            field.name,
            field.tag.unwrap_or_default()
        );
    }
    let _ = writeln!(out, "}}");
}

/// One `//` line per line of `text`.
fn write_comment(out: &mut String, indent: &str, text: &str) {
    for line in text.lines() {
        let _ = writeln!(out, "{indent}//{}{line}", if line.is_empty() { "" } else { " " });
    }
}

fn service_block(entity: &Entity) -> String {
    let name = &entity.name;
    let mut out = String::new();
    let _ = writeln!(out, "// {name}Service provides CRUD operations for {name} entities.");
    let _ = writeln!(out, "service {name}Service {{");
    for method in entity.methods() {
        let response = match method {
            Method::Create | Method::Get | Method::Update => name.clone(),
            Method::Delete => "google.protobuf.Empty".to_string(),
            Method::List => format!("List{name}Response")
        };
        let _ = writeln!(out, "  rpc {method}({method}{name}Request) returns ({response});");
    }
    let _ = writeln!(out, "}}");
    out
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}
