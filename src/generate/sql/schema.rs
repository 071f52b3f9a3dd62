// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Table definitions (`schema.sql`).

use super::Dialect;
use crate::{
    error::{Error, Result},
    schema::{DefaultValue, Entity, Field, FieldType},
    utils::naming::GENERATED_NOTICE
};

/// Generate one `CREATE TABLE` per entity.
///
/// # Errors
///
/// [`Error::NoTaggedEntities`] when `entities` is empty.
pub fn generate_schema(entities: &[Entity], dialect: Dialect) -> Result<String> {
    if entities.is_empty() {
        return Err(Error::NoTaggedEntities {
            artifact:   "SQL schema",
            annotation: "any"
        });
    }

    let tables: Vec<String> = entities
        .iter()
        .map(|entity| generate_create_table(entity, dialect))
        .collect();

    Ok(format!("-- {GENERATED_NOTICE}\n\n{}", tables.join("\n")))
}

/// Generate the `CREATE TABLE` statement for one entity.
///
/// Columns follow declaration order, each field exactly once.
#[must_use]
pub fn generate_create_table(entity: &Entity, dialect: Dialect) -> String {
    let columns: Vec<String> = entity
        .fields
        .iter()
        .map(|field| format!("    {}", generate_column_def(field, dialect)))
        .collect();

    format!(
        "CREATE TABLE {} (\n{}\n);\n",
        dialect.quote_ident(&entity.table),
        columns.join(",\n")
    )
}

/// Generate a single column definition.
///
/// Clause order: type, `UNIQUE`, `DEFAULT`, `NOT NULL`. Reserved words such
/// as `order` are quoted per dialect.
#[must_use]
pub fn generate_column_def(field: &Field, dialect: Dialect) -> String {
    let column = dialect.quote_column(&field.name);
    if field.is_id() {
        return format!("{column} {}", dialect.id_column(field.ty));
    }

    let mut parts = vec![column, dialect.column_type(field.ty).to_string()];

    if field.unique {
        parts.push("UNIQUE".to_string());
    }

    if let Some(default) = &field.default {
        parts.push(format!("DEFAULT {}", default_literal(default, field.ty, dialect)));
    }

    if !field.optional {
        parts.push("NOT NULL".to_string());
    }

    parts.join(" ")
}

fn default_literal(value: &DefaultValue, ty: FieldType, dialect: Dialect) -> String {
    match value {
        DefaultValue::Text(expr) if ty.is_time() => expr.clone(),
        DefaultValue::Text(text) => format!("'{}'", text.replace('\'', "''")),
        DefaultValue::Int(n) => n.to_string(),
        DefaultValue::Bool(b) => dialect.bool_literal(*b).to_string()
    }
}
