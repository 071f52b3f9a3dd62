// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! sqlc-style CRUD queries (`query.sql`).
//!
//! | Query | With `RETURNING` | Without (MySQL) |
//! |-------|------------------|-----------------|
//! | `CreateUser` | `:one` + `RETURNING *` | `:execlastid`, read back with `GetUser` |
//! | `GetUser` | `:one` | `:one` |
//! | `ListUsers` | `:many`, `LIMIT`/`OFFSET` | same |
//! | `UpdateUser` | `:one` + `RETURNING *` | `:exec`, read back with `GetUser` |
//! | `DeleteUser` | `:exec` | `:exec` |

use tracing::debug;

use super::Dialect;
use crate::{
    error::{Error, Result},
    schema::{Entity, FieldType, ID_FIELD},
    utils::naming::GENERATED_NOTICE
};

/// Generate the query file for all entities.
///
/// # Errors
///
/// [`Error::NoTaggedEntities`] when `entities` is empty.
pub fn generate_queries(entities: &[Entity], dialect: Dialect) -> Result<String> {
    if entities.is_empty() {
        return Err(Error::NoTaggedEntities {
            artifact:   "SQL queries",
            annotation: "any"
        });
    }

    let blocks: Vec<String> = entities
        .iter()
        .map(|entity| generate_entity_queries(entity, dialect))
        .collect();

    Ok(format!("-- {GENERATED_NOTICE}\n\n{}", blocks.join("\n")))
}

/// All query blocks for one entity, separated by blank lines.
#[must_use]
pub fn generate_entity_queries(entity: &Entity, dialect: Dialect) -> String {
    let table = dialect.quote_ident(&entity.table);
    let mut blocks = vec![
        create_query(entity, &table, dialect),
        get_query(entity, &table, dialect),
        list_query(entity, &table, dialect),
    ];
    match update_query(entity, &table, dialect) {
        Some(update) => blocks.push(update),
        None => debug!(entity = %entity.name, "no updatable columns; skipping update query")
    }
    blocks.push(delete_query(entity, &table, dialect));
    blocks.join("\n")
}

fn id_column(entity: &Entity, dialect: Dialect) -> String {
    dialect.quote_column(entity.id_field().map_or(ID_FIELD, |f| f.name.as_str()))
}

fn create_query(entity: &Entity, table: &str, dialect: Dialect) -> String {
    let auto_id = entity
        .id_field()
        .is_none_or(|id| id.ty == FieldType::Int32);
    let columns: Vec<String> = entity
        .fields
        .iter()
        .filter(|f| !(auto_id && f.is_id()))
        .map(|f| dialect.quote_column(&f.name))
        .collect();

    let insert = if columns.is_empty() {
        match dialect {
            Dialect::MySQL => format!("INSERT INTO {table} () VALUES ()"),
            _ => format!("INSERT INTO {table} DEFAULT VALUES")
        }
    } else {
        format!(
            "INSERT INTO {table} ({})\nVALUES ({})",
            columns.join(", "),
            dialect.placeholders(columns.len())
        )
    };

    if dialect.supports_returning() {
        format!("-- name: Create{} :one\n{insert}\nRETURNING *;\n", entity.name)
    } else {
        format!("-- name: Create{} :execlastid\n{insert};\n", entity.name)
    }
}

fn get_query(entity: &Entity, table: &str, dialect: Dialect) -> String {
    format!(
        "-- name: Get{} :one\nSELECT * FROM {table}\nWHERE {} = {} LIMIT 1;\n",
        entity.name,
        id_column(entity, dialect),
        dialect.placeholder(1)
    )
}

fn list_query(entity: &Entity, table: &str, dialect: Dialect) -> String {
    format!(
        "-- name: List{} :many\nSELECT * FROM {table}\nORDER BY {}\nLIMIT {} OFFSET {};\n",
        entity.plural_pascal(),
        id_column(entity, dialect),
        dialect.placeholder(1),
        dialect.placeholder(2)
    )
}

fn update_query(entity: &Entity, table: &str, dialect: Dialect) -> Option<String> {
    let columns: Vec<&str> = entity.update_fields().map(|f| f.name.as_str()).collect();
    if columns.is_empty() {
        return None;
    }

    let statement = format!(
        "UPDATE {table}\nSET {}\nWHERE {} = {}",
        dialect.set_clause(&columns),
        id_column(entity, dialect),
        dialect.placeholder(columns.len() + 1)
    );

    Some(if dialect.supports_returning() {
        format!("-- name: Update{} :one\n{statement}\nRETURNING *;\n", entity.name)
    } else {
        format!("-- name: Update{} :exec\n{statement};\n", entity.name)
    })
}

fn delete_query(entity: &Entity, table: &str, dialect: Dialect) -> String {
    format!(
        "-- name: Delete{} :exec\nDELETE FROM {table}\nWHERE {} = {};\n",
        entity.name,
        id_column(entity, dialect),
        dialect.placeholder(1)
    )
}
