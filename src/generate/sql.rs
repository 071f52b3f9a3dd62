// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Relational schema and query generation.
//!
//! One entity model, three dialects. Switching [`Dialect`] changes quoting,
//! placeholders, column types and the identifier idiom; it never changes
//! column order, nullability or which queries exist.
//!
//! # Artifacts
//!
//! | Function | File | Content |
//! |----------|------|---------|
//! | [`generate_schema`] | `schema.sql` | `CREATE TABLE` per entity |
//! | [`generate_queries`] | `query.sql` | sqlc `-- name:` blocks per entity |

mod dialect;
mod queries;
mod schema;

pub use dialect::Dialect;
pub use queries::{generate_entity_queries, generate_queries};
pub use schema::{generate_column_def, generate_create_table, generate_schema};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Entity, Field, FieldType};

    fn entity() -> Entity {
        let mut entity = Entity::new("User");
        entity.fields = vec![
            Field::identifier(1),
            Field::builder("email", FieldType::Text).unique().tag(2).build(),
            Field::builder("age", FieldType::Int32).optional().tag(3).build(),
            Field::builder("active", FieldType::Bool).tag(4).build(),
            Field::builder("created_at", FieldType::Time).tag(5).build(),
        ];
        entity
    }

    /// Column names and NOT NULL flags of a CREATE TABLE statement.
    fn columns(sql: &str) -> Vec<(String, bool)> {
        sql.lines()
            .skip(1)
            .filter(|line| line.starts_with("    "))
            .map(|line| {
                let name = line
                    .split_whitespace()
                    .next()
                    .unwrap_or_default()
                    .trim_matches(['"', '`'])
                    .to_string();
                (name, line.contains("NOT NULL"))
            })
            .collect()
    }

    #[test]
    fn dialects_preserve_column_order_and_nullability() {
        let entity = entity();
        let reference = columns(&generate_create_table(&entity, Dialect::PostgreSQL));
        for dialect in Dialect::ALL {
            assert_eq!(columns(&generate_create_table(&entity, dialect)), reference);
        }
    }

    #[test]
    fn dialects_produce_distinct_sql() {
        let entity = entity();
        let outputs: Vec<String> = Dialect::ALL
            .iter()
            .map(|d| generate_create_table(&entity, *d) + &generate_entity_queries(&entity, *d))
            .collect();
        assert_ne!(outputs[0], outputs[1]);
        assert_ne!(outputs[1], outputs[2]);
        assert_ne!(outputs[0], outputs[2]);
    }
}
