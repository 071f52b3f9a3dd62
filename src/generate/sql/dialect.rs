// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! SQL dialect configuration.
//!
//! [`Dialect`] is the single mapping table for everything that differs
//! between databases: identifier quoting, placeholders, column types, the
//! identifier-column idiom and `RETURNING` support.

use std::{fmt, str::FromStr};

use serde::Deserialize;

use crate::{error::Error, schema::FieldType};

/// Keywords reserved in at least one supported dialect, sorted.
const RESERVED_WORDS: &[&str] = &[
    "add", "all", "alter", "analyze", "and", "any", "array", "as", "asc", "asymmetric",
    "authorization", "between", "binary", "both", "by", "call", "case", "cast", "check",
    "collate", "column", "constraint", "create", "cross", "current_date", "current_role",
    "current_time", "current_timestamp", "current_user", "database", "databases",
    "default", "deferrable", "delete", "desc", "describe", "distinct", "div", "do", "drop",
    "else", "end", "except", "exists", "explain", "false", "fetch", "for", "foreign",
    "from", "full", "glob", "grant", "group", "having", "if", "ilike", "in", "index",
    "inner", "insert", "intersect", "interval", "into", "is", "isnull", "join", "key",
    "keys", "lateral", "leading", "left", "like", "limit", "localtime", "localtimestamp",
    "match", "natural", "not", "notnull", "null", "of", "offset", "on", "only", "or",
    "order", "outer", "overlaps", "placing", "primary", "range", "references", "regexp",
    "rename", "replace", "returning", "right", "rlike", "row", "rows", "select",
    "session_user", "set", "show", "similar", "some", "symmetric", "table", "then", "to",
    "trailing", "true", "union", "unique", "update", "user", "using", "values", "variadic",
    "verbose", "when", "where", "window", "with"
];

/// Target SQL dialect, selected once per run.
///
/// | Concern | PostgreSQL | SQLite | MySQL |
/// |---------|------------|--------|-------|
/// | Identifier quote | `"user"` | `"user"` | `` `user` `` |
/// | Placeholder | `$1` | `?` | `?` |
/// | `RETURNING` | yes | yes | no |
/// | Int32 id | `SERIAL PRIMARY KEY` | `INTEGER PRIMARY KEY AUTOINCREMENT` | `INT AUTO_INCREMENT PRIMARY KEY` |
///
/// # Examples
///
/// ```
/// use entlite::Dialect;
///
/// let dialect: Dialect = "pg".parse().unwrap();
/// assert_eq!(dialect.placeholder(2), "$2");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Deserialize)]
#[serde(try_from = "String")]
pub enum Dialect {
    /// PostgreSQL.
    ///
    /// - Placeholders: `$1, $2, $3, ...`
    /// - Time: `TIMESTAMP WITH TIME ZONE`
    #[default]
    PostgreSQL,

    /// SQLite.
    ///
    /// - Placeholders: `?`
    /// - Booleans stored as `INTEGER` (0/1)
    SQLite,

    /// MySQL / MariaDB.
    ///
    /// - Placeholders: `?`
    /// - No `RETURNING`; writes are followed by a separate read
    MySQL
}

impl Dialect {
    /// Every supported dialect.
    pub const ALL: [Self; 3] = [Self::PostgreSQL, Self::SQLite, Self::MySQL];

    /// Quote an identifier (table name).
    #[must_use]
    pub fn quote_ident(&self, ident: &str) -> String {
        match self {
            Self::PostgreSQL | Self::SQLite => format!("\"{}\"", ident.replace('"', "\"\"")),
            Self::MySQL => format!("`{}`", ident.replace('`', "``"))
        }
    }

    /// Column name, quoted only when it has to be.
    ///
    /// Plain lowercase names pass through; reserved words and names that
    /// case folding would change are quoted.
    #[must_use]
    pub fn quote_column(&self, name: &str) -> String {
        let plain = name
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_lowercase() || c == '_')
            && name
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
        if plain && RESERVED_WORDS.binary_search(&name).is_err() {
            name.to_string()
        } else {
            self.quote_ident(name)
        }
    }

    /// Placeholder for the parameter at `index` (1-based).
    #[must_use]
    pub fn placeholder(&self, index: usize) -> String {
        match self {
            Self::PostgreSQL => format!("${index}"),
            Self::SQLite | Self::MySQL => "?".to_string()
        }
    }

    /// Comma-separated placeholders for `count` parameters starting at 1.
    #[must_use]
    pub fn placeholders(&self, count: usize) -> String {
        (1..=count)
            .map(|i| self.placeholder(i))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// `SET` clause assigning `columns` to parameters `1..=columns.len()`.
    #[must_use]
    pub fn set_clause(&self, columns: &[&str]) -> String {
        columns
            .iter()
            .enumerate()
            .map(|(i, column)| {
                format!("{} = {}", self.quote_column(column), self.placeholder(i + 1))
            })
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Whether `INSERT`/`UPDATE ... RETURNING` is available.
    #[must_use]
    pub fn supports_returning(&self) -> bool {
        matches!(self, Self::PostgreSQL | Self::SQLite)
    }

    /// Column type for a field type.
    #[must_use]
    pub fn column_type(&self, ty: FieldType) -> &'static str {
        match (self, ty) {
            (_, FieldType::Text) => "TEXT",
            (_, FieldType::Int32) => "INTEGER",
            (Self::PostgreSQL, FieldType::Bool) => "BOOLEAN",
            (Self::SQLite, FieldType::Bool) => "INTEGER",
            (Self::MySQL, FieldType::Bool) => "TINYINT(1)",
            (Self::PostgreSQL, FieldType::Time) => "TIMESTAMP WITH TIME ZONE",
            (Self::SQLite, FieldType::Time) => "DATETIME",
            (Self::MySQL, FieldType::Time) => "TIMESTAMP"
        }
    }

    /// Type and key clause of the identifier column.
    ///
    /// Int32 identifiers are auto-generated by the database; other types
    /// are plain primary keys supplied by the caller.
    #[must_use]
    pub fn id_column(&self, ty: FieldType) -> String {
        match (self, ty) {
            (Self::PostgreSQL, FieldType::Int32) => "SERIAL PRIMARY KEY".to_string(),
            (Self::SQLite, FieldType::Int32) => "INTEGER PRIMARY KEY AUTOINCREMENT".to_string(),
            (Self::MySQL, FieldType::Int32) => "INT AUTO_INCREMENT PRIMARY KEY".to_string(),
            (_, other) => format!("{} PRIMARY KEY", self.column_type(other))
        }
    }

    /// Boolean literal.
    #[must_use]
    pub fn bool_literal(&self, value: bool) -> &'static str {
        match (self, value) {
            (Self::SQLite, true) => "1",
            (Self::SQLite, false) => "0",
            (_, true) => "TRUE",
            (_, false) => "FALSE"
        }
    }

    /// Lowercase name, as accepted by [`FromStr`].
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PostgreSQL => "postgresql",
            Self::SQLite => "sqlite",
            Self::MySQL => "mysql"
        }
    }
}

impl FromStr for Dialect {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_lowercase().as_str() {
            "postgres" | "postgresql" | "pg" => Ok(Self::PostgreSQL),
            "sqlite" | "sqlite3" => Ok(Self::SQLite),
            "mysql" | "mariadb" => Ok(Self::MySQL),
            _ => Err(Error::UnsupportedDialect(value.to_string()))
        }
    }
}

impl TryFrom<String> for Dialect {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
