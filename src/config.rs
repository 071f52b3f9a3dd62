// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Run configuration.
//!
//! A TOML file names the schema directory and one section per generator.
//! A missing section skips that generator.
//!
//! ```toml
//! schema_dir = "schema"
//!
//! [proto]
//! output = "gen/entlite.proto"
//! package = "app.v1"
//! optional_policy = "presence"
//!
//! [proto.options]
//! go_package = "example.com/app/pb"
//! optimize_for = "SPEED"
//!
//! [sql]
//! dialect = "postgres"
//! schema_output = "gen/schema.sql"
//! queries_output = "gen/query.sql"
//!
//! [convert]
//! output = "src/convert.rs"
//! db_module = "crate::db"
//! wire_module = "crate::pb"
//!
//! [wrap]
//! input_dir = "src/db"
//! output_dir = "src/store"
//! upstream_module = "crate::db"
//!
//! [validate]
//! output = "src/validate.rs"
//! wire_module = "crate::pb"
//! ```
//!
//! Relative paths resolve against the directory holding the config file.

use std::{
    fs,
    path::{Path, PathBuf}
};

use serde::Deserialize;

use crate::{
    error::{Error, Result},
    generate::{
        convert::ConvertOptions, proto::ProtoOptions, sql::Dialect, validate::ValidateOptions,
        wrap::WrapOptions
    }
};

/// Whole-run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Config {
    /// Directory scanned for entity declarations.
    pub schema_dir: PathBuf,
    /// proto3 IDL output.
    #[serde(default)]
    pub proto:      Option<ProtoConfig>,
    /// SQL schema and query output.
    #[serde(default)]
    pub sql:        Option<SqlConfig>,
    /// Conversion code output.
    #[serde(default)]
    pub convert:    Option<ConvertConfig>,
    /// Wrapper code output.
    #[serde(default)]
    pub wrap:       Option<WrapConfig>,
    /// Request validation output.
    #[serde(default)]
    pub validate:   Option<ValidateConfig>
}

/// `[proto]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProtoConfig {
    /// Destination `.proto` file.
    pub output:  PathBuf,
    /// Generator options.
    #[serde(flatten)]
    pub options: ProtoOptions
}

/// `[sql]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SqlConfig {
    /// Target dialect.
    #[serde(default)]
    pub dialect:        Dialect,
    /// Destination of `CREATE TABLE` statements.
    #[serde(default)]
    pub schema_output:  Option<PathBuf>,
    /// Destination of sqlc queries.
    #[serde(default)]
    pub queries_output: Option<PathBuf>
}

/// `[convert]` section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConvertConfig {
    /// Destination `.rs` file.
    pub output:  PathBuf,
    /// Generator options.
    #[serde(flatten)]
    pub options: ConvertOptions
}

/// `[wrap]` section.
///
/// `imports` entries override aliases extracted from the declarations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WrapConfig {
    /// Directory of upstream-generated `.rs` files.
    pub input_dir:  PathBuf,
    /// Directory receiving one wrapper per upstream file.
    pub output_dir: PathBuf,
    /// Generator options.
    #[serde(flatten)]
    pub options:    WrapOptions
}

/// `[validate]` section.
///
/// `imports` entries override aliases extracted from the declarations.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateConfig {
    /// Destination `.rs` file.
    pub output:  PathBuf,
    /// Generator options.
    #[serde(flatten)]
    pub options: ValidateOptions
}

impl Config {
    /// Read and parse a config file, resolving paths against its directory.
    ///
    /// # Errors
    ///
    /// [`Error::Io`] when the file cannot be read, [`Error::Config`] when it
    /// is not a valid configuration.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
        let config = Self::parse(&contents, path)?;
        let base = path.parent().unwrap_or_else(|| Path::new(""));
        Ok(config.resolved(base))
    }

    /// Parse a config from a string; paths stay as written.
    ///
    /// # Errors
    ///
    /// [`Error::Config`] when `contents` is not a valid configuration.
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Self::parse(contents, Path::new("<inline>"))
    }

    fn parse(contents: &str, path: &Path) -> Result<Self> {
        toml::from_str(contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source
        })
    }

    /// Join every relative path onto `base`.
    #[must_use]
    pub fn resolved(mut self, base: &Path) -> Self {
        let resolve = |path: &mut PathBuf| {
            if path.is_relative() {
                *path = base.join(&*path);
            }
        };

        resolve(&mut self.schema_dir);
        if let Some(proto) = &mut self.proto {
            resolve(&mut proto.output);
        }
        if let Some(sql) = &mut self.sql {
            sql.schema_output.iter_mut().for_each(resolve);
            sql.queries_output.iter_mut().for_each(resolve);
        }
        if let Some(convert) = &mut self.convert {
            resolve(&mut convert.output);
        }
        if let Some(wrap) = &mut self.wrap {
            resolve(&mut wrap.input_dir);
            resolve(&mut wrap.output_dir);
        }
        if let Some(validate) = &mut self.validate {
            resolve(&mut validate.output);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::{OptionalPolicy, proto::OptionValue};

    const FULL: &str = r#"
        schema_dir = "schema"

        [proto]
        output = "gen/app.proto"
        package = "app.v1"
        optional_policy = "zero_value"

        [proto.options]
        go_package = "example.com/app/pb"
        java_multiple_files = true

        [sql]
        dialect = "mysql"
        schema_output = "gen/schema.sql"

        [convert]
        output = "src/convert.rs"
        db_module = "crate::db"
        imports = ["crate::db", "crate::pb"]

        [wrap]
        input_dir = "src/db"
        output_dir = "src/store"

        [wrap.imports]
        logic = "crate::logic"

        [validate]
        output = "src/validate.rs"
    "#;

    #[test]
    fn full_config() {
        let config = Config::from_toml_str(FULL).unwrap();
        assert_eq!(config.schema_dir, PathBuf::from("schema"));

        let proto = config.proto.unwrap();
        assert_eq!(proto.options.package, "app.v1");
        assert_eq!(proto.options.optional_policy, OptionalPolicy::ZeroValue);
        assert_eq!(
            proto.options.options.get("go_package"),
            Some(&OptionValue::from("example.com/app/pb"))
        );
        assert_eq!(
            proto.options.options.get("java_multiple_files"),
            Some(&OptionValue::Bool(true))
        );

        let sql = config.sql.unwrap();
        assert_eq!(sql.dialect, Dialect::MySQL);
        assert_eq!(sql.schema_output, Some(PathBuf::from("gen/schema.sql")));
        assert_eq!(sql.queries_output, None);

        let convert = config.convert.unwrap();
        assert_eq!(convert.options.db_module, "crate::db");
        assert_eq!(convert.options.wire_module, "pb");
        assert_eq!(convert.options.imports.len(), 2);

        let wrap = config.wrap.unwrap();
        assert_eq!(wrap.options.upstream_module, "crate::db");
        assert_eq!(
            wrap.options.imports.get("logic").map(String::as_str),
            Some("crate::logic")
        );

        assert_eq!(config.validate.unwrap().options.wire_module, "pb");
    }

    #[test]
    fn missing_sections_are_none() {
        let config = Config::from_toml_str("schema_dir = \"schema\"").unwrap();
        assert!(config.proto.is_none());
        assert!(config.sql.is_none());
        assert!(config.convert.is_none());
        assert!(config.wrap.is_none());
        assert!(config.validate.is_none());
    }

    #[test]
    fn sql_dialect_defaults_to_postgres() {
        let config = Config::from_toml_str("schema_dir = \"s\"\n[sql]\n").unwrap();
        assert_eq!(config.sql.unwrap().dialect, Dialect::PostgreSQL);
    }

    #[test]
    fn unsupported_dialect_rejected() {
        let err = Config::from_toml_str("schema_dir = \"s\"\n[sql]\ndialect = \"oracle\"\n").unwrap_err();
        assert!(matches!(err, Error::Config { .. }));
        assert!(err.to_string().contains("oracle"));
    }

    #[test]
    fn missing_schema_dir_rejected() {
        assert!(matches!(
            Config::from_toml_str("[sql]\n").unwrap_err(),
            Error::Config { .. }
        ));
    }

    #[test]
    fn from_file_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("entlite.toml");
        fs::write(&path, FULL.replace("src/store", "/abs/store")).unwrap();

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.schema_dir, dir.path().join("schema"));
        assert_eq!(config.proto.unwrap().output, dir.path().join("gen/app.proto"));
        let wrap = config.wrap.unwrap();
        assert_eq!(wrap.input_dir, dir.path().join("src/db"));
        assert_eq!(wrap.output_dir, PathBuf::from("/abs/store"));
    }

    #[test]
    fn from_file_missing() {
        let err = Config::from_file("/nonexistent/entlite.toml").unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
