// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Error type shared by every pipeline stage.
//!
//! # Propagation
//!
//! | Stage | Fatal | Recovered locally |
//! |-------|-------|-------------------|
//! | Discovery | missing directory, zero entities | unparsable file (skipped) |
//! | Parsing | - | malformed declaration (skipped) |
//! | Tag allocation | collision, invalid tag, duplicate field | - |
//! | Generators | no annotated entities, upstream parse | - |
//! | Output | I/O | - |
//!
//! Messages always name the entity, field and tag involved so the source
//! declaration can be fixed without a debugger.

use std::{io, path::PathBuf};

use thiserror::Error as ThisError;

/// Errors produced while loading entities or generating artifacts.
#[derive(Debug, ThisError)]
pub enum Error {
    /// The schema root does not exist or is not a directory.
    #[error("schema directory not found: {}", path.display())]
    DirectoryNotFound {
        /// Directory that was requested.
        path: PathBuf
    },

    /// Discovery finished without finding a single entity declaration.
    #[error("no entity declarations found under {}", path.display())]
    NoEntitiesFound {
        /// Directory that was scanned.
        path: PathBuf
    },

    /// A declaration file or entity declaration could not be understood.
    #[error("malformed declaration in {}: {message}", path.display())]
    MalformedDeclaration {
        /// File containing the declaration.
        path:    PathBuf,
        /// Parser diagnostic.
        message: String
    },

    /// Two fields of one entity carry the same explicit wire tag.
    #[error("entity `{entity}`: tag {tag} is used by both `{first}` and `{second}`")]
    TagCollision {
        /// Entity name.
        entity: String,
        /// Duplicated tag.
        tag:    u32,
        /// Field declared first.
        first:  String,
        /// Field declared second.
        second: String
    },

    /// An explicit wire tag is zero or falls in the reserved protobuf range.
    #[error("entity `{entity}`: field `{field}` has invalid tag {tag}")]
    InvalidTag {
        /// Entity name.
        entity: String,
        /// Field name.
        field:  String,
        /// Offending tag.
        tag:    u32
    },

    /// A field name is declared twice within one entity.
    #[error("entity `{entity}`: field `{field}` is declared more than once")]
    DuplicateField {
        /// Entity name.
        entity: String,
        /// Duplicated field name.
        field:  String
    },

    /// A field name cannot be used as an identifier in generated code.
    #[error("entity `{entity}`: field name `{field}` is not a valid identifier")]
    InvalidFieldName {
        /// Entity name.
        entity: String,
        /// Offending field name.
        field:  String
    },

    /// The requested SQL dialect is not one of the supported variants.
    #[error("unsupported SQL dialect `{0}` (expected postgres, sqlite or mysql)")]
    UnsupportedDialect(String),

    /// A generator was given no entity carrying the annotation it consumes.
    #[error("{artifact}: no entities carry the {annotation} annotation")]
    NoTaggedEntities {
        /// Artifact being generated.
        artifact:   &'static str,
        /// Annotation the generator requires.
        annotation: &'static str
    },

    /// An upstream-generated access-layer file could not be parsed.
    #[error("failed to parse upstream file {}: {message}", path.display())]
    UpstreamParse {
        /// Upstream file.
        path:    PathBuf,
        /// Parser diagnostic.
        message: String
    },

    /// A collaborator-supplied import path is not a valid Rust path.
    #[error("invalid import path `{path}`: {message}")]
    InvalidPath {
        /// Offending path string.
        path:    String,
        /// Parser diagnostic.
        message: String
    },

    /// Generated Rust code failed to re-parse before formatting.
    #[error("{artifact}: generated code is not valid Rust: {message}")]
    InvalidGeneratedCode {
        /// Artifact being generated.
        artifact: &'static str,
        /// Parser diagnostic.
        message:  String
    },

    /// The configuration file could not be deserialized.
    #[error("invalid configuration {}: {source}", path.display())]
    Config {
        /// Configuration file.
        path:   PathBuf,
        /// TOML diagnostic.
        #[source]
        source: toml::de::Error
    },

    /// Reading or writing a file failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// File or directory involved.
        path:   PathBuf,
        /// Underlying error.
        #[source]
        source: io::Error
    }
}

impl Error {
    /// Wrap an I/O error with the path it occurred on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source
        }
    }

    /// Build a [`Error::MalformedDeclaration`].
    pub(crate) fn malformed(path: impl Into<PathBuf>, message: impl ToString) -> Self {
        Self::MalformedDeclaration {
            path:    path.into(),
            message: message.to_string()
        }
    }
}

/// Result alias with [`Error`] as the default error type.
pub type Result<T, E = Error> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tag_collision_names_entity_tag_and_fields() {
        let err = Error::TagCollision {
            entity: "User".to_string(),
            tag:    2,
            first:  "email".to_string(),
            second: "name".to_string()
        };
        assert_eq!(
            err.to_string(),
            "entity `User`: tag 2 is used by both `email` and `name`"
        );
    }

    #[test]
    fn no_tagged_entities_names_artifact() {
        let err = Error::NoTaggedEntities {
            artifact:   "conversion code",
            annotation: "message"
        };
        assert!(err.to_string().contains("conversion code"));
        assert!(err.to_string().contains("message"));
    }

    #[test]
    fn io_keeps_source() {
        let err = Error::io(
            "out/schema.sql",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied")
        );
        assert!(err.to_string().contains("out/schema.sql"));
        assert!(std::error::Error::source(&err).is_some());
    }
}
