// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

#![warn(
    missing_docs,
    rustdoc::missing_crate_level_docs,
    rustdoc::broken_intra_doc_links,
    rust_2018_idioms
)]
#![deny(unsafe_code)]

//! # entlite
//!
//! Entity-model extraction and multi-backend code generation.
//!
//! Entities are declared as ordinary Rust source: a tuple struct embedding
//! the [`Schema`](schema::MARKER_TYPE) marker plus two methods returning
//! builder chains. `entlite` reads those declarations with `syn` (it never
//! compiles or runs them), builds one shared [`Entity`] model, allocates
//! wire tags and feeds the model to independent backend generators.
//!
//! ## Declaring an entity
//!
//! ```rust,ignore
//! use entlite::{Annotation, Field, Method};
//! use crate::logic;
//!
//! /// Registered account.
//! pub struct User(entlite::Schema);
//!
//! impl User {
//!     fn annotations(&self) -> Vec<Annotation> {
//!         vec![entlite::message(), entlite::service()]
//!     }
//!
//!     fn fields(&self) -> Vec<Field> {
//!         vec![
//!             entlite::string("email").unique().proto_field(2),
//!             entlite::string("name").validate(logic::starts_with_capital),
//!             entlite::int32("age").optional(),
//!             entlite::time("created_at").default_func(logic::now),
//!         ]
//!     }
//! }
//! ```
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   ┌─────────────┐   ┌────────────┐   ┌──────────────┐
//! │ discover │──►│ declaration │──►│   model    │──►│ tag allocator│
//! │  (*.rs)  │   │   parser    │   │  builder   │   │              │
//! └──────────┘   └─────────────┘   └────────────┘   └──────┬───────┘
//!                                                          │ Vec<Entity>
//!                 ┌──────────────┬──────────────┬──────────┼───────────┐
//!                 ▼              ▼              ▼          ▼           ▼
//!              proto3       SQL schema +    conversion   wrapper   request
//!               IDL        sqlc queries       code        code    validation
//! ```
//!
//! | Generator | Input annotation | Artifact |
//! |-----------|------------------|----------|
//! | [`generate::proto`] | `message` / `service` | `.proto` schema |
//! | [`generate::sql`] | any | `schema.sql`, `query.sql` |
//! | [`generate::convert`] | `message` | row ↔ wire conversion `.rs` |
//! | [`generate::wrap`] | fields with `default_func` | access-layer wrapper `.rs` |
//! | [`generate::validate`] | fields with `validate` | request validation `.rs` |
//!
//! Every generator is a pure function of the finalized model. The
//! [`Pipeline`] renders all configured artifacts in memory and only writes
//! them once every generator has succeeded.
//!
//! ```rust,ignore
//! let config = entlite::Config::from_file("entlite.toml")?;
//! let written = entlite::Pipeline::new(&config).run()?;
//! ```

pub mod config;
pub mod error;
pub mod generate;
pub mod parse;
pub mod schema;
pub mod tags;
mod utils;

use std::path::Path;

pub use config::Config;
pub use error::{Error, Result};
pub use generate::{Artifact, OptionalPolicy, Pipeline, sql::Dialect};
pub use parse::{DiscoveredEntity, discover_entities, parse_entities, parse_entity};
pub use schema::{Annotation, DefaultValue, Entity, Field, FieldBuilder, FieldType, Method, SymbolRef};

/// Discover, parse and finalize every entity declared under `dir`.
///
/// Runs the front half of the pipeline: discovery, declaration parsing and
/// tag allocation. Files that fail to parse are skipped with a warning; tag
/// problems abort before any generator could observe them.
///
/// # Errors
///
/// - [`Error::DirectoryNotFound`] / [`Error::NoEntitiesFound`] from discovery
/// - [`Error::NoEntitiesFound`] when every declaration was skipped
/// - [`Error::TagCollision`], [`Error::InvalidTag`], [`Error::DuplicateField`],
///   [`Error::InvalidFieldName`] from tag allocation
pub fn load_entities(dir: impl AsRef<Path>) -> Result<Vec<Entity>> {
    let dir = dir.as_ref();
    let discovered = discover_entities(dir)?;
    tracing::info!(count = discovered.len(), dir = %dir.display(), "discovered entities");

    let entities = parse_entities(&discovered);
    if entities.is_empty() {
        return Err(Error::NoEntitiesFound {
            path: dir.to_path_buf()
        });
    }

    tags::finalize_all(entities)
}
