// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declaration front-end: discovery, parsing and import extraction.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                         Parse Pipeline                              │
//! ├─────────────────────────────────────────────────────────────────────┤
//! │                                                                     │
//! │  schema dir ──► discover ──► DiscoveredEntity { name, path }        │
//! │                                  │                                  │
//! │                                  ▼                                  │
//! │                            declaration ──► attrs (darling)          │
//! │                                  │                                  │
//! │                 annotations() ───┼─── fields()                      │
//! │                        │         │        │                         │
//! │                        ▼         ▼        ▼                         │
//! │                   annotation   expr     field                       │
//! │                        └────────┬─────────┘                         │
//! │                                 ▼                                   │
//! │                              Entity                                 │
//! │                                                                     │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`discover`] | Directory walk and marker detection |
//! | [`declaration`] | Locate `annotations()` / `fields()` and build the entity |
//! | [`expr`] | `syn` adapter producing [`DslExpr`] |
//! | [`annotation`] | `message()` / `service(..)` parsing |
//! | [`field`] | Builder-chain walk |
//! | [`attrs`] | `#[entlite(...)]` via darling |
//! | [`imports`] | `use` extraction for generated code |

pub mod annotation;
pub mod attrs;
pub mod declaration;
pub mod discover;
pub mod expr;
pub mod field;
pub mod imports;

pub use declaration::{parse_entities, parse_entity, parse_entity_in};
pub use discover::{DiscoveredEntity, discover_entities, source_files};
pub use expr::{DslExpr, DslLit};
pub use imports::{ImportMap, extract_imports, extract_reference_imports};
