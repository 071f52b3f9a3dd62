// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity discovery.
//!
//! Walks a directory tree, parses every `.rs` file and reports top-level
//! structs that embed the marker type as an unnamed field:
//!
//! ```rust,ignore
//! pub struct User(entlite::Schema);        // entity
//! pub struct Audit(pub Schema, u64);       // entity
//! pub struct Plain { schema: Schema }      // not an entity: named field
//! ```
//!
//! Files are visited in sorted path order so discovery is deterministic.
//! A file that cannot be read or parsed is skipped with a warning; the same
//! skip-and-continue policy applies to declaration parsing and import
//! extraction.

use std::{
    fs,
    path::{Path, PathBuf}
};

use syn::{Fields, Item, ItemStruct, Type};
use tracing::{debug, warn};

use crate::{
    error::{Error, Result},
    schema::{MARKER_NAMESPACE, MARKER_TYPE}
};

/// An entity name and the file declaring it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredEntity {
    /// Struct name.
    pub name: String,
    /// Declaring file.
    pub path: PathBuf
}

/// Find every entity declaration under `root`.
///
/// # Errors
///
/// - [`Error::DirectoryNotFound`] if `root` is missing or not a directory
/// - [`Error::NoEntitiesFound`] if no file declares an entity
/// - [`Error::Io`] if a directory cannot be listed
pub fn discover_entities(root: &Path) -> Result<Vec<DiscoveredEntity>> {
    let files = source_files(root)?;
    let mut discovered = Vec::new();

    for path in files {
        let Some(file) = read_source(&path) else {
            continue;
        };
        for item in &file.items {
            if let Item::Struct(item) = item
                && embeds_marker(item)
            {
                debug!(entity = %item.ident, path = %path.display(), "found entity");
                discovered.push(DiscoveredEntity {
                    name: item.ident.to_string(),
                    path: path.clone()
                });
            }
        }
    }

    if discovered.is_empty() {
        return Err(Error::NoEntitiesFound {
            path: root.to_path_buf()
        });
    }
    Ok(discovered)
}

/// All `.rs` files under `root`, recursively, in sorted order.
///
/// # Errors
///
/// [`Error::DirectoryNotFound`] or [`Error::Io`].
pub fn source_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: root.to_path_buf()
        });
    }

    let mut files = Vec::new();
    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|e| Error::io(&dir, e))?;
        for entry in entries {
            let path = entry.map_err(|e| Error::io(&dir, e))?.path();
            if path.is_dir() {
                pending.push(path);
            } else if path.extension().is_some_and(|ext| ext == "rs") {
                files.push(path);
            }
        }
    }

    files.sort();
    Ok(files)
}

/// Read and parse a source file, warning and returning `None` on failure.
pub(crate) fn read_source(path: &Path) -> Option<syn::File> {
    let source = match fs::read_to_string(path) {
        Ok(source) => source,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping unreadable file");
            return None;
        }
    };
    match syn::parse_file(&source) {
        Ok(file) => Some(file),
        Err(err) => {
            warn!(path = %path.display(), error = %err, "skipping malformed file");
            None
        }
    }
}

/// Whether a struct has an unnamed field of the marker type.
#[must_use]
pub fn embeds_marker(item: &ItemStruct) -> bool {
    match &item.fields {
        Fields::Unnamed(fields) => fields.unnamed.iter().any(|f| is_marker_type(&f.ty)),
        _ => false
    }
}

fn is_marker_type(ty: &Type) -> bool {
    let Type::Path(type_path) = ty else {
        return false;
    };
    if type_path.qself.is_some() {
        return false;
    }

    let segments: Vec<_> = type_path.path.segments.iter().collect();
    match segments.as_slice() {
        [last] => last.ident == MARKER_TYPE,
        [namespace, last] => namespace.ident == MARKER_NAMESPACE && last.ident == MARKER_TYPE,
        _ => false
    }
}
