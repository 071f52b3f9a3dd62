// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Configured end-to-end runs.
//!
//! ```text
//! Config ──► load_entities ──► render every configured artifact ──► write all
//!                 │                       │                            │
//!             fatal: tags            fatal: any generator        temp file + rename
//!                 └───────── nothing written on failure ──────────────┘
//! ```

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf}
};

use tempfile::NamedTempFile;
use tracing::info;

use super::{Artifact, convert, proto, sql, validate, wrap};
use crate::{
    config::Config,
    error::{Error, Result},
    load_entities,
    parse::{ImportMap, extract_reference_imports, source_files}
};

/// Runs every generator a [`Config`] enables.
#[derive(Debug, Clone, Copy)]
pub struct Pipeline<'a> {
    config: &'a Config
}

impl<'a> Pipeline<'a> {
    /// Pipeline over `config`.
    #[must_use]
    pub const fn new(config: &'a Config) -> Self {
        Self {
            config
        }
    }

    /// Load entities and render every configured artifact in memory.
    ///
    /// # Errors
    ///
    /// The first error from loading or from any generator.
    pub fn render(&self) -> Result<Vec<Artifact>> {
        let config = self.config;
        let entities = load_entities(&config.schema_dir)?;
        let mut artifacts = Vec::new();

        if let Some(section) = &config.proto {
            let contents = proto::generate(&entities, &section.options)?;
            artifacts.push(Artifact::new(&section.output, contents));
        }

        if let Some(section) = &config.sql {
            if let Some(output) = &section.schema_output {
                let contents = sql::generate_schema(&entities, section.dialect)?;
                artifacts.push(Artifact::new(output, contents));
            }
            if let Some(output) = &section.queries_output {
                let contents = sql::generate_queries(&entities, section.dialect)?;
                artifacts.push(Artifact::new(output, contents));
            }
        }

        if let Some(section) = &config.convert {
            let contents = convert::generate(&entities, &section.options)?;
            artifacts.push(Artifact::new(&section.output, contents));
        }

        if config.wrap.is_some() || config.validate.is_some() {
            let imports = extract_reference_imports(&source_files(&config.schema_dir)?);

            if let Some(section) = &config.wrap {
                let options = wrap::WrapOptions {
                    imports: merged(&imports, &section.options.imports),
                    ..section.options.clone()
                };
                artifacts.extend(wrap::generate_dir(
                    &section.input_dir,
                    &section.output_dir,
                    &entities,
                    &options
                )?);
            }

            if let Some(section) = &config.validate {
                let options = validate::ValidateOptions {
                    imports: merged(&imports, &section.options.imports),
                    ..section.options.clone()
                };
                let contents = validate::generate(&entities, &options)?;
                artifacts.push(Artifact::new(&section.output, contents));
            }
        }

        Ok(artifacts)
    }

    /// Render everything, then write each artifact atomically.
    ///
    /// # Errors
    ///
    /// As [`Pipeline::render`]; [`Error::Io`] when writing fails.
    pub fn run(&self) -> Result<Vec<PathBuf>> {
        let artifacts = self.render()?;
        for artifact in &artifacts {
            write_atomic(&artifact.path, &artifact.contents)?;
            info!(path = %artifact.path.display(), bytes = artifact.contents.len(), "wrote artifact");
        }
        Ok(artifacts.into_iter().map(|a| a.path).collect())
    }
}

/// Extracted imports with configured overrides applied.
fn merged(extracted: &ImportMap, overrides: &ImportMap) -> ImportMap {
    let mut imports = extracted.clone();
    imports.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
    imports
}

/// Write `contents` to `path` through a temp file in the same directory.
///
/// Parent directories are created as needed.
///
/// # Errors
///
/// [`Error::Io`] naming the path that failed.
pub fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new(".")
    };
    fs::create_dir_all(dir).map_err(|err| Error::io(dir, err))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|err| Error::io(dir, err))?;
    file.write_all(contents.as_bytes())
        .map_err(|err| Error::io(file.path(), err))?;
    file.persist(path).map_err(|err| Error::io(path, err.error))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_atomic_creates_parents_and_replaces() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("gen/nested/schema.sql");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        let leftovers = fs::read_dir(path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }

    #[test]
    fn overrides_win() {
        let mut extracted = ImportMap::new();
        extracted.insert("logic".into(), "crate::logic".into());
        extracted.insert("rules".into(), "crate::rules".into());
        let mut overrides = ImportMap::new();
        overrides.insert("logic".into(), "app::logic".into());

        let imports = merged(&extracted, &overrides);
        assert_eq!(imports.get("logic").map(String::as_str), Some("app::logic"));
        assert_eq!(imports.get("rules").map(String::as_str), Some("crate::rules"));
    }

    #[test]
    fn missing_schema_dir_fails_before_writing() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::from_toml_str(&format!(
            "schema_dir = \"{}\"\n[sql]\nschema_output = \"{}\"\n",
            dir.path().join("missing").display(),
            dir.path().join("schema.sql").display()
        ))
        .unwrap();

        let err = Pipeline::new(&config).run().unwrap_err();
        assert!(matches!(err, Error::DirectoryNotFound { .. }));
        assert!(!dir.path().join("schema.sql").exists());
    }
}
