// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Shared helpers for parsing and generation.
//!
//! # Submodules
//!
//! - [`docs`]: doc comment extraction from `syn` attributes
//! - [`naming`]: pluralization and generated-file headers

pub mod docs;
pub mod naming;
