// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Wire-tag allocation.
//!
//! # Algorithm
//!
//! ```text
//! fields (declaration order)
//!   │
//!   ├─ 1. invalid / duplicate names ──► InvalidFieldName / DuplicateField
//!   ├─ 2. explicit tag 0 / reserved ──► InvalidTag
//!   ├─ 3. explicit tag collision    ──► TagCollision
//!   ├─ 4. no `id` field             ──► insert id (Int32, unique) first,
//!   │                                   tagged with the lowest free tag
//!   └─ 5. untagged fields           ──► lowest free tag, in order
//! ```
//!
//! Validation runs before anything is assigned, so a failing entity never
//! reaches a generator. Allocation only fills missing tags: explicit tags
//! are never changed and running it again is a no-op.
//!
//! | Used tags | Next available |
//! |-----------|----------------|
//! | `{1, 2, 4, 6}` | 3 |
//! | `{}` | 1 |
//! | `{1, 2, 3}` | 4 |
//! | `{1..=18999}` | 20000 (reserved range skipped) |

use std::{
    collections::{BTreeSet, HashMap},
    ops::RangeInclusive
};

use tracing::debug;

use crate::{
    error::{Error, Result},
    schema::{Entity, Field}
};

/// Tags reserved by the protobuf implementation.
pub const RESERVED_TAGS: RangeInclusive<u32> = 19_000..=19_999;

/// Largest valid protobuf field number.
pub const MAX_TAG: u32 = 536_870_911;

/// Lowest positive tag not in `used`, skipping the reserved range.
#[must_use]
pub fn next_available(used: &BTreeSet<u32>) -> u32 {
    let mut candidate = 1;
    loop {
        if RESERVED_TAGS.contains(&candidate) {
            candidate = RESERVED_TAGS.end() + 1;
        } else if used.contains(&candidate) {
            candidate += 1;
        } else {
            return candidate;
        }
    }
}

/// Validate names and explicit tags of `fields`.
///
/// # Errors
///
/// [`Error::InvalidFieldName`], [`Error::DuplicateField`],
/// [`Error::InvalidTag`] or [`Error::TagCollision`], checked in that order.
pub fn check_collisions(entity: &str, fields: &[Field]) -> Result<()> {
    let mut names = BTreeSet::new();
    for field in fields {
        if !field.has_valid_name() {
            return Err(Error::InvalidFieldName {
                entity: entity.to_string(),
                field:  field.name.clone()
            });
        }
        let key = if field.is_id() {
            field.name.to_ascii_lowercase()
        } else {
            field.name.clone()
        };
        if !names.insert(key) {
            return Err(Error::DuplicateField {
                entity: entity.to_string(),
                field:  field.name.clone()
            });
        }
    }

    let mut owners: HashMap<u32, &str> = HashMap::new();
    for field in fields {
        let Some(tag) = field.tag else {
            continue;
        };
        if tag == 0 || tag > MAX_TAG || RESERVED_TAGS.contains(&tag) {
            return Err(Error::InvalidTag {
                entity: entity.to_string(),
                field: field.name.clone(),
                tag
            });
        }
        if let Some(first) = owners.insert(tag, &field.name) {
            return Err(Error::TagCollision {
                entity: entity.to_string(),
                tag,
                first: first.to_string(),
                second: field.name.clone()
            });
        }
    }

    Ok(())
}

/// Validate, synthesize `id` if missing, and fill every missing tag.
///
/// # Errors
///
/// See [`check_collisions`].
pub fn allocate(entity: &str, mut fields: Vec<Field>) -> Result<Vec<Field>> {
    check_collisions(entity, &fields)?;

    let mut used: BTreeSet<u32> = fields.iter().filter_map(|f| f.tag).collect();

    if !fields.iter().any(Field::is_id) {
        let tag = next_available(&used);
        used.insert(tag);
        debug!(entity, tag, "synthesized id field");
        fields.insert(0, Field::identifier(tag));
    }

    for field in fields.iter_mut().filter(|f| f.tag.is_none()) {
        let tag = next_available(&used);
        used.insert(tag);
        debug!(entity, field = %field.name, tag, "assigned tag");
        field.tag = Some(tag);
    }

    Ok(fields)
}

/// Run [`allocate`] over an entity's fields.
///
/// # Errors
///
/// See [`check_collisions`].
pub fn finalize(mut entity: Entity) -> Result<Entity> {
    let fields = std::mem::take(&mut entity.fields);
    entity.fields = allocate(&entity.name, fields)?;
    Ok(entity)
}

/// Finalize every entity, stopping at the first error.
///
/// # Errors
///
/// See [`check_collisions`].
pub fn finalize_all(entities: Vec<Entity>) -> Result<Vec<Entity>> {
    entities.into_iter().map(finalize).collect()
}
