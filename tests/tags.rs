// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

use std::collections::BTreeSet;

use entlite::{
    Field, FieldType,
    tags::{RESERVED_TAGS, allocate, next_available}
};
use proptest::prelude::*;

/// Fields `f0..fn` with distinct explicit tags where present.
fn arb_fields() -> impl Strategy<Value = Vec<Field>> {
    (
        prop::collection::vec(prop::option::of(1u32..40), 0..12),
        any::<bool>()
    )
        .prop_map(|(tags, with_id)| {
            let mut seen = BTreeSet::new();
            let mut fields: Vec<Field> = tags
                .into_iter()
                .enumerate()
                .map(|(i, tag)| {
                    let builder = Field::builder(format!("f{i}"), FieldType::Text);
                    match tag {
                        Some(tag) if seen.insert(tag) => builder.tag(tag).build(),
                        _ => builder.build()
                    }
                })
                .collect();
            if with_id {
                fields.push(Field::builder("id", FieldType::Int32).build());
            }
            fields
        })
}

fn tagged(fields: &[Field]) -> usize {
    fields.iter().filter(|f| f.tag.is_some()).count()
}

proptest! {
    #[test]
    fn every_field_tagged_exactly_once(fields in arb_fields()) {
        let allocated = allocate("Entity", fields).unwrap();
        let tags: BTreeSet<u32> = allocated.iter().filter_map(|f| f.tag).collect();

        prop_assert_eq!(tagged(&allocated), allocated.len());
        prop_assert_eq!(tags.len(), allocated.len());
        prop_assert!(tags.iter().all(|t| *t > 0 && !RESERVED_TAGS.contains(t)));
    }

    #[test]
    fn exactly_one_id(fields in arb_fields()) {
        let allocated = allocate("Entity", fields).unwrap();
        prop_assert_eq!(allocated.iter().filter(|f| f.is_id()).count(), 1);
    }

    #[test]
    fn synthesized_id_takes_lowest_free_tag(fields in arb_fields()) {
        prop_assume!(!fields.iter().any(Field::is_id));
        let used: BTreeSet<u32> = fields.iter().filter_map(|f| f.tag).collect();

        let allocated = allocate("Entity", fields).unwrap();
        prop_assert!(allocated[0].is_id());
        prop_assert_eq!(allocated[0].tag, Some(next_available(&used)));
    }

    #[test]
    fn explicit_tags_untouched(fields in arb_fields()) {
        let before: Vec<(String, u32)> = fields
            .iter()
            .filter_map(|f| f.tag.map(|t| (f.name.clone(), t)))
            .collect();

        let allocated = allocate("Entity", fields.clone()).unwrap();
        for (name, tag) in before {
            let field = allocated.iter().find(|f| f.name == name).unwrap();
            prop_assert_eq!(field.tag, Some(tag));
        }
        prop_assert!(tagged(&allocated) >= tagged(&fields));
        prop_assert!(tagged(&allocated) > tagged(&fields) || fields.iter().all(|f| f.tag.is_some()));
    }

    #[test]
    fn allocation_is_idempotent(fields in arb_fields()) {
        let once = allocate("Entity", fields).unwrap();
        let twice = allocate("Entity", once.clone()).unwrap();
        prop_assert_eq!(once, twice);
    }
}
