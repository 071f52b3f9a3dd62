// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! The entity aggregate.

use std::collections::BTreeSet;

use convert_case::{Case, Casing};

use super::{Annotation, Field, Method};
use crate::utils::naming::pluralize;

/// One declared record, shared read-only by every generator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entity {
    /// Type name as declared (`User`).
    pub name:        String,
    /// Table name; snake_case of the name unless overridden.
    pub table:       String,
    /// Plural used for list queries and list responses.
    pub plural:      String,
    /// Doc comment of the declaring struct.
    pub doc:         Option<String>,
    /// Fields in declaration order.
    pub fields:      Vec<Field>,
    /// Annotations in declaration order.
    pub annotations: Vec<Annotation>
}

impl Entity {
    /// Empty entity with derived table and plural names.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        let snake = name.to_case(Case::Snake);
        Self {
            plural: pluralize(&snake),
            table: snake,
            name,
            doc: None,
            fields: Vec::new(),
            annotations: Vec::new()
        }
    }

    /// snake_case form of the name (`UserProfile` → `user_profile`).
    #[must_use]
    pub fn snake_name(&self) -> String {
        self.name.to_case(Case::Snake)
    }

    /// PascalCase form of the plural (`users` → `Users`).
    #[must_use]
    pub fn plural_pascal(&self) -> String {
        self.plural.to_case(Case::Pascal)
    }

    /// Carries the `message` annotation.
    #[must_use]
    pub fn has_message(&self) -> bool {
        self.annotations.contains(&Annotation::Message)
    }

    /// Carries at least one `service` annotation.
    #[must_use]
    pub fn has_service(&self) -> bool {
        self.annotations
            .iter()
            .any(|a| matches!(a, Annotation::Service(_)))
    }

    /// Needs a wire message: declared as a message or exposed by a service.
    #[must_use]
    pub fn emits_message(&self) -> bool {
        self.has_message() || self.has_service()
    }

    /// Union of methods permitted by all service annotations.
    #[must_use]
    pub fn methods(&self) -> BTreeSet<Method> {
        self.annotations.iter().flat_map(Annotation::methods).collect()
    }

    /// Whether a service permits `method`.
    #[must_use]
    pub fn permits(&self, method: Method) -> bool {
        self.methods().contains(&method)
    }

    /// The identifier field, if present.
    #[must_use]
    pub fn id_field(&self) -> Option<&Field> {
        self.fields.iter().find(|f| f.is_id())
    }

    /// Fields populated by a default function.
    pub fn computed_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.is_computed())
    }

    /// Fields carrying a validation function.
    pub fn validated_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| f.validate.is_some())
    }

    /// Fields accepted by a create request: everything but the identifier.
    pub fn create_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_id())
    }

    /// Fields changed by an update: mutable non-identifier fields.
    pub fn update_fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.iter().filter(|f| !f.is_id() && !f.immutable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::FieldType;

    fn user() -> Entity {
        let mut entity = Entity::new("User");
        entity.fields = vec![
            Field::identifier(1),
            Field::builder("email", FieldType::Text).tag(2).build(),
            Field::builder("created_at", FieldType::Time)
                .immutable()
                .tag(3)
                .build(),
        ];
        entity
    }

    #[test]
    fn derived_names() {
        let entity = Entity::new("UserProfile");
        assert_eq!(entity.table, "user_profile");
        assert_eq!(entity.plural, "user_profiles");
        assert_eq!(entity.plural_pascal(), "UserProfiles");
    }

    #[test]
    fn service_implies_message() {
        let mut entity = Entity::new("User");
        assert!(!entity.emits_message());
        entity.annotations.push(Annotation::Service(None));
        assert!(entity.emits_message());
        assert!(!entity.has_message());
    }

    #[test]
    fn methods_union_across_annotations() {
        let mut entity = Entity::new("Post");
        entity.annotations = vec![
            Annotation::Message,
            Annotation::service([Method::Get].into_iter().collect()),
            Annotation::service([Method::List].into_iter().collect()),
        ];
        assert!(entity.permits(Method::Get));
        assert!(entity.permits(Method::List));
        assert!(!entity.permits(Method::Delete));
    }

    #[test]
    fn create_and_update_fields() {
        let entity = user();
        let create: Vec<_> = entity.create_fields().map(|f| f.name.as_str()).collect();
        let update: Vec<_> = entity.update_fields().map(|f| f.name.as_str()).collect();
        assert_eq!(create, vec!["email", "created_at"]);
        assert_eq!(update, vec!["email"]);
    }
}
