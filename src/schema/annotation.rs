// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Entity annotations and CRUD method sets.

use std::{collections::BTreeSet, fmt};

/// CRUD operation exposed by a service.
///
/// Declaration order is the canonical emission order used by every
/// generator (`Create`, `Get`, `Update`, `Delete`, `List`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Method {
    /// Insert a new record.
    Create,
    /// Read one record by identifier.
    Get,
    /// Replace the mutable fields of a record.
    Update,
    /// Remove a record by identifier.
    Delete,
    /// Page through records.
    List
}

impl Method {
    /// All methods in canonical order.
    pub const ALL: [Self; 5] = [
        Self::Create,
        Self::Get,
        Self::Update,
        Self::Delete,
        Self::List
    ];

    /// Resolve a method constant name.
    ///
    /// Case-insensitive; a leading `Method`/`METHOD_` prefix is ignored so
    /// `Method::Get`, `MethodGet`, `METHOD_GET` and `get` all resolve.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        let bare = lower
            .strip_prefix("method")
            .map(|rest| rest.trim_start_matches('_'))
            .unwrap_or(&lower);

        match bare {
            "create" => Some(Self::Create),
            "get" => Some(Self::Get),
            "update" => Some(Self::Update),
            "delete" => Some(Self::Delete),
            "list" => Some(Self::List),
            _ => None
        }
    }

    /// PascalCase name used for RPCs and query names.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Get => "Get",
            Self::Update => "Update",
            Self::Delete => "Delete",
            Self::List => "List"
        }
    }

    /// The full method set.
    #[must_use]
    pub fn all() -> BTreeSet<Self> {
        Self::ALL.into_iter().collect()
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Entity-level annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    /// Emit a wire message for the entity.
    Message,
    /// Emit a CRUD service.
    ///
    /// `None` means every method; an explicit set is never empty.
    Service(Option<BTreeSet<Method>>)
}

impl Annotation {
    /// Service annotation from an explicit method subset.
    ///
    /// An empty subset collapses to "all methods".
    #[must_use]
    pub fn service(methods: BTreeSet<Method>) -> Self {
        if methods.is_empty() {
            Self::Service(None)
        } else {
            Self::Service(Some(methods))
        }
    }

    /// Methods permitted by this annotation.
    #[must_use]
    pub fn methods(&self) -> BTreeSet<Method> {
        match self {
            Self::Message => BTreeSet::new(),
            Self::Service(None) => Method::all(),
            Self::Service(Some(methods)) => methods.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_variants() {
        assert_eq!(Method::from_name("Get"), Some(Method::Get));
        assert_eq!(Method::from_name("MethodGet"), Some(Method::Get));
        assert_eq!(Method::from_name("METHOD_LIST"), Some(Method::List));
        assert_eq!(Method::from_name("delete"), Some(Method::Delete));
        assert_eq!(Method::from_name("Upsert"), None);
    }

    #[test]
    fn delete_resolves_to_delete() {
        assert_eq!(Method::from_name("MethodDelete"), Some(Method::Delete));
        assert_ne!(Method::from_name("MethodDelete"), Some(Method::Update));
    }

    #[test]
    fn canonical_order() {
        let set: BTreeSet<_> = [Method::List, Method::Create, Method::Delete]
            .into_iter()
            .collect();
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(ordered, vec![Method::Create, Method::Delete, Method::List]);
    }

    #[test]
    fn service_without_subset_means_all() {
        assert_eq!(Annotation::Service(None).methods().len(), 5);
        assert_eq!(Annotation::service(BTreeSet::new()), Annotation::Service(None));
    }

    #[test]
    fn message_has_no_methods() {
        assert!(Annotation::Message.methods().is_empty());
    }
}
