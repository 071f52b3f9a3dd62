// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Row ↔ wire conversion code.
//!
//! For every entity carrying `message`, generates a pair of functions
//! between the relational row type (`db::User`) and the wire message
//! (`pb::User`):
//!
//! ```rust,ignore
//! pub fn user_db_to_wire(row: db::User) -> pb::User { .. }
//! pub fn user_wire_to_db(msg: pb::User) -> db::User { .. }
//! ```
//!
//! # Field Routing
//!
//! | Field | Row type | Wire type | db → wire | wire → db |
//! |-------|----------|-----------|-----------|-----------|
//! | required scalar | `T` | `T` | passthrough | passthrough |
//! | optional scalar, presence | `Option<T>` | `Option<T>` | passthrough | passthrough |
//! | optional scalar, zero value | `Option<T>` | `T` | `nullable_to_wire` | `wire_to_nullable` |
//! | required time | `DateTime<Utc>` | `Option<Timestamp>` | `time_to_wire` | `time_from_wire` |
//! | optional time | `Option<DateTime<Utc>>` | `Option<Timestamp>` | `nullable_time_to_wire` | `wire_to_nullable_time` |
//!
//! Only helpers that some field routes through are emitted.

use std::collections::BTreeSet;

use convert_case::{Case, Casing};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use serde::Deserialize;

use super::{OptionalPolicy, field_ident, module_path, render, use_items};
use crate::{
    error::{Error, Result},
    schema::{Entity, Field}
};

const ARTIFACT: &str = "conversion code";

/// Conversion generator options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ConvertOptions {
    /// Module path holding row types.
    #[serde(default = "default_db_module")]
    pub db_module:       String,
    /// Module path holding wire messages.
    #[serde(default = "default_wire_module")]
    pub wire_module:     String,
    /// Extra `use` paths emitted at the top of the file.
    #[serde(default)]
    pub imports:         Vec<String>,
    /// How optional fields are represented on the wire.
    #[serde(default)]
    pub optional_policy: OptionalPolicy
}

fn default_db_module() -> String {
    "db".to_string()
}

fn default_wire_module() -> String {
    "pb".to_string()
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            db_module:       default_db_module(),
            wire_module:     default_wire_module(),
            imports:         Vec::new(),
            optional_policy: OptionalPolicy::default()
        }
    }
}

/// Shared conversion helper emitted into the generated file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Helper {
    NullableToWire,
    WireToNullable,
    TimeToWire,
    TimeFromWire,
    NullableTimeToWire,
    WireToNullableTime
}

impl Helper {
    fn ident(self) -> syn::Ident {
        let name = match self {
            Self::NullableToWire => "nullable_to_wire",
            Self::WireToNullable => "wire_to_nullable",
            Self::TimeToWire => "time_to_wire",
            Self::TimeFromWire => "time_from_wire",
            Self::NullableTimeToWire => "nullable_time_to_wire",
            Self::WireToNullableTime => "wire_to_nullable_time"
        };
        format_ident!("{}", name)
    }

    fn definition(self) -> TokenStream {
        match self {
            Self::NullableToWire => quote! {
                fn nullable_to_wire<T: Default>(value: Option<T>) -> T {
                    value.unwrap_or_default()
                }
            },
            Self::WireToNullable => quote! {
                fn wire_to_nullable<T: Default + PartialEq>(value: T) -> Option<T> {
                    if value == T::default() { None } else { Some(value) }
                }
            },
            Self::TimeToWire => quote! {
                fn time_to_wire(value: ::chrono::DateTime<::chrono::Utc>) -> Option<::prost_types::Timestamp> {
                    Some(::prost_types::Timestamp {
                        seconds: value.timestamp(),
                        nanos: i32::try_from(value.timestamp_subsec_nanos()).unwrap_or_default(),
                    })
                }
            },
            Self::TimeFromWire => quote! {
                fn time_from_wire(value: Option<::prost_types::Timestamp>) -> ::chrono::DateTime<::chrono::Utc> {
                    value
                        .and_then(|ts| {
                            ::chrono::DateTime::from_timestamp(ts.seconds, u32::try_from(ts.nanos).unwrap_or_default())
                        })
                        .unwrap_or_default()
                }
            },
            Self::NullableTimeToWire => quote! {
                fn nullable_time_to_wire(
                    value: Option<::chrono::DateTime<::chrono::Utc>>,
                ) -> Option<::prost_types::Timestamp> {
                    value.map(|value| ::prost_types::Timestamp {
                        seconds: value.timestamp(),
                        nanos: i32::try_from(value.timestamp_subsec_nanos()).unwrap_or_default(),
                    })
                }
            },
            Self::WireToNullableTime => quote! {
                fn wire_to_nullable_time(
                    value: Option<::prost_types::Timestamp>,
                ) -> Option<::chrono::DateTime<::chrono::Utc>> {
                    value.and_then(|ts| {
                        ::chrono::DateTime::from_timestamp(ts.seconds, u32::try_from(ts.nanos).unwrap_or_default())
                    })
                }
            }
        }
    }
}

/// Helpers a field routes through: `(db → wire, wire → db)`.
///
/// `None` means passthrough.
fn route(field: &Field, policy: OptionalPolicy) -> (Option<Helper>, Option<Helper>) {
    match (field.ty.is_time(), field.optional, policy) {
        (true, false, _) => (Some(Helper::TimeToWire), Some(Helper::TimeFromWire)),
        (true, true, _) => (
            Some(Helper::NullableTimeToWire),
            Some(Helper::WireToNullableTime)
        ),
        (false, true, OptionalPolicy::ZeroValue) => {
            (Some(Helper::NullableToWire), Some(Helper::WireToNullable))
        }
        (false, _, _) => (None, None)
    }
}

fn apply(helper: Option<Helper>, value: TokenStream) -> TokenStream {
    match helper {
        Some(helper) => {
            let ident = helper.ident();
            quote!(#ident(#value))
        }
        None => value
    }
}

/// Generate the conversion file.
///
/// # Errors
///
/// - [`Error::NoTaggedEntities`] when no entity carries `message`
/// - [`Error::InvalidPath`] for unparsable module or import paths
/// - [`Error::InvalidFieldName`] for names that cannot be identifiers
pub fn generate(entities: &[Entity], options: &ConvertOptions) -> Result<String> {
    let messages: Vec<&Entity> = entities.iter().filter(|e| e.has_message()).collect();
    if messages.is_empty() {
        return Err(Error::NoTaggedEntities {
            artifact:   ARTIFACT,
            annotation: "message"
        });
    }

    let db = module_path(&options.db_module)?;
    let wire = module_path(&options.wire_module)?;
    let uses = use_items(options.imports.iter().map(String::as_str))?;

    let mut helpers = BTreeSet::new();
    let mut conversions = Vec::with_capacity(messages.len());

    for entity in messages {
        let name = format_ident!("{}", entity.name);
        let snake = entity.name.to_case(Case::Snake);
        let to_wire = format_ident!("{}_db_to_wire", snake);
        let to_db = format_ident!("{}_wire_to_db", snake);
        let to_wire_doc = format!("Convert a `{}` row into its wire message.", entity.name);
        let to_db_doc = format!("Convert a `{}` wire message into its row.", entity.name);

        let mut wire_fields = Vec::with_capacity(entity.fields.len());
        let mut db_fields = Vec::with_capacity(entity.fields.len());
        for field in &entity.fields {
            let ident = field_ident(&entity.name, field)?;
            let (db_to_wire, wire_to_db) = route(field, options.optional_policy);
            helpers.extend(db_to_wire);
            helpers.extend(wire_to_db);

            let from_row = apply(db_to_wire, quote!(row.#ident));
            let from_msg = apply(wire_to_db, quote!(msg.#ident));
            wire_fields.push(quote!(#ident: #from_row));
            db_fields.push(quote!(#ident: #from_msg));
        }

        conversions.push(quote! {
            #[doc = #to_wire_doc]
            pub fn #to_wire(row: #db::#name) -> #wire::#name {
                #wire::#name { #(#wire_fields),* }
            }

            #[doc = #to_db_doc]
            pub fn #to_db(msg: #wire::#name) -> #db::#name {
                #db::#name { #(#db_fields),* }
            }
        });
    }

    let helper_defs = helpers.into_iter().map(Helper::definition);
    let tokens = quote! {
        #(#uses)*

        #(#conversions)*

        #(#helper_defs)*
    };

    render(ARTIFACT, tokens)
}
