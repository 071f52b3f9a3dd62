// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! `validate()` methods on wire request messages.
//!
//! ```rust,ignore
//! impl pb::CreateUserRequest {
//!     pub fn validate(&self) -> Result<(), ValidationError> {
//!         if !logic::starts_with_capital(&self.name) {
//!             return Err(ValidationError { field: "name", message: ".." });
//!         }
//!         Ok(())
//!     }
//! }
//! ```
//!
//! Only requests the service permits get a method: `Create` checks every
//! non-identifier field, `Update` checks mutable ones. Values the wire
//! type wraps in `Option` (timestamps, optional fields under presence) are
//! checked only when set.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use serde::Deserialize;

use super::{OptionalPolicy, field_ident, module_path, render, symbol_imports};
use crate::{
    error::{Error, Result},
    parse::ImportMap,
    schema::{Entity, Field, Method}
};

const ARTIFACT: &str = "request validation";

/// Validation generator options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ValidateOptions {
    /// Module path holding wire messages.
    #[serde(default = "default_wire_module")]
    pub wire_module:     String,
    /// Alias → path map for modules referenced by validators.
    #[serde(default)]
    pub imports:         ImportMap,
    /// How optional fields are represented on the wire.
    #[serde(default)]
    pub optional_policy: OptionalPolicy
}

fn default_wire_module() -> String {
    "pb".to_string()
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            wire_module:     default_wire_module(),
            imports:         ImportMap::new(),
            optional_policy: OptionalPolicy::default()
        }
    }
}

/// The `ValidationError` type emitted into generated files.
pub(crate) fn validation_error_type() -> TokenStream {
    quote! {
        /// A field value rejected by its validator.
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct ValidationError {
            /// Rejected field.
            pub field: &'static str,
            /// Human-readable reason.
            pub message: &'static str,
        }

        impl ::std::fmt::Display for ValidationError {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(self.message)
            }
        }

        impl ::std::error::Error for ValidationError {}
    }
}

/// Whether the wire type of `field` is an `Option`.
fn wire_optional(field: &Field, policy: OptionalPolicy) -> bool {
    field.ty.is_time() || (field.optional && policy == OptionalPolicy::Presence)
}

/// Generate the validation file.
///
/// # Errors
///
/// - [`Error::NoTaggedEntities`] when no service entity has a validated
///   field in a permitted create or update request
/// - [`Error::InvalidPath`] for unparsable module or import paths
pub fn generate(entities: &[Entity], options: &ValidateOptions) -> Result<String> {
    let wire = module_path(&options.wire_module)?;

    let mut impls = Vec::new();
    let mut symbols = Vec::new();

    for entity in entities.iter().filter(|e| e.has_service()) {
        let requests = [
            (Method::Create, entity.create_fields().collect::<Vec<_>>()),
            (Method::Update, entity.update_fields().collect::<Vec<_>>())
        ];

        for (method, fields) in requests {
            if !entity.permits(method) {
                continue;
            }
            let validated: Vec<&Field> = fields.into_iter().filter(|f| f.validate.is_some()).collect();
            if validated.is_empty() {
                continue;
            }

            let mut checks = Vec::with_capacity(validated.len());
            for field in validated {
                let Some(validator) = &field.validate else {
                    continue;
                };
                symbols.push(validator);

                let ident = field_ident(&entity.name, field)?;
                let name = field.name.as_str();
                let message = format!("{} rejected by {validator}", field.name);
                let validator = validator.to_path()?;
                let rejected = if wire_optional(field, options.optional_policy) {
                    quote!(self.#ident.as_ref().is_some_and(|value| !#validator(value)))
                } else {
                    quote!(!#validator(&self.#ident))
                };
                checks.push(quote! {
                    if #rejected {
                        return Err(ValidationError {
                            field: #name,
                            message: #message,
                        });
                    }
                });
            }

            let request = format_ident!("{}{}Request", method.as_str(), entity.name);
            let doc = format!("Run every field validator of `{request}`.");
            impls.push(quote! {
                impl #wire::#request {
                    #[doc = #doc]
                    pub fn validate(&self) -> ::std::result::Result<(), ValidationError> {
                        #(#checks)*
                        Ok(())
                    }
                }
            });
        }
    }

    if impls.is_empty() {
        return Err(Error::NoTaggedEntities {
            artifact:   ARTIFACT,
            annotation: "service with validated fields"
        });
    }

    let uses = symbol_imports(symbols, &options.imports)?;
    let error_type = validation_error_type();
    let tokens = quote! {
        #(#uses)*

        #error_type

        #(#impls)*
    };

    render(ARTIFACT, tokens)
}
