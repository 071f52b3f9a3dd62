// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Access-layer wrappers over upstream-generated query code.
//!
//! The upstream query generator knows nothing about computed defaults or
//! validators: its `CreateUserParams` demands every column. The wrapper
//! module sits in front of it and narrows the create path.
//!
//! # Generated Layout
//!
//! ```text
//! upstream (crate::db::queries)        wrapper
//! ─────────────────────────────        ─────────────────────────────────────
//! pub struct User { .. }          ──►  pub use crate::db::queries::User;
//! pub struct CreateUserParams {        pub struct CreateUserParams {
//!     email, name, created_at     ──►      email, name           // computed dropped
//! }                                    }
//! pub struct Queries { .. }       ──►  pub struct Queries(pub upstream::Queries);
//!                                      impl Deref, From
//! impl Queries {                       impl Queries {
//!     async fn create_user(..)    ──►      async fn create_user(..) {
//! }                                            validators → CreateError::Invalid
//!                                              created_at: logic::now()
//!                                              self.0.create_user(..)
//!                                          }
//!                                      }
//! ```
//!
//! An entity is wrapped when it has at least one `default_func` field and
//! upstream defines both `Create<X>Params` and `create_<snake>`. Every
//! other public upstream item is re-exported unchanged.
//!
//! # Return Types
//!
//! | Upstream | Validators | Wrapper |
//! |----------|------------|---------|
//! | `R` | none | `R` |
//! | `Result<T, E>` | some | `Result<T, CreateError<E>>` |
//! | `R` (not `Result<T, E>`) | some | `Result<R, CreateError<Infallible>>` |

use std::{
    collections::{BTreeMap, BTreeSet},
    fs,
    path::{Path, PathBuf}
};

use proc_macro2::TokenStream;
use quote::quote;
use serde::Deserialize;
use syn::{
    FnArg, GenericArgument, Ident, ImplItem, ImplItemFn, Item, ItemStruct, Pat, PathArguments,
    ReturnType, Type, Visibility, ext::IdentExt, parse_quote
};
use tracing::{debug, info, warn};

use super::{Artifact, module_path, render, symbol_imports, validate::validation_error_type};
use crate::{
    error::{Error, Result},
    parse::ImportMap,
    schema::{Entity, Field, SymbolRef}
};

const ARTIFACT: &str = "wrapper code";

/// Wrapper generator options.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct WrapOptions {
    /// Module path of the upstream code being wrapped.
    ///
    /// For [`generate_dir`] this is the parent module; each file's stem is
    /// appended (`crate::db` + `queries.rs` → `crate::db::queries`).
    #[serde(default = "default_upstream_module")]
    pub upstream_module: String,
    /// Alias → path map for modules referenced by computed defaults and
    /// validators.
    #[serde(default)]
    pub imports:         ImportMap
}

fn default_upstream_module() -> String {
    "crate::db".to_string()
}

impl Default for WrapOptions {
    fn default() -> Self {
        Self {
            upstream_module: default_upstream_module(),
            imports:         ImportMap::new()
        }
    }
}

/// An entity whose create path is wrapped.
struct Target<'a> {
    entity:  &'a Entity,
    params:  &'a ItemStruct,
    method:  &'a ImplItemFn,
    queries: &'a Ident
}

impl Target<'_> {
    fn computed(&self, name: &str) -> Option<&SymbolRef> {
        self.entity
            .fields
            .iter()
            .find(|f| f.name == name)
            .and_then(|f| f.default_func.as_ref())
    }

    /// Validated fields still supplied by the caller.
    fn validated(&self) -> Vec<Check<'_>> {
        self.entity
            .validated_fields()
            .filter(|f| !f.is_computed())
            .filter_map(|field| {
                let ident = self
                    .params
                    .fields
                    .iter()
                    .filter_map(|f| f.ident.as_ref())
                    .find(|ident| ident.unraw() == field.name)?;
                Some(Check {
                    field,
                    ident,
                    validator: field.validate.as_ref()?
                })
            })
            .collect()
    }
}

/// A validator applied to a caller-supplied param.
struct Check<'a> {
    field:     &'a Field,
    ident:     &'a Ident,
    validator: &'a SymbolRef
}

/// Generate the wrapper for one parsed upstream file.
///
/// # Errors
///
/// [`Error::InvalidPath`] for an unparsable upstream module or import path.
pub fn generate(upstream: &syn::File, entities: &[Entity], options: &WrapOptions) -> Result<String> {
    let module = module_path(&options.upstream_module)?;
    let targets = find_targets(upstream, entities);

    let mut shadowed: BTreeSet<String> = BTreeSet::new();
    let mut symbols: Vec<&SymbolRef> = Vec::new();
    let mut narrowed = Vec::with_capacity(targets.len());
    let mut methods: BTreeMap<&Ident, Vec<TokenStream>> = BTreeMap::new();
    let mut validates = false;

    for target in &targets {
        let validated = target.validated();
        let Some(method) = create_method(target, &module, &validated)? else {
            continue;
        };

        shadowed.insert(target.params.ident.to_string());
        shadowed.insert(target.queries.to_string());
        symbols.extend(target.entity.computed_fields().filter_map(|f| f.default_func.as_ref()));
        symbols.extend(validated.iter().map(|check| check.validator));
        validates |= !validated.is_empty();

        narrowed.push(narrow_params(target));
        methods.entry(target.queries).or_default().push(method);
        info!(entity = %target.entity.name, "wrapped create path");
    }

    let reexports = reexports(upstream, &module, &shadowed);
    let uses = symbol_imports(symbols, &options.imports)?;
    let newtypes = methods.iter().map(|(queries, methods)| {
        quote! {
            pub struct #queries(pub #module::#queries);

            impl ::std::ops::Deref for #queries {
                type Target = #module::#queries;

                fn deref(&self) -> &Self::Target {
                    &self.0
                }
            }

            impl From<#module::#queries> for #queries {
                fn from(inner: #module::#queries) -> Self {
                    Self(inner)
                }
            }

            impl #queries {
                #(#methods)*
            }
        }
    });
    let errors = validates.then(|| {
        let validation_error = validation_error_type();
        quote! {
            #validation_error

            /// Failure of a wrapped create call.
            #[derive(Debug)]
            pub enum CreateError<E> {
                /// A validator rejected the input; nothing was written.
                Invalid(ValidationError),
                /// The upstream query failed.
                Query(E),
            }

            impl<E: ::std::fmt::Display> ::std::fmt::Display for CreateError<E> {
                fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                    match self {
                        Self::Invalid(err) => write!(f, "invalid input: {err}"),
                        Self::Query(err) => write!(f, "query failed: {err}"),
                    }
                }
            }

            impl<E: ::std::error::Error + 'static> ::std::error::Error for CreateError<E> {
                fn source(&self) -> Option<&(dyn ::std::error::Error + 'static)> {
                    match self {
                        Self::Invalid(err) => Some(err),
                        Self::Query(err) => Some(err),
                    }
                }
            }
        }
    });

    let tokens = quote! {
        #(#uses)*

        #(#reexports)*

        #errors

        #(#narrowed)*

        #(#newtypes)*
    };

    render(ARTIFACT, tokens)
}

/// Parse upstream `source` read from `path` and wrap it.
///
/// # Errors
///
/// [`Error::UpstreamParse`] when `source` is not valid Rust, otherwise as
/// [`generate`].
pub fn generate_source(
    source: &str,
    path: &Path,
    entities: &[Entity],
    options: &WrapOptions
) -> Result<String> {
    let upstream = syn::parse_file(source).map_err(|err| Error::UpstreamParse {
        path:    path.to_path_buf(),
        message: err.to_string()
    })?;
    generate(&upstream, entities, options)
}

/// Wrap every `.rs` file directly inside `input`, one output per input.
///
/// Outputs keep the input file name and land in `output`. Nothing is
/// written; the caller persists the returned artifacts.
///
/// # Errors
///
/// [`Error::DirectoryNotFound`] for a missing `input`, [`Error::Io`] for
/// unreadable files, otherwise as [`generate_source`].
pub fn generate_dir(
    input: &Path,
    output: &Path,
    entities: &[Entity],
    options: &WrapOptions
) -> Result<Vec<Artifact>> {
    if !input.is_dir() {
        return Err(Error::DirectoryNotFound {
            path: input.to_path_buf()
        });
    }

    let mut files: Vec<PathBuf> = fs::read_dir(input)
        .map_err(|err| Error::io(input, err))?
        .map(|entry| entry.map(|e| e.path()).map_err(|err| Error::io(input, err)))
        .collect::<Result<_>>()?;
    files.retain(|path| path.is_file() && path.extension().is_some_and(|ext| ext == "rs"));
    files.sort();

    files
        .iter()
        .map(|path| {
            let source = fs::read_to_string(path).map_err(|err| Error::io(path, err))?;
            let stem = path
                .file_stem()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_default();
            let upstream_module = match stem.as_str() {
                "mod" | "lib" => options.upstream_module.clone(),
                stem => format!("{}::{stem}", options.upstream_module)
            };
            let file_options = WrapOptions {
                upstream_module,
                imports: options.imports.clone()
            };

            let contents = generate_source(&source, path, entities, &file_options)?;
            let name = path.file_name().unwrap_or_default();
            Ok(Artifact::new(output.join(name), contents))
        })
        .collect()
}

fn find_targets<'a>(upstream: &'a syn::File, entities: &'a [Entity]) -> Vec<Target<'a>> {
    let structs: BTreeMap<String, &ItemStruct> = upstream
        .items
        .iter()
        .filter_map(|item| match item {
            Item::Struct(item) if matches!(item.fields, syn::Fields::Named(_)) => {
                Some((item.ident.to_string(), item))
            }
            _ => None
        })
        .collect();

    let mut methods: BTreeMap<String, (&Ident, &ImplItemFn)> = BTreeMap::new();
    for item in &upstream.items {
        let Item::Impl(block) = item else {
            continue;
        };
        if block.trait_.is_some() || !block.generics.params.is_empty() {
            continue;
        }
        let Type::Path(self_ty) = block.self_ty.as_ref() else {
            continue;
        };
        let Some(queries) = self_ty.path.segments.last().map(|s| &s.ident) else {
            continue;
        };
        for item in &block.items {
            if let ImplItem::Fn(method) = item {
                methods.insert(method.sig.ident.to_string(), (queries, method));
            }
        }
    }

    entities
        .iter()
        .filter(|entity| entity.computed_fields().next().is_some())
        .filter_map(|entity| {
            let params_name = format!("Create{}Params", entity.name);
            let method_name = format!("create_{}", entity.snake_name());
            let (Some(params), Some((queries, method))) = (
                structs.get(&params_name).copied(),
                methods.get(&method_name).copied()
            )
            else {
                debug!(entity = %entity.name, params = %params_name, method = %method_name, "no upstream create path");
                return None;
            };
            Some(Target {
                entity,
                params,
                method,
                queries
            })
        })
        .collect()
}

fn reexports(upstream: &syn::File, module: &syn::Path, shadowed: &BTreeSet<String>) -> Vec<TokenStream> {
    upstream
        .items
        .iter()
        .filter_map(|item| {
            let (vis, ident) = match item {
                Item::Struct(i) => (&i.vis, &i.ident),
                Item::Enum(i) => (&i.vis, &i.ident),
                Item::Fn(i) => (&i.vis, &i.sig.ident),
                Item::Const(i) => (&i.vis, &i.ident),
                Item::Static(i) => (&i.vis, &i.ident),
                Item::Type(i) => (&i.vis, &i.ident),
                Item::Trait(i) => (&i.vis, &i.ident),
                Item::Union(i) => (&i.vis, &i.ident),
                Item::Mod(i) => (&i.vis, &i.ident),
                Item::Use(i) if !is_relative(&i.tree) => return Some(quote!(#i)),
                _ => return None
            };
            let public = matches!(vis, Visibility::Public(_));
            (public && !shadowed.contains(&ident.to_string())).then(|| quote!(pub use #module::#ident;))
        })
        .collect()
}

fn is_relative(tree: &syn::UseTree) -> bool {
    match tree {
        syn::UseTree::Path(path) => path.ident == "self" || path.ident == "super",
        syn::UseTree::Name(name) => name.ident == "self" || name.ident == "super",
        _ => false
    }
}

/// Upstream params without the computed fields.
fn narrow_params(target: &Target<'_>) -> TokenStream {
    let mut narrowed = target.params.clone();
    if let syn::Fields::Named(named) = &mut narrowed.fields {
        named.named = named
            .named
            .iter()
            .filter(|f| {
                f.ident
                    .as_ref()
                    .is_none_or(|ident| target.computed(&ident.unraw().to_string()).is_none())
            })
            .cloned()
            .collect();
    }
    quote!(#narrowed)
}

/// The wrapped `create_<snake>` method, or `None` when the upstream
/// signature cannot be forwarded.
fn create_method(
    target: &Target<'_>,
    module: &syn::Path,
    validated: &[Check<'_>]
) -> Result<Option<TokenStream>> {
    let upstream_sig = &target.method.sig;
    let params_ident = &target.params.ident;
    let method_ident = &upstream_sig.ident;

    let mut sig = upstream_sig.clone();
    let mut forwarded = Vec::new();
    let mut arg = None;
    for input in &mut sig.inputs {
        let FnArg::Typed(pat_type) = input else {
            continue;
        };
        let Pat::Ident(pat) = pat_type.pat.as_ref() else {
            warn!(entity = %target.entity.name, "upstream create argument is not a plain binding, skipping");
            return Ok(None);
        };
        let ident = pat.ident.clone();
        if is_params_type(&pat_type.ty, params_ident) {
            *pat_type.ty = parse_quote!(#params_ident);
            arg = Some(ident);
        } else {
            forwarded.push(ident);
        }
    }
    let Some(arg) = arg else {
        warn!(entity = %target.entity.name, params = %params_ident, "upstream create method does not take its params, skipping");
        return Ok(None);
    };

    let mut fields = Vec::new();
    for ident in target.params.fields.iter().filter_map(|f| f.ident.as_ref()) {
        fields.push(match target.computed(&ident.unraw().to_string()) {
            Some(func) => {
                let func = func.to_path()?;
                quote!(#ident: #func())
            }
            None => quote!(#ident: #arg.#ident)
        });
    }

    let await_call = upstream_sig.asyncness.map(|_| quote!(.await));
    let call = quote! {
        self.0.#method_ident(#(#forwarded,)* #module::#params_ident { #(#fields),* }) #await_call
    };

    let mut checks = Vec::with_capacity(validated.len());
    for check in validated {
        let ident = check.ident;
        let name = check.field.name.as_str();
        let message = format!("{} rejected by {}", check.field.name, check.validator);
        let validator = check.validator.to_path()?;
        let rejected = if check.field.optional {
            quote!(#arg.#ident.as_ref().is_some_and(|value| !#validator(value)))
        } else {
            quote!(!#validator(&#arg.#ident))
        };
        checks.push(quote! {
            if #rejected {
                return Err(CreateError::Invalid(ValidationError {
                    field: #name,
                    message: #message,
                }));
            }
        });
    }

    let body = if validated.is_empty() {
        call
    } else {
        match result_parts(&upstream_sig.output) {
            Some((ok, err)) => {
                sig.output = parse_quote!(-> ::std::result::Result<#ok, CreateError<#err>>);
                quote! {
                    #(#checks)*
                    #call.map_err(CreateError::Query)
                }
            }
            None => {
                let ok: Type = match &upstream_sig.output {
                    ReturnType::Type(_, ty) => ty.as_ref().clone(),
                    ReturnType::Default => parse_quote!(())
                };
                sig.output =
                    parse_quote!(-> ::std::result::Result<#ok, CreateError<::std::convert::Infallible>>);
                quote! {
                    #(#checks)*
                    Ok(#call)
                }
            }
        }
    };

    let doc = format!(
        "Create a `{}`, computing {} before delegating upstream.",
        target.entity.name,
        target
            .entity
            .computed_fields()
            .map(|f| format!("`{}`", f.name))
            .collect::<Vec<_>>()
            .join(", ")
    );
    let vis = &target.method.vis;
    Ok(Some(quote! {
        #[doc = #doc]
        #vis #sig {
            #body
        }
    }))
}

fn is_params_type(ty: &Type, params: &Ident) -> bool {
    match ty {
        Type::Path(path) => path.path.segments.last().is_some_and(|s| s.ident == *params),
        _ => false
    }
}

/// `(T, E)` of a `Result<T, E>` return type.
fn result_parts(output: &ReturnType) -> Option<(Type, Type)> {
    let ReturnType::Type(_, ty) = output else {
        return None;
    };
    let Type::Path(path) = ty.as_ref() else {
        return None;
    };
    let last = path.path.segments.last()?;
    if last.ident != "Result" {
        return None;
    }
    let PathArguments::AngleBracketed(args) = &last.arguments else {
        return None;
    };
    let mut types = args.args.iter().filter_map(|arg| match arg {
        GenericArgument::Type(ty) => Some(ty.clone()),
        _ => None
    });
    match (types.next(), types.next(), types.next()) {
        (Some(ok), Some(err), None) => Some((ok, err)),
        _ => None
    }
}
