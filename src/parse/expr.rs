// SPDX-FileCopyrightText: 2025-2026 RAprogramm <andrey.rozanov.vl@gmail.com>
// SPDX-License-Identifier: MIT

//! Declaration expression tree.
//!
//! The declaration DSL is walked over [`DslExpr`], a small tree that keeps
//! only the node kinds builder chains are made of. [`DslExpr::from_syn`] is
//! the single place that knows about `syn::Expr`; annotation and field
//! parsing never touch `syn` directly.
//!
//! # Mapping
//!
//! | `syn` | [`DslExpr`] |
//! |-------|-------------|
//! | `entlite::string("a")` | `Call { path: [entlite, string], args }` |
//! | `x.unique()` | `MethodCall { receiver, method: "unique", args }` |
//! | `Method::Get` | `Path([Method, Get])` |
//! | `"a"`, `2`, `-1`, `true` | `Lit(..)` |
//! | `a \| b` | `BitOr(a, b)` |
//! | `vec![..]`, `[..]` | `List(..)` |
//! | `(x)`, `&x` | `x` |
//! | anything else | `Opaque` |

use syn::{Expr, Lit, Token, UnOp, ext::IdentExt, punctuated::Punctuated};

/// Literal value in a declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslLit {
    /// String literal.
    Str(String),
    /// Integer literal (sign folded in).
    Int(i64),
    /// Boolean literal.
    Bool(bool)
}

/// Node of a declaration expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DslExpr {
    /// Free function call.
    Call {
        /// Callee path segments.
        path: Vec<String>,
        /// Arguments.
        args: Vec<DslExpr>
    },
    /// Method call on a receiver.
    MethodCall {
        /// Receiver expression.
        receiver: Box<DslExpr>,
        /// Method name.
        method:   String,
        /// Arguments.
        args:     Vec<DslExpr>
    },
    /// Path expression (constant or function reference).
    Path(Vec<String>),
    /// Literal.
    Lit(DslLit),
    /// Bitwise OR of two expressions.
    BitOr(Box<DslExpr>, Box<DslExpr>),
    /// List literal.
    List(Vec<DslExpr>),
    /// Anything the DSL does not recognize.
    Opaque
}

impl DslExpr {
    /// Convert a `syn` expression.
    #[must_use]
    pub fn from_syn(expr: &Expr) -> Self {
        match expr {
            Expr::Call(call) => match call.func.as_ref() {
                Expr::Path(func) => Self::Call {
                    path: path_segments(&func.path),
                    args: call.args.iter().map(Self::from_syn).collect()
                },
                _ => Self::Opaque
            },
            Expr::MethodCall(call) => Self::MethodCall {
                receiver: Box::new(Self::from_syn(&call.receiver)),
                method:   call.method.to_string(),
                args:     call.args.iter().map(Self::from_syn).collect()
            },
            Expr::Path(path) if path.qself.is_none() => Self::Path(path_segments(&path.path)),
            Expr::Lit(lit) => lit_from_syn(&lit.lit).map_or(Self::Opaque, Self::Lit),
            Expr::Unary(unary) if matches!(unary.op, UnOp::Neg(_)) => {
                match Self::from_syn(&unary.expr) {
                    Self::Lit(DslLit::Int(value)) => Self::Lit(DslLit::Int(-value)),
                    _ => Self::Opaque
                }
            }
            Expr::Binary(binary) if matches!(binary.op, syn::BinOp::BitOr(_)) => Self::BitOr(
                Box::new(Self::from_syn(&binary.left)),
                Box::new(Self::from_syn(&binary.right))
            ),
            Expr::Array(array) => Self::List(array.elems.iter().map(Self::from_syn).collect()),
            Expr::Macro(mac) if mac.mac.path.is_ident("vec") => mac
                .mac
                .parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
                .map_or(Self::Opaque, |elems| {
                    Self::List(elems.iter().map(Self::from_syn).collect())
                }),
            Expr::Paren(paren) => Self::from_syn(&paren.expr),
            Expr::Group(group) => Self::from_syn(&group.expr),
            Expr::Reference(reference) => Self::from_syn(&reference.expr),
            _ => Self::Opaque
        }
    }

    /// String literal value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Lit(DslLit::Str(value)) => Some(value),
            _ => None
        }
    }

    /// Integer literal value.
    #[must_use]
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Lit(DslLit::Int(value)) => Some(*value),
            _ => None
        }
    }

    /// Literal of any kind.
    #[must_use]
    pub fn as_lit(&self) -> Option<&DslLit> {
        match self {
            Self::Lit(lit) => Some(lit),
            _ => None
        }
    }

    /// Path segments of a path expression.
    #[must_use]
    pub fn as_path(&self) -> Option<&[String]> {
        match self {
            Self::Path(segments) => Some(segments),
            _ => None
        }
    }

    /// Elements of a list literal.
    #[must_use]
    pub fn as_list(&self) -> Option<&[DslExpr]> {
        match self {
            Self::List(items) => Some(items),
            _ => None
        }
    }
}

fn path_segments(path: &syn::Path) -> Vec<String> {
    path.segments
        .iter()
        .map(|segment| segment.ident.unraw().to_string())
        .collect()
}

fn lit_from_syn(lit: &Lit) -> Option<DslLit> {
    match lit {
        Lit::Str(s) => Some(DslLit::Str(s.value())),
        Lit::Int(i) => i.base10_parse::<i64>().ok().map(DslLit::Int),
        Lit::Bool(b) => Some(DslLit::Bool(b.value)),
        _ => None
    }
}

#[cfg(test)]
mod tests {
    use syn::parse_quote;

    use super::*;

    fn convert(expr: Expr) -> DslExpr {
        DslExpr::from_syn(&expr)
    }

    fn segments(path: &[&str]) -> Vec<String> {
        path.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn call_with_literal() {
        let expr = convert(parse_quote!(entlite::string("email")));
        assert_eq!(
            expr,
            DslExpr::Call {
                path: segments(&["entlite", "string"]),
                args: vec![DslExpr::Lit(DslLit::Str("email".into()))]
            }
        );
    }

    #[test]
    fn method_chain_nests_receivers() {
        let expr = convert(parse_quote!(entlite::int32("age").optional().proto_field(4)));
        let DslExpr::MethodCall {
            receiver,
            method,
            args
        } = expr
        else {
            panic!("expected method call");
        };
        assert_eq!(method, "proto_field");
        assert_eq!(args[0].as_int(), Some(4));
        assert!(matches!(*receiver, DslExpr::MethodCall { ref method, .. } if method == "optional"));
    }

    #[test]
    fn bit_or_chain() {
        let expr = convert(parse_quote!(Method::Get | Method::List | Method::Get));
        let DslExpr::BitOr(left, right) = expr else {
            panic!("expected bit-or");
        };
        assert!(matches!(*left, DslExpr::BitOr(..)));
        assert_eq!(right.as_path(), Some(segments(&["Method", "Get"]).as_slice()));
    }

    #[test]
    fn vec_macro_and_array_are_lists() {
        let from_vec = convert(parse_quote!(vec![entlite::message(), entlite::service()]));
        let from_array = convert(parse_quote!([entlite::message(), entlite::service()]));
        assert_eq!(from_vec, from_array);
        assert_eq!(from_vec.as_list().map(<[_]>::len), Some(2));
    }

    #[test]
    fn negative_and_wrapped_literals() {
        assert_eq!(convert(parse_quote!(-5)).as_int(), Some(-5));
        assert_eq!(convert(parse_quote!((7))).as_int(), Some(7));
        assert_eq!(
            convert(parse_quote!(true)).as_lit(),
            Some(&DslLit::Bool(true))
        );
    }

    #[test]
    fn unknown_nodes_are_opaque() {
        assert_eq!(convert(parse_quote!(format!("x{}", 1))), DslExpr::Opaque);
        assert_eq!(convert(parse_quote!(a + b)), DslExpr::Opaque);
        assert_eq!(convert(parse_quote!(|x| x)), DslExpr::Opaque);
        assert_eq!(convert(parse_quote!(1.5)), DslExpr::Opaque);
    }
}
