//! The `Expr` sum type: every AST node kind is a variant of one enum.
//!
//! Per `spec.md` §3/§9, the original implementation expresses each node as a
//! subclass of a common `Expr` base with `dynamic_cast`-based dispatch; here
//! that collapses into one tagged union matched on in the lowerer, with each
//! node owning its children directly (`Box`/`Vec`), so the "no AST cycles,
//! single owner per node" invariant holds by construction rather than by
//! convention.

use crate::items::{ClassDef, Function};
use crate::operators::UnaryOperator;
use crate::span::SourceLocation;
use crate::variable::{Variable, VariableDef};

/// A source-level expression or statement. Both live in the same AST because
/// the source language does not separate the two grammatically (e.g. `If` is
/// both a statement and a value-producing-at-the-block-level construct).
#[derive(Clone, Debug)]
pub enum Expr {
    Number {
        value: f32,
        loc: SourceLocation,
    },
    Integer {
        value: i32,
        loc: SourceLocation,
    },
    Bool {
        value: bool,
        loc: SourceLocation,
    },
    Byte {
        value: i8,
        loc: SourceLocation,
    },
    /// Escapes (`\n \t \b`) are already resolved in `value` by the time the
    /// core sees this node — see `SPEC_FULL.md` §3.1.
    String {
        value: String,
        loc: SourceLocation,
    },
    TypeCast {
        type_name: String,
        value: Box<Expr>,
        loc: SourceLocation,
    },
    Variable(Variable),
    VariableDef(VariableDef),
    BinaryOp {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
        loc: SourceLocation,
    },
    UnaryOp {
        op: UnaryOperator,
        value: Box<Expr>,
        loc: SourceLocation,
    },
    FunctionCall {
        name: String,
        args: Vec<Expr>,
        is_method: bool,
        loc: SourceLocation,
    },
    Function(Function),
    Return {
        value: Option<Box<Expr>>,
        loc: SourceLocation,
    },
    If {
        head: Box<Expr>,
        body: Vec<Expr>,
        else_body: Vec<Expr>,
        loc: SourceLocation,
    },
    While {
        head: Box<Expr>,
        body: Vec<Expr>,
        loc: SourceLocation,
    },
    For {
        init: Box<Expr>,
        cond: Box<Expr>,
        inc: Box<Expr>,
        body: Vec<Expr>,
        loc: SourceLocation,
    },
    Label {
        name: String,
        loc: SourceLocation,
    },
    Goto {
        name: String,
        loc: SourceLocation,
    },
    ClassDef(ClassDef),
    /// A compile-time meta block; consumed and removed by `cinder_preprocess`
    /// before the lowerer ever sees a `Meta` node.
    Meta {
        body: Vec<Expr>,
        loc: SourceLocation,
    },
}

impl Expr {
    /// The source location of this node, regardless of variant.
    #[must_use]
    pub fn location(&self) -> SourceLocation {
        match self {
            Expr::Number { loc, .. }
            | Expr::Integer { loc, .. }
            | Expr::Bool { loc, .. }
            | Expr::Byte { loc, .. }
            | Expr::String { loc, .. }
            | Expr::TypeCast { loc, .. }
            | Expr::BinaryOp { loc, .. }
            | Expr::UnaryOp { loc, .. }
            | Expr::FunctionCall { loc, .. }
            | Expr::Return { loc, .. }
            | Expr::If { loc, .. }
            | Expr::While { loc, .. }
            | Expr::For { loc, .. }
            | Expr::Label { loc, .. }
            | Expr::Goto { loc, .. }
            | Expr::Meta { loc, .. } => *loc,
            Expr::Variable(v) => v.loc,
            Expr::VariableDef(v) => v.loc,
            Expr::Function(f) => f.loc,
            Expr::ClassDef(c) => c.loc,
        }
    }

    /// True for `FunctionCall { name: "include" | "require", .. }` — the two
    /// call forms the preprocessor expands in place.
    #[must_use]
    pub fn is_include_call(&self) -> bool {
        matches!(self, Expr::FunctionCall { name, .. } if name == "include" || name == "require")
    }

    /// Definition-file grammar fragment for this node, per `spec.md` §6.
    /// Only `VariableDef`, `Function`, and `ClassDef` contribute text;
    /// everything else contributes nothing (matches the original
    /// implementation's `Expr::getDefinitionString` default).
    #[must_use]
    pub fn definition_string(&self) -> String {
        match self {
            Expr::VariableDef(v) => {
                if !v.is_extern {
                    return String::new();
                }
                format!(
                    "extern local {} -> {}{}\n",
                    v.name,
                    v.type_name,
                    if v.size > 0 {
                        format!("[{}]", v.size)
                    } else {
                        String::new()
                    }
                )
            }
            Expr::Function(f) => {
                if f.is_extern {
                    format!(
                        "extern function {}({}) -> {}\n",
                        f.name,
                        f.params
                            .iter()
                            .map(|p| format!("{} {}", p.type_name, p.name))
                            .collect::<Vec<_>>()
                            .join(", "),
                        f.return_type
                    )
                } else {
                    f.definition_string()
                }
            }
            Expr::ClassDef(c) => c.definition_string(),
            Expr::Meta { body, .. } => {
                let inner: String = body.iter().map(Expr::definition_string).collect();
                if inner.is_empty() {
                    String::new()
                } else {
                    format!("meta {inner}end\n")
                }
            }
            _ => String::new(),
        }
    }
}
