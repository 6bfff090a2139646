//! Variable references and variable definitions.

use crate::expr::Expr;
use crate::span::SourceLocation;

/// An l-value producer: `name`, optionally indexed (`name[i]`) and optionally
/// chained into a field access (`name.field`, which may itself be indexed and
/// chained further: `a[i].b.c[j]`).
///
/// The chain is represented as a linked list headed by the outermost name,
/// with the index living on the head of the chain it applies to. Per
/// `SPEC_FULL.md` §3.1, the index on a given link is resolved *before*
/// descending into that link's `field`.
#[derive(Clone, Debug)]
pub struct Variable {
    pub name: String,
    pub index: Option<Box<Expr>>,
    pub field: Option<Box<Variable>>,
    pub loc: SourceLocation,
}

impl Variable {
    #[must_use]
    pub fn new(name: impl Into<String>, loc: SourceLocation) -> Self {
        Variable {
            name: name.into(),
            index: None,
            field: None,
            loc,
        }
    }

    #[must_use]
    pub fn with_index(mut self, index: Expr) -> Self {
        self.index = Some(Box::new(index));
        self
    }

    #[must_use]
    pub fn with_field(mut self, field: Variable) -> Self {
        self.field = Some(Box::new(field));
        self
    }
}

/// A variable declaration: `local name -> type = initial` (locals) or
/// `local name -> type` at top level with `extern` (externs never take an
/// initializer — enforced by the preprocessor/lowerer, not representable
/// here as a type-level invariant since the AST is produced by an external
/// parser).
#[derive(Clone, Debug)]
pub struct VariableDef {
    pub name: String,
    /// Empty string means "infer from initializer".
    pub type_name: String,
    pub initial: Option<Box<Expr>>,
    /// 0 means scalar; > 0 means a fixed-size array of that many elements.
    pub size: u32,
    pub is_extern: bool,
    pub loc: SourceLocation,
}

impl VariableDef {
    #[must_use]
    pub fn new(name: impl Into<String>, type_name: impl Into<String>, loc: SourceLocation) -> Self {
        VariableDef {
            name: name.into(),
            type_name: type_name.into(),
            initial: None,
            size: 0,
            is_extern: false,
            loc,
        }
    }

    #[must_use]
    pub fn is_inferred(&self) -> bool {
        self.type_name.is_empty()
    }

    #[must_use]
    pub fn is_array(&self) -> bool {
        self.size > 0
    }
}
