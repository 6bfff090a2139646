//! Function declarations and definitions.

use crate::expr::Expr;
use crate::span::SourceLocation;
use crate::variable::VariableDef;

/// A function: either a declaration (`extern`, no body emitted) or a
/// definition. Methods (functions nested in a `ClassDef`) are represented as
/// ordinary `Function`s with `is_member` set and, after class lowering, an
/// implicit leading `self` parameter — see `cinder_preprocess`.
#[derive(Clone, Debug)]
pub struct Function {
    pub name: String,
    pub return_type: String,
    pub params: Vec<VariableDef>,
    pub body: Vec<Expr>,
    pub is_extern: bool,
    pub is_variadic: bool,
    pub is_member: bool,
    pub loc: SourceLocation,
}

impl Function {
    #[must_use]
    pub fn new(name: impl Into<String>, return_type: impl Into<String>, loc: SourceLocation) -> Self {
        Function {
            name: name.into(),
            return_type: return_type.into(),
            params: Vec::new(),
            body: Vec::new(),
            is_extern: false,
            is_variadic: false,
            is_member: false,
            loc,
        }
    }

    /// Definition-file grammar for this function, per `SPEC_FULL.md` §6.
    /// Methods omit the implicit `self` first parameter.
    #[must_use]
    pub fn definition_string(&self) -> String {
        if self.is_extern {
            return String::new();
        }

        let params: Vec<&VariableDef> = if self.is_member {
            self.params.iter().skip(1).collect()
        } else {
            self.params.iter().collect()
        };

        let args = params
            .iter()
            .map(|p| format!("{} {}", p.type_name, p.name))
            .collect::<Vec<_>>()
            .join(", ");

        format!("function {}({}) -> {}\n", self.name, args, self.return_type)
    }
}
