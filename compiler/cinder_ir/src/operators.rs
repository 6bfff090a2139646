//! Unary operator tags.
//!
//! Binary operators stay as plain `String`s (spec: arbitrary operator text,
//! including user-overloadable ones like `+`/`-`/`==`); unary operators are a
//! closed set of four symbols and are modeled as an enum so the lowerer can
//! match exhaustively instead of re-parsing a string.

/// One of the four unary operator symbols the grammar allows.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum UnaryOperator {
    /// `~v` — logical not. Requires a `bool` operand.
    Not,
    /// `-v` — arithmetic negation. Requires `int` or `float`.
    Neg,
    /// `@v` — address-of. Requires `v` to be a load (i.e. have a backing pointer).
    AddressOf,
    /// `$v` — dereference. Requires a pointer operand.
    Deref,
}

impl UnaryOperator {
    /// Parse the single-character source spelling of a unary operator.
    #[must_use]
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "~" => Some(UnaryOperator::Not),
            "-" => Some(UnaryOperator::Neg),
            "@" => Some(UnaryOperator::AddressOf),
            "$" => Some(UnaryOperator::Deref),
            _ => None,
        }
    }

    #[must_use]
    pub fn symbol(self) -> &'static str {
        match self {
            UnaryOperator::Not => "~",
            UnaryOperator::Neg => "-",
            UnaryOperator::AddressOf => "@",
            UnaryOperator::Deref => "$",
        }
    }
}
