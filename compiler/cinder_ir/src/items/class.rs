//! Class definitions.

use crate::expr::Expr;
use crate::items::function::Function;
use crate::span::SourceLocation;
use crate::variable::VariableDef;

/// A class body, as parsed. `fields` and `methods` start empty and are
/// populated by the preprocessor's class-lowering pass (`cinder_preprocess`)
/// from `body`; the lowerer (`cinder_llvm`) only ever reads `fields`/`methods`,
/// never `body`.
#[derive(Clone, Debug)]
pub struct ClassDef {
    pub name: String,
    pub body: Vec<Expr>,
    pub fields: Vec<VariableDef>,
    pub methods: Vec<Function>,
    pub loc: SourceLocation,
}

impl ClassDef {
    #[must_use]
    pub fn new(name: impl Into<String>, loc: SourceLocation) -> Self {
        ClassDef {
            name: name.into(),
            body: Vec::new(),
            fields: Vec::new(),
            methods: Vec::new(),
            loc,
        }
    }

    /// Index of a field by name, or `None` if no such field exists.
    #[must_use]
    pub fn member_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name == name)
    }

    /// The field definition for a given name, or `None` if it is not a member.
    #[must_use]
    pub fn member(&self, name: &str) -> Option<&VariableDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    #[must_use]
    pub fn definition_string(&self) -> String {
        let mut out = format!("class {} {{\n", self.name);
        for field in &self.fields {
            out.push('\t');
            out.push_str(&format!(
                "local {} -> {}{}\n",
                field.name,
                field.type_name,
                if field.size > 0 {
                    format!("[{}]", field.size)
                } else {
                    String::new()
                }
            ));
        }
        for method in &self.methods {
            out.push('\t');
            out.push_str(&method.definition_string());
        }
        out.push_str("}\n");
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loc() -> SourceLocation {
        SourceLocation::new(1, 1, 1)
    }

    #[test]
    fn member_lookup_by_name() {
        let mut class = ClassDef::new("Point", loc());
        class.fields.push(VariableDef::new("x", "int", loc()));
        class.fields.push(VariableDef::new("y", "int", loc()));

        assert_eq!(class.member_index("y"), Some(1));
        assert_eq!(class.member_index("z"), None);
        assert!(class.member("x").is_some());
    }
}
