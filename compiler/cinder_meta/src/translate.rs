//! Tree-walk translation from a meta block's `Expr` sub-AST to Lua source
//! text, per `spec.md` §4.5: "function, variable, if, while, return, call,
//! variable-reference forms". `For`/`Label`/`Goto` are supplemented beyond
//! that list since Lua expresses all three directly (`do ... while ... end`,
//! `::name::`, `goto name`) and the translation is unambiguous.
//!
//! Binary comparison/arithmetic operators are not translated at all: the
//! source language already spells `~= == < > <= >= + - * /` exactly as Lua
//! does, so the operator string passes through unchanged.

use cinder_ir::{Expr, Function, UnaryOperator, Variable, VariableDef};

/// Translate a meta block's statement list to a Lua chunk.
pub fn translate_block(body: &[Expr]) -> Result<String, String> {
    let mut out = String::new();
    for stmt in body {
        out.push_str(&translate_stmt(stmt)?);
    }
    Ok(out)
}

fn translate_stmt(expr: &Expr) -> Result<String, String> {
    match expr {
        Expr::VariableDef(v) => translate_variable_def(v),
        Expr::Function(f) => translate_function(f),
        Expr::If { head, body, else_body, .. } => translate_if(head, body, else_body),
        Expr::While { head, body, .. } => translate_while(head, body),
        Expr::For { init, cond, inc, body, .. } => translate_for(init, cond, inc, body),
        Expr::Return { value, .. } => translate_return(value.as_deref()),
        Expr::Label { name, .. } => Ok(format!("::{name}::\n")),
        Expr::Goto { name, .. } => Ok(format!("goto {name}\n")),
        Expr::FunctionCall { .. } => Ok(format!("{}\n", translate_expr(expr)?)),
        Expr::BinaryOp { op, left, right, .. } if op == "=" => {
            Ok(format!("{} = {}\n", translate_expr(left)?, translate_expr(right)?))
        }
        Expr::ClassDef(_) => Err("class definitions are not supported inside a meta block".to_string()),
        Expr::Meta { .. } => Err("nested meta blocks are not supported".to_string()),
        _ => Err("expression is not a valid statement inside a meta block".to_string()),
    }
}

fn translate_expr(expr: &Expr) -> Result<String, String> {
    match expr {
        Expr::Number { value, .. } => Ok(format!("{value:?}")),
        Expr::Integer { value, .. } => Ok(value.to_string()),
        Expr::Bool { value, .. } => Ok(value.to_string()),
        Expr::Byte { value, .. } => Ok(value.to_string()),
        Expr::String { value, .. } => Ok(lua_string_literal(value)),
        Expr::TypeCast { value, .. } => translate_expr(value),
        Expr::Variable(v) => translate_variable(v),
        Expr::BinaryOp { op, left, right, .. } => translate_binary_op(op, left, right),
        Expr::UnaryOp { op, value, .. } => translate_unary_op(*op, value),
        Expr::FunctionCall { name, args, is_method, .. } => translate_call(name, args, *is_method),
        _ => Err("expression is not valid inside a meta block".to_string()),
    }
}

/// `a[i].b[j].c`: index on the current link before descending into its field.
fn translate_variable(var: &Variable) -> Result<String, String> {
    let mut out = var.name.clone();
    if let Some(index) = &var.index {
        out.push('[');
        out.push_str(&translate_expr(index)?);
        out.push(']');
    }
    if let Some(field) = &var.field {
        out.push('.');
        out.push_str(&translate_variable(field)?);
    }
    Ok(out)
}

fn translate_binary_op(op: &str, left: &Expr, right: &Expr) -> Result<String, String> {
    if op == "=" {
        return Err("assignment is not a valid expression inside a meta block".to_string());
    }
    let l = translate_expr(left)?;
    let r = translate_expr(right)?;
    Ok(format!("({l} {op} {r})"))
}

fn translate_unary_op(op: UnaryOperator, inner: &Expr) -> Result<String, String> {
    let v = translate_expr(inner)?;
    match op {
        UnaryOperator::Not => Ok(format!("(not {v})")),
        UnaryOperator::Neg => Ok(format!("(-{v})")),
        UnaryOperator::AddressOf | UnaryOperator::Deref => {
            Err("pointer operators are not valid inside a meta block".to_string())
        }
    }
}

fn translate_call(name: &str, args: &[Expr], is_method: bool) -> Result<String, String> {
    if is_method {
        let Some((receiver, rest)) = args.split_first() else {
            return Err("method call has no receiver".to_string());
        };
        Ok(format!("{}:{name}({})", translate_expr(receiver)?, translate_args(rest)?))
    } else {
        Ok(format!("{name}({})", translate_args(args)?))
    }
}

fn translate_args(args: &[Expr]) -> Result<String, String> {
    let mut parts = Vec::with_capacity(args.len());
    for a in args {
        parts.push(translate_expr(a)?);
    }
    Ok(parts.join(", "))
}

fn translate_variable_def(v: &VariableDef) -> Result<String, String> {
    if v.is_extern {
        return Err("extern variables are not supported inside a meta block".to_string());
    }
    match &v.initial {
        Some(init) => Ok(format!("local {} = {}\n", v.name, translate_expr(init)?)),
        None => Ok(format!("local {}\n", v.name)),
    }
}

fn translate_function(f: &Function) -> Result<String, String> {
    if f.is_extern {
        return Err("extern functions are not supported inside a meta block".to_string());
    }
    let mut params: Vec<&str> = f.params.iter().map(|p| p.name.as_str()).collect();
    if f.is_variadic {
        params.push("...");
    }
    let body = translate_block(&f.body)?;
    Ok(format!("function {}({})\n{body}end\n", f.name, params.join(", ")))
}

fn translate_if(head: &Expr, body: &[Expr], else_body: &[Expr]) -> Result<String, String> {
    let cond = translate_expr(head)?;
    let then = translate_block(body)?;
    if else_body.is_empty() {
        Ok(format!("if {cond} then\n{then}end\n"))
    } else {
        let otherwise = translate_block(else_body)?;
        Ok(format!("if {cond} then\n{then}else\n{otherwise}end\n"))
    }
}

fn translate_while(head: &Expr, body: &[Expr]) -> Result<String, String> {
    let cond = translate_expr(head)?;
    let b = translate_block(body)?;
    Ok(format!("while {cond} do\n{b}end\n"))
}

/// No direct Lua equivalent to a C-style `for`; emulated with a scoped
/// `do ... while ... end` block so `init` doesn't leak past the loop.
fn translate_for(init: &Expr, cond: &Expr, inc: &Expr, body: &[Expr]) -> Result<String, String> {
    let init_stmt = translate_stmt(init)?;
    let cond_expr = translate_expr(cond)?;
    let inc_stmt = translate_stmt(inc)?;
    let body_block = translate_block(body)?;
    Ok(format!("do\n{init_stmt}while {cond_expr} do\n{body_block}{inc_stmt}end\nend\n"))
}

fn translate_return(value: Option<&Expr>) -> Result<String, String> {
    match value {
        Some(v) => Ok(format!("return {}\n", translate_expr(v)?)),
        None => Ok("return\n".to_string()),
    }
}

fn lua_string_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use cinder_ir::SourceLocation;

    fn loc() -> SourceLocation {
        SourceLocation::default()
    }

    #[test]
    fn translates_arithmetic_and_comparison_operators_verbatim() {
        let expr = Expr::BinaryOp {
            op: "~=".to_string(),
            left: Box::new(Expr::Integer { value: 1, loc: loc() }),
            right: Box::new(Expr::Integer { value: 2, loc: loc() }),
            loc: loc(),
        };
        assert_eq!(translate_expr(&expr).unwrap(), "(1 ~= 2)");
    }

    #[test]
    fn assignment_statement_uses_lua_equals() {
        let stmt = Expr::BinaryOp {
            op: "=".to_string(),
            left: Box::new(Expr::Variable(Variable::new("x", loc()))),
            right: Box::new(Expr::Integer { value: 7, loc: loc() }),
            loc: loc(),
        };
        assert_eq!(translate_stmt(&stmt).unwrap(), "x = 7\n");
    }

    #[test]
    fn variable_chain_indexes_before_descending_fields() {
        let inner = Variable::new("b", loc());
        let var = Variable::new("a", loc())
            .with_index(Expr::Integer { value: 0, loc: loc() })
            .with_field(inner);
        assert_eq!(translate_variable(&var).unwrap(), "a[0].b");
    }

    #[test]
    fn method_call_uses_lua_colon_syntax() {
        let call = Expr::FunctionCall {
            name: "set".to_string(),
            args: vec![
                Expr::Variable(Variable::new("p", loc())),
                Expr::Integer { value: 7, loc: loc() },
            ],
            is_method: true,
            loc: loc(),
        };
        assert_eq!(translate_expr(&call).unwrap(), "p:set(7)");
    }

    #[test]
    fn if_without_else_omits_the_else_branch() {
        let stmt = Expr::If {
            head: Box::new(Expr::Bool { value: true, loc: loc() }),
            body: vec![Expr::Return { value: None, loc: loc() }],
            else_body: vec![],
            loc: loc(),
        };
        assert_eq!(translate_stmt(&stmt).unwrap(), "if true then\nreturn\nend\n");
    }

    #[test]
    fn function_definition_round_trips_params_and_body() {
        let mut f = Function::new("gen", "void", loc());
        f.params.push(VariableDef::new("n", "int", loc()));
        f.body.push(Expr::Return { value: None, loc: loc() });
        assert_eq!(translate_function(&f).unwrap(), "function gen(n)\nreturn\nend\n");
    }

    #[test]
    fn class_def_is_rejected() {
        let class = Expr::ClassDef(cinder_ir::ClassDef::new("Point", loc()));
        assert!(translate_stmt(&class).is_err());
    }
}
