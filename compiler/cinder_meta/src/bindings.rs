//! Lua-visible constructors that let a meta block build new `Expr` fragments
//! and hand them back to the enclosing module.
//!
//! `mlua = "0.9"` dropped the `'lua` lifetime from every public type (`Lua`,
//! `Table`, `Function`, `UserData`...), so every signature below is
//! lifetime-free; there is no `'lua` to thread through `install`.

use std::cell::RefCell;
use std::rc::Rc;

use cinder_ir::{Expr, Function, SourceLocation, UnaryOperator, Variable, VariableDef};
use mlua::{Lua, Table, UserData};

/// An `Expr` wrapped so it can cross the Lua/Rust boundary as userdata.
/// `mlua`'s blanket `FromLua`/`IntoLua` impl for `T: UserData + Clone +
/// 'static` is what makes this work with no manual conversion code.
#[derive(Clone)]
pub struct LuaExpr(pub Expr);

impl UserData for LuaExpr {}

/// Register the `ast` table of constructor functions and the `ast.emit`
/// sink on `lua`. `pending` is drained by the caller after the translated
/// chunk finishes executing.
pub fn install(lua: &Lua, pending: Rc<RefCell<Vec<Expr>>>) -> mlua::Result<()> {
    let ast = lua.create_table()?;

    ast.set("integer", lua.create_function(|_, value: i32| Ok(LuaExpr(Expr::Integer { value, loc: loc() })))?)?;
    ast.set("number", lua.create_function(|_, value: f32| Ok(LuaExpr(Expr::Number { value, loc: loc() })))?)?;
    ast.set("bool", lua.create_function(|_, value: bool| Ok(LuaExpr(Expr::Bool { value, loc: loc() })))?)?;
    ast.set("byte", lua.create_function(|_, value: i8| Ok(LuaExpr(Expr::Byte { value, loc: loc() })))?)?;
    ast.set(
        "string",
        lua.create_function(|_, value: String| Ok(LuaExpr(Expr::String { value, loc: loc() })))?,
    )?;

    ast.set(
        "variable",
        lua.create_function(|_, name: String| Ok(LuaExpr(Expr::Variable(Variable::new(name, loc())))))?,
    )?;

    ast.set(
        "variable_def",
        lua.create_function(|_, (name, type_name, initial): (String, String, Option<LuaExpr>)| {
            let mut def = VariableDef::new(name, type_name, loc());
            def.initial = initial.map(|e| Box::new(e.0));
            Ok(LuaExpr(Expr::VariableDef(def)))
        })?,
    )?;

    ast.set(
        "binary_op",
        lua.create_function(|_, (op, left, right): (String, LuaExpr, LuaExpr)| {
            Ok(LuaExpr(Expr::BinaryOp {
                op,
                left: Box::new(left.0),
                right: Box::new(right.0),
                loc: loc(),
            }))
        })?,
    )?;

    ast.set(
        "unary_op",
        lua.create_function(|_, (op, value): (String, LuaExpr)| {
            let op = UnaryOperator::from_symbol(&op)
                .ok_or_else(|| mlua::Error::RuntimeError(format!("unknown unary operator '{op}'")))?;
            Ok(LuaExpr(Expr::UnaryOp { op, value: Box::new(value.0), loc: loc() }))
        })?,
    )?;

    ast.set(
        "call",
        lua.create_function(|_, (name, is_method, args): (String, bool, Table)| {
            let mut exprs = Vec::new();
            for value in args.sequence_values::<LuaExpr>() {
                exprs.push(value?.0);
            }
            Ok(LuaExpr(Expr::FunctionCall { name, args: exprs, is_method, loc: loc() }))
        })?,
    )?;

    ast.set(
        "ret",
        lua.create_function(|_, value: Option<LuaExpr>| {
            Ok(LuaExpr(Expr::Return { value: value.map(|e| Box::new(e.0)), loc: loc() }))
        })?,
    )?;

    ast.set(
        "function",
        lua.create_function(|_, (name, return_type, params, body): (String, String, Table, Table)| {
            let mut f = Function::new(name, return_type, loc());
            for value in params.sequence_values::<(String, String)>() {
                let (pname, ptype) = value?;
                f.params.push(VariableDef::new(pname, ptype, loc()));
            }
            for value in body.sequence_values::<LuaExpr>() {
                f.body.push(value?.0);
            }
            Ok(LuaExpr(Expr::Function(f)))
        })?,
    )?;

    let emit_pending = Rc::clone(&pending);
    ast.set(
        "emit",
        lua.create_function(move |_, expr: LuaExpr| {
            emit_pending.borrow_mut().push(expr.0);
            Ok(())
        })?,
    )?;

    lua.globals().set("ast", ast)
}

/// Fragments synthesized inside a meta block have no source position of
/// their own; they are attributed to the meta block as a whole by the
/// caller once drained.
fn loc() -> SourceLocation {
    SourceLocation::default()
}
