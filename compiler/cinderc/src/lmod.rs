//! Parser for the `.lmod` definitions grammar (`spec.md` §6):
//!
//! ```text
//! extern local <name> -> <type>[<size>]
//! extern function <name>(<type> <name>, ...) -> <type>
//! function <name>(<type> <name>, ...) -> <type>
//! class <name> { <field-lines> <method-lines> }
//! meta <inner definitions> end
//! ```
//!
//! Unlike the full source-language grammar, this one is small, closed, and
//! fully specified by `cinder_ir::Expr::definition_string` — it describes
//! declarations only, never expressions or statement bodies — so it is
//! implemented directly here rather than treated as an external collaborator.
//! `require(x)` loads `x.lmod` through this parser (`cinder_preprocess`'s
//! `IncludeResolver::load_definitions`).

use cinder_ir::{ClassDef, Expr, Function, SourceLocation, VariableDef};

struct Tokens<'a> {
    rest: &'a str,
}

impl<'a> Tokens<'a> {
    fn new(text: &'a str) -> Self {
        Tokens { rest: text }
    }

    fn peek(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        if self.rest.is_empty() {
            return None;
        }
        Some(self.next_token_str())
    }

    fn next(&mut self) -> Option<&'a str> {
        self.skip_whitespace();
        if self.rest.is_empty() {
            return None;
        }
        let token = self.next_token_str();
        self.rest = &self.rest[token.len()..];
        Some(token)
    }

    fn skip_whitespace(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// The next token starting at `self.rest` (whitespace already skipped
    /// by the caller), without consuming it: single-char punctuation, the
    /// two-char `->`, or a run of non-whitespace, non-punctuation characters.
    /// `->` in this grammar is always set off by whitespace, so a word token
    /// never needs to stop mid-run to yield to one.
    fn next_token_str(&self) -> &'a str {
        if self.rest.starts_with("->") {
            return &self.rest[..2];
        }
        let bytes = self.rest.as_bytes();
        if matches!(bytes[0], b'(' | b')' | b'{' | b'}' | b'[' | b']' | b',') {
            return &self.rest[..1];
        }
        let end = self
            .rest
            .find(|c: char| c.is_whitespace() || matches!(c, '(' | ')' | '{' | '}' | '[' | ']' | ','))
            .unwrap_or(self.rest.len());
        &self.rest[..end.max(1)]
    }

    fn expect(&mut self, expected: &str) -> Result<(), String> {
        match self.next() {
            Some(tok) if tok == expected => Ok(()),
            Some(tok) => Err(format!("expected '{expected}', found '{tok}'")),
            None => Err(format!("expected '{expected}', found end of input")),
        }
    }
}

/// Parse a full `.lmod` file's text into top-level declaration nodes.
pub fn parse_definitions(text: &str) -> Result<Vec<Expr>, String> {
    let mut tokens = Tokens::new(text);
    parse_declarations(&mut tokens, None)
}

fn parse_declarations(tokens: &mut Tokens<'_>, stop_at: Option<&str>) -> Result<Vec<Expr>, String> {
    let mut out = Vec::new();
    loop {
        let Some(tok) = tokens.peek() else { break };
        if Some(tok) == stop_at {
            break;
        }
        match tok {
            "extern" => {
                tokens.next();
                match tokens.next() {
                    Some("local") => out.push(Expr::VariableDef(parse_extern_local(tokens)?)),
                    Some("function") => out.push(Expr::Function(parse_function(tokens, true)?)),
                    Some(other) => return Err(format!("expected 'local' or 'function' after 'extern', found '{other}'")),
                    None => return Err("expected 'local' or 'function' after 'extern'".to_string()),
                }
            }
            "function" => {
                tokens.next();
                out.push(Expr::Function(parse_function(tokens, false)?));
            }
            "class" => {
                tokens.next();
                out.push(Expr::ClassDef(parse_class(tokens)?));
            }
            "meta" => {
                tokens.next();
                let body = parse_declarations(tokens, Some("end"))?;
                tokens.expect("end")?;
                out.push(Expr::Meta { body, loc: SourceLocation::default() });
            }
            other => return Err(format!("unexpected token '{other}' in definitions file")),
        }
    }
    Ok(out)
}

fn parse_extern_local(tokens: &mut Tokens<'_>) -> Result<VariableDef, String> {
    let name = tokens.next().ok_or("expected a name after 'extern local'")?.to_string();
    tokens.expect("->")?;
    let type_name = tokens.next().ok_or("expected a type after '->'")?.to_string();
    let mut def = VariableDef::new(name, type_name, SourceLocation::default());
    def.is_extern = true;
    if tokens.peek() == Some("[") {
        tokens.next();
        let size_tok = tokens.next().ok_or("expected an array size")?;
        def.size = size_tok.parse().map_err(|_| format!("invalid array size '{size_tok}'"))?;
        tokens.expect("]")?;
    }
    Ok(def)
}

fn parse_function(tokens: &mut Tokens<'_>, is_extern: bool) -> Result<Function, String> {
    let name = tokens.next().ok_or("expected a function name")?.to_string();
    tokens.expect("(")?;
    let mut params = Vec::new();
    if tokens.peek() != Some(")") {
        loop {
            let type_name = tokens.next().ok_or("expected a parameter type")?.to_string();
            let param_name = tokens.next().ok_or("expected a parameter name")?.to_string();
            params.push(VariableDef::new(param_name, type_name, SourceLocation::default()));
            match tokens.next() {
                Some(",") => continue,
                Some(")") => break,
                Some(other) => return Err(format!("expected ',' or ')' in parameter list, found '{other}'")),
                None => return Err("unterminated parameter list".to_string()),
            }
        }
    } else {
        tokens.next();
    }
    tokens.expect("->")?;
    let return_type = tokens.next().ok_or("expected a return type")?.to_string();

    let mut function = Function::new(name, return_type, SourceLocation::default());
    function.is_extern = is_extern;
    function.params = params;
    Ok(function)
}

fn parse_class(tokens: &mut Tokens<'_>) -> Result<ClassDef, String> {
    let name = tokens.next().ok_or("expected a class name")?.to_string();
    tokens.expect("{")?;
    let mut class = ClassDef::new(name, SourceLocation::default());
    loop {
        match tokens.peek() {
            Some("}") => {
                tokens.next();
                break;
            }
            Some("local") => {
                tokens.next();
                let name = tokens.next().ok_or("expected a field name")?.to_string();
                tokens.expect("->")?;
                let type_name = tokens.next().ok_or("expected a field type")?.to_string();
                let mut field = VariableDef::new(name, type_name, SourceLocation::default());
                if tokens.peek() == Some("[") {
                    tokens.next();
                    let size_tok = tokens.next().ok_or("expected an array size")?;
                    field.size = size_tok.parse().map_err(|_| format!("invalid array size '{size_tok}'"))?;
                    tokens.expect("]")?;
                }
                class.fields.push(field);
            }
            Some("function") => {
                tokens.next();
                class.methods.push(parse_function(tokens, false)?);
            }
            Some(other) => return Err(format!("unexpected token '{other}' in class body")),
            None => return Err("unterminated class body".to_string()),
        }
    }
    Ok(class)
}
