//! Include expansion, the second preprocessor phase.
//!
//! Walks the top-level list by index, expanding `include`/`require` calls
//! in place. Locating and parsing the named file is delegated to an
//! `IncludeResolver` — this crate stays IO-free and parser-agnostic, per
//! `spec.md` §1's "lexer/parser is an external collaborator".

use cinder_diagnostic::DiagnosticSink;
use cinder_ir::{Expr, Module};
use rustc_hash::FxHashSet;

/// Locates and parses an included file's contents. `cinderc` backs this
/// with real filesystem IO plus the external parser; tests back it with an
/// in-memory map.
pub trait IncludeResolver {
    /// `include(name)`: try `source_path + name`, then `include_path + name`.
    /// Returns the parsed top-level items, or `None` if no candidate exists.
    fn load_source(&self, name: &str, source_path: &str, include_path: &str) -> Option<Vec<Expr>>;

    /// `require(name)`: load `name.lmod`'s declarations the same way.
    fn load_definitions(&self, name: &str, source_path: &str, include_path: &str) -> Option<Vec<Expr>>;
}

/// Expand every `include`/`require` call in `module.top_level`, in place.
///
/// Returns `Err(())` if an include callback could not locate its file —
/// the caller aborts the rest of preprocessing for this module, matching
/// the original "if the include callback returns nothing, compilation
/// aborts" without this crate calling `process::exit` itself.
pub fn run(
    module: &mut Module,
    resolver: &dyn IncludeResolver,
    include_path: &str,
    visited: &mut FxHashSet<String>,
    diagnostics: &mut DiagnosticSink,
) -> Result<(), ()> {
    let source_name = module.source_name.clone();
    let mut i = 0;
    while i < module.top_level.len() {
        if !module.top_level[i].is_include_call() {
            i += 1;
            continue;
        }

        let Expr::FunctionCall { name: call_name, args, loc, .. } = &module.top_level[i] else {
            unreachable!("is_include_call guarantees a FunctionCall");
        };
        let loc = *loc;
        let call_name = call_name.clone();

        let Some(Expr::String { value: target, .. }) = args.first() else {
            diagnostics.error(&source_name, loc, "malformed include: argument must be a string literal");
            module.top_level.remove(i);
            continue;
        };
        let target = target.clone();

        if visited.contains(&target) {
            diagnostics.warning(&source_name, loc, format!("redundant include of '{target}'"));
            module.top_level.remove(i);
            continue;
        }
        visited.insert(target.clone());

        let is_require = call_name == "require";
        if is_require {
            module.required_libraries.push(format!("{target}.ll"));
        }

        let loaded = if is_require {
            resolver.load_definitions(&target, &module.source_path, include_path)
        } else {
            resolver.load_source(&target, &module.source_path, include_path)
        };

        match loaded {
            Some(items) => {
                let count = items.len();
                module.top_level.splice(i..=i, items);
                if count == 0 {
                    // nothing was spliced in; don't re-visit position i forever
                    continue;
                }
                // Leave the cursor at i — freshly spliced items may themselves
                // contain include calls, and the loop will walk into them.
            }
            None => {
                diagnostics.error(&source_name, loc, format!("could not locate included file '{target}'"));
                return Err(());
            }
        }
    }
    Ok(())
}
