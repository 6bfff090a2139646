//! Filesystem-backed [`IncludeResolver`], wiring `spec.md` §4.1/§6's
//! "source_path + name, falling back to include_path + name" lookup rule to
//! real file IO and the two on-disk grammars this crate understands: the
//! external source parser for `include`, and [`crate::lmod`] for `require`.

use cinder_ir::Expr;
use cinder_preprocess::IncludeResolver;

use crate::lmod;
use crate::parser::SourceParser;

pub struct FsIncludeResolver<'a> {
    parser: &'a dyn SourceParser,
}

impl<'a> FsIncludeResolver<'a> {
    #[must_use]
    pub fn new(parser: &'a dyn SourceParser) -> Self {
        FsIncludeResolver { parser }
    }
}

/// Try `source_path + name`, then `include_path + name`; return the path
/// that existed plus its contents.
fn locate(name: &str, source_path: &str, include_path: &str) -> Option<(String, String)> {
    let candidate = format!("{source_path}{name}");
    if let Ok(text) = std::fs::read_to_string(&candidate) {
        return Some((candidate, text));
    }
    if include_path.is_empty() {
        return None;
    }
    let fallback = format!("{include_path}{name}");
    std::fs::read_to_string(&fallback).ok().map(|text| (fallback, text))
}

impl<'a> IncludeResolver for FsIncludeResolver<'a> {
    fn load_source(&self, name: &str, source_path: &str, include_path: &str) -> Option<Vec<Expr>> {
        let (path, text) = locate(name, source_path, include_path)?;
        self.parser.parse(name, &path, &text).ok().map(|module| module.top_level)
    }

    fn load_definitions(&self, name: &str, source_path: &str, include_path: &str) -> Option<Vec<Expr>> {
        let filename = format!("{name}.lmod");
        let (_path, text) = locate(&filename, source_path, include_path)?;
        lmod::parse_definitions(&text).ok()
    }
}
