//! Operator-overload name mangling, per `spec.md` §6.
//!
//! `Operator_{op}_{leftType}_{rightType}`, with every occurrence of
//! `@ < > = + - * /` in the three pieces replaced per the substitution
//! table before they are joined. The joined-up-and-collapsed approach below
//! is the only one that reproduces the table's worked example exactly:
//! `Operator_+_@byte_@byte` → `Operator_Plus_At_byte_At_byte`, not
//! `Operator_Plus__At_byte_At_byte` (the naive concatenation).

const SUBSTITUTIONS: &[(char, &str)] = &[
    ('@', "_At_"),
    ('<', "_Smaller_"),
    ('>', "_Greater_"),
    ('=', "_Equal_"),
    ('+', "_Plus_"),
    ('-', "_Minus_"),
    ('*', "_Times_"),
    ('/', "_Divided_"),
];

fn substitute(segment: &str) -> String {
    let mut out = String::with_capacity(segment.len());
    for c in segment.chars() {
        match SUBSTITUTIONS.iter().find(|(from, _)| *from == c) {
            Some((_, to)) => out.push_str(to),
            None => out.push(c),
        }
    }
    out
}

/// Collapse runs of `_` down to a single `_`, since joining substituted
/// segments (each of which may start/end with `_`) naively doubles up
/// underscores at the seams.
fn collapse_underscores(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_was_underscore = false;
    for c in s.chars() {
        if c == '_' {
            if prev_was_underscore {
                continue;
            }
            prev_was_underscore = true;
        } else {
            prev_was_underscore = false;
        }
        out.push(c);
    }
    out
}

/// The callee name an unresolved `BinaryOp` dispatches to: `Operator_{op}_{L}_{R}`,
/// normalized per `spec.md` §6's substitution table.
#[must_use]
pub fn operator_name(op: &str, left_type: &str, right_type: &str) -> String {
    let raw = format!(
        "Operator_{}_{}_{}",
        substitute(op),
        substitute(left_type),
        substitute(right_type)
    );
    collapse_underscores(&raw)
}

/// Normalize a user-declared function name that denotes an operator
/// overload (`Operator_{op}_{L}_{R}`, e.g. `Operator_+_@byte_@byte`) through
/// the same substitution+collapse table `operator_name` uses to build a
/// call-site callee name, so a declaration and its call sites converge on
/// the same mangled symbol. Names that don't start with `Operator_` (plain
/// functions, already-mangled `{Class}_{method}` names) pass through
/// unchanged.
#[must_use]
pub fn normalize_declared_name(name: &str) -> String {
    if name.starts_with("Operator_") {
        collapse_underscores(&substitute(name))
    } else {
        name.to_string()
    }
}

/// `{ClassName}_{methodName}`, the mangled name a class method is declared
/// and called under once lowered out of its `ClassDef` (`spec.md` §3/§4.4).
#[must_use]
pub fn method_name(class_name: &str, method_name: &str) -> String {
    format!("{class_name}_{method_name}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_spec_worked_example() {
        assert_eq!(
            operator_name("+", "@byte", "@byte"),
            "Operator_Plus_At_byte_At_byte"
        );
    }

    #[test]
    fn plain_identifiers_pass_through_untouched() {
        assert_eq!(operator_name("+", "int", "int"), "Operator_Plus_int_int");
    }

    #[test]
    fn comparison_operators_mangle() {
        assert_eq!(
            operator_name("==", "Point", "Point"),
            "Operator_Equal_Equal_Point_Point"
        );
    }

    #[test]
    fn method_name_prefixes_class() {
        assert_eq!(method_name("Point", "set"), "Point_set");
    }

    #[test]
    fn normalize_declared_name_converges_with_operator_name() {
        assert_eq!(
            normalize_declared_name("Operator_+_@byte_@byte"),
            operator_name("+", "@byte", "@byte")
        );
    }

    #[test]
    fn normalize_declared_name_leaves_plain_functions_untouched() {
        assert_eq!(normalize_declared_name("main"), "main");
        assert_eq!(normalize_declared_name("Point_set"), "Point_set");
    }
}
