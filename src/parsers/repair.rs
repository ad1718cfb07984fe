//! Textual repair rules for malformed stub sources
//!
//! The stub generator occasionally emits text that is not valid under the
//! declaration grammar. Each known defect gets one pure text-to-text rule;
//! the rules run once, in order, before the parse is retried. This is
//! best-effort regex surgery, not a grammar-aware fix-up — new generator
//! quirks get a new rule here rather than a change to the parser core.

use regex::Regex;
use std::sync::OnceLock;

/// A single textual repair applied to an unparseable stub source.
pub trait RepairRule: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &'static str;

    /// Apply the rewrite. Must return the input unchanged when the defect
    /// is absent.
    fn apply(&self, text: &str) -> String;
}

/// The reserved word `is` emitted as a parameter name inside a
/// parenthesized list; rewritten to `stream`.
struct ReservedParameterName;

impl RepairRule for ReservedParameterName {
    fn name(&self) -> &'static str {
        "reserved-parameter-name"
    }

    fn apply(&self, text: &str) -> String {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"\(([^)]*?)\bis\b([^)]*?)\)").expect("valid regex")
        });
        re.replace_all(text, "(${1}stream${2})").into_owned()
    }
}

/// Empty parameter lists written as a lone colon `(:)`.
struct EmptyColonParameters;

impl RepairRule for EmptyColonParameters {
    fn name(&self) -> &'static str {
        "empty-colon-parameters"
    }

    fn apply(&self, text: &str) -> String {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| Regex::new(r"\(\s*:\s*\)").expect("valid regex"));
        re.replace_all(text, "()").into_owned()
    }
}

/// A string-literal default glued onto a `mime_type`-suffixed parameter
/// without the `=` in between.
struct MissingDefaultAssignment;

impl RepairRule for MissingDefaultAssignment {
    fn name(&self) -> &'static str {
        "missing-default-assignment"
    }

    fn apply(&self, text: &str) -> String {
        static RE: OnceLock<Regex> = OnceLock::new();
        let re = RE.get_or_init(|| {
            Regex::new(r"\(\s*([^)]*?mime_type)('[^=)]*?')([^)]*?)\)").expect("valid regex")
        });
        re.replace_all(text, "(${1}=${2}${3})").into_owned()
    }
}

/// The known repair rules, in application order.
pub fn rules() -> &'static [&'static dyn RepairRule] {
    static RULES: [&(dyn RepairRule); 3] = [
        &ReservedParameterName,
        &EmptyColonParameters,
        &MissingDefaultAssignment,
    ];
    &RULES
}

/// Run every rule once, in order.
pub fn repair(text: &str) -> String {
    let mut out = text.to_string();
    for rule in rules() {
        let repaired = rule.apply(&out);
        if repaired != out {
            tracing::debug!(rule = rule.name(), "applied stub repair rule");
        }
        out = repaired;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrites_reserved_is_parameter() {
        let fixed = repair("def f(is: int): pass");
        assert_eq!(fixed, "def f(stream: int): pass");
    }

    #[test]
    fn leaves_is_outside_parens_alone() {
        let text = "x = 1 # this is a comment\ndef f(a: int): pass";
        assert_eq!(repair(text), text);
    }

    #[test]
    fn removes_lone_colon_parameter_list() {
        assert_eq!(repair("def f(:): pass"), "def f(): pass");
        assert_eq!(repair("def f( : ): pass"), "def f(): pass");
    }

    #[test]
    fn inserts_missing_equals_before_string_default() {
        let fixed = repair("def f(mime_type'text/plain'): pass");
        assert_eq!(fixed, "def f(mime_type='text/plain'): pass");
    }

    #[test]
    fn well_formed_text_is_untouched() {
        let text = "class A(Base):\n    def m(self, x: int = 5) -> int: pass\n";
        assert_eq!(repair(text), text);
    }
}
