//! Stub-file parser
//!
//! Turns the text of one `*.doc.py` stub into a [`ParsedFile`]: a
//! tree-sitter parse of the constrained declaration grammar, a separate
//! comment stream for positional association, and a visitor pass that
//! lowers the CST into declaration records.
//!
//! A failed parse is retried once after the ordered textual repair rules
//! in [`repair`]; a second failure is reported as a syntax error and the
//! caller skips the file.

pub mod comments;
pub mod repair;
mod visitor;

use crate::models::ParsedFile;
use thiserror::Error;
use tree_sitter::Parser;

pub use visitor::resolve_value;

#[derive(Debug, Error)]
pub enum StubError {
    /// The text is not valid under the declaration grammar, even after
    /// repair. Recoverable: the file is counted and skipped.
    #[error("stub source is not valid under the declaration grammar")]
    Syntax,

    /// The grammar could not be loaded or the parser produced no tree.
    #[error("stub parser unavailable: {0}")]
    Parser(String),
}

/// Parse stub-file text into a declaration tree.
///
/// On a syntax failure the repair rules are applied once and the parse is
/// retried; the retry's outcome is final.
pub fn parse_stub_source(source: &str) -> Result<ParsedFile, StubError> {
    match parse_once(source) {
        Err(StubError::Syntax) => {
            let repaired = repair::repair(source);
            parse_once(&repaired)
        }
        outcome => outcome,
    }
}

fn parse_once(source: &str) -> Result<ParsedFile, StubError> {
    let mut parser = Parser::new();
    let language = tree_sitter_python::LANGUAGE;
    parser
        .set_language(&language.into())
        .map_err(|e| StubError::Parser(e.to_string()))?;

    let tree = parser
        .parse(source, None)
        .ok_or_else(|| StubError::Parser("no tree produced".to_string()))?;

    let root = tree.root_node();
    if root.has_error() {
        return Err(StubError::Syntax);
    }

    let index = comments::CommentIndex::new(comments::collect_comments(&root, source.as_bytes()));
    Ok(visitor::visit_module(&root, source.as_bytes(), &index))
}
