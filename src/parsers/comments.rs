//! Comment extraction and doxygen-tag association
//!
//! Comments are not part of the declaration grammar. The CST exposes them
//! as `comment` nodes; we collect them separately with their 1-based line
//! numbers, then associate a block with each declaration by scanning the
//! stream backward from the declaration's starting line.

use std::collections::HashMap;
use tree_sitter::Node;

/// Collect every comment in the tree as `(line, text)` pairs, in source
/// order. Lines are 1-based to match declaration line numbers.
pub fn collect_comments(root: &Node, source: &[u8]) -> Vec<(u32, String)> {
    let mut out = Vec::new();
    collect_into(root, source, &mut out);
    out
}

fn collect_into(node: &Node, source: &[u8], out: &mut Vec<(u32, String)>) {
    if node.kind() == "comment" {
        if let Ok(text) = node.utf8_text(source) {
            out.push((node.start_position().row as u32 + 1, text.trim().to_string()));
        }
    }
    for child in node.children(&mut node.walk()) {
        collect_into(&child, source, out);
    }
}

/// Ordered comment stream for one file.
#[derive(Debug, Default)]
pub struct CommentIndex {
    entries: Vec<(u32, String)>,
}

impl CommentIndex {
    pub fn new(entries: Vec<(u32, String)>) -> Self {
        Self { entries }
    }

    /// Recover the comment lines belonging to the declaration that starts
    /// at `lineno`.
    ///
    /// The scan runs bottom-up over every comment above the declaration:
    /// a `##` marker terminates the block (it closes the previous
    /// declaration's comments), a lone `#` separator is skipped, and any
    /// other comment is cleaned of leading `#`s and whitespace. The result
    /// is reversed back into top-down reading order.
    pub fn associated(&self, lineno: u32) -> Vec<String> {
        let mut lines = Vec::new();
        for (line, text) in self.entries.iter().rev() {
            if *line >= lineno {
                continue;
            }
            if text.starts_with("##") {
                break;
            }
            if text == "#" {
                continue;
            }
            lines.push(text.trim_start_matches('#').trim().to_string());
        }
        lines.reverse();
        lines
    }
}

/// Structured tag set recovered from a declaration's comment block.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct DocBlock {
    pub brief: String,
    pub params: HashMap<String, String>,
    pub ret: String,
}

impl DocBlock {
    /// Look up a parameter's comment, defaulting to empty.
    pub fn param(&self, name: &str) -> String {
        self.params.get(name).cloned().unwrap_or_default()
    }

    /// Interpret an ordered comment block as tagged sections.
    ///
    /// `\brief` opens the brief section with the remainder of its line,
    /// `\param <name>` opens a per-parameter section, `\return` opens the
    /// return section, and any untagged line extends whichever section is
    /// open. A `\param` with no name token is ignored outright: no section
    /// is opened and the currently open one stays open.
    pub fn parse(lines: &[String]) -> Self {
        #[derive(Clone)]
        enum Section {
            None,
            Brief,
            Param(String),
            Return,
        }

        let mut doc = DocBlock::default();
        let mut section = Section::None;

        for line in lines {
            if let Some(rest) = line.strip_prefix("\\brief") {
                doc.brief = rest.trim().to_string();
                section = Section::Brief;
            } else if let Some(rest) = line.strip_prefix("\\param") {
                let mut words = rest.split_whitespace();
                let Some(name) = words.next() else {
                    continue;
                };
                let text = rest.trim_start()[name.len()..].trim().to_string();
                doc.params.insert(name.to_string(), text);
                section = Section::Param(name.to_string());
            } else if let Some(rest) = line.strip_prefix("\\return") {
                doc.ret = rest.trim().to_string();
                section = Section::Return;
            } else {
                let cont = line.trim();
                match &section {
                    Section::Brief => {
                        doc.brief.push(' ');
                        doc.brief.push_str(cont);
                    }
                    Section::Param(name) => {
                        if let Some(entry) = doc.params.get_mut(name) {
                            entry.push(' ');
                            entry.push_str(cont);
                        }
                    }
                    Section::Return => {
                        doc.ret.push(' ');
                        doc.ret.push_str(cont);
                    }
                    Section::None => {}
                }
            }
        }

        doc
    }

    /// Convenience: associate and parse in one step.
    pub fn for_line(index: &CommentIndex, lineno: u32) -> Self {
        Self::parse(&index.associated(lineno))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index(entries: &[(u32, &str)]) -> CommentIndex {
        CommentIndex::new(
            entries
                .iter()
                .map(|(l, t)| (*l, t.to_string()))
                .collect(),
        )
    }

    #[test]
    fn double_hash_marker_bounds_the_block() {
        let idx = index(&[
            (1, "# \\brief Belongs to the previous declaration."),
            (2, "##"),
            (3, "# \\brief Belongs to f."),
        ]);

        let lines = idx.associated(4);
        assert_eq!(lines, vec!["\\brief Belongs to f."]);
    }

    #[test]
    fn lone_hash_separator_is_skipped_without_terminating() {
        let idx = index(&[
            (1, "# \\brief Does a thing."),
            (2, "#"),
            (3, "# \\return the output"),
        ]);

        let lines = idx.associated(4);
        assert_eq!(lines, vec!["\\brief Does a thing.", "\\return the output"]);
    }

    #[test]
    fn comments_below_the_declaration_are_ignored() {
        let idx = index(&[(1, "# \\brief above"), (10, "# \\brief below")]);
        assert_eq!(idx.associated(5), vec!["\\brief above"]);
    }

    #[test]
    fn tags_open_sections_and_capture_remainders() {
        let lines = vec![
            "\\brief Does a thing.".to_string(),
            "\\param x the input".to_string(),
            "\\return the output".to_string(),
        ];
        let doc = DocBlock::parse(&lines);

        assert_eq!(doc.brief, "Does a thing.");
        assert_eq!(doc.param("x"), "the input");
        assert_eq!(doc.ret, "the output");
    }

    #[test]
    fn untagged_lines_extend_the_open_section() {
        let lines = vec![
            "\\brief First line".to_string(),
            "and a continuation".to_string(),
            "\\param mol the molecule".to_string(),
            "to process".to_string(),
        ];
        let doc = DocBlock::parse(&lines);

        assert_eq!(doc.brief, "First line and a continuation");
        assert_eq!(doc.param("mol"), "the molecule to process");
    }

    #[test]
    fn nameless_param_tag_is_ignored() {
        let lines = vec![
            "\\brief Something.".to_string(),
            "\\param".to_string(),
            "still the brief".to_string(),
        ];
        let doc = DocBlock::parse(&lines);

        assert!(doc.params.is_empty());
        // The brief section stays open across the malformed tag.
        assert_eq!(doc.brief, "Something. still the brief");
    }
}
