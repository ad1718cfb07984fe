//! Declaration-tree data model
//!
//! These records are produced by parsing a single stub file and discarded
//! after being lowered to graph operations. They carry the structured
//! comments recovered by the comment associator alongside the declared
//! signatures.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sentinel used when an expression has no resolvable value.
pub const NO_VALUE: &str = "No value";

/// Sentinel used for parameters declared without a default.
pub const NO_DEFAULT: &str = "No default";

/// A resolved expression value.
///
/// Any expression used as a type annotation, default value, base class, or
/// decorator reduces to one of these: a (possibly dotted) name, a literal's
/// textual value, or a call descriptor. Everything outside that grammar
/// degrades to the [`NO_VALUE`] sentinel instead of failing the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Bare or dotted name, or a literal rendered as text.
    Name(String),
    /// Call expression, e.g. `Factory(arg)` as a default value.
    Call {
        callable: Box<Value>,
        arguments: Vec<Value>,
    },
}

impl Value {
    pub fn name(s: impl Into<String>) -> Self {
        Value::Name(s.into())
    }

    /// The "no value" sentinel.
    pub fn no_value() -> Self {
        Value::Name(NO_VALUE.to_string())
    }

    /// The "no default" sentinel.
    pub fn no_default() -> Self {
        Value::Name(NO_DEFAULT.to_string())
    }

    pub fn is_no_value(&self) -> bool {
        matches!(self, Value::Name(s) if s == NO_VALUE)
    }

    /// Plain name, if this value is one.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Value::Name(s) => Some(s),
            Value::Call { .. } => None,
        }
    }

    /// Name of the `Class` node a type or base reference points at.
    ///
    /// Dotted references (`Module.Sub.Type`) reduce to their last segment
    /// because `Class` nodes are keyed by bare name only. Call descriptors
    /// and the no-value sentinel have no graph target.
    pub fn graph_target(&self) -> Option<&str> {
        match self {
            Value::Name(s) if s != NO_VALUE && s != NO_DEFAULT => {
                Some(s.rsplit('.').next().unwrap_or(s.as_str()))
            }
            _ => None,
        }
    }
}

/// One declared function parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDecl {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: Value,
    pub default: Value,
    pub comment: String,
}

/// Return-type descriptor of a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReturnDecl {
    #[serde(rename = "type")]
    pub ty: Value,
    pub comment: String,
}

/// A declared function or method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionDecl {
    pub name: String,
    pub params: Vec<ParameterDecl>,
    pub decorators: Vec<Value>,
    pub return_type: ReturnDecl,
    pub comment: String,
}

/// A class or module attribute declared via assignment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeDecl {
    pub name: String,
    pub value: Value,
    pub comment: String,
}

/// A declared class.
///
/// Nested classes are reachable only through `nested_classes`; they are
/// never flattened into the enclosing file's top-level class list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDecl {
    pub name: String,
    pub bases: Vec<Value>,
    pub decorators: Vec<Value>,
    pub methods: Vec<FunctionDecl>,
    pub class_attributes: Vec<AttributeDecl>,
    pub nested_classes: Vec<ClassDecl>,
    pub comment: String,
}

/// Everything extracted from one stub file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParsedFile {
    pub classes: Vec<ClassDecl>,
    pub functions: Vec<FunctionDecl>,
}

/// Aggregated parse results keyed by logical folder name, then file name.
///
/// Append-only per distinct folder/file key, so results from parallel
/// per-file parses can be reduced into it without coordination.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Corpus {
    pub folders: BTreeMap<String, BTreeMap<String, ParsedFile>>,
}

impl Corpus {
    pub fn insert_file(&mut self, folder: &str, file: &str, parsed: ParsedFile) {
        self.folders
            .entry(folder.to_string())
            .or_default()
            .insert(file.to_string(), parsed);
    }

    /// Register a folder key even when it ends up with no parsed files.
    pub fn ensure_folder(&mut self, folder: &str) {
        self.folders.entry(folder.to_string()).or_default();
    }

    /// Iterate `(folder, file, parsed)` triples in deterministic order.
    pub fn iter_files(&self) -> impl Iterator<Item = (&str, &str, &ParsedFile)> {
        self.folders.iter().flat_map(|(folder, files)| {
            files
                .iter()
                .map(move |(file, parsed)| (folder.as_str(), file.as_str(), parsed))
        })
    }

    pub fn file_count(&self) -> usize {
        self.folders.values().map(|f| f.len()).sum()
    }

    pub fn class_count(&self) -> usize {
        self.iter_files().map(|(_, _, p)| p.classes.len()).sum()
    }

    pub fn function_count(&self) -> usize {
        self.iter_files().map(|(_, _, p)| p.functions.len()).sum()
    }
}
