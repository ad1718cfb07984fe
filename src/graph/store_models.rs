//! Node and relationship models for the API graph

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Node labels in the API graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeLabel {
    Project,
    Folder,
    File,
    Class,
    Function,
    Parameter,
    Decorator,
}

impl fmt::Display for NodeLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeLabel::Project => "Project",
            NodeLabel::Folder => "Folder",
            NodeLabel::File => "File",
            NodeLabel::Class => "Class",
            NodeLabel::Function => "Function",
            NodeLabel::Parameter => "Parameter",
            NodeLabel::Decorator => "Decorator",
        };
        f.write_str(s)
    }
}

/// Relationship types, directed source → target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelKind {
    IncludedIn,
    DeclaredAt,
    InheritsFrom,
    Has,
    OfType,
}

impl fmt::Display for RelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RelKind::IncludedIn => "INCLUDED_IN",
            RelKind::DeclaredAt => "DECLARED_AT",
            RelKind::InheritsFrom => "INHERITS_FROM",
            RelKind::Has => "HAS",
            RelKind::OfType => "OF_TYPE",
        };
        f.write_str(s)
    }
}

/// Identity key of a graph node: a label plus the exact property tuple
/// that keys nodes of that label. Two nodes are the same node iff their
/// keys are equal — for `Function` and `Parameter` the key deliberately
/// includes the full descriptive payload.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeKey {
    pub label: NodeLabel,
    pub props: BTreeMap<String, String>,
}

impl NodeKey {
    pub fn new(label: NodeLabel) -> Self {
        Self {
            label,
            props: BTreeMap::new(),
        }
    }

    /// Key for a label whose identity is its bare `name`.
    pub fn named(label: NodeLabel, name: &str) -> Self {
        Self::new(label).with("name", name)
    }

    pub fn with(mut self, key: &str, value: impl Into<String>) -> Self {
        self.props.insert(key.to_string(), value.into());
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.props.get(key).map(String::as_str)
    }

    /// Canonical identity string, used as the store's index key.
    /// `BTreeMap` ordering makes it deterministic.
    pub fn id(&self) -> String {
        let mut out = format!("{}{{", self.label);
        let mut first = true;
        for (k, v) in &self.props {
            if !first {
                out.push(',');
            }
            first = false;
            out.push_str(k);
            out.push('=');
            out.push_str(v);
        }
        out.push('}');
        out
    }
}

/// A stored node: its identity key plus mutable extra properties
/// (class comment, serialized attributes) set after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphNode {
    pub key: NodeKey,
    pub props: HashMap<String, serde_json::Value>,
}

impl GraphNode {
    pub fn new(key: NodeKey) -> Self {
        Self {
            key,
            props: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        self.key.get("name").unwrap_or_default()
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.props.get(key).and_then(|v| v.as_str())
    }
}

/// A stored relationship. Relationships carry no properties; identity is
/// the `(source, kind, target)` triple.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GraphEdge {
    pub kind: RelKind,
}

impl GraphEdge {
    pub fn new(kind: RelKind) -> Self {
        Self { kind }
    }
}
