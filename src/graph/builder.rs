//! Graph builder
//!
//! Lowers an aggregated [`Corpus`] into idempotent upsert operations
//! against a [`GraphWrite`] store, one manager per entity kind. Operations
//! run in dependency order: a node is always merged before any edge that
//! needs it, and a base-class or parameter-type reference merges its
//! (possibly property-less) `Class` node before the edge. Class comments
//! and attributes are separate merge-then-set steps so a node created
//! early through a reference is enriched, not duplicated, when its own
//! declaration is visited.

use anyhow::Result;
use tracing::info;

use super::store_models::{NodeKey, NodeLabel, RelKind};
use super::traits::GraphWrite;
use crate::models::{ClassDecl, Corpus, FunctionDecl};

pub struct GraphBuilder<'a> {
    store: &'a dyn GraphWrite,
    project: &'a str,
    corpus: &'a Corpus,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(store: &'a dyn GraphWrite, project: &'a str, corpus: &'a Corpus) -> Self {
        Self {
            store,
            project,
            corpus,
        }
    }

    /// Create the whole graph for the corpus.
    pub fn build(&self) -> Result<()> {
        let project = ProjectManager { store: self.store };
        let folders = FolderManager { store: self.store };
        let files = FileManager { store: self.store };
        let classes = ClassManager { store: self.store };
        let functions = FunctionManager { store: self.store };

        project.create(self.project)?;
        folders.create_all(self.corpus, self.project)?;
        files.create_all(self.corpus)?;
        classes.create_all(self.corpus)?;
        functions.create_all(self.corpus)?;

        info!(
            project = self.project,
            folders = self.corpus.folders.len(),
            files = self.corpus.file_count(),
            "graph build complete"
        );
        Ok(())
    }
}

struct ProjectManager<'a> {
    store: &'a dyn GraphWrite,
}

impl ProjectManager<'_> {
    fn create(&self, name: &str) -> Result<()> {
        self.store
            .merge_node(&NodeKey::named(NodeLabel::Project, name))?;
        Ok(())
    }
}

struct FolderManager<'a> {
    store: &'a dyn GraphWrite,
}

impl FolderManager<'_> {
    fn create_all(&self, corpus: &Corpus, project: &str) -> Result<()> {
        let project_key = NodeKey::named(NodeLabel::Project, project);
        for folder in corpus.folders.keys() {
            let folder_key = NodeKey::named(NodeLabel::Folder, folder);
            self.store.merge_node(&folder_key)?;
            self.store
                .merge_relationship(&folder_key, RelKind::IncludedIn, &project_key)?;
        }
        Ok(())
    }
}

struct FileManager<'a> {
    store: &'a dyn GraphWrite,
}

impl FileManager<'_> {
    fn create_all(&self, corpus: &Corpus) -> Result<()> {
        for (folder, files) in &corpus.folders {
            let folder_key = NodeKey::named(NodeLabel::Folder, folder);
            for file in files.keys() {
                let file_key = NodeKey::named(NodeLabel::File, file);
                self.store.merge_node(&file_key)?;
                self.store
                    .merge_relationship(&file_key, RelKind::IncludedIn, &folder_key)?;
            }
        }
        Ok(())
    }
}

struct ClassManager<'a> {
    store: &'a dyn GraphWrite,
}

impl ClassManager<'_> {
    fn create_all(&self, corpus: &Corpus) -> Result<()> {
        let functions = FunctionManager { store: self.store };
        for (_, file, parsed) in corpus.iter_files() {
            for class in &parsed.classes {
                self.create_class(file, class, &functions)?;
            }
        }
        Ok(())
    }

    fn create_class(
        &self,
        file: &str,
        class: &ClassDecl,
        functions: &FunctionManager<'_>,
    ) -> Result<()> {
        let class_key = NodeKey::named(NodeLabel::Class, &class.name);
        self.store.merge_node(&class_key)?;
        // Set even if the node pre-existed bare (created through an
        // inheritance or type reference).
        self.store
            .set_properties(&class_key, &[("comment", class.comment.as_str().into())])?;
        self.create_relationships(file, class, functions)
    }

    fn create_relationships(
        &self,
        file: &str,
        class: &ClassDecl,
        functions: &FunctionManager<'_>,
    ) -> Result<()> {
        let class_key = NodeKey::named(NodeLabel::Class, &class.name);
        let file_key = NodeKey::named(NodeLabel::File, file);
        self.store
            .merge_relationship(&class_key, RelKind::DeclaredAt, &file_key)?;

        for base in &class.bases {
            let Some(base_name) = base.graph_target() else {
                continue;
            };
            let base_key = NodeKey::named(NodeLabel::Class, base_name);
            // Merge first: the base may never be declared in any parsed
            // file, and a later declaration can still enrich it.
            self.store.merge_node(&base_key)?;
            self.store
                .merge_relationship(&class_key, RelKind::InheritsFrom, &base_key)?;
        }

        for decorator in &class.decorators {
            let Some(name) = decorator.as_name() else {
                continue;
            };
            let dec_key = NodeKey::named(NodeLabel::Decorator, name);
            self.store.merge_node(&dec_key)?;
            self.store
                .merge_relationship(&class_key, RelKind::Has, &dec_key)?;
        }

        for method in &class.methods {
            functions.create_method(&class_key, method)?;
        }

        if !class.class_attributes.is_empty() {
            let attributes = serde_json::to_string(&class.class_attributes)?;
            self.store
                .set_properties(&class_key, &[("attributes", attributes.into())])?;
        }

        for nested in &class.nested_classes {
            self.create_class(file, nested, functions)?;
            let nested_key = NodeKey::named(NodeLabel::Class, &nested.name);
            self.store
                .merge_relationship(&class_key, RelKind::Has, &nested_key)?;
        }

        Ok(())
    }
}

struct FunctionManager<'a> {
    store: &'a dyn GraphWrite,
}

impl FunctionManager<'_> {
    fn create_all(&self, corpus: &Corpus) -> Result<()> {
        for (_, file, parsed) in corpus.iter_files() {
            let file_key = NodeKey::named(NodeLabel::File, file);
            for function in &parsed.functions {
                let key = function_key(function)?;
                self.store.merge_node(&key)?;
                self.store
                    .merge_relationship(&key, RelKind::DeclaredAt, &file_key)?;
                self.create_inputs(&key, function)?;
            }
        }
        Ok(())
    }

    /// A method is a regular function node plus a HAS edge from its class
    /// instead of a DECLARED_AT edge.
    fn create_method(&self, class_key: &NodeKey, function: &FunctionDecl) -> Result<()> {
        let key = function_key(function)?;
        self.store.merge_node(&key)?;
        self.store
            .merge_relationship(class_key, RelKind::Has, &key)?;
        self.create_inputs(&key, function)
    }

    /// Parameters, their type edges, and decorators for one function.
    fn create_inputs(&self, function_key: &NodeKey, function: &FunctionDecl) -> Result<()> {
        for param in &function.params {
            let param_key = parameter_key(param)?;
            self.store.merge_node(&param_key)?;
            self.store
                .merge_relationship(function_key, RelKind::Has, &param_key)?;

            if let Some(type_name) = param.ty.graph_target() {
                let type_key = NodeKey::named(NodeLabel::Class, type_name);
                // Type targets exist as Class nodes even when never
                // declared anywhere.
                self.store.merge_node(&type_key)?;
                self.store
                    .merge_relationship(&param_key, RelKind::OfType, &type_key)?;
            }
        }

        for decorator in &function.decorators {
            let Some(name) = decorator.as_name() else {
                continue;
            };
            let dec_key = NodeKey::named(NodeLabel::Decorator, name);
            self.store.merge_node(&dec_key)?;
            self.store
                .merge_relationship(function_key, RelKind::Has, &dec_key)?;
        }

        Ok(())
    }
}

/// Identity key of a function node: the full descriptive tuple, with the
/// signature parts JSON-serialized. Two declarations sharing a name but
/// differing anywhere in the tuple are distinct nodes by design.
pub fn function_key(function: &FunctionDecl) -> Result<NodeKey> {
    Ok(NodeKey::named(NodeLabel::Function, &function.name)
        .with("comment", function.comment.clone())
        .with("parameter", serde_json::to_string(&function.params)?)
        .with("decorators", serde_json::to_string(&function.decorators)?)
        .with("returns", serde_json::to_string(&function.return_type)?))
}

/// Identity key of a parameter node: name, comment, serialized type and
/// default, all part of the key.
pub fn parameter_key(param: &crate::models::ParameterDecl) -> Result<NodeKey> {
    Ok(NodeKey::named(NodeLabel::Parameter, &param.name)
        .with("comment", param.comment.clone())
        .with("type", serde_json::to_string(&param.ty)?)
        .with("default", serde_json::to_string(&param.default)?))
}
