//! Stub ingestion pipeline
//!
//! Orchestrates a full run:
//! 1. Walk each configured folder for `*.doc.py` stub files
//! 2. Parse every stub (with one repair retry on syntax failure)
//! 3. Aggregate the results into a [`Corpus`]
//! 4. Lower the corpus into the graph store and persist it
//!
//! Parsing is read-only per file, so the per-folder parse step runs on
//! the rayon pool. Unreadable and unparseable files are counted, logged
//! and skipped; they never abort the run.

use std::path::{Path, PathBuf};

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::graph::{GraphBuilder, GraphStore};
use crate::models::{Corpus, ParsedFile};
use crate::parsers::{parse_stub_source, StubError};

/// Discovers and parses the stub files of a single folder.
pub struct DocParser<'a> {
    /// Path component that marks where the logical folder name starts,
    /// e.g. `CDPL` in `.../Doc/Doxygen/Python-API/Source/CDPL/Chem`.
    marker: &'a str,
    /// Filename suffix identifying stub files.
    suffix: &'a str,
}

/// Outcome of parsing one folder.
#[derive(Debug, Default)]
pub struct FolderStats {
    pub files: usize,
    pub unparseable: usize,
}

impl<'a> DocParser<'a> {
    pub fn new(marker: &'a str, suffix: &'a str) -> Self {
        Self { marker, suffix }
    }

    /// Logical name of a folder: the path component right after the
    /// marker component, falling back to the last component when the
    /// marker is absent or terminal.
    pub fn folder_name(&self, dir: &Path) -> String {
        let components: Vec<&str> = dir
            .components()
            .filter_map(|c| c.as_os_str().to_str())
            .collect();
        if let Some(pos) = components.iter().position(|c| *c == self.marker) {
            if let Some(name) = components.get(pos + 1) {
                return (*name).to_string();
            }
        }
        components
            .last()
            .map(|c| (*c).to_string())
            .unwrap_or_else(|| dir.display().to_string())
    }

    /// Stub files directly inside `dir`, sorted by name. Subdirectories
    /// are not descended into; each folder is ingested explicitly.
    pub fn discover(&self, dir: &Path) -> Vec<PathBuf> {
        let mut files: Vec<PathBuf> = ignore::WalkBuilder::new(dir)
            .max_depth(Some(1))
            .standard_filters(false)
            .build()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_type().is_some_and(|ft| ft.is_file()))
            .map(|entry| entry.into_path())
            .filter(|path| {
                path.file_name()
                    .and_then(|n| n.to_str())
                    .is_some_and(|n| n.ends_with(self.suffix))
            })
            .collect();
        files.sort();
        files
    }

    /// Parse every stub in `dir` into `corpus`. The folder node exists
    /// even when the folder holds no parseable stub.
    pub fn parse_folder(&self, corpus: &mut Corpus, dir: &Path) -> FolderStats {
        let folder = self.folder_name(dir);
        corpus.ensure_folder(&folder);

        let files = self.discover(dir);
        let parsed: Vec<(String, Option<ParsedFile>)> = files
            .par_iter()
            .map(|path| {
                let name = path
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or_default()
                    .to_string();
                (name, parse_stub_file(path))
            })
            .collect();

        let mut stats = FolderStats {
            files: parsed.len(),
            ..FolderStats::default()
        };
        for (file, outcome) in parsed {
            match outcome {
                Some(result) => corpus.insert_file(&folder, &file, result),
                None => stats.unparseable += 1,
            }
        }

        debug!(
            folder = folder.as_str(),
            files = stats.files,
            unparseable = stats.unparseable,
            "folder parsed"
        );
        stats
    }
}

/// Read and parse one stub file. `None` means the file was counted as
/// unparseable, whether it failed to read or failed the grammar.
fn parse_stub_file(path: &Path) -> Option<ParsedFile> {
    let source = match std::fs::read_to_string(path) {
        Ok(source) => source,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "failed to read stub file");
            return None;
        }
    };
    match parse_stub_source(&source) {
        Ok(parsed) => Some(parsed),
        Err(StubError::Syntax) => {
            warn!(path = %path.display(), "stub rejected by the declaration grammar");
            None
        }
        Err(StubError::Parser(msg)) => {
            warn!(path = %path.display(), error = msg.as_str(), "parser failure");
            None
        }
    }
}

/// Full ingestion pipeline: folders in, persisted graph out.
pub struct Pipeline {
    store: GraphStore,
    project: String,
    marker: String,
    suffix: String,
}

impl Pipeline {
    pub fn new(store: GraphStore, project: impl Into<String>) -> Self {
        Self {
            store,
            project: project.into(),
            marker: crate::config::DEFAULT_FOLDER_MARKER.to_string(),
            suffix: crate::config::DEFAULT_STUB_SUFFIX.to_string(),
        }
    }

    pub fn with_marker(mut self, marker: impl Into<String>) -> Self {
        self.marker = marker.into();
        self
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    /// Parse one folder into the corpus.
    pub fn ingest_folder(&self, corpus: &mut Corpus, dir: &Path) -> FolderStats {
        DocParser::new(&self.marker, &self.suffix).parse_folder(corpus, dir)
    }

    /// Lower the corpus into the store and persist it.
    pub fn build_graph(&self, corpus: &Corpus) -> Result<()> {
        GraphBuilder::new(&self.store, &self.project, corpus).build()?;
        self.store.save()
    }

    /// Parse all folders and build the graph in one pass.
    pub fn ingest(&self, folders: &[PathBuf]) -> Result<IngestStats> {
        let mut corpus = Corpus::default();
        let mut stats = IngestStats::default();

        for dir in folders {
            let folder_stats = self.ingest_folder(&mut corpus, dir);
            stats.folders += 1;
            stats.files += folder_stats.files;
            stats.unparseable += folder_stats.unparseable;
        }
        stats.classes = corpus.class_count();
        stats.functions = corpus.function_count();

        self.build_graph(&corpus)?;
        stats.nodes = self.store.node_count();
        stats.edges = self.store.edge_count();

        info!(summary = stats.summary().as_str(), "ingest complete");
        Ok(stats)
    }

    pub fn store(&self) -> &GraphStore {
        &self.store
    }
}

/// Statistics from one ingestion run.
#[derive(Debug, Default)]
pub struct IngestStats {
    pub folders: usize,
    pub files: usize,
    pub unparseable: usize,
    pub classes: usize,
    pub functions: usize,
    pub nodes: usize,
    pub edges: usize,
}

impl IngestStats {
    pub fn summary(&self) -> String {
        let mut parts = vec![
            format!("{} folders", self.folders),
            format!("{} files", self.files),
            format!("{} classes", self.classes),
            format!("{} functions", self.functions),
            format!("{} nodes", self.nodes),
            format!("{} edges", self.edges),
        ];
        if self.unparseable > 0 {
            parts.push(format!("{} unparseable", self.unparseable));
        }
        parts.join(", ")
    }
}
