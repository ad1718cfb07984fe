//! Project configuration
//!
//! Loads per-project settings from a `stubgraph.toml` in the working
//! directory. Every field has a default, so a missing or partial file
//! still yields a usable configuration.
//!
//! # Configuration Format
//!
//! ```toml
//! # stubgraph.toml
//!
//! project = "CDPKit"
//! folder_marker = "CDPL"
//! stub_suffix = ".doc.py"
//! db_path = ".stubgraph"
//!
//! folders = [
//!     "Doc/Doxygen/Python-API/Source/CDPL/Chem",
//!     "Doc/Doxygen/Python-API/Source/CDPL/Math",
//! ]
//! ```

use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

pub const DEFAULT_PROJECT_NAME: &str = "CDPKit";
pub const DEFAULT_FOLDER_MARKER: &str = "CDPL";
pub const DEFAULT_STUB_SUFFIX: &str = ".doc.py";
pub const DEFAULT_DB_PATH: &str = ".stubgraph";

pub const CONFIG_FILE_NAME: &str = "stubgraph.toml";

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StubgraphConfig {
    /// Name of the project node the whole graph hangs off.
    pub project: String,
    /// Path component after which the logical folder name starts.
    pub folder_marker: String,
    /// Filename suffix identifying documentation stubs.
    pub stub_suffix: String,
    /// Directory holding the persistent graph database.
    pub db_path: PathBuf,
    /// Folders to ingest when none are given on the command line.
    pub folders: Vec<PathBuf>,
}

impl Default for StubgraphConfig {
    fn default() -> Self {
        Self {
            project: DEFAULT_PROJECT_NAME.to_string(),
            folder_marker: DEFAULT_FOLDER_MARKER.to_string(),
            stub_suffix: DEFAULT_STUB_SUFFIX.to_string(),
            db_path: PathBuf::from(DEFAULT_DB_PATH),
            folders: Vec::new(),
        }
    }
}

impl StubgraphConfig {
    /// Absolute database directory for a project rooted at `root`.
    pub fn db_dir(&self, root: &Path) -> PathBuf {
        if self.db_path.is_absolute() {
            self.db_path.clone()
        } else {
            root.join(&self.db_path)
        }
    }

    /// Configured folders resolved against `root`.
    pub fn resolved_folders(&self, root: &Path) -> Vec<PathBuf> {
        self.folders
            .iter()
            .map(|f| if f.is_absolute() { f.clone() } else { root.join(f) })
            .collect()
    }
}

/// Load configuration from `<root>/stubgraph.toml`.
///
/// A missing file yields the defaults; an unreadable or invalid file is
/// logged and also yields the defaults.
pub fn load_config(root: &Path) -> StubgraphConfig {
    let path = root.join(CONFIG_FILE_NAME);
    if !path.exists() {
        debug!("No {} found, using defaults", CONFIG_FILE_NAME);
        return StubgraphConfig::default();
    }

    match load_toml_config(&path) {
        Ok(config) => {
            debug!("Loaded config from {}", path.display());
            config
        }
        Err(e) => {
            warn!("Failed to load {}: {}", path.display(), e);
            StubgraphConfig::default()
        }
    }
}

fn load_toml_config(path: &Path) -> anyhow::Result<StubgraphConfig> {
    let content = std::fs::read_to_string(path)?;
    Ok(toml::from_str(&content)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.project, "CDPKit");
        assert_eq!(config.folder_marker, "CDPL");
        assert_eq!(config.stub_suffix, ".doc.py");
        assert!(config.folders.is_empty());
    }

    #[test]
    fn partial_file_keeps_unset_defaults() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "project = \"MyLib\"\nfolders = [\"src/CDPL/Chem\"]\n",
        )
        .unwrap();

        let config = load_config(dir.path());
        assert_eq!(config.project, "MyLib");
        assert_eq!(config.folder_marker, "CDPL");
        assert_eq!(config.folders.len(), 1);
    }

    #[test]
    fn invalid_file_falls_back_to_defaults() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "project = [not toml").unwrap();
        let config = load_config(dir.path());
        assert_eq!(config.project, "CDPKit");
    }

    #[test]
    fn relative_paths_resolve_against_the_root() {
        let config = StubgraphConfig {
            folders: vec![PathBuf::from("api/CDPL/Chem")],
            ..StubgraphConfig::default()
        };
        let root = Path::new("/work/proj");
        assert_eq!(config.db_dir(root), Path::new("/work/proj/.stubgraph"));
        assert_eq!(
            config.resolved_folders(root),
            vec![PathBuf::from("/work/proj/api/CDPL/Chem")]
        );
    }
}
