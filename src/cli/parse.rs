//! Parse command - dump one folder's extracted declarations as JSON

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::config;
use crate::models::Corpus;
use crate::pipeline::DocParser;

pub fn run(root: &Path, folder: &Path, output: Option<&Path>) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", root.display()))?;
    let cfg = config::load_config(&root);

    let folder = if folder.is_absolute() {
        folder.to_path_buf()
    } else {
        root.join(folder)
    };
    if !folder.is_dir() {
        anyhow::bail!("Not a directory: {}", folder.display());
    }

    let parser = DocParser::new(&cfg.folder_marker, &cfg.stub_suffix);
    let mut corpus = Corpus::default();
    let stats = parser.parse_folder(&mut corpus, &folder);

    let json = serde_json::to_string_pretty(&corpus)?;
    match output {
        Some(path) => {
            std::fs::write(path, &json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!(
                "{} Wrote {} file(s) to {}",
                style("✓").green(),
                stats.files - stats.unparseable,
                style(path.display()).cyan()
            );
        }
        None => println!("{}", json),
    }

    if stats.unparseable > 0 {
        eprintln!(
            "{} {} file(s) could not be parsed and were skipped",
            style("⚠").yellow(),
            stats.unparseable
        );
    }

    Ok(())
}
