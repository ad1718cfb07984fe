//! Build command - parse stub folders and lower them into the graph

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::config;
use crate::graph::GraphStore;
use crate::models::Corpus;
use crate::pipeline::{IngestStats, Pipeline};

pub fn run(
    root: &Path,
    folders: &[PathBuf],
    project: Option<String>,
    marker: Option<String>,
    db: Option<PathBuf>,
) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", root.display()))?;
    let cfg = config::load_config(&root);

    let folders: Vec<PathBuf> = if folders.is_empty() {
        cfg.resolved_folders(&root)
    } else {
        folders.to_vec()
    };
    if folders.is_empty() {
        anyhow::bail!(
            "No folders to ingest. Pass folder paths or list them in {}.",
            config::CONFIG_FILE_NAME
        );
    }
    for folder in &folders {
        if !folder.is_dir() {
            anyhow::bail!("Not a directory: {}", folder.display());
        }
    }

    let db_dir = db.unwrap_or_else(|| cfg.db_dir(&root));
    let project = project.unwrap_or(cfg.project);
    let marker = marker.unwrap_or(cfg.folder_marker);

    println!(
        "\n{} Building graph for {}\n",
        style("◆").bold(),
        style(&project).cyan()
    );

    let store = GraphStore::open(&db_dir)
        .with_context(|| format!("Failed to open graph database at {}", db_dir.display()))?;
    let pipeline = Pipeline::new(store, &project)
        .with_marker(marker)
        .with_suffix(cfg.stub_suffix);

    let bar = ProgressBar::new(folders.len() as u64).with_style(create_bar_style());
    let mut corpus = Corpus::default();
    let mut stats = IngestStats::default();
    for folder in &folders {
        bar.set_message(folder.display().to_string());
        let folder_stats = pipeline.ingest_folder(&mut corpus, folder);
        stats.folders += 1;
        stats.files += folder_stats.files;
        stats.unparseable += folder_stats.unparseable;
        bar.inc(1);
    }
    bar.finish_and_clear();

    stats.classes = corpus.class_count();
    stats.functions = corpus.function_count();

    pipeline.build_graph(&corpus)?;
    stats.nodes = pipeline.store().node_count();
    stats.edges = pipeline.store().edge_count();

    if stats.unparseable > 0 {
        println!(
            "{} {} file(s) could not be parsed and were skipped",
            style("⚠").yellow(),
            style(stats.unparseable).yellow()
        );
    }
    println!(
        "{} Graph built: {}",
        style("✓").green(),
        style(stats.summary()).dim()
    );
    println!("  Database: {}", style(db_dir.display()).cyan());

    Ok(())
}

fn create_bar_style() -> ProgressStyle {
    ProgressStyle::default_bar()
        .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
        .expect("valid template")
        .progress_chars("█▓▒░  ")
}
