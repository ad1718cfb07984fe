//! Stats command - node and edge counts of the stored graph

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::config;
use crate::graph::GraphStore;

pub fn run(root: &Path) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", root.display()))?;
    let cfg = config::load_config(&root);
    let db_dir = cfg.db_dir(&root);

    if !db_dir.exists() {
        println!("No graph database found. Run 'stubgraph build' first.");
        return Ok(());
    }

    let store = GraphStore::open(&db_dir)
        .with_context(|| format!("Failed to open graph database at {}", db_dir.display()))?;
    let stats = store.stats();

    println!("\n{} Graph statistics\n", style("◆").bold());
    let mut keys: Vec<&String> = stats.keys().collect();
    keys.sort();
    for key in keys {
        println!("  {:<16} {}", key, style(stats[key]).cyan());
    }
    println!("\n  Database: {}", style(db_dir.display()).dim());

    Ok(())
}
