//! Clean command - remove the graph database directory

use std::path::Path;

use anyhow::{Context, Result};

use crate::config;

pub fn run(root: &Path, dry_run: bool) -> Result<()> {
    let root = root
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", root.display()))?;
    let db_dir = config::load_config(&root).db_dir(&root);

    if !db_dir.exists() {
        println!("No graph database found at {}.", db_dir.display());
        return Ok(());
    }

    if dry_run {
        println!("Would remove: {}", db_dir.display());
        println!("\nDry run - nothing removed. Run without --dry-run to delete.");
        return Ok(());
    }

    std::fs::remove_dir_all(&db_dir)
        .with_context(|| format!("Failed to remove {}", db_dir.display()))?;
    println!("Removed: {}", db_dir.display());

    Ok(())
}
