//! Init command - write a stubgraph.toml with example settings

use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use crate::config::CONFIG_FILE_NAME;

pub fn run(path: &Path) -> Result<()> {
    let root = path
        .canonicalize()
        .with_context(|| format!("Path does not exist: {}", path.display()))?;
    if !root.is_dir() {
        anyhow::bail!("Path is not a directory: {}", root.display());
    }

    let config_path = root.join(CONFIG_FILE_NAME);
    if config_path.exists() {
        println!(
            "{} Already initialized at {}",
            style("✓").green(),
            style(config_path.display()).cyan()
        );
        return Ok(());
    }

    let default_config = r#"# Stubgraph configuration

# Name of the project node the graph hangs off
project = "CDPKit"

# Path component after which the logical folder name starts.
# For a folder like Doc/Doxygen/Python-API/Source/CDPL/Chem the
# logical name is "Chem".
folder_marker = "CDPL"

# Filename suffix identifying documentation stubs
stub_suffix = ".doc.py"

# Directory holding the persistent graph database
db_path = ".stubgraph"

# Folders to ingest when 'stubgraph build' is run without arguments
folders = [
    # "Doc/Doxygen/Python-API/Source/CDPL/Chem",
    # "Doc/Doxygen/Python-API/Source/CDPL/Math",
]
"#;
    std::fs::write(&config_path, default_config)
        .with_context(|| format!("Failed to create {}", config_path.display()))?;
    println!(
        "{} Created {}",
        style("✓").green(),
        style(config_path.display()).cyan()
    );

    // Keep the database out of version control
    let gitignore_path = root.join(".gitignore");
    if gitignore_path.exists() {
        let content = std::fs::read_to_string(&gitignore_path).unwrap_or_default();
        if !content.contains(".stubgraph") {
            let mut file = std::fs::OpenOptions::new()
                .append(true)
                .open(&gitignore_path)?;
            use std::io::Write;
            file.write_all(b"\n# Stubgraph\n.stubgraph/\n")?;
            println!(
                "{} Added .stubgraph/ to {}",
                style("✓").green(),
                style(".gitignore").cyan()
            );
        }
    }

    println!("\nNext steps:");
    println!(
        "  {} List stub folders in {}",
        style("edit").cyan(),
        CONFIG_FILE_NAME
    );
    println!("  {} Build the graph", style("stubgraph build").cyan());
    println!("  {} Inspect it", style("stubgraph stats").cyan());

    Ok(())
}
