//! CLI command definitions and handlers

mod build;
mod clean;
mod init;
mod parse;
mod schema;
mod stats;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

/// Stubgraph - documentation-stub knowledge graph builder
#[derive(Parser, Debug)]
#[command(name = "stubgraph")]
#[command(
    version,
    about = "Build a knowledge graph from generated Python documentation stubs",
    long_about = "Stubgraph parses generated *.doc.py documentation stubs (doxygen-tagged \
class, function and attribute declarations) and builds a deduplicated property graph \
of the API they describe: projects, folders, files, classes, functions, parameters \
and decorators, connected by containment, inheritance and typing relationships.\n\n\
Re-running a build against the same stubs is a no-op.",
    after_help = "\
Examples:
  stubgraph init                           Write a stubgraph.toml with example settings
  stubgraph build api/CDPL/Chem            Ingest one folder into the graph
  stubgraph build                          Ingest the folders listed in stubgraph.toml
  stubgraph parse api/CDPL/Chem            Dump one folder's parse tree as JSON
  stubgraph stats                          Show node and edge counts
  stubgraph schema                         Print the graph schema
  stubgraph clean                          Remove the graph database"
)]
pub struct Cli {
    /// Path to the project root (default: current directory)
    #[arg(global = true, long, default_value = ".")]
    pub path: PathBuf,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, default_value = "info", value_parser = ["error", "warn", "info", "debug", "trace"])]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize a stubgraph.toml config file with example settings
    Init,

    /// Parse stub folders and build (or extend) the graph
    #[command(after_help = "\
Examples:
  stubgraph build api/CDPL/Chem                      Ingest one folder
  stubgraph build api/CDPL/Chem api/CDPL/Math        Ingest several folders
  stubgraph build --project MyLib --marker MyLib     Override project and marker
  stubgraph build --db /tmp/graph api/CDPL/Chem      Use an explicit database directory")]
    Build {
        /// Folders holding *.doc.py stubs (default: folders from stubgraph.toml)
        folders: Vec<PathBuf>,

        /// Project node name (default: from config)
        #[arg(long)]
        project: Option<String>,

        /// Path component marking the start of logical folder names
        #[arg(long)]
        marker: Option<String>,

        /// Graph database directory (default: <path>/.stubgraph)
        #[arg(long)]
        db: Option<PathBuf>,
    },

    /// Parse one folder and print the extracted declarations as JSON
    #[command(after_help = "\
Examples:
  stubgraph parse api/CDPL/Chem                      Pretty JSON to stdout
  stubgraph parse api/CDPL/Chem -o chem.json         Write to a file")]
    Parse {
        /// Folder holding *.doc.py stubs
        folder: PathBuf,

        /// Output format: json (pretty-printed)
        #[arg(long, short = 'f', default_value = "json", value_parser = ["json"])]
        format: String,

        /// Output file path (default: stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Show graph statistics (node counts per label, edge count)
    Stats,

    /// Print the graph schema (node labels, properties, relationships)
    Schema,

    /// Remove the graph database directory
    Clean {
        /// Preview what would be removed without deleting
        #[arg(long)]
        dry_run: bool,
    },
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Init => init::run(&cli.path),

        Commands::Build {
            folders,
            project,
            marker,
            db,
        } => build::run(&cli.path, &folders, project, marker, db),

        Commands::Parse {
            folder,
            format: _,
            output,
        } => parse::run(&cli.path, &folder, output.as_deref()),

        Commands::Stats => stats::run(&cli.path),

        Commands::Schema => schema::run(),

        Commands::Clean { dry_run } => clean::run(&cli.path, dry_run),
    }
}
