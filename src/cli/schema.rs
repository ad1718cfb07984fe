//! Schema command - print the graph schema

use anyhow::Result;

use crate::graph::schema_description;

pub fn run() -> Result<()> {
    println!("{}", schema_description());
    Ok(())
}
