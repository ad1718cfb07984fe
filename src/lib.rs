//! Stubgraph - documentation-stub knowledge graph builder
//!
//! Parses generated `*.doc.py` documentation stubs and builds a
//! deduplicated property graph of the API they describe. The library
//! surface mirrors the CLI: [`pipeline::Pipeline`] runs the full
//! ingest, [`parsers::parse_stub_source`] parses a single stub, and
//! [`graph::GraphStore`] holds the result.

pub mod cli;
pub mod config;
pub mod graph;
pub mod models;
pub mod parsers;
pub mod pipeline;
