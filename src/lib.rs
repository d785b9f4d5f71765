//! docs-collector library
//!
//! This crate provides the core functionality for the `docs-collector` binary.
//! Keep the crate root minimal; implementation and tests live in their modules.
//!
//! ## Overview
//!
//! The library turns a directory of ZIP archives, each holding many small XML documents,
//! into two correlated CSV outputs: one `id,level` row per document and one `id,name`
//! row per document object.
//!
//! - [`lister`] - Lists the archives directly inside a directory
//! - [`parser`] - Parses (and renders) one XML document
//! - [`extractor`] - Opens one archive and parses its document entries
//! - [`distributor`] - Runs extraction sequentially or across a worker pool
//! - [`writer`] - Streams documents into the two CSV outputs
//! - [`collector`] - Wires the pipeline together and reports a run summary
//! - [`generator`] - Produces archives of random documents
//! - [`cli`] - Command-line interface
//! - [`models`] - Document records and pipeline options
//! - [`errors`] - Error types used throughout the application
//!
//! ## Example Usage
//!
//! ```no_run
//! use docs_collector::{collector, config::ResolvedConfig, errors::AppResult};
//! use std::fs::File;
//! use std::path::Path;
//!
//! # fn example() -> AppResult<()> {
//! let summary = collector::collect(
//!     Path::new("documents"),
//!     File::create("docs.csv")?,
//!     File::create("objs.csv")?,
//!     &ResolvedConfig::default(),
//! )?;
//! collector::log_summary(&summary);
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod collector;
pub mod config;
pub mod constants;
pub mod distributor;
pub mod errors;
pub mod extractor;
pub mod generator;
pub mod lister;
pub mod models;
pub mod parser;
pub mod ui;
pub mod utils;
pub mod writer;
