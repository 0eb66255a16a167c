//! # deckmatch-cli
//!
//! Command-line interface for the deckmatch pipeline: analyze a
//! template, extract a merged design specification, validate content
//! records, and generate presentations.

pub mod app;

pub use app::run_cli;
