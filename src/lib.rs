//! Transchara - Japanese names for booru character tags
//!
//! Transchara reads a file of English/romaji tags, looks each one up in
//! external name sources and writes the tag with its Japanese name. Tags with
//! several plausible names are sent to an AI model in batches. Output files
//! double as a cache, so an interrupted run resumes where it stopped.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and overrides
//! - `record`, `cache`, `writer`: Input rows, resume cache and output sinks
//! - `script`, `scorer`: Japanese script classification and candidate scoring
//! - `lookup`, `resolver`: External name sources and tiered resolution
//! - `translator`, `batch`: AI providers and batched disambiguation
//! - `pipeline`: The record-by-record driver
//! - `rate_limit`, `logging`: Request pacing and tracing setup
//! - `works`: Work title extraction from translated tags

pub mod batch;
pub mod cache;
pub mod cli;
pub mod config;
pub mod logging;
pub mod lookup;
pub mod pipeline;
pub mod rate_limit;
pub mod record;
pub mod resolver;
pub mod scorer;
pub mod script;
pub mod translator;
pub mod works;
pub mod writer;
