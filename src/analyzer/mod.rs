// src/analyzer/mod.rs
// =============================================================================
// This module contains all page analysis logic.
//
// Submodules:
// - document: Walks the parsed HTML and collects structural features
// - links: Splits links into internal and external
// - probe: Checks links for reachability with a bounded worker pool
// - service: Runs the whole analysis for one URL
// - error: The errors that can stop an analysis
// =============================================================================

mod document;
mod error;
mod links;
mod probe;
mod service;

// Re-export the public API so callers can write `analyzer::PageAnalyzer`
pub use error::AnalysisError;
pub use service::{AnalysisResult, AnalyzerConfig, PageAnalyzer};
