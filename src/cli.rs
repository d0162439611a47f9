// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Usage:
//   page-analyzer https://example.com
//   page-analyzer https://example.com --json --timeout-secs 5
// =============================================================================

use clap::Parser;

// This struct represents our entire CLI application
//
// #[derive(Parser)] tells clap to automatically generate parsing code
#[derive(Parser, Debug)]
#[command(
    name = "page-analyzer",
    version,
    about = "Analyze the structure of a web page and check its links",
    long_about = "page-analyzer fetches a web page, reports its HTML version, title, headings \
                  and whether it has a login form, then checks every internal and external \
                  link on it for reachability."
)]
pub struct Cli {
    /// URL of the page to analyze (e.g., https://example.com)
    pub url: String,

    /// Output results in JSON format instead of a report
    #[arg(long)]
    pub json: bool,

    /// Timeout in seconds for the page fetch and for each link check
    #[arg(long, default_value_t = 10, value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout_secs: u64,
}
