// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Set up logging
// 3. Run one page analysis (Ctrl-C cancels it)
// 4. Print the result as a report or as JSON
// 5. Exit with proper code (0 = all links fine, 1 = inaccessible links, 2 = error)
// =============================================================================

// Module declarations - tells Rust about our other source files
mod analyzer; // src/analyzer/ - page analysis logic
mod cli; // src/cli.rs - command-line parsing
mod logging; // src/logging.rs - tracing subscriber setup

use analyzer::{AnalysisError, AnalysisResult, AnalyzerConfig, PageAnalyzer};
use clap::Parser;
use cli::Cli;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{error, warn};

use anyhow::Result;

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = analysis done, every link reachable
//   Ok(1) = analysis done, some links inaccessible
//   Err   = analysis failed
async fn run() -> Result<i32> {
    let cli = Cli::parse();
    logging::init()?;

    let analyzer = PageAnalyzer::with_config(AnalyzerConfig {
        timeout: Duration::from_secs(cli.timeout_secs),
        ..AnalyzerConfig::default()
    })?;

    // Ctrl-C cancels the token; the analysis notices and winds down
    let cancel = CancellationToken::new();
    let ctrl_c_cancel = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupted, cancelling analysis");
            ctrl_c_cancel.cancel();
        }
    });

    if !cli.json {
        println!("🔍 Analyzing: {}", cli.url);
    }

    let result = match analyzer.analyze(&cancel, &cli.url).await {
        Ok(result) => result,
        Err(AnalysisError::Cancelled) => {
            return Err(anyhow::anyhow!("analysis cancelled"));
        }
        Err(e) => {
            error!(url = %cli.url, error = %e, "analysis failed");
            return Err(anyhow::anyhow!("analysis failed: {}", e));
        }
    };

    print_result(&result, cli.json)?;

    if result.inaccessible_links_count() > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

// Prints the result either as a report or JSON
fn print_result(result: &AnalysisResult, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(result)?;
        println!("{}", json_output);
    } else {
        print_report(result);
    }
    Ok(())
}

// Prints the result as a human-readable report
fn print_report(result: &AnalysisResult) {
    let features = &result.features;

    println!();
    println!(
        "{:<22} {}",
        "HTML version:",
        features.html_version.map(|v| v.to_string()).unwrap_or_else(|| "unknown".to_string())
    );
    println!("{:<22} {}", "Title:", features.title.as_deref().unwrap_or("(none)"));
    println!(
        "{:<22} {}",
        "Login form:",
        if features.has_login_form { "yes" } else { "no" }
    );

    println!("{:<22}", "Headings:");
    if features.headings.is_empty() {
        println!("   (none)");
    }
    for (level, count) in &features.headings {
        println!("   {:<4} {}", level, count);
    }

    println!();
    println!("📊 Links:");
    println!(
        "   🏠 Internal: {} ({} inaccessible)",
        result.internal_links_count, result.inaccessible_internal_links_count
    );
    println!(
        "   🌐 External: {} ({} inaccessible)",
        result.external_links_count, result.inaccessible_external_links_count
    );

    print_link_list("Internal links", &result.internal_links);
    print_link_list("External links", &result.external_links);
}

fn print_link_list(heading: &str, links: &[String]) {
    if links.is_empty() {
        return;
    }

    println!();
    println!("{}:", heading);
    println!("{}", "=".repeat(60));
    for link in links {
        // Truncate long URLs for display
        let display = if link.chars().count() > 57 {
            format!("{}...", link.chars().take(57).collect::<String>())
        } else {
            link.clone()
        };
        println!("   {}", display);
    }
}
