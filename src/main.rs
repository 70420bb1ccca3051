// src/main.rs
// =============================================================================
// This is the entry point of link-reporter.
//
// What happens here:
// 1. Set up logging (RUST_LOG controls the level, default "info")
// 2. Parse command-line arguments using clap
// 3. Load the request store - if the file is corrupt we stop right here,
//    before serving anything
// 4. Dispatch to the chosen subcommand
// 5. Exit with proper code (0 = success, 1 = unavailable links, 2 = error)
// =============================================================================

mod checker;       // src/checker/ - probing hostnames
mod cli;           // src/cli.rs - command-line parsing
mod report;        // src/report/ - report aggregation and PDF rendering
mod server;        // src/server/ - HTTP routes
mod service;       // src/service.rs - the two operations we offer
mod store;         // src/store/ - durable request storage

use anyhow::{Context, Result};
use checker::{Availability, HttpProber};
use clap::Parser;
use cli::{Cli, Commands};
use report::PdfRenderer;
use service::{CheckOutcome, LinkService};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use store::RequestStore;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    init_tracing();

    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Logs go to stderr so `check --json` output stays clean on stdout
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run() -> Result<i32> {
    let cli = Cli::parse();

    let store = RequestStore::load(&cli.data_file)
        .context("refusing to start on top of unreadable storage")?;
    let prober = HttpProber::new(Duration::from_secs(cli.probe_timeout_secs))
        .context("failed to build HTTP client")?;
    let service = Arc::new(LinkService::new(Arc::new(store), prober, PdfRenderer));

    match cli.command {
        Commands::Serve { addr } => {
            server::serve(addr, service).await?;
            Ok(0)
        }
        Commands::Check { links, json } => handle_check(&service, links, json).await,
        Commands::Report { ids, out } => handle_report(&service, &ids, &out),
    }
}

// Handles the 'check' subcommand
async fn handle_check(
    service: &LinkService<HttpProber>,
    links: Vec<String>,
    json: bool,
) -> Result<i32> {
    if !json {
        println!("🔍 Checking {} link(s)...\n", links.len());
    }

    let outcome = service.check_links(links).await?;
    print_outcome(&outcome, json)?;

    let unavailable = outcome
        .statuses
        .values()
        .filter(|s| **s == Availability::Unavailable)
        .count();

    if unavailable > 0 {
        Ok(1) // Exit code 1 = some links are not available
    } else {
        Ok(0)
    }
}

// Handles the 'report' subcommand
fn handle_report(service: &LinkService<HttpProber>, ids: &[u64], out: &Path) -> Result<i32> {
    let pdf = service.render_report(ids)?;
    std::fs::write(out, &pdf).with_context(|| format!("failed to write {}", out.display()))?;

    println!("📄 Report written to {} ({} bytes)", out.display(), pdf.len());
    Ok(0)
}

// Prints the outcome either as a table or JSON
fn print_outcome(outcome: &CheckOutcome, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(outcome)?;
        println!("{}", json_output);
    } else {
        print_table(outcome);
    }
    Ok(())
}

// Prints the outcome as a human-readable table in the terminal
fn print_table(outcome: &CheckOutcome) {
    println!("Request #{}", outcome.id);
    println!("{:<60} {:<15}", "URL", "STATUS");
    println!("{}", "=".repeat(75));

    for (url, status) in &outcome.statuses {
        // Truncate URL if too long for display
        let url_display = if url.chars().count() > 57 {
            format!("{}...", url.chars().take(57).collect::<String>())
        } else {
            url.clone()
        };

        println!("{:<60} {:<15}", url_display, format_status(*status));
    }

    println!();

    let ok_count = outcome
        .statuses
        .values()
        .filter(|s| **s == Availability::Available)
        .count();

    println!("📊 Summary:");
    println!("   ✅ Available: {}", ok_count);
    println!("   ❌ Not available: {}", outcome.statuses.len() - ok_count);
    println!("   📋 Total: {}", outcome.statuses.len());
}

fn format_status(status: Availability) -> &'static str {
    match status {
        Availability::Available => "✅ AVAILABLE",
        Availability::Unavailable => "❌ NOT AVAILABLE",
    }
}
