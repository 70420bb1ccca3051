// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Every option can also come from an environment variable, which is how the
// service is usually configured when it runs in a container.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Enums: Types that can be one of several variants
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use std::path::PathBuf;

// This struct represents our entire CLI application
//
// `global = true` lets the shared options appear after the subcommand too:
//   link-reporter serve --data-file /var/lib/links.json
#[derive(Parser, Debug)]
#[command(
    name = "link-reporter",
    version,
    about = "Checks batches of links, remembers the results and renders PDF reports",
    long_about = "link-reporter probes hostnames over HTTP, stores each batch under an \
                  increasing request number, and builds PDF reports from earlier batches."
)]
pub struct Cli {
    /// JSON file holding every stored request
    #[arg(
        long,
        global = true,
        env = "LINK_REPORTER_DATA_FILE",
        default_value = "data.json"
    )]
    pub data_file: PathBuf,

    /// Seconds to wait for a host before calling it not available
    #[arg(
        long,
        global = true,
        env = "LINK_REPORTER_PROBE_TIMEOUT_SECS",
        default_value_t = 10
    )]
    pub probe_timeout_secs: u64,

    #[command(subcommand)]
    pub command: Commands,
}

// This enum defines our subcommands (serve, check, report)
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the HTTP service
    ///
    /// Example: link-reporter serve --addr 0.0.0.0:8080
    Serve {
        /// Address to listen on
        #[arg(long, env = "LINK_REPORTER_ADDR", default_value = "127.0.0.1:8080")]
        addr: SocketAddr,
    },

    /// Check a batch of hostnames once and store the result
    ///
    /// Example: link-reporter check example.com rust-lang.org
    Check {
        /// Hostnames to probe (probed as http://<hostname>)
        links: Vec<String>,

        /// Output results in JSON format instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Render a PDF report for earlier requests
    ///
    /// Example: link-reporter report 1 2 --out links.pdf
    Report {
        /// Request numbers to include
        #[arg(required = true)]
        ids: Vec<u64>,

        /// Where to write the PDF
        #[arg(long, default_value = "report.pdf")]
        out: PathBuf,
    },
}
