//! TLD Report CLI
//!
//! Reads a report written by `tld-enum` and prints the registered domains
//! that carry usable evidence as a fixed-width table.

mod logging;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use std::path::PathBuf;
use tld_enum_lib::{
    filter_valid, load_report, render, Report, ReportLoadKind, ReportRow, TldEnumError,
};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for tld-report
#[derive(Parser, Debug)]
#[command(name = "tld-report")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Parse YAML file and display registered domains")]
#[command(styles = STYLES)]
struct Args {
    /// Path to the YAML file containing domain data
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Print the displayed rows as JSON instead of a table
    #[arg(short = 'j', long = "json")]
    json: bool,

    /// Report entries that are skipped
    #[arg(short = 'v', long = "verbose")]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    logging::init_logging(args.verbose, std::io::stderr);

    // Load failures are reported, not propagated: the exit status stays 0.
    let report: Report = match load_report(&args.file) {
        Ok(report) => report,
        Err(e @ TldEnumError::ReportLoad { kind: ReportLoadKind::Malformed, .. }) => {
            eprintln!("{}", e);
            return;
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return;
        }
    };

    let rows = filter_valid(&report);
    if args.json {
        print_json(&rows);
    } else {
        print!("{}", render(&rows));
    }
}

fn print_json(rows: &[ReportRow]) {
    match serde_json::to_string_pretty(rows) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error: failed to serialize rows: {}", e),
    }
}
