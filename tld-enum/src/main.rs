//! TLD Enumeration CLI
//!
//! Takes a company base name, tries it against every top-level domain from
//! the public TLD list and writes which combinations are registered to a
//! YAML report.

mod logging;
mod ui;

use clap::builder::styling::{AnsiColor, Effects, Styles};
use clap::Parser;
use console::style;
use std::process;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tld_enum_lib::{
    enumerate, fetch_tlds_from, is_whois_available, load_env_config, normalize_base_name,
    parse_timeout_string, resolve_config, save_report, ConfigManager, EnumConfig, FileConfig,
    RegistrationChecker, TldEnumError,
};
use tracing::{info, warn};

const STYLES: Styles = Styles::styled()
    .header(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Yellow.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

/// CLI arguments for tld-enum
#[derive(Parser, Debug)]
#[command(name = "tld-enum")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Enumerate TLDs for a given company name and check domain registration")]
#[command(
    long_about = "Enumerate TLDs for a given company name and check domain registration.\n\nEach candidate is checked with WHOIS first, falling back to DNS TXT records.\nResults are written to a YAML report that tld-report can display."
)]
#[command(styles = STYLES)]
pub struct Args {
    /// The base company name (e.g., example)
    #[arg(value_name = "COMPANY_NAME")]
    pub company_name: String,

    /// Number of concurrent checks (default: 10)
    #[arg(long = "threads", value_name = "N")]
    pub threads: Option<usize>,

    /// Report file to write (default: output.yaml)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<String>,

    /// Fetch the TLD list from this URL instead of IANA
    #[arg(long = "tld-url", value_name = "URL")]
    pub tld_url: Option<String>,

    /// Upper bound on each WHOIS query, e.g. 10s or 1m (default: 10s)
    #[arg(long = "whois-timeout", value_name = "DURATION")]
    pub whois_timeout: Option<String>,

    /// Use this configuration file instead of discovering one
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<String>,

    /// Show per-domain diagnostics
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,
}

#[tokio::main]
async fn main() {
    let args = Args::parse();

    if let Err(e) = validate_args(&args) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }

    logging::init_logging(args.verbose, ui::ProgressWriterFactory);

    if let Err(e) = run(args).await {
        eprintln!("{} {}", style("Error:").red().bold(), e);
        process::exit(1);
    }
}

/// Validate command line arguments
fn validate_args(args: &Args) -> Result<(), String> {
    if let Some(threads) = args.threads {
        if threads == 0 || threads > 100 {
            return Err("Threads must be between 1 and 100".to_string());
        }
    }

    if let Some(timeout) = &args.whois_timeout {
        if parse_timeout_string(timeout).is_none() {
            return Err(format!(
                "Invalid WHOIS timeout '{}'. Use a format like '10s' or '1m'",
                timeout
            ));
        }
    }

    if matches!(&args.output, Some(path) if path.trim().is_empty()) {
        return Err("Output path cannot be empty".to_string());
    }

    Ok(())
}

/// Build the run configuration: defaults < config file < environment < flags.
fn build_config(args: &Args) -> Result<EnumConfig, TldEnumError> {
    let manager = ConfigManager::new();
    let file_config: FileConfig = match &args.config {
        Some(path) => manager.load_file(path)?,
        None => manager.discover_and_load()?,
    };

    let config = resolve_config(&file_config, &load_env_config());
    Ok(apply_args(config, args))
}

fn apply_args(mut config: EnumConfig, args: &Args) -> EnumConfig {
    if let Some(threads) = args.threads {
        config = config.with_concurrency(threads);
    }
    if let Some(output) = &args.output {
        config = config.with_output(output.clone());
    }
    if let Some(url) = &args.tld_url {
        config = config.with_tld_url(url.clone());
    }
    if let Some(secs) = args.whois_timeout.as_deref().and_then(parse_timeout_string) {
        config = config.with_whois_timeout(Duration::from_secs(secs));
    }
    config
}

/// Fetch TLDs, check every candidate and save the report.
async fn run(args: Args) -> Result<(), TldEnumError> {
    let base_name = normalize_base_name(&args.company_name)?;
    let config = build_config(&args)?;

    info!(
        "tld-enum v{} starting: base={}, threads={}, output={}",
        env!("CARGO_PKG_VERSION"),
        base_name,
        config.concurrency,
        config.output
    );

    if !is_whois_available().await {
        warn!("'whois' command not found, relying on DNS TXT records only");
    }

    println!("Fetching TLDs...");
    let tlds = fetch_tlds_from(&config.tld_url).await?;
    println!("Fetched {} TLDs.", tlds.len());

    println!("Enumerating domains...");
    let checker = Arc::new(RegistrationChecker::with_config(&config));
    let mut progress = ui::ProgressUi::new();
    let start = Instant::now();
    let report = enumerate(
        &base_name,
        &tlds,
        config.concurrency,
        &checker,
        &mut progress,
    )
    .await;
    progress.finish();
    ui::print_summary(&report, start.elapsed());

    println!("Saving results to YAML...");
    save_report(&config.output, &report)?;
    println!("Results saved to {}", config.output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(argv: &[&str]) -> Args {
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_minimal_args() {
        let args = parse(&["tld-enum", "example"]);
        assert_eq!(args.company_name, "example");
        assert_eq!(args.threads, None);
        assert!(validate_args(&args).is_ok());
    }

    #[test]
    fn test_company_name_required() {
        assert!(Args::try_parse_from(["tld-enum"]).is_err());
    }

    #[test]
    fn test_threads_bounds() {
        assert!(validate_args(&parse(&["tld-enum", "example", "--threads", "0"])).is_err());
        assert!(validate_args(&parse(&["tld-enum", "example", "--threads", "101"])).is_err());
        assert!(validate_args(&parse(&["tld-enum", "example", "--threads", "50"])).is_ok());
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        let args = parse(&["tld-enum", "example", "--whois-timeout", "soon"]);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_empty_output_rejected() {
        let args = parse(&["tld-enum", "example", "--output", " "]);
        assert!(validate_args(&args).is_err());
    }

    #[test]
    fn test_flags_override_config() {
        let args = parse(&[
            "tld-enum",
            "example",
            "--threads",
            "5",
            "--output",
            "acme.yaml",
            "--tld-url",
            "http://localhost/tlds.txt",
            "--whois-timeout",
            "2m",
        ]);
        let base = EnumConfig::default().with_concurrency(25);
        let config = apply_args(base, &args);

        assert_eq!(config.concurrency, 5);
        assert_eq!(config.output, "acme.yaml");
        assert_eq!(config.tld_url, "http://localhost/tlds.txt");
        assert_eq!(config.whois_timeout, Duration::from_secs(120));
    }

    #[test]
    fn test_absent_flags_keep_config() {
        let args = parse(&["tld-enum", "example"]);
        let base = EnumConfig::default()
            .with_concurrency(25)
            .with_output("from-file.yaml");
        let config = apply_args(base, &args);

        assert_eq!(config.concurrency, 25);
        assert_eq!(config.output, "from-file.yaml");
    }
}
