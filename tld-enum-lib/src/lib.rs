//! # tld-enum library
//!
//! Enumerates a company base name across every top-level domain and finds out
//! which combinations are registered.
//!
//! Each candidate is checked with WHOIS first; when WHOIS is unavailable or
//! has no status for the domain, a DNS TXT lookup is used as a weaker signal.
//! Per-domain lookup failures never abort a run.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tld_enum_lib::{enumerate, fetch_tlds, save_report, NoProgress, RegistrationChecker};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let tlds = fetch_tlds().await?;
//!     let checker = Arc::new(RegistrationChecker::new());
//!     let report = enumerate("example", &tlds, 10, &checker, &mut NoProgress).await;
//!     save_report("output.yaml", &report)?;
//!     Ok(())
//! }
//! ```

pub use checker::{DomainCheck, RegistrationChecker};
pub use config::{
    env_config_from, load_env_config, parse_timeout_string, resolve_config, ConfigManager,
    DefaultsConfig, EnvConfig, FileConfig,
};
pub use enumerate::{enumerate, NoProgress, ProgressObserver};
pub use error::{ReportLoadKind, TldEnumError};
pub use protocols::{
    is_whois_available, parse_whois_response, TxtLookup, TxtOutcome, TxtResolver, WhoisClient,
    WhoisLookup, WhoisOutcome, WhoisRecord,
};
pub use report::{
    filter_valid, is_valid_details, load_report, parse_report, render, save_report, ReportRow,
    EMPTY_REPORT_MESSAGE, PLACEHOLDER,
};
pub use tld::{fetch_tlds, fetch_tlds_from, parse_tld_list};
pub use types::{
    CheckResult, DetectionMethod, EnumConfig, Report, ReportEntry, DEFAULT_OUTPUT_FILE,
    DEFAULT_TLD_URL,
};
pub use utils::{expand_base_name, normalize_base_name};

mod checker;
mod config;
mod enumerate;
mod error;
mod protocols;
mod report;
mod tld;
mod types;
mod utils;

pub type Result<T> = std::result::Result<T, TldEnumError>;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
