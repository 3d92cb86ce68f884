//! Saving, loading and rendering enumeration reports.
//!
//! Reports are YAML mappings of domain to [`ReportEntry`]. Loading is
//! lenient per entry: details with a missing or unknown `method` tag are
//! dropped (and flagged later by [`filter_valid`]) instead of rejecting the
//! whole file.

use crate::error::{ReportLoadKind, TldEnumError};
use crate::types::{CheckResult, Report, ReportEntry};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{debug, warn};

/// Placeholder for absent values in the rendered table.
pub const PLACEHOLDER: &str = "N/A";

/// Message printed when nothing survives [`filter_valid`].
pub const EMPTY_REPORT_MESSAGE: &str = "No registered domains found.";

const DOMAIN_WIDTH: usize = 30;
const METHOD_WIDTH: usize = 10;
const NAME_WIDTH: usize = 30;
const DATE_WIDTH: usize = 20;
const RULE_WIDTH: usize = 150;

/// A registered domain with details worth displaying.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportRow {
    pub domain: String,
    #[serde(flatten)]
    pub details: CheckResult,
}

/// Entry shape accepted on load, before the details are interpreted.
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    registered: bool,
    #[serde(default)]
    details: Option<serde_yaml::Value>,
}

/// Write `report` to `path` as YAML.
pub fn save_report<P: AsRef<Path>>(path: P, report: &Report) -> Result<(), TldEnumError> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy();

    let yaml = serde_yaml::to_string(report)
        .map_err(|e| TldEnumError::save(path_str.as_ref(), e.to_string()))?;

    fs::write(path, yaml).map_err(|e| TldEnumError::save(path_str.as_ref(), e.to_string()))?;

    debug!(path = %path_str, entries = report.len(), "report saved");
    Ok(())
}

/// Load a report previously written by [`save_report`].
///
/// # Errors
///
/// Returns [`TldEnumError::ReportLoad`] if the file is missing, unreadable,
/// or not a YAML mapping of domains to entries.
pub fn load_report<P: AsRef<Path>>(path: P) -> Result<Report, TldEnumError> {
    let path = path.as_ref();
    let path_str = path.to_string_lossy().into_owned();

    let content = fs::read_to_string(path).map_err(|e| {
        let kind = if e.kind() == ErrorKind::NotFound {
            ReportLoadKind::NotFound
        } else {
            ReportLoadKind::Unreadable
        };
        TldEnumError::report_load(path_str.as_str(), kind, e.to_string())
    })?;

    parse_report(&content)
        .map_err(|e| TldEnumError::report_load(path_str.as_str(), ReportLoadKind::Malformed, e))
}

/// Parse report YAML. An empty document is an empty report.
pub fn parse_report(content: &str) -> Result<Report, String> {
    if content.trim().is_empty() {
        return Ok(Report::new());
    }

    let raw: BTreeMap<String, RawEntry> =
        serde_yaml::from_str(content).map_err(|e| e.to_string())?;

    Ok(raw
        .into_iter()
        .map(|(domain, entry)| {
            let details = entry.details.and_then(|value| {
                match serde_yaml::from_value::<CheckResult>(value) {
                    Ok(details) => Some(details),
                    Err(e) => {
                        debug!(domain = %domain, error = %e, "unrecognized report details");
                        None
                    }
                }
            });

            let entry = ReportEntry {
                registered: entry.registered,
                details,
            };
            (domain, entry)
        })
        .collect())
}

/// Whether registered details carry enough information to display.
///
/// WHOIS needs a registrar or registrant; TXT needs at least one record.
pub fn is_valid_details(details: &CheckResult) -> bool {
    match details {
        CheckResult::RegisteredWhois {
            registrar,
            registrant,
            ..
        } => is_present(registrar) || is_present(registrant),
        CheckResult::RegisteredTxt { txt_records } => !txt_records.is_empty(),
        CheckResult::Unregistered => false,
    }
}

/// Registered entries that pass [`is_valid_details`], sorted by domain.
///
/// Registered entries without recognizable details are excluded and
/// reported with a warning.
pub fn filter_valid(report: &Report) -> Vec<ReportRow> {
    let mut rows = Vec::new();

    for (domain, entry) in report {
        if !entry.registered {
            continue;
        }

        match &entry.details {
            Some(details) if details.is_registered() => {
                if is_valid_details(details) {
                    rows.push(ReportRow {
                        domain: domain.clone(),
                        details: details.clone(),
                    });
                } else {
                    debug!(domain = %domain, "registered entry lacks identifying details");
                }
            }
            _ => {
                warn!(
                    domain = %domain,
                    "registered entry has no recognized detection method; excluded from report"
                );
            }
        }
    }

    rows
}

/// Render rows as a fixed-width table.
pub fn render(rows: &[ReportRow]) -> String {
    if rows.is_empty() {
        return format!("{}\n", EMPTY_REPORT_MESSAGE);
    }

    let mut out = String::new();
    out.push('\n');
    out.push_str(&format!(
        "{:<dw$} {:<mw$} {:<nw$} {:<nw$} {:<tw$} {:<tw$} TXT Records\n",
        "Domain",
        "Method",
        "Registrar",
        "Registrant",
        "Creation Date",
        "Expiration Date",
        dw = DOMAIN_WIDTH,
        mw = METHOD_WIDTH,
        nw = NAME_WIDTH,
        tw = DATE_WIDTH,
    ));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    for row in rows {
        out.push_str(&render_row(row));
        out.push('\n');
    }

    out
}

fn render_row(row: &ReportRow) -> String {
    let (method, registrar, registrant, created, expires, txt) = match &row.details {
        CheckResult::RegisteredWhois {
            registrar,
            registrant,
            creation_date,
            expiration_date,
        } => (
            "whois",
            or_placeholder(registrar),
            or_placeholder(registrant),
            or_placeholder(creation_date),
            or_placeholder(expiration_date),
            String::new(),
        ),
        CheckResult::RegisteredTxt { txt_records } => (
            "txt_dns",
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            txt_records.join(", "),
        ),
        CheckResult::Unregistered => (
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            PLACEHOLDER,
            String::new(),
        ),
    };

    let line = format!(
        "{:<dw$} {:<mw$} {:<nw$} {:<nw$} {:<tw$} {:<tw$} {}",
        row.domain,
        method,
        registrar,
        registrant,
        created,
        expires,
        txt,
        dw = DOMAIN_WIDTH,
        mw = METHOD_WIDTH,
        nw = NAME_WIDTH,
        tw = DATE_WIDTH,
    );
    line.trim_end().to_string()
}

fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.trim().is_empty())
}

fn or_placeholder(value: &Option<String>) -> &str {
    match value.as_deref() {
        Some(v) if !v.trim().is_empty() => v,
        _ => PLACEHOLDER,
    }
}
