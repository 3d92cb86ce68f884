//! WHOIS lookups through the system `whois` command.
//!
//! WHOIS output is unstructured text that differs between registries, so the
//! response is scanned for the handful of fields a report needs. Many TLDs
//! refuse, throttle or simply don't run WHOIS; every such case comes back as
//! [`WhoisOutcome::Failed`] or [`WhoisOutcome::NoStatus`] and the checker moves
//! on to DNS.

use crate::error::TldEnumError;
use crate::protocols::WhoisLookup;
use regex::Regex;
use std::io::ErrorKind;
use std::time::Duration;
use tokio::process::Command;

lazy_static::lazy_static! {
    static ref STATUS_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*domain status:[ \t]*(.+)$",
        r"(?im)^\s*status:[ \t]*(.+)$",
        r"(?im)^\s*state:[ \t]*(.+)$",
    ]);

    static ref REGISTRAR_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*registrar:[ \t]*(.+)$",
        r"(?im)^\s*registrar name:[ \t]*(.+)$",
        r"(?im)^\s*sponsoring registrar:[ \t]*(.+)$",
    ]);

    static ref REGISTRANT_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*registrant name:[ \t]*(.+)$",
        r"(?im)^\s*registrant:[ \t]*(.+)$",
        r"(?im)^\s*registrant organization:[ \t]*(.+)$",
        r"(?im)^\s*org-name:[ \t]*(.+)$",
    ]);

    static ref CREATION_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*creation date:[ \t]*(.+)$",
        r"(?im)^\s*created date:[ \t]*(.+)$",
        r"(?im)^\s*created on:[ \t]*(.+)$",
        r"(?im)^\s*created:[ \t]*(.+)$",
        r"(?im)^\s*registration date:[ \t]*(.+)$",
        r"(?im)^\s*registered on:[ \t]*(.+)$",
    ]);

    static ref EXPIRATION_PATTERNS: Vec<Regex> = compile(&[
        r"(?im)^\s*registry expiry date:[ \t]*(.+)$",
        r"(?im)^\s*registrar registration expiration date:[ \t]*(.+)$",
        r"(?im)^\s*expiration date:[ \t]*(.+)$",
        r"(?im)^\s*expiry date:[ \t]*(.+)$",
        r"(?im)^\s*expires on:[ \t]*(.+)$",
        r"(?im)^\s*expires:[ \t]*(.+)$",
        r"(?im)^\s*paid-till:[ \t]*(.+)$",
    ]);
}

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns.iter().filter_map(|p| Regex::new(p).ok()).collect()
}

/// Status values some registries print for domains that are free.
const UNREGISTERED_STATUSES: &[&str] = &[
    "available",
    "free",
    "no object found",
    "not registered",
    "not found",
];

/// Fields of interest from a WHOIS response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhoisRecord {
    pub status: Vec<String>,
    pub registrar: Option<String>,
    pub registrant: Option<String>,
    pub creation_date: Option<String>,
    pub expiration_date: Option<String>,
}

/// Result of a single WHOIS lookup.
#[derive(Debug, Clone)]
pub enum WhoisOutcome {
    /// The response carried at least one registration status
    Registered(WhoisRecord),
    /// The server answered, but with no usable status
    NoStatus,
    /// The lookup itself failed (missing binary, timeout, throttling)
    Failed(TldEnumError),
}

/// WHOIS client backed by the system's `whois` command.
#[derive(Debug, Clone)]
pub struct WhoisClient {
    /// Upper bound on one `whois` invocation
    timeout: Duration,
}

impl WhoisClient {
    /// Create a new WHOIS client with default settings.
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(10),
        }
    }

    /// Create a new WHOIS client with custom timeout.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Look up `domain` and classify the response.
    pub async fn query(&self, domain: &str) -> WhoisOutcome {
        let output = match tokio::time::timeout(self.timeout, self.execute_whois_command(domain))
            .await
        {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => return WhoisOutcome::Failed(e),
            Err(_) => {
                return WhoisOutcome::Failed(TldEnumError::timeout(
                    format!("WHOIS query for {}", domain),
                    self.timeout,
                ))
            }
        };

        if is_rate_limited(&output) {
            return WhoisOutcome::Failed(TldEnumError::lookup(
                domain,
                "WHOIS",
                "rate limited by WHOIS server",
            ));
        }

        match parse_whois_response(&output) {
            Some(record) => WhoisOutcome::Registered(record),
            None => WhoisOutcome::NoStatus,
        }
    }

    /// Run `whois <domain>` and return its standard output.
    async fn execute_whois_command(&self, domain: &str) -> Result<String, TldEnumError> {
        let output = whois_command(domain)
            .output()
            .await
            .map_err(|e| {
                TldEnumError::lookup(
                    domain,
                    "WHOIS",
                    format!(
                        "Failed to execute whois command: {}. Make sure 'whois' is installed.",
                        e
                    ),
                )
            })?;

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// `whois -- <domain>`; the separator keeps a domain from being read as an option.
fn whois_command(domain: &str) -> Command {
    let mut command = Command::new("whois");
    command.arg("--").arg(domain).kill_on_drop(true);
    command
}

impl Default for WhoisClient {
    fn default() -> Self {
        Self::new()
    }
}

impl WhoisLookup for WhoisClient {
    async fn lookup(&self, domain: &str) -> WhoisOutcome {
        self.query(domain).await
    }
}

/// Extract a [`WhoisRecord`] from raw WHOIS output.
///
/// Returns `None` unless the response carries at least one status line that
/// does not itself say the domain is free.
pub fn parse_whois_response(raw: &str) -> Option<WhoisRecord> {
    let status: Vec<String> = STATUS_PATTERNS
        .iter()
        .flat_map(|re| re.captures_iter(raw))
        .filter_map(|caps| caps.get(1).map(|m| m.as_str().trim().to_string()))
        .filter(|value| !value.is_empty())
        .filter(|value| {
            let lower = value.to_lowercase();
            !UNREGISTERED_STATUSES.iter().any(|s| lower.starts_with(s))
        })
        .collect();

    if status.is_empty() {
        return None;
    }

    Some(WhoisRecord {
        status,
        registrar: extract_field(raw, &REGISTRAR_PATTERNS),
        registrant: extract_field(raw, &REGISTRANT_PATTERNS),
        creation_date: extract_field(raw, &CREATION_PATTERNS),
        expiration_date: extract_field(raw, &EXPIRATION_PATTERNS),
    })
}

/// First non-empty, non-redacted capture across `patterns`.
fn extract_field(raw: &str, patterns: &[Regex]) -> Option<String> {
    for re in patterns {
        for caps in re.captures_iter(raw) {
            if let Some(m) = caps.get(1) {
                let value = m.as_str().trim();
                if !value.is_empty() && !value.to_lowercase().contains("redacted") {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

/// Check if the WHOIS output indicates rate limiting.
fn is_rate_limited(output: &str) -> bool {
    let output_lower = output.to_lowercase();
    let rate_limit_patterns = [
        "rate limit exceeded",
        "too many requests",
        "try again later",
        "quota exceeded",
        "limit exceeded",
        "query rate",
    ];

    rate_limit_patterns
        .iter()
        .any(|pattern| output_lower.contains(pattern))
}

/// Check whether a `whois` executable can be spawned at all.
pub async fn is_whois_available() -> bool {
    match Command::new("whois").arg("--version").output().await {
        Ok(_) => true,
        Err(e) => e.kind() != ErrorKind::NotFound,
    }
}
