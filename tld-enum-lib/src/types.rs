//! Core data types for registration checks and reports.
//!
//! The persisted report is a mapping from domain name to [`ReportEntry`].
//! Details are tagged by the `method` that produced the evidence, so a
//! saved file looks like:
//!
//! ```yaml
//! example.com:
//!   registered: true
//!   details:
//!     method: whois
//!     registrar: Example Registrar Inc.
//!     registrant: null
//!     creation_date: 1995-08-14T04:00:00Z
//!     expiration_date: 2030-08-13T04:00:00Z
//! example.zzz:
//!   registered: false
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::time::Duration;

/// Default IANA list of every delegated TLD.
pub const DEFAULT_TLD_URL: &str = "https://data.iana.org/TLD/tlds-alpha-by-domain.txt";

/// Default report file written by an enumeration run.
pub const DEFAULT_OUTPUT_FILE: &str = "output.yaml";

/// Outcome of checking a single domain.
///
/// Exactly one variant is produced per domain. WHOIS evidence always wins
/// over TXT evidence; `Unregistered` means neither channel produced any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "method")]
pub enum CheckResult {
    /// No evidence of registration from either method
    #[serde(rename = "unregistered")]
    Unregistered,

    /// WHOIS reported a status for the domain
    #[serde(rename = "whois")]
    RegisteredWhois {
        registrar: Option<String>,
        registrant: Option<String>,
        creation_date: Option<String>,
        expiration_date: Option<String>,
    },

    /// The domain publishes at least one TXT record
    #[serde(rename = "txt_dns")]
    RegisteredTxt {
        #[serde(default)]
        txt_records: Vec<String>,
    },
}

/// How a registration was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DetectionMethod {
    #[serde(rename = "whois")]
    Whois,
    #[serde(rename = "txt_dns")]
    TxtDns,
}

impl CheckResult {
    /// Whether this result is evidence of registration.
    pub fn is_registered(&self) -> bool {
        !matches!(self, CheckResult::Unregistered)
    }

    /// The method that detected the registration, if any.
    pub fn method(&self) -> Option<DetectionMethod> {
        match self {
            CheckResult::Unregistered => None,
            CheckResult::RegisteredWhois { .. } => Some(DetectionMethod::Whois),
            CheckResult::RegisteredTxt { .. } => Some(DetectionMethod::TxtDns),
        }
    }
}

impl DetectionMethod {
    /// Tag used in the report file and in the table's Method column.
    pub fn as_str(&self) -> &'static str {
        match self {
            DetectionMethod::Whois => "whois",
            DetectionMethod::TxtDns => "txt_dns",
        }
    }
}

impl std::fmt::Display for DetectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The persisted unit of a report.
///
/// The domain itself is the key of the surrounding [`Report`] mapping.
/// `registered == true` always comes with `details`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportEntry {
    pub registered: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<CheckResult>,
}

impl From<CheckResult> for ReportEntry {
    fn from(result: CheckResult) -> Self {
        if result.is_registered() {
            ReportEntry {
                registered: true,
                details: Some(result),
            }
        } else {
            ReportEntry {
                registered: false,
                details: None,
            }
        }
    }
}

/// Mapping from full domain name to its entry, one key per checked domain.
pub type Report = BTreeMap<String, ReportEntry>;

/// Settings for an enumeration run.
#[derive(Debug, Clone)]
pub struct EnumConfig {
    /// Maximum number of checks in flight
    /// Default: 10, Range: 1-100
    pub concurrency: usize,

    /// Upper bound on a single `whois` command
    /// Default: 10 seconds
    pub whois_timeout: Duration,

    /// Where the TLD list is fetched from
    pub tld_url: String,

    /// Where the report is written
    pub output: String,
}

impl Default for EnumConfig {
    fn default() -> Self {
        Self {
            concurrency: 10,
            whois_timeout: Duration::from_secs(10),
            tld_url: DEFAULT_TLD_URL.to_string(),
            output: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl EnumConfig {
    /// Set concurrency, clamped to 1..=100.
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.clamp(1, 100);
        self
    }

    /// Set the WHOIS command timeout.
    pub fn with_whois_timeout(mut self, timeout: Duration) -> Self {
        self.whois_timeout = timeout;
        self
    }

    /// Set the TLD list URL.
    pub fn with_tld_url<U: Into<String>>(mut self, url: U) -> Self {
        self.tld_url = url.into();
        self
    }

    /// Set the report output path.
    pub fn with_output<P: Into<String>>(mut self, output: P) -> Self {
        self.output = output.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unregistered_entry_has_no_details() {
        let entry = ReportEntry::from(CheckResult::Unregistered);
        assert!(!entry.registered);
        assert!(entry.details.is_none());

        let yaml = serde_yaml::to_string(&entry).unwrap();
        assert_eq!(yaml.trim(), "registered: false");
    }

    #[test]
    fn test_whois_entry_is_tagged() {
        let entry = ReportEntry::from(CheckResult::RegisteredWhois {
            registrar: Some("Example Registrar Inc.".to_string()),
            registrant: None,
            creation_date: None,
            expiration_date: None,
        });
        assert!(entry.registered);

        let yaml = serde_yaml::to_string(&entry).unwrap();
        assert!(yaml.contains("method: whois"));
        assert!(yaml.contains("registrar: Example Registrar Inc."));
    }

    #[test]
    fn test_txt_details_parse_from_yaml() {
        let yaml = "method: txt_dns\ntxt_records:\n- v=spf1 -all\n";
        let details: CheckResult = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(
            details,
            CheckResult::RegisteredTxt {
                txt_records: vec!["v=spf1 -all".to_string()]
            }
        );
        assert_eq!(details.method(), Some(DetectionMethod::TxtDns));
    }

    #[test]
    fn test_whois_missing_fields_default_to_none() {
        let details: CheckResult = serde_yaml::from_str("method: whois\n").unwrap();
        assert_eq!(
            details,
            CheckResult::RegisteredWhois {
                registrar: None,
                registrant: None,
                creation_date: None,
                expiration_date: None,
            }
        );
    }

    #[test]
    fn test_concurrency_is_clamped() {
        assert_eq!(EnumConfig::default().with_concurrency(0).concurrency, 1);
        assert_eq!(EnumConfig::default().with_concurrency(500).concurrency, 100);
        assert_eq!(EnumConfig::default().with_concurrency(25).concurrency, 25);
    }
}
