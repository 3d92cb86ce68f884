//! Error handling for TLD enumeration.
//!
//! Only two kinds of failure are ever user-visible: the TLD list being
//! unavailable (fatal to a run) and a report that cannot be loaded. Per-domain
//! lookup errors are represented here too, but the checker downgrades them to
//! "no evidence" and never lets them escape a single domain.

use std::fmt;
use std::time::Duration;

/// Why a saved report could not be loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLoadKind {
    /// The file does not exist
    NotFound,
    /// The file exists but could not be read
    Unreadable,
    /// The file is not a valid report mapping
    Malformed,
}

/// Main error type for enumeration and reporting.
#[derive(Debug, Clone)]
pub enum TldEnumError {
    /// The TLD list could not be retrieved
    Fetch {
        url: String,
        status_code: Option<u16>,
        message: String,
    },

    /// A WHOIS or DNS lookup failed for one domain
    Lookup {
        domain: String,
        method: String,
        message: String,
    },

    /// A lookup did not finish in time
    Timeout {
        operation: String,
        duration: Duration,
    },

    /// A saved report could not be loaded
    ReportLoad {
        path: String,
        kind: ReportLoadKind,
        message: String,
    },

    /// The report could not be written
    Save {
        path: String,
        message: String,
    },

    /// Configuration errors (invalid settings, unparsable files)
    Config {
        message: String,
    },

    /// Invalid user input (empty base name, bad thread count)
    InvalidInput {
        value: String,
        reason: String,
    },

    /// Errors that don't fit other categories
    Internal {
        message: String,
    },
}

impl TldEnumError {
    /// Create a fetch error for a non-success HTTP status.
    pub fn fetch_status<U: Into<String>>(url: U, status_code: u16) -> Self {
        Self::Fetch {
            url: url.into(),
            status_code: Some(status_code),
            message: format!("server returned HTTP {}", status_code),
        }
    }

    /// Create a fetch error for a transport failure.
    pub fn fetch<U: Into<String>, M: Into<String>>(url: U, message: M) -> Self {
        Self::Fetch {
            url: url.into(),
            status_code: None,
            message: message.into(),
        }
    }

    /// Create a per-domain lookup error.
    pub fn lookup<D: Into<String>, T: Into<String>, M: Into<String>>(
        domain: D,
        method: T,
        message: M,
    ) -> Self {
        Self::Lookup {
            domain: domain.into(),
            method: method.into(),
            message: message.into(),
        }
    }

    /// Create a timeout error.
    pub fn timeout<O: Into<String>>(operation: O, duration: Duration) -> Self {
        Self::Timeout {
            operation: operation.into(),
            duration,
        }
    }

    /// Create a report load error.
    pub fn report_load<P: Into<String>, M: Into<String>>(
        path: P,
        kind: ReportLoadKind,
        message: M,
    ) -> Self {
        Self::ReportLoad {
            path: path.into(),
            kind,
            message: message.into(),
        }
    }

    /// Create a report save error.
    pub fn save<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self::Save {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error.
    pub fn config<M: Into<String>>(message: M) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an invalid input error.
    pub fn invalid_input<V: Into<String>, R: Into<String>>(value: V, reason: R) -> Self {
        Self::InvalidInput {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a new internal error.
    pub fn internal<M: Into<String>>(message: M) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

}

impl fmt::Display for TldEnumError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch {
                url,
                status_code,
                message,
            } => {
                if let Some(code) = status_code {
                    write!(f, "Failed to fetch TLDs: {} (HTTP {} from {})", message, code, url)
                } else {
                    write!(f, "Failed to fetch TLDs from {}: {}", url, message)
                }
            }
            Self::Lookup {
                domain,
                method,
                message,
            } => {
                write!(f, "{} lookup failed for '{}': {}", method, domain, message)
            }
            Self::Timeout {
                operation,
                duration,
            } => {
                write!(f, "Timeout after {:?} during: {}", duration, operation)
            }
            Self::ReportLoad {
                path,
                kind,
                message,
            } => match kind {
                ReportLoadKind::NotFound => write!(f, "File {} not found.", path),
                ReportLoadKind::Unreadable => {
                    write!(f, "Could not read file {}: {}", path, message)
                }
                ReportLoadKind::Malformed => write!(f, "Error parsing YAML file: {}", message),
            },
            Self::Save { path, message } => {
                write!(f, "Failed to save results to {}: {}", path, message)
            }
            Self::Config { message } => {
                write!(f, "Configuration error: {}", message)
            }
            Self::InvalidInput { value, reason } => {
                write!(f, "Invalid input '{}': {}", value, reason)
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {}", message)
            }
        }
    }
}

impl std::error::Error for TldEnumError {}

impl From<reqwest::Error> for TldEnumError {
    fn from(err: reqwest::Error) -> Self {
        let url = err
            .url()
            .map(|u| u.to_string())
            .unwrap_or_else(|| "unknown URL".to_string());

        if let Some(status) = err.status() {
            Self::fetch_status(url, status.as_u16())
        } else if err.is_connect() {
            Self::fetch(url, format!("connection failed: {}", err))
        } else {
            Self::fetch(url, err.to_string())
        }
    }
}

impl From<toml::de::Error> for TldEnumError {
    fn from(err: toml::de::Error) -> Self {
        Self::config(format!("Failed to parse TOML configuration: {}", err))
    }
}
