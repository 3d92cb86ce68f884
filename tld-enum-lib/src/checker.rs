//! Registration checker.
//!
//! Combines the two lookup protocols into one ordered decision:
//! WHOIS first, DNS TXT only when WHOIS produced nothing usable.

use crate::protocols::{
    TxtLookup, TxtOutcome, TxtResolver, WhoisClient, WhoisLookup, WhoisOutcome,
};
use crate::types::{CheckResult, EnumConfig};
use std::future::Future;
use tracing::debug;

/// Anything that can turn a domain name into a [`CheckResult`].
///
/// The enumerator drives this trait, which keeps it independent of the
/// concrete lookup clients.
pub trait DomainCheck {
    fn check(&self, domain: &str) -> impl Future<Output = CheckResult> + Send;
}

/// Checks a domain with WHOIS, falling back to DNS TXT records.
///
/// # Example
///
/// ```rust,no_run
/// use tld_enum_lib::{CheckResult, RegistrationChecker};
///
/// #[tokio::main]
/// async fn main() {
///     let checker = RegistrationChecker::new();
///     match checker.check_domain("example.com").await {
///         CheckResult::Unregistered => println!("no evidence"),
///         other => println!("registered: {:?}", other),
///     }
/// }
/// ```
#[derive(Clone)]
pub struct RegistrationChecker<W = WhoisClient, T = TxtResolver> {
    /// WHOIS client, consulted first
    whois: W,
    /// TXT resolver, consulted when WHOIS has no status
    txt: T,
}

impl RegistrationChecker {
    /// Checker with the system `whois` command and system DNS configuration.
    pub fn new() -> Self {
        Self::with_config(&EnumConfig::default())
    }

    /// Checker using the WHOIS timeout from `config`.
    pub fn with_config(config: &EnumConfig) -> Self {
        Self {
            whois: WhoisClient::with_timeout(config.whois_timeout),
            txt: TxtResolver::new(),
        }
    }
}

impl Default for RegistrationChecker {
    fn default() -> Self {
        Self::new()
    }
}

impl<W, T> RegistrationChecker<W, T>
where
    W: WhoisLookup + Sync,
    T: TxtLookup + Sync,
{
    /// Build a checker from explicit lookup implementations.
    pub fn from_parts(whois: W, txt: T) -> Self {
        Self { whois, txt }
    }

    /// Check a single fully qualified domain.
    ///
    /// Never fails: lookup errors are logged and treated as absence of
    /// evidence from that method.
    pub async fn check_domain(&self, domain: &str) -> CheckResult {
        match self.whois.lookup(domain).await {
            WhoisOutcome::Registered(record) => {
                return CheckResult::RegisteredWhois {
                    registrar: record.registrar,
                    registrant: record.registrant,
                    creation_date: record.creation_date,
                    expiration_date: record.expiration_date,
                };
            }
            WhoisOutcome::NoStatus => {
                debug!(domain, "WHOIS returned no status");
            }
            WhoisOutcome::Failed(e) => {
                debug!(domain, error = %e, "WHOIS lookup failed");
            }
        }

        let outcome = self.txt.lookup(domain).await;
        if let TxtOutcome::Failed(e) = &outcome {
            debug!(domain, error = %e, "TXT lookup failed");
        }

        match outcome.into_evidence() {
            Some(txt_records) => CheckResult::RegisteredTxt { txt_records },
            None => {
                debug!(domain, "no TXT evidence");
                CheckResult::Unregistered
            }
        }
    }
}

impl<W, T> DomainCheck for RegistrationChecker<W, T>
where
    W: WhoisLookup + Sync,
    T: TxtLookup + Sync,
{
    async fn check(&self, domain: &str) -> CheckResult {
        self.check_domain(domain).await
    }
}
