//! Lookup protocols used to detect registrations.
//!
//! Each protocol returns an explicit outcome enum instead of an error, so a
//! failed lookup can only ever mean "no evidence from this method".

use std::future::Future;

/// DNS TXT lookups
pub mod dns;

/// WHOIS lookups
pub mod whois;

pub use dns::{TxtOutcome, TxtResolver};
pub use whois::{is_whois_available, parse_whois_response, WhoisClient, WhoisOutcome, WhoisRecord};

/// Something that can answer a WHOIS query for a domain.
pub trait WhoisLookup {
    fn lookup(&self, domain: &str) -> impl Future<Output = WhoisOutcome> + Send;
}

/// Something that can answer a DNS TXT query for a domain.
pub trait TxtLookup {
    fn lookup(&self, domain: &str) -> impl Future<Output = TxtOutcome> + Send;
}
