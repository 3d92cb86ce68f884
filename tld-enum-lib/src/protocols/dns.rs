//! DNS TXT lookups used as a weak registration signal.
//!
//! A domain that publishes TXT records is configured somewhere and therefore
//! almost certainly registered. The absence of records proves nothing, so
//! every negative answer is just [`TxtOutcome`] without evidence.

use crate::error::TldEnumError;
use crate::protocols::TxtLookup;
use hickory_resolver::config::{ResolverConfig, ResolverOpts};
use hickory_resolver::error::{ResolveError, ResolveErrorKind};
use hickory_resolver::proto::error::ProtoError;
use hickory_resolver::proto::op::ResponseCode;
use hickory_resolver::proto::rr::Name;
use hickory_resolver::TokioAsyncResolver;
use tracing::debug;

/// Result of a single TXT query.
#[derive(Debug, Clone)]
pub enum TxtOutcome {
    /// One string per TXT record
    Records(Vec<String>),
    /// The name exists but has no TXT records
    NoAnswer,
    /// The name does not exist
    NxDomain,
    /// The resolver gave up waiting
    Timeout,
    /// Any other resolver failure
    Failed(TldEnumError),
}

impl TxtOutcome {
    /// Records when this outcome is evidence of registration.
    pub fn into_evidence(self) -> Option<Vec<String>> {
        match self {
            TxtOutcome::Records(records) if !records.is_empty() => Some(records),
            _ => None,
        }
    }
}

/// TXT resolver backed by `hickory-resolver`.
#[derive(Clone)]
pub struct TxtResolver {
    resolver: TokioAsyncResolver,
}

impl TxtResolver {
    /// Resolver using the system configuration (`/etc/resolv.conf` on Unix).
    ///
    /// Falls back to the resolver library's default upstreams when the
    /// system configuration cannot be read.
    pub fn new() -> Self {
        let resolver = match TokioAsyncResolver::tokio_from_system_conf() {
            Ok(resolver) => resolver,
            Err(e) => {
                debug!(error = %e, "system resolver config unavailable, using defaults");
                TokioAsyncResolver::tokio(ResolverConfig::default(), ResolverOpts::default())
            }
        };
        Self { resolver }
    }

    /// Resolver with an explicit configuration.
    pub fn with_config(config: ResolverConfig, opts: ResolverOpts) -> Self {
        Self {
            resolver: TokioAsyncResolver::tokio(config, opts),
        }
    }

    /// Query TXT records for `domain`.
    ///
    /// The name is always queried as fully qualified, so the system search
    /// list is never appended to it.
    pub async fn query(&self, domain: &str) -> TxtOutcome {
        let name = match fully_qualified(domain) {
            Ok(name) => name,
            Err(e) => {
                return TxtOutcome::Failed(TldEnumError::lookup(domain, "DNS TXT", e.to_string()))
            }
        };

        match self.resolver.txt_lookup(name).await {
            Ok(response) => {
                let records: Vec<String> = response
                    .iter()
                    .map(|txt| {
                        txt.iter()
                            .map(|data| String::from_utf8_lossy(data).into_owned())
                            .collect::<Vec<_>>()
                            .join("")
                    })
                    .collect();

                if records.is_empty() {
                    TxtOutcome::NoAnswer
                } else {
                    TxtOutcome::Records(records)
                }
            }
            Err(e) => classify_error(domain, &e),
        }
    }
}

impl Default for TxtResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TxtLookup for TxtResolver {
    async fn lookup(&self, domain: &str) -> TxtOutcome {
        self.query(domain).await
    }
}

/// `domain` as an absolute name.
fn fully_qualified(domain: &str) -> Result<Name, ProtoError> {
    let mut name = Name::from_ascii(domain)?;
    name.set_fqdn(true);
    Ok(name)
}

/// Map a resolver error onto a [`TxtOutcome`].
fn classify_error(domain: &str, err: &ResolveError) -> TxtOutcome {
    match err.kind() {
        ResolveErrorKind::NoRecordsFound { response_code, .. } => {
            if *response_code == ResponseCode::NXDomain {
                TxtOutcome::NxDomain
            } else {
                TxtOutcome::NoAnswer
            }
        }
        ResolveErrorKind::Timeout => TxtOutcome::Timeout,
        _ => TxtOutcome::Failed(TldEnumError::lookup(domain, "DNS TXT", err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hickory_resolver::config::NameServerConfigGroup;
    use hickory_resolver::proto::op::{Message, MessageType, OpCode};
    use hickory_resolver::proto::rr::rdata::TXT;
    use hickory_resolver::proto::rr::{RData, Record};
    use std::net::SocketAddr;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tokio::net::UdpSocket;

    /// Local DNS server:
    /// `example.io.` has TXT, `example.org.` exists without TXT,
    /// anything under `corp.test.` matches a wildcard TXT, the rest is NXDOMAIN.
    async fn spawn_dns_server() -> (SocketAddr, Arc<Mutex<Vec<String>>>) {
        let socket = UdpSocket::bind("127.0.0.1:0").await.unwrap();
        let addr = socket.local_addr().unwrap();
        let queried = Arc::new(Mutex::new(Vec::new()));
        let log = queried.clone();

        tokio::spawn(async move {
            let mut buf = [0u8; 4096];
            loop {
                let Ok((len, peer)) = socket.recv_from(&mut buf).await else {
                    break;
                };
                let Ok(request) = Message::from_vec(&buf[..len]) else {
                    continue;
                };
                let Some(query) = request.queries().first().cloned() else {
                    continue;
                };
                let name = query.name().to_string().to_lowercase();
                log.lock().unwrap().push(name.clone());

                let mut response = Message::new();
                response
                    .set_id(request.id())
                    .set_message_type(MessageType::Response)
                    .set_op_code(OpCode::Query)
                    .set_recursion_desired(request.recursion_desired())
                    .set_recursion_available(true)
                    .set_authoritative(true);
                response.add_query(query.clone());

                let txt = |strings: &[&str]| {
                    Record::from_rdata(
                        query.name().clone(),
                        60,
                        RData::TXT(TXT::new(strings.iter().map(|s| s.to_string()).collect())),
                    )
                };

                match name.as_str() {
                    "example.io." => {
                        response.add_answer(txt(&["v=spf1 ", "-all"]));
                    }
                    "example.org." => {}
                    n if n.ends_with(".corp.test.") => {
                        response.add_answer(txt(&["wildcard-corp"]));
                    }
                    _ => {
                        response.set_response_code(ResponseCode::NXDomain);
                    }
                }

                if let Ok(bytes) = response.to_vec() {
                    let _ = socket.send_to(&bytes, peer).await;
                }
            }
        });

        (addr, queried)
    }

    /// Resolver pointed at `addr`, with `corp.test.` on its search list.
    fn resolver_with_search_domain(addr: SocketAddr) -> TxtResolver {
        let search = vec![Name::from_ascii("corp.test.").unwrap()];
        let servers = NameServerConfigGroup::from_ips_clear(&[addr.ip()], addr.port(), true);
        let config = ResolverConfig::from_parts(None, search, servers);

        let mut opts = ResolverOpts::default();
        opts.ndots = 5;
        opts.attempts = 1;
        opts.timeout = Duration::from_secs(2);
        opts.cache_size = 0;

        TxtResolver::with_config(config, opts)
    }

    #[tokio::test]
    async fn test_search_domain_is_never_appended() {
        let (addr, queried) = spawn_dns_server().await;
        let resolver = resolver_with_search_domain(addr);

        let outcome = resolver.query("example.zzz").await;

        assert!(matches!(outcome, TxtOutcome::NxDomain), "got {:?}", outcome);
        let queried = queried.lock().unwrap().clone();
        assert!(queried.contains(&"example.zzz.".to_string()));
        assert!(
            queried.iter().all(|n| !n.ends_with("corp.test.")),
            "search list used: {:?}",
            queried
        );
    }

    #[tokio::test]
    async fn test_records_are_joined_per_record() {
        let (addr, _) = spawn_dns_server().await;
        let resolver = resolver_with_search_domain(addr);

        match resolver.query("example.io").await {
            TxtOutcome::Records(records) => assert_eq!(records, vec!["v=spf1 -all"]),
            other => panic!("expected records, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_existing_name_without_txt_is_no_answer() {
        let (addr, _) = spawn_dns_server().await;
        let resolver = resolver_with_search_domain(addr);

        let outcome = resolver.query("example.org").await;
        assert!(matches!(outcome, TxtOutcome::NoAnswer), "got {:?}", outcome);
    }

    #[test]
    fn test_fully_qualified_name() {
        let name = fully_qualified("example.com").unwrap();
        assert!(name.is_fqdn());
        assert_eq!(name.to_string(), "example.com.");
    }

    #[test]
    fn test_timeout_is_classified() {
        let err = ResolveError::from(ResolveErrorKind::Timeout);
        assert!(matches!(
            classify_error("example.zzz", &err),
            TxtOutcome::Timeout
        ));
    }

    #[test]
    fn test_other_errors_are_failures() {
        let err = ResolveError::from("no connections available");
        match classify_error("example.zzz", &err) {
            TxtOutcome::Failed(TldEnumError::Lookup { domain, method, .. }) => {
                assert_eq!(domain, "example.zzz");
                assert_eq!(method, "DNS TXT");
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[test]
    fn test_only_records_are_evidence() {
        let spf = "v=spf1 include:_spf.example.com ~all".to_string();
        assert_eq!(
            TxtOutcome::Records(vec![spf.clone()]).into_evidence(),
            Some(vec![spf])
        );
        assert_eq!(TxtOutcome::Records(vec![]).into_evidence(), None);
        assert_eq!(TxtOutcome::NoAnswer.into_evidence(), None);
        assert_eq!(TxtOutcome::NxDomain.into_evidence(), None);
        assert_eq!(TxtOutcome::Timeout.into_evidence(), None);
    }
}
