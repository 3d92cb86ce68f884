// tld-enum-lib/tests/integration.rs

//! End-to-end scenarios through the public API, with scripted lookups
//! standing in for WHOIS and DNS.

use std::collections::HashMap;
use std::sync::Arc;
use tempfile::TempDir;
use tld_enum_lib::{
    enumerate, filter_valid, load_report, render, save_report, CheckResult, NoProgress,
    RegistrationChecker, ReportLoadKind, TldEnumError, TxtLookup, TxtOutcome, WhoisLookup,
    WhoisOutcome, WhoisRecord,
};

/// WHOIS answers keyed by domain; unknown domains fail like a refused query.
struct ScriptedWhois(HashMap<String, WhoisRecord>);

impl WhoisLookup for ScriptedWhois {
    async fn lookup(&self, domain: &str) -> WhoisOutcome {
        match self.0.get(domain) {
            Some(record) => WhoisOutcome::Registered(record.clone()),
            None => WhoisOutcome::Failed(TldEnumError::lookup(
                domain,
                "WHOIS",
                "connection refused",
            )),
        }
    }
}

/// TXT answers keyed by domain; unknown domains are NXDOMAIN.
struct ScriptedTxt(HashMap<String, Vec<String>>);

impl TxtLookup for ScriptedTxt {
    async fn lookup(&self, domain: &str) -> TxtOutcome {
        match self.0.get(domain) {
            Some(records) => TxtOutcome::Records(records.clone()),
            None => TxtOutcome::NxDomain,
        }
    }
}

fn example_checker() -> Arc<RegistrationChecker<ScriptedWhois, ScriptedTxt>> {
    let mut whois = HashMap::new();
    whois.insert(
        "example.com".to_string(),
        WhoisRecord {
            status: vec!["clientTransferProhibited".to_string()],
            registrar: Some("Example Registrar Inc.".to_string()),
            registrant: None,
            creation_date: Some("1995-08-14T04:00:00Z".to_string()),
            expiration_date: Some("2030-08-13T04:00:00Z".to_string()),
        },
    );
    whois.insert(
        "example.net".to_string(),
        WhoisRecord {
            status: vec!["ok".to_string()],
            ..Default::default()
        },
    );

    let mut txt = HashMap::new();
    txt.insert(
        "example.io".to_string(),
        vec!["v=spf1 include:_spf.example.com ~all".to_string()],
    );

    Arc::new(RegistrationChecker::from_parts(
        ScriptedWhois(whois),
        ScriptedTxt(txt),
    ))
}

fn tlds(list: &[&str]) -> Vec<String> {
    list.iter().map(|t| t.to_string()).collect()
}

#[tokio::test]
async fn test_whois_and_unregistered_scenario() {
    let checker = example_checker();
    let report = enumerate("example", &tlds(&["com", "zzz"]), 10, &checker, &mut NoProgress).await;

    assert_eq!(report.len(), 2);

    let com = &report["example.com"];
    assert!(com.registered);
    match com.details.as_ref().unwrap() {
        CheckResult::RegisteredWhois { registrar, .. } => {
            assert_eq!(registrar.as_deref(), Some("Example Registrar Inc."));
        }
        other => panic!("expected WHOIS details, got {:?}", other),
    }

    let zzz = &report["example.zzz"];
    assert!(!zzz.registered);
    assert!(zzz.details.is_none());

    let rows = filter_valid(&report);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].domain, "example.com");
}

#[tokio::test]
async fn test_txt_fallback_scenario() {
    let checker = example_checker();
    let result = checker.check_domain("example.io").await;

    assert_eq!(
        result,
        CheckResult::RegisteredTxt {
            txt_records: vec!["v=spf1 include:_spf.example.com ~all".to_string()]
        }
    );

    let report = enumerate("example", &tlds(&["io"]), 1, &checker, &mut NoProgress).await;
    let rows = filter_valid(&report);
    let table = render(&rows);
    let row = table.lines().nth(3).unwrap();

    assert!(row.starts_with("example.io"));
    assert!(row.contains("txt_dns"));
    assert_eq!(row.matches("N/A").count(), 4);
    assert!(row.ends_with("v=spf1 include:_spf.example.com ~all"));
}

#[tokio::test]
async fn test_whois_without_names_is_saved_but_not_shown() {
    let checker = example_checker();
    let report = enumerate("example", &tlds(&["net"]), 4, &checker, &mut NoProgress).await;

    assert!(report["example.net"].registered);
    assert!(filter_valid(&report).is_empty());
    assert_eq!(render(&filter_valid(&report)), "No registered domains found.\n");
}

#[tokio::test]
async fn test_save_and_load_preserve_rows() {
    let checker = example_checker();
    let list = tlds(&["com", "io", "net", "zzz", "org"]);
    let report = enumerate("example", &list, 2, &checker, &mut NoProgress).await;

    let dir = TempDir::new().unwrap();
    let path = dir.path().join("output.yaml");
    save_report(&path, &report).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("example.zzz:\n  registered: false\n"));
    assert!(content.contains("method: whois"));
    assert!(content.contains("method: txt_dns"));

    let loaded = load_report(&path).unwrap();
    assert_eq!(loaded, report);
    assert_eq!(filter_valid(&loaded), filter_valid(&report));
}

#[test]
fn test_load_missing_file() {
    let dir = TempDir::new().unwrap();
    let err = load_report(dir.path().join("missing.yaml")).unwrap_err();

    assert!(matches!(
        err,
        TldEnumError::ReportLoad {
            kind: ReportLoadKind::NotFound,
            ..
        }
    ));
    assert!(err.to_string().ends_with("not found."));
}

#[test]
fn test_load_malformed_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.yaml");
    std::fs::write(&path, "example.com:\n  registered: [true\n").unwrap();

    let err = load_report(&path).unwrap_err();
    assert!(matches!(
        err,
        TldEnumError::ReportLoad {
            kind: ReportLoadKind::Malformed,
            ..
        }
    ));
    assert!(err.to_string().starts_with("Error parsing YAML file"));
}

#[test]
fn test_enumerate_from_sync_context() {
    let checker = example_checker();
    let report = tokio_test::block_on(enumerate(
        "example",
        &tlds(&["com", "io", "zzz"]),
        3,
        &checker,
        &mut NoProgress,
    ));

    let registered: Vec<&str> = report
        .iter()
        .filter(|(_, e)| e.registered)
        .map(|(d, _)| d.as_str())
        .collect();
    assert_eq!(registered, vec!["example.com", "example.io"]);
}
