//! TLD list retrieval.
//!
//! Downloads the newline-delimited IANA list of delegated TLDs. The file
//! starts with a `# Version ...` comment line followed by one upper-case
//! TLD per line.

use crate::error::TldEnumError;
use crate::types::DEFAULT_TLD_URL;
use std::time::Duration;
use tracing::{debug, info};

/// Fetch every TLD from the default IANA list.
pub async fn fetch_tlds() -> Result<Vec<String>, TldEnumError> {
    fetch_tlds_from(DEFAULT_TLD_URL).await
}

/// Fetch every TLD from a specific URL.
///
/// Performs a single GET. A non-success status is a fatal
/// [`TldEnumError::Fetch`] carrying the status code.
pub async fn fetch_tlds_from(url: &str) -> Result<Vec<String>, TldEnumError> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(30))
        .build()
        .map_err(|e| TldEnumError::fetch(url, format!("failed to create HTTP client: {}", e)))?;

    debug!(url, "fetching TLD list");

    let response = client.get(url).send().await?;

    let status = response.status();
    if !status.is_success() {
        return Err(TldEnumError::fetch_status(url, status.as_u16()));
    }

    let body = response.text().await?;

    let tlds = parse_tld_list(&body);
    info!(count = tlds.len(), "fetched TLD list");
    Ok(tlds)
}

/// Parse the body of a TLD list.
///
/// Lines starting with `#` are comments. Every other non-blank line is
/// lower-cased and returned in file order.
pub fn parse_tld_list(body: &str) -> Vec<String> {
    body.lines()
        .filter(|line| !line.starts_with('#'))
        .map(|line| line.trim())
        .filter(|line| !line.is_empty())
        .map(|line| line.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Serve one raw HTTP response on a local port and return the list URL.
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();

        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                match stream.read(&mut buf) {
                    Ok(0) | Err(_) => break,
                    Ok(n) => request.extend_from_slice(&buf[..n]),
                }
            }
            let _ = stream.write_all(response.as_bytes());
        });

        format!("http://{}/tlds-alpha-by-domain.txt", addr)
    }

    #[tokio::test]
    async fn test_fetch_non_success_status_is_fatal() {
        let url = serve_once(
            "HTTP/1.1 503 Service Unavailable\r\nContent-Length: 0\r\nConnection: close\r\n\r\n",
        );

        let err = fetch_tlds_from(&url).await.unwrap_err();
        match &err {
            TldEnumError::Fetch {
                url: failed_url,
                status_code,
                ..
            } => {
                assert_eq!(*status_code, Some(503));
                assert_eq!(failed_url, &url);
            }
            other => panic!("expected fetch error, got {:?}", other),
        }
        assert!(err.to_string().starts_with("Failed to fetch TLDs"));
    }

    #[tokio::test]
    async fn test_fetch_parses_served_list() {
        let url = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Type: text/plain\r\nContent-Length: 28\r\nConnection: close\r\n\r\n# Version 2026101900\nCOM\nIO\n",
        );

        let tlds = fetch_tlds_from(&url).await.unwrap();
        assert_eq!(tlds, vec!["com", "io"]);
    }

    #[tokio::test]
    async fn test_fetch_connection_refused_has_no_status() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = fetch_tlds_from(&format!("http://{}/tlds.txt", addr))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            TldEnumError::Fetch {
                status_code: None,
                ..
            }
        ));
    }

    #[test]
    fn test_parse_skips_comments_and_lowercases() {
        let body = "# Version 2026101900, Last Updated Mon Oct 19 07:07:01 2026 UTC\nAAA\nCOM\nXN--11B4C3D\nZW\n";
        assert_eq!(
            parse_tld_list(body),
            vec!["aaa", "com", "xn--11b4c3d", "zw"]
        );
    }

    #[test]
    fn test_parse_keeps_file_order() {
        let body = "ORG\n#comment\nCOM\nIO";
        assert_eq!(parse_tld_list(body), vec!["org", "com", "io"]);
    }

    #[test]
    fn test_parse_ignores_blank_lines() {
        let body = "COM\n\n  \nNET\r\n";
        assert_eq!(parse_tld_list(body), vec!["com", "net"]);
    }

    #[test]
    fn test_parse_only_comments() {
        assert!(parse_tld_list("# one\n# two\n").is_empty());
    }
}
