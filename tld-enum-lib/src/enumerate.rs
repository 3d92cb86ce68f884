//! Concurrent enumeration of a base name across TLDs.
//!
//! Every check runs as its own task on the tokio runtime, so on a
//! multi-thread runtime checks execute in parallel on the worker threads.
//! At most `concurrency` tasks exist at once and they complete in any order.
//! Results flow back into a single consumer that owns the report, so no
//! task ever touches shared state.

use crate::checker::DomainCheck;
use crate::error::TldEnumError;
use crate::types::{CheckResult, Report, ReportEntry};
use crate::utils::expand_base_name;
use futures::stream::{self, StreamExt};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Receives progress while an enumeration runs.
pub trait ProgressObserver {
    /// Called once before the first check with the number of domains.
    fn on_start(&mut self, _total: usize) {}

    /// Called once per completed check, in completion order.
    fn on_checked(&mut self, domain: &str, result: &CheckResult, completed: usize, total: usize);
}

/// Observer that ignores all progress.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressObserver for NoProgress {
    fn on_checked(&mut self, _: &str, _: &CheckResult, _: usize, _: usize) {}
}

impl<F> ProgressObserver for F
where
    F: FnMut(&str, &CheckResult, usize, usize),
{
    fn on_checked(&mut self, domain: &str, result: &CheckResult, completed: usize, total: usize) {
        self(domain, result, completed, total)
    }
}

/// Check `<base_name>.<tld>` for every TLD.
///
/// At most `concurrency` checks are in flight (values below 1 are treated
/// as 1). The returned report has exactly one entry per distinct TLD,
/// whatever the concurrency. A check task that panics is recorded as
/// unregistered.
///
/// Must be called from within a tokio runtime.
pub async fn enumerate<C, P>(
    base_name: &str,
    tlds: &[String],
    concurrency: usize,
    checker: &Arc<C>,
    observer: &mut P,
) -> Report
where
    C: DomainCheck + Send + Sync + 'static,
    P: ProgressObserver + ?Sized,
{
    let domains = expand_base_name(base_name, tlds);
    let total = domains.len();
    let concurrency = concurrency.max(1);

    info!(base_name, total, concurrency, "starting enumeration");
    observer.on_start(total);

    let checks = domains.into_iter().map(|domain| {
        let checker = Arc::clone(checker);
        async move {
            let task_domain = domain.clone();
            let handle = tokio::spawn(async move { checker.check(&task_domain).await });
            let result = match handle.await {
                Ok(result) => result,
                Err(e) => {
                    let err = TldEnumError::internal(format!(
                        "check task for {} failed: {}",
                        domain, e
                    ));
                    warn!(domain = %domain, error = %err, "check aborted");
                    CheckResult::Unregistered
                }
            };
            (domain, result)
        }
    });

    let mut results = stream::iter(checks).buffer_unordered(concurrency);
    let mut report = Report::new();
    let mut completed = 0usize;

    while let Some((domain, result)) = results.next().await {
        completed += 1;
        if let Some(method) = result.method() {
            debug!(domain = %domain, %method, "registration detected");
        }
        observer.on_checked(&domain, &result, completed, total);
        report.insert(domain, ReportEntry::from(result));
    }

    info!(
        checked = report.len(),
        registered = report.values().filter(|e| e.registered).count(),
        "enumeration finished"
    );

    report
}
