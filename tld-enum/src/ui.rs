//! Terminal output for the enumeration run.
//!
//! Progress goes to stderr through an `indicatif` bar so stdout stays clean.
//! While the bar is active, log lines are routed through it as well so they
//! print above the bar instead of tearing it.

use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;
use tld_enum_lib::{CheckResult, DetectionMethod, ProgressObserver, Report};

// ── Progress bar ─────────────────────────────────────────────────────────────

/// The bar currently on screen, if any.
static ACTIVE_BAR: Mutex<Option<ProgressBar>> = Mutex::new(None);

fn set_active_bar(bar: Option<ProgressBar>) {
    if let Ok(mut guard) = ACTIVE_BAR.lock() {
        *guard = bar;
    }
}

fn active_bar() -> Option<ProgressBar> {
    ACTIVE_BAR.lock().ok().and_then(|guard| guard.clone())
}

/// Progress display for an enumeration run.
#[derive(Default)]
pub struct ProgressUi {
    bar: Option<ProgressBar>,
    found: usize,
}

impl ProgressUi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered domains announced so far.
    pub fn found(&self) -> usize {
        self.found
    }

    /// Clear the bar and stop routing logs through it.
    pub fn finish(&self) {
        if let Some(bar) = &self.bar {
            bar.finish_and_clear();
        }
        set_active_bar(None);
    }

    fn announce(&self, line: String) {
        match &self.bar {
            Some(bar) if !bar.is_hidden() => bar.println(line),
            _ => println!("{}", line),
        }
    }
}

impl ProgressObserver for ProgressUi {
    fn on_start(&mut self, total: usize) {
        let bar = ProgressBar::new(total as u64);
        let bar_style = ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .map(|s| s.progress_chars("#>-"))
            .unwrap_or_else(|_| ProgressStyle::default_bar());
        bar.set_style(bar_style);
        bar.set_message("Checking domains");
        bar.enable_steady_tick(Duration::from_millis(100));

        set_active_bar(Some(bar.clone()));
        self.bar = Some(bar);
    }

    fn on_checked(&mut self, domain: &str, result: &CheckResult, _completed: usize, _total: usize) {
        if let Some(method) = result.method() {
            self.found += 1;
            self.announce(found_line(domain, method));
        }

        if let Some(bar) = &self.bar {
            bar.set_message(format!("Checked {}", domain));
            bar.inc(1);
        }
    }
}

/// One-line notice for a detected registration.
pub fn found_line(domain: &str, method: DetectionMethod) -> String {
    format!(
        "{} {} (method: {})",
        style("FOUND REGISTERED:").green().bold(),
        domain,
        method
    )
}

// ── Summary ──────────────────────────────────────────────────────────────────

/// Print the final counts after enumeration.
pub fn print_summary(report: &Report, duration: Duration) {
    let total = report.len();
    let registered = report.values().filter(|e| e.registered).count();

    println!(
        "  {} domain{} in {:.1}s  {}  {}  {}  {}",
        style(total).bold(),
        if total == 1 { "" } else { "s" },
        duration.as_secs_f64(),
        style("|").dim(),
        style(format!("{} registered", registered)).green(),
        style("|").dim(),
        style(format!("{} unregistered", total - registered)).dim(),
    );
}

// ── Log routing ──────────────────────────────────────────────────────────────

/// Writer that sends complete lines through the active progress bar, or to
/// stderr when no bar is on screen.
#[derive(Default)]
pub struct ProgressWriter {
    buffer: Vec<u8>,
}

impl ProgressWriter {
    fn emit(line: &str) -> std::io::Result<()> {
        match active_bar() {
            Some(bar) if !bar.is_hidden() => {
                bar.println(line);
                Ok(())
            }
            _ => {
                let mut stderr = std::io::stderr();
                stderr.write_all(line.as_bytes())?;
                stderr.write_all(b"\n")
            }
        }
    }
}

impl Write for ProgressWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.extend_from_slice(buf);

        while let Some(newline_pos) = self.buffer.iter().position(|&b| b == b'\n') {
            let line: Vec<u8> = self.buffer.drain(..=newline_pos).collect();
            let line = String::from_utf8_lossy(&line);
            Self::emit(line.trim_end_matches('\n'))?;
        }

        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        if !self.buffer.is_empty() {
            let rest = String::from_utf8_lossy(&self.buffer).into_owned();
            self.buffer.clear();
            let rest = rest.trim_end();
            if !rest.is_empty() {
                Self::emit(rest)?;
            }
        }
        Ok(())
    }
}

impl Drop for ProgressWriter {
    fn drop(&mut self) {
        let _ = self.flush();
    }
}

/// `MakeWriter` handing out [`ProgressWriter`]s to tracing-subscriber.
#[derive(Default, Clone, Copy)]
pub struct ProgressWriterFactory;

impl<'a> tracing_subscriber::fmt::MakeWriter<'a> for ProgressWriterFactory {
    type Writer = ProgressWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ProgressWriter::default()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
