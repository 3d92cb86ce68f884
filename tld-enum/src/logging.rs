//! Tracing setup shared by both binaries.

use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::EnvFilter;

/// Resolver crates log every failed query; those are expected per domain.
const COLLABORATOR_DIRECTIVES: &str = "hickory_proto=error,hickory_resolver=error";

/// Filter used when `RUST_LOG` is not set.
pub fn default_directives(verbose: bool) -> String {
    let level = if verbose { "info" } else { "warn" };
    format!("{},{}", level, COLLABORATOR_DIRECTIVES)
}

/// Install the global subscriber, writing through `writer`.
pub fn init_logging<W>(verbose: bool, writer: W)
where
    W: for<'a> MakeWriter<'a> + Send + Sync + 'static,
{
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives(verbose)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(writer)
        .init();
}
