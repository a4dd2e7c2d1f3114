#![warn(missing_docs)]

//! Shared logging helpers, CLI argument definitions, and tracing utilities for csvsync.
//!
//! This crate consolidates logging infrastructure:
//! - CLI argument parsing for log level configuration
//! - Filter spec computation scoped to our crates
//! - [`file`]: an append-only file sink for a second `fmt` layer

use std::env;

use clap::Args;
use tracing_subscriber::EnvFilter;

pub mod file;

/// Directive appended to user-provided `RUST_LOG` specs to quiet the
/// WebSocket stack's per-frame chatter.
const TRANSPORT_QUIET: &str = "tungstenite=warn,tokio_tungstenite=warn";

/// Logging controls for CLI apps.
#[derive(Debug, Clone, Default, Args)]
pub struct LogArgs {
    /// Set global log level to trace (our crates only)
    #[arg(long, conflicts_with_all = ["debug", "log_level", "log_filter"])]
    pub trace: bool,

    /// Set global log level to debug (our crates only)
    #[arg(long, conflicts_with_all = ["trace", "log_level", "log_filter"])]
    pub debug: bool,

    /// Set a single global log level for our crates (error|warn|info|debug|trace)
    #[arg(long)]
    pub log_level: Option<String>,

    /// Set an explicit tracing filter directive (overrides other flags)
    /// e.g. "sync_engine=trace,obs_client=debug"
    #[arg(long)]
    pub log_filter: Option<String>,
}

impl LogArgs {
    /// Compute the filter spec for these flags, falling back to `default_level`
    /// (usually from the config file) when neither flags nor `RUST_LOG` decide.
    pub fn spec(&self, default_level: Option<&str>) -> String {
        compute_spec(
            self.trace,
            self.debug,
            self.log_level.as_deref(),
            self.log_filter.as_deref(),
            default_level,
        )
    }
}

/// List of crate targets that constitute "our" logs.
pub fn our_crates() -> &'static [&'static str] {
    &[
        "csvsync",
        "sync_engine",
        "obs_client",
        "obs_protocol",
        "config",
        "logging",
    ]
}

/// Build a filter directive string that sets the same `level` for all of our crates.
pub fn level_spec_for(level: &str) -> String {
    let lvl = level.to_ascii_lowercase();
    our_crates()
        .iter()
        .map(|t| format!("{}={}", t, lvl))
        .collect::<Vec<_>>()
        .join(",")
}

/// Compute the final filter spec string with precedence:
/// - `log_filter`
/// - `trace`/`debug`/`log_level` (crate-scoped)
/// - `RUST_LOG` env (plus transport suppression if not present)
/// - `default_level` (crate-scoped)
/// - default to crate-scoped `info`
pub fn compute_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
    default_level: Option<&str>,
) -> String {
    resolve_spec(
        trace,
        debug,
        log_level,
        log_filter,
        env::var("RUST_LOG").ok().as_deref(),
        default_level,
    )
}

/// [`compute_spec`] with the `RUST_LOG` value passed in.
fn resolve_spec(
    trace: bool,
    debug: bool,
    log_level: Option<&str>,
    log_filter: Option<&str>,
    rust_log: Option<&str>,
    default_level: Option<&str>,
) -> String {
    if let Some(spec) = log_filter {
        return spec.to_string();
    }
    if trace {
        return level_spec_for("trace");
    }
    if debug {
        return level_spec_for("debug");
    }
    if let Some(lvl) = log_level {
        return level_spec_for(lvl);
    }
    if let Some(spec) = rust_log.filter(|s| !s.trim().is_empty()) {
        return if spec.contains("tungstenite") {
            spec.to_string()
        } else {
            format!("{},{}", spec, TRANSPORT_QUIET)
        };
    }
    level_spec_for(default_level.unwrap_or("info"))
}

/// Create an `EnvFilter` from a spec string.
pub fn env_filter_from_spec(spec: &str) -> EnvFilter {
    EnvFilter::new(spec)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_filter_wins() {
        let s = resolve_spec(true, false, Some("warn"), Some("x=trace"), Some("y=debug"), None);
        assert_eq!(s, "x=trace");
    }

    #[test]
    fn flags_scope_to_our_crates() {
        let s = resolve_spec(false, true, None, None, Some("y=trace"), Some("warn"));
        assert!(s.contains("sync_engine=debug"));
        assert!(s.contains("csvsync=debug"));
        assert!(!s.contains("y=trace"));

        let s = resolve_spec(false, false, Some("WARN"), None, None, None);
        assert!(s.contains("obs_client=warn"));
    }

    #[test]
    fn rust_log_gets_transport_suppression() {
        let s = resolve_spec(false, false, None, None, Some("obs_client=trace"), Some("error"));
        assert_eq!(s, format!("obs_client=trace,{TRANSPORT_QUIET}"));

        let s = resolve_spec(false, false, None, None, Some("tungstenite=trace"), None);
        assert_eq!(s, "tungstenite=trace");
    }

    #[test]
    fn config_default_then_info() {
        let s = resolve_spec(false, false, None, None, None, Some("debug"));
        assert_eq!(s, level_spec_for("debug"));
        let s = resolve_spec(false, false, None, None, Some("  "), None);
        assert_eq!(s, level_spec_for("info"));
    }
}
