//! Plugin output formatting
//!
//! stdout belongs to the monitoring scheduler: exactly one line per
//! invocation, either the measured status line with performance data or the
//! UNKNOWN short circuit. Everything else the probe has to say goes to
//! stderr via tracing.

use crate::status::Verdict;

/// Service label leading every output line.
pub const SERVICE_NAME: &str = "SERVICE";

/// The measured status line with `rta` performance data:
/// `SERVICE OK: Roundtrip 102.35ms|'rta'=102.35;5000;20000;0;20000`
///
/// Performance-data fields are value;warn;crit;min;max. The critical
/// threshold doubles as the max since the probe never waits longer.
pub fn status_line(verdict: Verdict, elapsed_ms: f64, warning_ms: u64, critical_ms: u64) -> String {
    format!(
        "{SERVICE_NAME} {verdict}: Roundtrip {elapsed_ms}ms|'rta'={elapsed_ms};{warning_ms};{critical_ms};0;{critical_ms}"
    )
}

/// The short-circuit line for failures before anything was measured.
pub fn unknown_line(reason: &str) -> String {
    format!("{SERVICE_NAME} {} - {reason}", Verdict::Unknown)
}
