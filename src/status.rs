//! Verdict classification per the Nagios plugin convention
//!
//! See <https://icinga.com/docs/icinga-2/latest/doc/05-service-monitoring/#status>
//! for the status/exit-code mapping consumed by monitoring schedulers.

use std::fmt;

/// Four-valued health verdict with the conventional plugin exit codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Ok,
    Warning,
    Critical,
    Unknown,
}

impl Verdict {
    /// Process exit code the monitoring scheduler interprets.
    pub fn exit_code(self) -> i32 {
        match self {
            Verdict::Ok => 0,
            Verdict::Warning => 1,
            Verdict::Critical => 2,
            Verdict::Unknown => 3,
        }
    }

    /// Upper-case label used in the plugin output line.
    pub fn label(self) -> &'static str {
        match self {
            Verdict::Ok => "OK",
            Verdict::Warning => "WARNING",
            Verdict::Critical => "CRITICAL",
            Verdict::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Map a measured round-trip time to a verdict.
///
/// `None` means nothing was measured (the publish step failed) and is always
/// UNKNOWN, whatever the thresholds. The remaining checks run in severity
/// order and must stay in this order: thresholds may coincide, and a tie
/// resolves toward the more severe band. An elapsed value of zero or below
/// never happened on a real clock and falls through to UNKNOWN.
pub fn classify(elapsed_ms: Option<f64>, warning_ms: u64, critical_ms: u64) -> Verdict {
    let Some(elapsed) = elapsed_ms else {
        return Verdict::Unknown;
    };

    if elapsed >= critical_ms as f64 {
        Verdict::Critical
    } else if elapsed >= warning_ms as f64 {
        Verdict::Warning
    } else if elapsed > 0.0 {
        Verdict::Ok
    } else {
        Verdict::Unknown
    }
}
