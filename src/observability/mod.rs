//! Observability for the probe
//!
//! A monitoring plugin owns its stdout, so all diagnostics are structured
//! logs on stderr.

pub mod logging;

// Re-export for convenience
pub use logging::{init_default_logging, init_logging, LogFormat};
