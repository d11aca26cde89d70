//! Error types for the probe
//!
//! Failures never cross the component boundaries described in the probe
//! design: the publisher collapses everything to a boolean, the listener
//! logs and goes silent, and configuration errors become the UNKNOWN
//! short-circuit line. `ProbeError` is the internal currency before those
//! conversions happen.

use thiserror::Error;

/// Main error type for probe operations
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Transport error: {0}")]
    Transport(#[from] lapin::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),
}

/// Result type for probe operations
pub type ProbeResult<T> = Result<T, ProbeError>;
