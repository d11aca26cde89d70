//! Testing utilities and mock implementations
//!
//! This module provides mock publisher and listener implementations so the
//! round-trip coordinator can be exercised without a running broker.

pub mod mocks;

pub use mocks::*;

use crate::config::ProbeConfig;
use std::collections::BTreeMap;

/// A ProbeConfig pointing at nothing in particular, for coordinator tests
/// driven entirely by mocks.
pub fn sample_probe_config(warning_ms: u64, critical_ms: u64) -> ProbeConfig {
    ProbeConfig {
        host: "localhost".to_string(),
        port: 5672,
        username: "guest".to_string(),
        password: "guest".to_string(),
        vhost: "/".to_string(),
        exchange: String::new(),
        routing_key: "probe-target".to_string(),
        reply_to: "probe-reply".to_string(),
        body: String::new(),
        headers: BTreeMap::new(),
        warning_ms,
        critical_ms,
    }
}
