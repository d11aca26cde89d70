//! check-amqp - Active AMQP round-trip health probe
//!
//! Publishes a probe message into an AMQP broker, concurrently listens on a
//! reply queue, measures the round-trip latency and classifies it for a
//! Nagios/Icinga-style monitoring scheduler.
//!
//! # Overview
//!
//! This crate provides:
//! - A round-trip coordinator racing a cancellable reply listener against
//!   the critical deadline
//! - AMQP publisher/listener implementations on top of `lapin`
//! - A pure latency classifier with the conventional plugin exit codes
//! - Plugin-protocol output formatting (status line + performance data)
//!
//! # Quick Start
//!
//! ```rust
//! use check_amqp::report::status_line;
//! use check_amqp::status::{classify, Verdict};
//!
//! // A 102.35ms round trip against warning=5000ms, critical=20000ms
//! let verdict = classify(Some(102.35), 5000, 20000);
//! assert_eq!(verdict, Verdict::Ok);
//! assert_eq!(verdict.exit_code(), 0);
//!
//! assert_eq!(
//!     status_line(verdict, 102.35, 5000, 20000),
//!     "SERVICE OK: Roundtrip 102.35ms|'rta'=102.35;5000;20000;0;20000"
//! );
//!
//! // No measurement (publish failed) is UNKNOWN whatever the thresholds
//! assert_eq!(classify(None, 5000, 20000), Verdict::Unknown);
//! ```

pub mod config;
pub mod error;
pub mod observability;
pub mod probe;
pub mod report;
pub mod status;
pub mod testing;
pub mod transport;

pub use config::{BrokerCredentials, ConfigError, CredentialsFile, ProbeConfig};
pub use error::{ProbeError, ProbeResult};
pub use probe::{
    AmqpProbePublisher, AmqpReplyListener, ProbeOutcome, ProbePublisher, ReplyListener,
    RoundTripCoordinator,
};
pub use status::{classify, Verdict};
