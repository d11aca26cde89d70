//! Round-trip probe core
//!
//! One probe run races two concurrently-scheduled units against the
//! configured critical deadline: the reply listener (a spawned task that
//! blocks on the reply queue) and the publisher (invoked inline by the
//! coordinator). They share no mutable state; the broker carries the reply
//! and a cancellation token plus a bounded channel carry the start/stop and
//! receipt signals.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{timeout, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ProbeConfig;

pub mod listener;
pub mod publisher;

pub use listener::AmqpReplyListener;
pub use publisher::AmqpProbePublisher;

/// How long the coordinator waits for a cancelled listener to wind down
/// before aborting its task outright.
const LISTENER_SHUTDOWN_GRACE: Duration = Duration::from_millis(250);

/// Sends the probe message.
///
/// Implementations must convert every transport failure into `false`; the
/// coordinator's control flow stays linear because nothing propagates past
/// this boundary.
#[async_trait]
pub trait ProbePublisher: Send + Sync {
    async fn publish(&self, config: &ProbeConfig) -> bool;
}

/// Blocks on the reply destination for exactly one inbound message.
///
/// Implementations attach to `config.reply_to`, consume the first message
/// regardless of content, send one unit on `reply_tx`, and return. The whole
/// body must be preemptible via `cancel`, including mid-attach; broker-side
/// cleanup is left to the broker on disconnect.
#[async_trait]
pub trait ReplyListener: Send + Sync + 'static {
    async fn listen(
        &self,
        config: ProbeConfig,
        cancel: CancellationToken,
        reply_tx: mpsc::Sender<()>,
    );
}

/// Result of one probe run, created exactly once by the coordinator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProbeOutcome {
    /// Publish succeeded and the reply arrived inside the wait bound.
    Replied { elapsed_ms: f64 },
    /// Publish succeeded but no receipt signal arrived before the critical
    /// bound elapsed (or the listener died without signaling). `waited_ms`
    /// is the wall-clock actually spent; for classification the round trip
    /// counts as infinite.
    NoReply { waited_ms: f64 },
    /// The probe message could not be published; nothing was measured.
    PublishFailed,
}

impl ProbeOutcome {
    pub fn publish_succeeded(&self) -> bool {
        !matches!(self, ProbeOutcome::PublishFailed)
    }

    /// Wall-clock milliseconds spent, for the performance-data line.
    pub fn measured_ms(&self) -> Option<f64> {
        match self {
            ProbeOutcome::Replied { elapsed_ms } => Some(*elapsed_ms),
            ProbeOutcome::NoReply { waited_ms } => Some(*waited_ms),
            ProbeOutcome::PublishFailed => None,
        }
    }

    /// Elapsed value fed into classification. A run without a reply counts
    /// as infinitely slow so it always lands in the critical band, even when
    /// the listener died long before the bound.
    pub fn classifier_input_ms(&self) -> Option<f64> {
        match self {
            ProbeOutcome::Replied { elapsed_ms } => Some(*elapsed_ms),
            ProbeOutcome::NoReply { .. } => Some(f64::INFINITY),
            ProbeOutcome::PublishFailed => None,
        }
    }
}

/// Orchestrates one round-trip measurement.
pub struct RoundTripCoordinator<P, L> {
    publisher: P,
    listener: Arc<L>,
}

impl<P, L> RoundTripCoordinator<P, L>
where
    P: ProbePublisher,
    L: ReplyListener,
{
    pub fn new(publisher: P, listener: L) -> Self {
        Self {
            publisher,
            listener: Arc::new(listener),
        }
    }

    /// Run one probe: spawn the listener, publish, race the receipt signal
    /// against the critical deadline.
    ///
    /// The listener task is guaranteed terminated (normally or forcibly)
    /// before this returns, on every exit path.
    pub async fn run(&self, config: &ProbeConfig) -> ProbeOutcome {
        // Fresh token and receipt channel per run: a stale signal from an
        // earlier listener instance can never leak into this measurement.
        let cancel = CancellationToken::new();
        let (reply_tx, mut reply_rx) = mpsc::channel(1);

        // The listener must be attaching before the probe message goes out;
        // a reply to a message sent first would be lost forever. The spawn
        // is fire-and-forget: there is no readiness handshake with the
        // broker, matching the wait-bound semantics of the measurement.
        let listener = Arc::clone(&self.listener);
        let listener_config = config.clone();
        let listener_cancel = cancel.clone();
        let listener_task = tokio::spawn(async move {
            listener.listen(listener_config, listener_cancel, reply_tx).await;
        });

        let started = Instant::now();

        if !self.publisher.publish(config).await {
            // Nothing was sent, so no reply can ever arrive. Short-circuit
            // without touching the wait bound.
            warn!("probe publish failed, skipping reply wait");
            shutdown_listener(&cancel, listener_task).await;
            return ProbeOutcome::PublishFailed;
        }

        let bound = Duration::from_millis(config.critical_ms);
        let outcome = match timeout(bound, reply_rx.recv()).await {
            Ok(Some(())) => ProbeOutcome::Replied {
                elapsed_ms: round_trip_ms(started),
            },
            Ok(None) => {
                // The listener exited without signaling. Indistinguishable
                // from a timeout as far as the verdict is concerned: no
                // reply was observed.
                debug!("listener exited without a receipt signal");
                ProbeOutcome::NoReply {
                    waited_ms: round_trip_ms(started),
                }
            }
            Err(_) => ProbeOutcome::NoReply {
                waited_ms: round_trip_ms(started),
            },
        };

        shutdown_listener(&cancel, listener_task).await;
        outcome
    }
}

/// Cancel the listener and wait briefly for it to wind down; abort the task
/// if it overruns the grace period. Never blocks indefinitely.
async fn shutdown_listener(cancel: &CancellationToken, mut task: JoinHandle<()>) {
    cancel.cancel();
    if timeout(LISTENER_SHUTDOWN_GRACE, &mut task).await.is_err() {
        debug!("listener did not stop within grace period, aborting task");
        task.abort();
    }
}

/// Elapsed wall-clock since `started`, in milliseconds rounded to 2 decimals.
fn round_trip_ms(started: Instant) -> f64 {
    let millis = started.elapsed().as_secs_f64() * 1000.0;
    (millis * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_accessors() {
        let replied = ProbeOutcome::Replied { elapsed_ms: 102.35 };
        assert!(replied.publish_succeeded());
        assert_eq!(replied.measured_ms(), Some(102.35));
        assert_eq!(replied.classifier_input_ms(), Some(102.35));

        let silent = ProbeOutcome::NoReply { waited_ms: 20001.4 };
        assert!(silent.publish_succeeded());
        assert_eq!(silent.measured_ms(), Some(20001.4));
        assert_eq!(silent.classifier_input_ms(), Some(f64::INFINITY));

        let failed = ProbeOutcome::PublishFailed;
        assert!(!failed.publish_succeeded());
        assert_eq!(failed.measured_ms(), None);
        assert_eq!(failed.classifier_input_ms(), None);
    }

    #[tokio::test]
    async fn test_round_trip_ms_rounds_to_two_decimals() {
        let started = Instant::now();
        let elapsed = round_trip_ms(started);
        assert!(elapsed >= 0.0);
        // No more than two decimal places survive the rounding.
        let centis = elapsed * 100.0;
        assert!((centis - centis.round()).abs() < 1e-9);
    }
}
