//! Mock implementations for testing
//!
//! Provides mock ProbePublisher and ReplyListener implementations to enable
//! coordinator testing without an AMQP broker.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio_util::sync::CancellationToken;

use crate::config::ProbeConfig;
use crate::probe::{ProbePublisher, ReplyListener};

/// Mock publisher for testing
#[derive(Debug, Default)]
pub struct MockPublisher {
    pub should_fail: bool,
    pub published: Arc<Mutex<Vec<ProbeConfig>>>,
}

impl MockPublisher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_failure() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    pub async fn published_configs(&self) -> Vec<ProbeConfig> {
        self.published.lock().await.clone()
    }
}

#[async_trait]
impl ProbePublisher for MockPublisher {
    async fn publish(&self, config: &ProbeConfig) -> bool {
        self.published.lock().await.push(config.clone());
        !self.should_fail
    }
}

/// Scripted listener behaviors
#[derive(Debug, Clone, Copy)]
pub enum ListenerScript {
    /// Signal receipt after the given delay, unless cancelled first.
    ReplyAfter(Duration),
    /// Never signal; wait for cancellation.
    Silent,
    /// Exit immediately without signaling, simulating a listener crash.
    ExitWithoutSignal,
    /// Sleep through cancellation, then try to signal anyway. Simulates a
    /// stale reply racing the coordinator's shutdown.
    ReplyIgnoringCancel(Duration),
}

/// Mock listener for testing
///
/// The flags record what the coordinator did to the listener: `cancelled`
/// flips when the cancellation token fired, `finished` when the listener
/// body ran to completion (rather than being aborted).
#[derive(Debug)]
pub struct MockListener {
    script: ListenerScript,
    pub cancelled: Arc<AtomicBool>,
    pub finished: Arc<AtomicBool>,
}

impl MockListener {
    pub fn new(script: ListenerScript) -> Self {
        Self {
            script,
            cancelled: Arc::new(AtomicBool::new(false)),
            finished: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn was_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }

    pub fn has_finished(&self) -> bool {
        self.finished.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ReplyListener for MockListener {
    async fn listen(
        &self,
        _config: ProbeConfig,
        cancel: CancellationToken,
        reply_tx: mpsc::Sender<()>,
    ) {
        match self.script {
            ListenerScript::ReplyAfter(delay) => {
                tokio::select! {
                    _ = cancel.cancelled() => {
                        self.cancelled.store(true, Ordering::SeqCst);
                    }
                    _ = tokio::time::sleep(delay) => {
                        let _ = reply_tx.send(()).await;
                    }
                }
            }
            ListenerScript::Silent => {
                cancel.cancelled().await;
                self.cancelled.store(true, Ordering::SeqCst);
            }
            ListenerScript::ExitWithoutSignal => {}
            ListenerScript::ReplyIgnoringCancel(delay) => {
                tokio::time::sleep(delay).await;
                let _ = reply_tx.send(()).await;
            }
        }
        self.finished.store(true, Ordering::SeqCst);
    }
}
