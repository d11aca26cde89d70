//! Reply listener: consumes the first message on the reply queue
//!
//! The listener owns its broker connection exclusively. It declares the
//! reply queue, consumes with auto-ack, and stops after the first delivery
//! whatever its content; a probe assumes it is the sole consumer of its
//! uniquely named reply queue, so no correlation filtering happens here.

use async_trait::async_trait;
use futures::StreamExt;
use lapin::options::{BasicConsumeOptions, QueueDeclareOptions};
use lapin::types::FieldTable;
use lapin::Connection;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::config::ProbeConfig;
use crate::error::ProbeResult;
use crate::probe::ReplyListener;
use crate::transport::amqp;

/// AMQP implementation of the reply listener.
#[derive(Debug, Default)]
pub struct AmqpReplyListener;

impl AmqpReplyListener {
    pub fn new() -> Self {
        Self
    }

    async fn consume_first(config: &ProbeConfig, reply_tx: &mpsc::Sender<()>) -> ProbeResult<()> {
        let connection =
            Connection::connect_uri(amqp::broker_uri(config), amqp::connection_properties())
                .await?;
        let channel = connection.create_channel().await?;

        channel
            .queue_declare(
                &config.reply_to,
                QueueDeclareOptions::default(),
                FieldTable::default(),
            )
            .await?;

        let consume_options = BasicConsumeOptions {
            no_ack: true,
            ..BasicConsumeOptions::default()
        };
        let mut consumer = channel
            .basic_consume(
                &config.reply_to,
                &amqp::consumer_tag(),
                consume_options,
                FieldTable::default(),
            )
            .await?;

        debug!(queue = %config.reply_to, "listener attached to reply queue");

        if let Some(delivery) = consumer.next().await {
            delivery?;
            // The channel is bounded at 1 and the receiver outlives the
            // wait bound, so a failed send only means the coordinator has
            // already stopped caring.
            let _ = reply_tx.send(()).await;
            debug!(queue = %config.reply_to, "reply received");
        }

        let _ = connection.close(amqp::REPLY_SUCCESS, "reply received").await;
        Ok(())
    }
}

#[async_trait]
impl ReplyListener for AmqpReplyListener {
    async fn listen(
        &self,
        config: ProbeConfig,
        cancel: CancellationToken,
        reply_tx: mpsc::Sender<()>,
    ) {
        tokio::select! {
            _ = cancel.cancelled() => {
                // Dropping the connection mid-attach or mid-consume is the
                // whole cancellation story; the broker reclaims whatever
                // state the listener left behind on disconnect.
                debug!(queue = %config.reply_to, "listener cancelled");
            }
            result = Self::consume_first(&config, &reply_tx) => {
                if let Err(e) = result {
                    // The coordinator observes listener failures only as
                    // absence of the receipt signal.
                    warn!(queue = %config.reply_to, error = %e, "listener failed");
                }
            }
        }
    }
}
