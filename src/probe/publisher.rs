//! Probe publisher: sends the single probe message
//!
//! The publisher owns its broker connection exclusively: connect, open one
//! channel, publish one message carrying the configured headers and the
//! reply-to queue, close. Every transport or protocol failure collapses to
//! `false` at the trait boundary.

use async_trait::async_trait;
use lapin::options::BasicPublishOptions;
use lapin::types::ShortString;
use lapin::{BasicProperties, Connection};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::config::ProbeConfig;
use crate::error::ProbeResult;
use crate::probe::ProbePublisher;
use crate::transport::amqp;

/// AMQP implementation of the probe publisher.
#[derive(Debug, Default)]
pub struct AmqpProbePublisher;

impl AmqpProbePublisher {
    pub fn new() -> Self {
        Self
    }

    async fn send_probe(config: &ProbeConfig) -> ProbeResult<()> {
        let connection =
            Connection::connect_uri(amqp::broker_uri(config), amqp::connection_properties())
                .await?;
        let channel = connection.create_channel().await?;

        let properties = BasicProperties::default()
            .with_reply_to(ShortString::from(config.reply_to.clone()))
            .with_message_id(ShortString::from(Uuid::new_v4().to_string()))
            .with_headers(amqp::headers_table(&config.headers));

        channel
            .basic_publish(
                &config.exchange,
                &config.routing_key,
                BasicPublishOptions::default(),
                config.body.as_bytes(),
                properties,
            )
            .await?
            .await?;

        debug!(
            exchange = %config.exchange,
            routing_key = %config.routing_key,
            reply_to = %config.reply_to,
            "probe message published"
        );

        channel.close(amqp::REPLY_SUCCESS, "probe sent").await?;
        connection.close(amqp::REPLY_SUCCESS, "probe sent").await?;
        Ok(())
    }
}

#[async_trait]
impl ProbePublisher for AmqpProbePublisher {
    async fn publish(&self, config: &ProbeConfig) -> bool {
        match Self::send_probe(config).await {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "probe publish failed");
                false
            }
        }
    }
}
