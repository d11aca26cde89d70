//! AMQP connection plumbing shared by the publisher and the listener
//!
//! Both probe units open their own exclusively-owned connection through
//! these helpers and close it themselves before exiting.

use lapin::types::{AMQPValue, FieldTable, LongString, ShortString};
use lapin::uri::{AMQPAuthority, AMQPUri, AMQPUserInfo};
use lapin::ConnectionProperties;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::config::ProbeConfig;

/// AMQP reply code for a clean connection/channel close.
pub const REPLY_SUCCESS: u16 = 200;

/// Build the broker URI from the probe configuration.
///
/// Assembling the `AMQPUri` struct directly keeps credentials and vhost out
/// of string form, so nothing needs percent-encoding.
pub fn broker_uri(config: &ProbeConfig) -> AMQPUri {
    AMQPUri {
        authority: AMQPAuthority {
            userinfo: AMQPUserInfo {
                username: config.username.clone(),
                password: config.password.clone(),
            },
            host: config.host.clone(),
            port: config.port,
        },
        vhost: config.vhost.clone(),
        ..AMQPUri::default()
    }
}

/// Connection properties wiring lapin into the ambient tokio runtime.
pub fn connection_properties() -> ConnectionProperties {
    ConnectionProperties::default()
        .with_executor(tokio_executor_trait::Tokio::current())
        .with_reactor(tokio_reactor_trait::Tokio)
}

/// Convert the configured header mapping into an AMQP field table.
pub fn headers_table(headers: &BTreeMap<String, String>) -> FieldTable {
    let mut table = FieldTable::default();
    for (key, value) in headers {
        table.insert(
            ShortString::from(key.clone()),
            AMQPValue::LongString(LongString::from(value.clone())),
        );
    }
    table
}

/// Unique consumer tag per probe run, useful in broker-side connection logs.
pub fn consumer_tag() -> String {
    format!("check-amqp-{}", Uuid::new_v4())
}
