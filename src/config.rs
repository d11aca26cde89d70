//! Probe configuration and credentials handling
//!
//! The probe is configured from two sources: CLI arguments and a YAML
//! credentials file mapping instance names to broker endpoints. Both are
//! validated here, once, before any network activity.

use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use thiserror::Error;

/// Immutable configuration for a single probe run.
///
/// Constructed once in `main` from the resolved credentials instance and the
/// CLI arguments; never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbeConfig {
    /// Broker hostname or IP
    pub host: String,
    /// Broker port
    pub port: u16,
    pub username: String,
    pub password: String,
    /// AMQP virtual host ("/" is the broker default)
    pub vhost: String,
    /// Target exchange; empty string means the broker's default exchange
    pub exchange: String,
    /// Routing key; equals the target queue name under the default exchange
    pub routing_key: String,
    /// Reply queue the probed consumer is expected to answer on.
    /// Doubles as the correlation key: one in-flight probe per reply queue.
    pub reply_to: String,
    /// Message body of the probe message
    pub body: String,
    /// Message headers, unique keys
    pub headers: BTreeMap<String, String>,
    /// Warning threshold in milliseconds
    pub warning_ms: u64,
    /// Critical threshold in milliseconds; also the wait bound for the reply
    pub critical_ms: u64,
}

/// One broker endpoint entry in the credentials file.
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BrokerCredentials {
    pub url: String,
    pub port: u16,
    pub username: String,
    pub password: String,
}

/// The credentials YAML file: a mapping of instance names to endpoints.
///
/// ```yaml
/// rabbitmq_dev:
///   url: broker.example.org
///   port: 5672
///   username: probe
///   password: hunter2
/// ```
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct CredentialsFile {
    instances: HashMap<String, BrokerCredentials>,
}

/// Configuration loading errors
///
/// Every variant's message is printed verbatim after `SERVICE UNKNOWN - `,
/// so they are phrased for the monitoring operator, not the developer.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unable to find file: {0}")]
    FileNotFound(String),
    #[error("Unable to read credentials from file: {0}")]
    CredentialsParse(#[from] serde_yaml::Error),
    #[error("Unknown instance '{0}' in credentials file")]
    UnknownInstance(String),
    #[error("Malformed header '{0}': expected KEY:VALUE")]
    MalformedHeader(String),
}

impl CredentialsFile {
    /// Load and parse the credentials file.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|_| ConfigError::FileNotFound(path.display().to_string()))?;
        Ok(serde_yaml::from_str(&content)?)
    }

    /// Look up a named instance.
    pub fn instance(&self, name: &str) -> Result<&BrokerCredentials, ConfigError> {
        self.instances
            .get(name)
            .ok_or_else(|| ConfigError::UnknownInstance(name.to_string()))
    }
}

/// Parse repeated `KEY:VALUE` header arguments into a unique-key mapping.
///
/// The value may itself contain `:`; only the first colon separates key from
/// value. A duplicate key keeps the last occurrence.
pub fn parse_headers(raw: &[String]) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut headers = BTreeMap::new();
    for entry in raw {
        let (key, value) = entry
            .split_once(':')
            .ok_or_else(|| ConfigError::MalformedHeader(entry.clone()))?;
        if key.is_empty() {
            return Err(ConfigError::MalformedHeader(entry.clone()));
        }
        headers.insert(key.to_string(), value.to_string());
    }
    Ok(headers)
}
