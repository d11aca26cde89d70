//! check_amqp - Main Entry Point
//!
//! Resolves the probe configuration from CLI arguments and the credentials
//! file, runs one round-trip probe, prints the plugin status line and exits
//! with the verdict's code. Any failure before measurement short-circuits to
//! `SERVICE UNKNOWN - <reason>` with exit code 3.

use clap::Parser;
use std::path::PathBuf;
use std::process;
use tracing::info;

use check_amqp::config::{parse_headers, CredentialsFile, ProbeConfig};
use check_amqp::observability::init_default_logging;
use check_amqp::probe::{AmqpProbePublisher, AmqpReplyListener, RoundTripCoordinator};
use check_amqp::{classify, report, ConfigError};

/// Active AMQP round-trip health probe with Nagios-compatible output
#[derive(Parser)]
#[command(name = "check_amqp")]
#[command(about = "Publish a probe message and measure the round-trip to the first reply")]
#[command(version)]
struct Cli {
    /// Filepath of the credentials yml file
    #[arg(short = 'f', long, value_name = "FILE", default_value = "amqp_credentials.yml")]
    file: PathBuf,

    /// Name of the instance in the credentials yml file
    #[arg(short = 'i', long, default_value = "rabbitmq_dev")]
    instance: String,

    /// Name of the exchange; defaults to the broker's default exchange
    #[arg(short = 'e', long, default_value = "")]
    exchange: String,

    /// Virtual host
    #[arg(short = 'v', long, default_value = "/")]
    virtualhost: String,

    /// Name of the queue the probe message is routed to
    #[arg(short = 'q', long)]
    queue: String,

    /// Queue the probed consumer sends its reply to
    #[arg(short = 'r', long)]
    replyto: String,

    /// Body of the probe message
    #[arg(short = 'b', long, default_value = "")]
    body: String,

    /// Header of the probe message as KEY:VALUE, repeatable
    #[arg(short = 'H', long = "header", value_name = "KEY:VALUE")]
    headers: Vec<String>,

    /// Warning threshold in ms for the round trip
    #[arg(short = 'w', long, default_value_t = 5000)]
    warning: u64,

    /// Critical threshold in ms for the round trip; also the wait bound
    #[arg(short = 'c', long, default_value_t = 20000)]
    critical: u64,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    init_default_logging();

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => exit_unknown(&e.to_string()),
    };

    info!(
        host = %config.host,
        queue = %config.routing_key,
        reply_to = %config.reply_to,
        "starting round-trip probe"
    );

    let coordinator = RoundTripCoordinator::new(AmqpProbePublisher::new(), AmqpReplyListener::new());
    let outcome = coordinator.run(&config).await;

    let Some(elapsed_ms) = outcome.measured_ms() else {
        exit_unknown("Unable to publish probe message");
    };

    let verdict = classify(
        outcome.classifier_input_ms(),
        config.warning_ms,
        config.critical_ms,
    );

    println!(
        "{}",
        report::status_line(verdict, elapsed_ms, config.warning_ms, config.critical_ms)
    );
    process::exit(verdict.exit_code());
}

/// Assemble the immutable probe configuration from the CLI arguments and the
/// resolved credentials instance.
fn resolve_config(cli: &Cli) -> Result<ProbeConfig, ConfigError> {
    let credentials = CredentialsFile::load_from_file(&cli.file)?;
    let instance = credentials.instance(&cli.instance)?;
    let headers = parse_headers(&cli.headers)?;

    Ok(ProbeConfig {
        host: instance.url.clone(),
        port: instance.port,
        username: instance.username.clone(),
        password: instance.password.clone(),
        vhost: cli.virtualhost.clone(),
        exchange: cli.exchange.clone(),
        routing_key: cli.queue.clone(),
        reply_to: cli.replyto.clone(),
        body: cli.body.clone(),
        headers,
        warning_ms: cli.warning,
        critical_ms: cli.critical,
    })
}

/// Print the UNKNOWN short-circuit line and exit with code 3.
fn exit_unknown(reason: &str) -> ! {
    println!("{}", report::unknown_line(reason));
    process::exit(check_amqp::Verdict::Unknown.exit_code());
}
