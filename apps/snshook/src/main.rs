//! snshook - subscribe a plain-HTTP webhook to an SNS topic and log what it receives.
//!
//! # Usage
//!
//! ```text
//! snshook --list-topics
//! snshook --listen
//! snshook --subscribe http://203.0.113.7:8080/
//! ```
//!
//! # Configuration
//!
//! | Variable | Required | Meaning |
//! |----------|----------|---------|
//! | `LOG_LEVEL` | yes | log filter, unless `RUST_LOG` is set |
//! | `LISTEN_HOST` | no, `127.0.0.1` | webhook listener address |
//! | `LISTEN_PORT` | yes | webhook listener port |
//! | `SNS_HOST` | yes | SNS endpoint host |
//! | `SNS_REGION` | yes | signing region |
//! | `SNS_TOPIC_ARN` | yes | topic for `--subscribe` |
//! | `AWS_ACCESS_KEY_ID` | yes | access key |
//! | `AWS_SECRET_KEY` | yes | secret key, or `AWS_SECRET_ACCESS_KEY` |

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use snshook_auth::Credentials;
use snshook_core::HookConfig;
use snshook_sns::{Endpoint, EndpointSettings};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Binary version reported at startup.
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Command line of the snshook binary; exactly one operation is required.
#[derive(Debug, Parser)]
#[command(name = "snshook", version, about, long_about = None)]
#[command(group(
    ArgGroup::new("operation")
        .required(true)
        .args(["list_topics", "listen", "subscribe"]),
))]
struct Cli {
    /// List the SNS topics available in the configured region.
    #[arg(long)]
    list_topics: bool,

    /// Receive webhook deliveries until interrupted.
    #[arg(long)]
    listen: bool,

    /// Subscribe ENDPOINT to the configured topic, then listen.
    #[arg(long, value_name = "ENDPOINT")]
    subscribe: Option<String>,
}

/// The operation selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Operation {
    ListTopics,
    Listen,
    Subscribe(String),
}

impl Cli {
    fn operation(self) -> Operation {
        match self.subscribe {
            Some(endpoint) => Operation::Subscribe(endpoint),
            None if self.list_topics => Operation::ListTopics,
            None => Operation::Listen,
        }
    }
}

/// Install the global subscriber. `RUST_LOG` takes precedence over `log_level`.
fn init_tracing(log_level: &str) -> Result<()> {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::try_new(log_level)
            .with_context(|| format!("invalid log level filter: {log_level}"))?
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .init();

    Ok(())
}

/// Serve webhook deliveries until Ctrl-C.
async fn listen(endpoint: &mut Endpoint) -> Result<()> {
    let shutdown = async {
        tokio::signal::ctrl_c().await.ok();
    };

    endpoint
        .listen(shutdown)
        .await
        .context("webhook listener stopped")?;

    info!("listener closed, exiting");
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let operation = Cli::parse().operation();

    let config = HookConfig::from_env().context("invalid configuration")?;
    init_tracing(&config.log_level)?;

    info!(
        listen_host = %config.listen_host,
        listen_port = config.listen_port,
        sns_host = %config.sns_host,
        sns_region = %config.sns_region,
        version = VERSION,
        "starting snshook",
    );

    let credentials = Credentials::new(&config.access_key_id, &config.secret_key);
    let mut endpoint = Endpoint::new(EndpointSettings::from_config(&config), credentials);

    match operation {
        Operation::ListTopics => {
            endpoint
                .list_topics(&config.sns_region)
                .await
                .context("failed to list topics")?;
        }
        Operation::Listen => listen(&mut endpoint).await?,
        Operation::Subscribe(target) => {
            if config.topic_arn.region() != config.sns_region.as_str() {
                warn!(
                    topic_arn = %config.topic_arn,
                    sns_region = %config.sns_region,
                    "topic is not in the signing region, SNS will reject the subscription",
                );
            }
            endpoint
                .subscribe(&config.sns_region, &config.topic_arn, &target)
                .await
                .with_context(|| format!("failed to subscribe {target}"))?;
            listen(&mut endpoint).await?;
        }
    }

    Ok(())
}
