//! Weave Transactor - command line entry point

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use config::{Config, ConfigLoader};
use node_client::LedgerClient;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transactor::{Context, FeeBounds, Transactor};
use types::TransactorError;

#[derive(Debug, Parser)]
#[command(name = "weave-transactor", version, about = "Query a weave node and track transactions")]
struct Cli {
    /// Configuration file (defaults to CONFIG_PATH, then config.yaml when present)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Node address, overrides node.url from the configuration
    #[arg(long)]
    node: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the node's network information
    Info,
    /// Print a fresh transaction anchor
    Anchor,
    /// Estimate the fee for a payload and apply the configured bounds
    Price {
        /// Payload size in bytes
        #[arg(long, default_value_t = 0)]
        size: u64,
        /// Recipient address
        #[arg(long, default_value = "")]
        target: String,
    },
    /// Print the last transaction id sent from a wallet
    LastTx { address: String },
    /// Look up a transaction once
    Status { id: String },
    /// Wait until a transaction is mined
    Wait {
        id: String,
        /// Give up after this many seconds
        #[arg(long)]
        timeout: Option<u64>,
    },
    /// Write an example configuration file
    InitConfig {
        #[arg(default_value = "config.yaml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    if let Err(e) = dotenv::dotenv() {
        if !e.to_string().contains("No such file or directory") {
            eprintln!("Could not load .env file: {}", e);
        }
    }

    let cli = Cli::parse();

    if let Command::InitConfig { path } = &cli.command {
        ConfigLoader::create_example(path).context("Failed to write example configuration")?;
        println!("Wrote example configuration to {}", path.display());
        return Ok(());
    }

    let mut config = load_config(cli.config.as_ref())?;
    if let Some(node) = cli.node {
        config.node.url = node;
    }

    init_logging(&config)?;

    info!("Starting Weave Transactor v{}", env!("CARGO_PKG_VERSION"));

    let transactor = Transactor::from_config(&config.node)
        .context("Failed to connect to node")?
        .with_poll_interval(Duration::from_millis(config.polling.interval_ms));

    let ctx = Context::background();
    let shutdown = ctx.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown signal received");
            shutdown.cancel();
        }
    });

    run(cli.command, &config, &transactor, &ctx).await
}

async fn run(command: Command, config: &Config, transactor: &Transactor, ctx: &Context) -> Result<()> {
    let client = transactor.client();

    match command {
        Command::Info => {
            let info = ctx
                .run(client.network_info())
                .await
                .map_err(TransactorError::Cancelled)?
                .context("Failed to fetch network info")?;
            println!("{}", serde_json::to_string_pretty(&info)?);
        }
        Command::Anchor => {
            let anchor = ctx
                .run(client.tx_anchor())
                .await
                .map_err(TransactorError::Cancelled)?
                .context("Failed to fetch anchor")?;
            println!("{}", anchor);
        }
        Command::Price { size, target } => {
            let bounds: FeeBounds = config
                .fees
                .parse()
                .map_err(anyhow::Error::msg)
                .context("Invalid fee bounds")?
                .into();
            let estimate = ctx
                .run(client.price(size, &target))
                .await
                .map_err(TransactorError::Cancelled)?
                .context("Failed to fetch fee estimate")?;
            let quote = bounds.finalize(&estimate)?;
            println!(
                "{}",
                serde_json::json!({
                    "estimate": quote.estimate.to_string(),
                    "fee": quote.fee.to_string(),
                    "raised_to_min": quote.was_raised,
                })
            );
        }
        Command::LastTx { address } => {
            let last_tx = ctx
                .run(client.last_transaction(&address))
                .await
                .map_err(TransactorError::Cancelled)?
                .context("Failed to fetch last transaction")?;
            println!("{}", last_tx);
        }
        Command::Status { id } => match ctx
            .run(client.get_transaction(&id))
            .await
            .map_err(TransactorError::Cancelled)?
        {
            Ok(Some(tx)) => println!("{}", serde_json::to_string_pretty(&tx)?),
            Ok(None) => println!("pending"),
            Err(e) => {
                warn!(tx_id = %id, error = %e, "Lookup failed");
                println!("unknown");
            }
        },
        Command::Wait { id, timeout } => {
            let timeout = timeout.or(config.polling.timeout_seconds);
            let ctx = match timeout {
                Some(secs) => ctx.child_with_timeout(Duration::from_secs(secs)),
                None => ctx.child(),
            };
            let receipt = transactor.wait_for_id(&ctx, &id).await?;
            println!("{}", serde_json::to_string_pretty(&receipt)?);
        }
        Command::InitConfig { .. } => unreachable!("handled before configuration is loaded"),
    }

    Ok(())
}

/// Load configuration from an explicit path, CONFIG_PATH, ./config.yaml, or the environment
fn load_config(path: Option<&PathBuf>) -> Result<Config> {
    let path = path
        .cloned()
        .or_else(|| env::var("CONFIG_PATH").ok().map(PathBuf::from))
        .or_else(|| Some(PathBuf::from("config.yaml")).filter(|p| p.exists()));

    match path {
        Some(path) => ConfigLoader::load(&path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => ConfigLoader::load_from_env().context("Failed to load configuration"),
    }
}

/// Initialize logging from configuration, RUST_LOG and LOG_FORMAT take precedence
fn init_logging(config: &Config) -> Result<()> {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| config.logging.level.clone());
    let log_format = env::var("LOG_FORMAT").unwrap_or_else(|_| config.logging.format.clone());

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_level));

    // Logs go to stderr so command output on stdout stays machine readable
    let registry = tracing_subscriber::registry().with(env_filter);

    match log_format.as_str() {
        "pretty" => {
            registry
                .with(tracing_subscriber::fmt::layer().pretty().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize pretty logging")?;
        }
        _ => {
            registry
                .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
                .try_init()
                .context("Failed to initialize JSON logging")?;
        }
    }

    if log_level == "trace" || log_level == "debug" {
        warn!("Debug/trace logging enabled");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use types::ErrorKind;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_wait_with_timeout() {
        let cli = Cli::parse_from(["weave-transactor", "--node", "arweave.net", "wait", "abc", "--timeout", "30"]);
        assert_eq!(cli.node.as_deref(), Some("arweave.net"));
        match cli.command {
            Command::Wait { id, timeout } => {
                assert_eq!(id, "abc");
                assert_eq!(timeout, Some(30));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_price_defaults() {
        let cli = Cli::parse_from(["weave-transactor", "price"]);
        match cli.command {
            Command::Price { size, target } => {
                assert_eq!(size, 0);
                assert!(target.is_empty());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_node_queries_stop_on_cancel() {
        // Accepts connections and never answers
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let config = Config::default();
        let transactor = Transactor::new(&addr.to_string()).unwrap();
        let commands = [
            Command::Info,
            Command::Anchor,
            Command::Price {
                size: 10,
                target: String::new(),
            },
            Command::LastTx {
                address: "addr".to_string(),
            },
            Command::Status {
                id: "abc".to_string(),
            },
        ];

        for command in commands {
            let ctx = Context::background();
            let canceller = ctx.clone();
            tokio::spawn(async move {
                tokio::time::sleep(Duration::from_millis(50)).await;
                canceller.cancel();
            });

            let err = tokio::time::timeout(
                Duration::from_secs(5),
                run(command, &config, &transactor, &ctx),
            )
            .await
            .expect("command kept waiting after cancellation")
            .unwrap_err();
            let err = err.downcast_ref::<TransactorError>().unwrap();
            assert_eq!(err.kind(), ErrorKind::Cancelled);
        }
    }
}
