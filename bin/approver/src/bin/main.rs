//! TRC20 approval client.
//!
//! - `detect`: report which wallet provider the host exposes
//! - `balance`: token balance of the configured account
//! - `allowance`: current allowance of a spender
//! - `approve`: submit `approve(spender, amount)`; `max` grants unlimited
//! - `watch`: keep the session alive and export balance metrics

use action::{ApprovalAmount, ApproveParams, TransactionOutcome};
use approver::{
    build_approver, config::Config, log_status, metrics, metrics::Metrics, node_host, run_cycle,
};
use clap::{Parser, Subcommand};
use std::{sync::Arc, time::Duration};
use tokio::time;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "approver")]
#[command(about = "Check balances and allowances, and submit TRC20 approvals")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// TronGrid API key
    #[arg(long, env = "TRONGRID_API_KEY")]
    api_key: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Report the detected wallet provider
    Detect,

    /// Token balance of the configured account
    Balance,

    /// Allowance granted to a spender
    Allowance {
        /// Spender address; defaults to the configured spender
        #[arg(long)]
        spender: Option<String>,
    },

    /// Approve a spender for an amount, or `max`
    Approve {
        /// Amount in token units, or `max`
        amount: ApprovalAmount,

        /// Spender address; defaults to the configured spender
        #[arg(long)]
        spender: Option<String>,
    },

    /// Keep the connection alive and export metrics
    Watch {
        /// Seconds between balance refreshes; overrides the config file
        #[arg(long)]
        interval: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if cli.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    let config = Config::from_file(&cli.config)?;
    let network = config.network_config();

    info!("Loaded config:");
    info!("  Network: {:?}", network.network_type);
    info!("  Full node: {}", network.full_node_url);
    info!("  Token: {} ({})", network.token.symbol, network.token.contract);
    info!("  Owner: {}", config.owner_address);

    let host = Arc::new(node_host(&config, &network, cli.api_key)?);
    let approver = build_approver(host, &network, config.polling);
    let _status = log_status(approver.connection().status());

    let default_spender = || network.token.default_spender.clone().unwrap_or_default();

    match cli.command {
        Command::Detect => {
            let kind = approver.connection().detect();
            info!(kind = %kind, connectable = kind.is_connectable(), "Provider detected");
            println!("{kind}");
        }
        Command::Balance => {
            let reading = approver.balance().await?;
            println!("{} {}", reading.scaled, network.token.symbol);
        }
        Command::Allowance { spender } => {
            let spender = spender.unwrap_or_else(default_spender);
            let reading = approver.allowance(&spender).await?;
            println!("{} {}", reading.scaled, network.token.symbol);
        }
        Command::Approve { amount, spender } => {
            let params = ApproveParams {
                spender: spender.unwrap_or_else(default_spender),
                amount,
            };
            let outcome = approver.approve(params).await;

            match &outcome {
                TransactionOutcome::Submitted(tx_id) => println!("{tx_id}"),
                _ => {
                    let status = outcome.status().unwrap_or_default();
                    eyre::bail!(status);
                }
            }
        }
        Command::Watch { interval } => {
            metrics::install_prometheus_exporter(config.metrics_port)?;
            let metrics = Metrics::new();
            info!(port = config.metrics_port, "Prometheus exporter listening");

            if let Err(err) = approver.connection().connect().await {
                error!(error = %err, "Initial connection failed; watcher will retry");
            }
            let _watcher = approver.connection().watch(config.polling.interval());

            let secs = interval.unwrap_or(config.watch_interval_secs).max(1);
            let mut ticker = time::interval(Duration::from_secs(secs));

            loop {
                tokio::select! {
                    _ = ticker.tick() => {
                        run_cycle(&approver, &metrics).await;
                    }
                    _ = tokio::signal::ctrl_c() => {
                        info!("Shutting down");
                        break;
                    }
                }
            }

            approver.connection().disconnect();
        }
    }

    Ok(())
}
