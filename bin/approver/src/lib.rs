pub mod config;
pub mod metrics;

use crate::{config::Config, metrics::Metrics};
use ::config::{NetworkConfig, PollingConfig};
use action::Approver;
use balance::{BalanceQueryService, BalanceReading};
use client::{
    ConnectionManager, ConnectionState, Delay, HostEnvironment, NodeHost, RemoteSigner,
    StatusFeed, TokioDelay,
};
use std::{sync::Arc, time::Instant};
use tokio::task::JoinHandle;
use tracing::{info, warn};

/// Node-backed host for the configured owner account.
pub fn node_host(
    config: &Config,
    network: &NetworkConfig,
    api_key: Option<String>,
) -> eyre::Result<NodeHost> {
    let signer = config
        .signer_url
        .as_ref()
        .map(|url| RemoteSigner::new(url.as_str(), config.owner_address.as_str()));
    if signer.is_none() {
        warn!("No signer_url configured; approvals will be rejected");
    }

    let host = NodeHost::new(&network.full_node_url, &config.owner_address, signer, api_key)?;
    Ok(host)
}

/// Wire an approver over `host`.
pub fn build_approver(
    host: Arc<dyn HostEnvironment>,
    network: &NetworkConfig,
    polling: PollingConfig,
) -> Approver {
    build_approver_with_delay(host, Arc::new(TokioDelay), network, polling)
}

pub fn build_approver_with_delay(
    host: Arc<dyn HostEnvironment>,
    delay: Arc<dyn Delay>,
    network: &NetworkConfig,
    polling: PollingConfig,
) -> Approver {
    let connection = ConnectionManager::with_delay(host, delay, polling, StatusFeed::new());
    let balances = BalanceQueryService::new(network.token.decimals);
    Approver::new(connection, balances, network.token.clone())
}

/// Log every status line published on `feed`.
pub fn log_status(feed: &StatusFeed) -> JoinHandle<()> {
    let mut rx = feed.subscribe();
    tokio::spawn(async move {
        while rx.changed().await.is_ok() {
            let status = rx.borrow_and_update().clone();
            info!(status = %status, "Status");
        }
    })
}

/// One watch cycle: record the connection state and, when connected, refresh
/// the balance.
pub async fn run_cycle(approver: &Approver, metrics: &Metrics) -> Option<BalanceReading> {
    let start = Instant::now();

    let state = approver.connection().state();
    metrics.record_connection(&state);

    let reading = match state {
        ConnectionState::Connected(session) => match approver.balance().await {
            Ok(reading) => {
                info!(
                    address = session.address(),
                    balance = %reading.scaled,
                    token = %approver.token().symbol,
                    "Balance"
                );
                metrics.set_token_balance(&reading);
                Some(reading)
            }
            Err(err) => {
                warn!(error = %err, "Balance refresh failed");
                None
            }
        },
        _ => None,
    };

    metrics.record_cycle(start.elapsed());
    reading
}
