//! Prometheus metrics for the approver.
//!
//! All metrics are aggregated in the [`Metrics`] struct for easy tracking and management.

use balance::BalanceReading;
use client::ConnectionState;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram, gauge, histogram};
use std::time::Duration;

/// Aggregated metrics for the approver.
///
/// Metrics are registered with the global metrics registry on creation.
#[derive(Debug, Clone)]
pub struct Metrics {
    _private: (),
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Metrics {
    /// Create a new metrics instance and register all metric descriptions.
    pub fn new() -> Self {
        Self::register_descriptions();
        Self { _private: () }
    }

    fn register_descriptions() {
        // Watch cycle metrics
        describe_counter!(
            "approver_cycles_total",
            "Total number of watch cycles executed"
        );
        describe_histogram!(
            "approver_cycle_duration_seconds",
            "Duration of each watch cycle in seconds"
        );

        // Connection metrics
        describe_gauge!(
            "approver_wallet_connected",
            "1 while a wallet session is connected, 0 otherwise"
        );
        describe_counter!(
            "approver_connection_failures_total",
            "Total number of watch cycles that found the connection failed"
        );

        // Balance metrics (gauges - current values)
        describe_gauge!(
            "approver_token_balance",
            "Current token balance of the connected account, in display units"
        );
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Watch cycle metrics
    // ─────────────────────────────────────────────────────────────────────────────

    /// Record a completed watch cycle.
    pub fn record_cycle(&self, duration: Duration) {
        counter!("approver_cycles_total").increment(1);
        histogram!("approver_cycle_duration_seconds").record(duration.as_secs_f64());
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Connection metrics
    // ─────────────────────────────────────────────────────────────────────────────

    /// Reflect the current connection state.
    pub fn record_connection(&self, state: &ConnectionState) {
        let connected = matches!(state, ConnectionState::Connected(_));
        gauge!("approver_wallet_connected").set(if connected { 1.0 } else { 0.0 });

        if matches!(state, ConnectionState::Failed(_)) {
            counter!("approver_connection_failures_total").increment(1);
        }
    }

    // ─────────────────────────────────────────────────────────────────────────────
    // Balance metrics (gauges)
    // ─────────────────────────────────────────────────────────────────────────────

    /// Set the current token balance.
    pub fn set_token_balance(&self, reading: &BalanceReading) {
        // f64 gauge; precision drops past 2^53
        let value = reading.scaled.parse::<f64>().unwrap_or(f64::NAN);
        gauge!("approver_token_balance").set(value);
    }
}

/// Install the Prometheus metrics exporter and start the HTTP server.
///
/// Returns an error if the server fails to bind to the specified port.
pub fn install_prometheus_exporter(port: u16) -> eyre::Result<()> {
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::net::SocketAddr;

    let addr = SocketAddr::from(([0, 0, 0, 0], port));

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()
        .map_err(|e| eyre::eyre!("Failed to install Prometheus exporter: {}", e))?;

    Ok(())
}
