use config::{NetworkConfig, NetworkConfigBuilder, NetworkType, PollingConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;

const fn default_network() -> NetworkType {
    NetworkType::Mainnet
}

const fn default_watch_interval_secs() -> u64 {
    30
}

const fn default_metrics_port() -> u16 {
    9090
}

/// Top-level approver configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Network preset the other settings override
    #[serde(default = "default_network")]
    pub network: NetworkType,

    /// Full node HTTP endpoint; defaults to the preset's TronGrid url
    #[serde(default)]
    pub full_node_url: Option<String>,

    /// Account approvals are sent from (base58)
    pub owner_address: String,

    /// signer-proxy url; without it the wallet can read but not sign
    #[serde(default)]
    pub signer_url: Option<String>,

    /// Token contract override
    #[serde(default)]
    pub token_contract: Option<String>,

    /// Spender used when none is given on the command line
    #[serde(default)]
    pub spender: Option<String>,

    /// Fee limit override, in sun
    #[serde(default)]
    pub fee_limit: Option<u64>,

    #[serde(default)]
    pub polling: PollingConfig,

    /// Seconds between two watch cycles
    #[serde(default = "default_watch_interval_secs")]
    pub watch_interval_secs: u64,

    /// Port of the Prometheus exporter started by `watch`
    #[serde(default = "default_metrics_port")]
    pub metrics_port: u16,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> eyre::Result<Self> {
        let config: Self = toml::from_str(contents)?;
        config.polling.validate()?;

        Ok(config)
    }

    /// The network preset with this file's overrides applied.
    pub fn network_config(&self) -> NetworkConfig {
        let mut builder = NetworkConfigBuilder::new(self.network);
        if let Some(url) = &self.full_node_url {
            builder = builder.full_node_url(url);
        }
        if let Some(contract) = &self.token_contract {
            builder = builder.token_contract(contract);
        }
        if let Some(fee_limit) = self.fee_limit {
            builder = builder.fee_limit(fee_limit);
        }
        if let Some(spender) = &self.spender {
            builder = builder.default_spender(spender);
        }
        builder.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_config() {
        let config = Config::from_toml(r#"owner_address = "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL""#)
            .unwrap();

        assert_eq!(config.network, NetworkType::Mainnet);
        assert_eq!(config.polling, PollingConfig::default());
        assert_eq!(config.network_config(), NetworkConfig::mainnet());
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_toml(
            r#"
            network = "nile"
            full_node_url = "http://localhost:8090"
            owner_address = "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL"
            spender = "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf"
            fee_limit = 50000000

            [polling]
            max_attempts = 5
            interval_ms = 200
            "#,
        )
        .unwrap();

        let network = config.network_config();
        assert_eq!(network.network_type, NetworkType::Nile);
        assert_eq!(network.full_node_url, "http://localhost:8090");
        assert_eq!(network.token.fee_limit, 50_000_000);
        assert_eq!(
            network.token.default_spender.as_deref(),
            Some("TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf")
        );
        assert_eq!(config.polling.max_attempts, 5);
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let result = Config::from_toml(
            r#"
            owner_address = "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL"

            [polling]
            max_attempts = 0
            interval_ms = 200
            "#,
        );
        assert!(result.is_err());
    }
}
