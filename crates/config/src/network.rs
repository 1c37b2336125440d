//! Network configuration for TRC20 approvals.
//!
//! Provides chain-specific endpoints and token parameters for different
//! networks (mainnet, Nile testnet).

use serde::{Deserialize, Serialize};

/// Fee limit used for state-changing calls: 100 TRX expressed in sun.
pub const DEFAULT_FEE_LIMIT: u64 = 100_000_000;

/// Network type (mainnet or testnet).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    Mainnet,
    Nile,
}

/// TRC20 token configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenConfig {
    /// Token contract address (base58)
    pub contract: String,
    /// Ticker shown in status messages
    pub symbol: String,
    /// Power-of-ten scaling between raw units and display units
    pub decimals: u8,
    /// Maximum fee (in sun) authorized for a state-changing call
    pub fee_limit: u64,
    /// Spender used when the caller does not supply one
    #[serde(default)]
    pub default_spender: Option<String>,
}

impl TokenConfig {
    /// Tether USD on TRON mainnet.
    pub fn usdt_mainnet() -> Self {
        Self {
            // https://tronscan.org/#/token20/TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t
            contract: "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t".to_string(),
            symbol: "USDT".to_string(),
            decimals: 6,
            fee_limit: DEFAULT_FEE_LIMIT,
            default_spender: None,
        }
    }

    /// Tether USD on the Nile testnet.
    pub fn usdt_nile() -> Self {
        Self {
            // https://nile.tronscan.org/#/token20/TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf
            contract: "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf".to_string(),
            symbol: "USDT".to_string(),
            decimals: 6,
            fee_limit: DEFAULT_FEE_LIMIT,
            default_spender: None,
        }
    }
}

/// Complete network configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Network type (mainnet or testnet)
    pub network_type: NetworkType,
    /// Full node HTTP API endpoint
    pub full_node_url: String,
    /// Token the client approves and queries
    pub token: TokenConfig,
}

impl NetworkConfig {
    /// Create mainnet configuration.
    pub fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            full_node_url: "https://api.trongrid.io".to_string(),
            token: TokenConfig::usdt_mainnet(),
        }
    }

    /// Create Nile testnet configuration.
    pub fn nile() -> Self {
        Self {
            network_type: NetworkType::Nile,
            full_node_url: "https://nile.trongrid.io".to_string(),
            token: TokenConfig::usdt_nile(),
        }
    }

    /// Create configuration from network type.
    pub fn from_network_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Nile => Self::nile(),
        }
    }
}

/// Builder for custom network configurations.
#[derive(Debug, Clone)]
pub struct NetworkConfigBuilder {
    config: NetworkConfig,
}

impl NetworkConfigBuilder {
    /// Start with the defaults for `network_type`.
    pub fn new(network_type: NetworkType) -> Self {
        Self {
            config: NetworkConfig::from_network_type(network_type),
        }
    }

    /// Start with mainnet defaults.
    pub fn mainnet() -> Self {
        Self {
            config: NetworkConfig::mainnet(),
        }
    }

    /// Start with Nile testnet defaults.
    pub fn nile() -> Self {
        Self {
            config: NetworkConfig::nile(),
        }
    }

    /// Override the full node endpoint.
    pub fn full_node_url(mut self, url: impl Into<String>) -> Self {
        self.config.full_node_url = url.into();
        self
    }

    /// Override the token contract address.
    pub fn token_contract(mut self, address: impl Into<String>) -> Self {
        self.config.token.contract = address.into();
        self
    }

    /// Override the token decimals.
    pub const fn token_decimals(mut self, decimals: u8) -> Self {
        self.config.token.decimals = decimals;
        self
    }

    /// Override the fee limit (sun).
    pub const fn fee_limit(mut self, fee_limit: u64) -> Self {
        self.config.token.fee_limit = fee_limit;
        self
    }

    /// Set a default spender.
    pub fn default_spender(mut self, spender: impl Into<String>) -> Self {
        self.config.token.default_spender = Some(spender.into());
        self
    }

    /// Build the network configuration.
    pub fn build(self) -> NetworkConfig {
        self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_config() {
        let config = NetworkConfig::mainnet();
        assert_eq!(config.network_type, NetworkType::Mainnet);
        assert_eq!(config.token.contract, "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t");
        assert_eq!(config.token.decimals, 6);
        assert_eq!(config.token.fee_limit, DEFAULT_FEE_LIMIT);
    }

    #[test]
    fn test_nile_config() {
        let config = NetworkConfig::from_network_type(NetworkType::Nile);
        assert_eq!(config.network_type, NetworkType::Nile);
        assert!(config.full_node_url.contains("nile"));
    }

    #[test]
    fn test_custom_config_builder() {
        let config = NetworkConfigBuilder::mainnet()
            .token_contract("TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf")
            .token_decimals(18)
            .default_spender("TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL")
            .build();

        assert_eq!(config.token.contract, "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf");
        assert_eq!(config.token.decimals, 18);
        assert_eq!(
            config.token.default_spender.as_deref(),
            Some("TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL")
        );
        assert_eq!(config.network_type, NetworkType::Mainnet);
    }

    #[test]
    fn test_network_type_from_toml() {
        #[derive(Deserialize)]
        struct Wrapper {
            network: NetworkType,
        }

        let parsed: Wrapper = toml::from_str("network = \"nile\"").unwrap();
        assert_eq!(parsed.network, NetworkType::Nile);
    }
}
