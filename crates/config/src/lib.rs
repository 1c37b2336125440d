//! Configuration types for the TRC20 approval client.
//!
//! This crate provides:
//! - Network presets (mainnet, Nile testnet)
//! - Token contract constants (address, decimals, fee limit)
//! - Wallet readiness polling tunables

pub mod network;
pub mod polling;

pub use network::{NetworkConfig, NetworkConfigBuilder, NetworkType, TokenConfig};
pub use polling::{PollingConfig, PollingConfigError};
