//! Token balance queries for the connected account.
//!
//! This crate provides the [`BalanceQueryService`], which reads `balanceOf`
//! through a [`client::ContractBinding`], scales the raw integer by the
//! token's decimals and never issues two identical reads at once.

pub mod monitor;
pub mod units;

pub use monitor::BalanceQueryService;
pub use units::{format_units, parse_units, AmountError};

use alloy_primitives::U256;
use client::ContractBinding;
use serde::{Deserialize, Serialize};
use std::future::Future;

/// A token amount as read from the chain.
///
/// Readings are replaced wholesale on every successful query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceReading {
    /// Raw integer amount in the token's smallest unit
    pub raw: U256,
    /// Decimal precision used for scaling
    pub decimals: u8,
    /// `raw / 10^decimals` with exactly `decimals` fractional digits
    pub scaled: String,
}

impl BalanceReading {
    pub fn new(raw: U256, decimals: u8) -> Result<Self, AmountError> {
        Ok(Self {
            raw,
            decimals,
            scaled: format_units(raw, decimals)?,
        })
    }

    /// A zero reading; `scaled` is `"0"` when `decimals` is out of range.
    pub fn zero(decimals: u8) -> Self {
        Self {
            raw: U256::ZERO,
            decimals,
            scaled: format_units(U256::ZERO, decimals).unwrap_or_else(|_| "0".to_string()),
        }
    }
}

/// Trait for querying token balances.
pub trait Monitor: Send + Sync {
    /// Query the balance of `holder` through `binding`.
    fn query_balance(
        &self,
        binding: &ContractBinding,
        holder: &str,
    ) -> impl Future<Output = BalanceReading> + Send;
}
