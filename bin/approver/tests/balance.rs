//! Integration tests for balance and allowance reads.

#[path = "setup.rs"]
mod setup;

use action::ErrorKind;
use alloy_primitives::U256;
use approver::{metrics::Metrics, run_cycle};
use balance::BalanceReading;
use client::mock::MockWallet;
use setup::{setup_empty_host, setup_with_wallet, OWNER, SPENDER};
use std::sync::Arc;

#[tokio::test]
async fn test_balance_query() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    wallet.contract().set_balance(U256::from(1_234_567u64));
    let harness = setup_with_wallet(wallet);

    let reading = harness.approver.balance().await.unwrap();

    assert_eq!(reading.raw, U256::from(1_234_567u64));
    assert_eq!(reading.scaled, "1.234567");
}

#[tokio::test]
async fn test_balance_failure_reads_zero() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    wallet.contract().fail_reads(Some("Network error: timeout"));
    let harness = setup_with_wallet(wallet);

    let reading = harness.approver.balance().await.unwrap();
    assert_eq!(reading, BalanceReading::zero(6));
}

#[tokio::test]
async fn test_allowance_query() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    wallet.contract().set_allowance(U256::MAX);
    let harness = setup_with_wallet(wallet);

    let reading = harness.approver.allowance(SPENDER).await.unwrap();
    assert_eq!(reading.raw, U256::MAX);
}

#[tokio::test]
async fn test_allowance_failure_is_reported() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    wallet.contract().fail_reads(Some("REVERT opcode executed"));
    let harness = setup_with_wallet(wallet);

    let err = harness.approver.allowance(SPENDER).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::ContractReverted);
}

#[tokio::test]
async fn test_cycle_skips_balance_until_connected() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    wallet.contract().set_balance(U256::from(3_000_000u64));
    let harness = setup_with_wallet(wallet.clone());
    let metrics = Metrics::new();

    assert!(run_cycle(&harness.approver, &metrics).await.is_none());
    assert_eq!(wallet.contract().reads(), 0);

    harness.approver.connection().connect().await.unwrap();
    let reading = run_cycle(&harness.approver, &metrics).await.unwrap();
    assert_eq!(reading.scaled, "3.000000");
}

#[tokio::test]
async fn test_cycle_without_wallet() {
    let harness = setup_empty_host();
    assert!(run_cycle(&harness.approver, &Metrics::new()).await.is_none());
}
