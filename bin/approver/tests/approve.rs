//! Integration tests for the approval flow.

#[path = "setup.rs"]
mod setup;

use action::{ApprovalAmount, ApproveParams, ErrorKind, TransactionOutcome};
use alloy_primitives::U256;
use binding::Value;
use client::mock::MockWallet;
use setup::{setup_empty_host, setup_with_wallet, OTHER, OWNER, SPENDER};
use std::sync::Arc;

fn params(spender: &str, amount: ApprovalAmount) -> ApproveParams {
    ApproveParams {
        spender: spender.to_string(),
        amount,
    }
}

#[tokio::test]
async fn test_approve_configured_spender() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    let harness = setup_with_wallet(wallet.clone());
    let spender = harness
        .config
        .network_config()
        .token
        .default_spender
        .unwrap();

    let outcome = harness
        .approver
        .approve(params(&spender, ApprovalAmount::Exact("25".to_string())))
        .await;

    assert_eq!(outcome, TransactionOutcome::Submitted("mock-tx-1".to_string()));
    let sent = wallet.contract().sent();
    assert_eq!(
        sent[0].args,
        vec![
            Value::Address(SPENDER.to_string()),
            Value::Uint(U256::from(25_000_000u64))
        ]
    );
    assert_eq!(sent[0].options.fee_limit, 100_000_000);
    assert_eq!(sent[0].options.call_value, 0);
}

#[tokio::test]
async fn test_approve_max_regardless_of_decimals() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    let harness = setup_with_wallet(wallet.clone());

    let outcome = harness.approver.approve(params(SPENDER, ApprovalAmount::Max)).await;

    assert!(outcome.tx_id().is_some());
    assert_eq!(wallet.contract().sent()[0].args[1], Value::Uint(U256::MAX));
}

#[tokio::test]
async fn test_truncates_extra_fraction_digits() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    let harness = setup_with_wallet(wallet.clone());

    harness
        .approver
        .approve(params(SPENDER, ApprovalAmount::Exact("0.1234567".to_string())))
        .await;

    assert_eq!(
        wallet.contract().sent()[0].args[1],
        Value::Uint(U256::from(123_456u64))
    );
}

#[tokio::test]
async fn test_empty_spender_never_submits() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    let harness = setup_with_wallet(wallet.clone());

    let outcome = harness
        .approver
        .approve(params("", ApprovalAmount::Exact("5".to_string())))
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::InvalidInput));
    assert!(wallet.contract().sent().is_empty());
}

#[tokio::test]
async fn test_no_wallet() {
    let harness = setup_empty_host();

    let outcome = harness
        .approver
        .approve(params(SPENDER, ApprovalAmount::Max))
        .await;

    assert_eq!(outcome.error_kind(), Some(ErrorKind::NotConnected));
}

#[tokio::test]
async fn test_wallet_failures_are_classified() {
    let cases = [
        ("User rejected the request", ErrorKind::UserRejected),
        ("REVERT opcode executed", ErrorKind::ContractReverted),
        ("Wallet is locked: no signer configured", ErrorKind::WalletLocked),
        ("Network error: error sending request", ErrorKind::NetworkError),
        ("CONTRACT_VALIDATE_ERROR: balance is not sufficient", ErrorKind::InsufficientFunds),
        ("something unexpected", ErrorKind::Unknown),
    ];

    for (message, kind) in cases {
        let wallet = Arc::new(MockWallet::new(OWNER));
        wallet.contract().fail_sends(Some(message));
        let harness = setup_with_wallet(wallet);

        let outcome = harness
            .approver
            .approve(params(SPENDER, ApprovalAmount::Max))
            .await;

        assert_eq!(outcome, TransactionOutcome::failed(kind, message), "{message}");
    }
}

#[tokio::test]
async fn test_account_switch_between_approvals() {
    let wallet = Arc::new(MockWallet::new(OWNER));
    let harness = setup_with_wallet(wallet.clone());

    harness.approver.approve(params(SPENDER, ApprovalAmount::Max)).await;
    wallet.set_address(Some(OTHER));
    harness.approver.approve(params(SPENDER, ApprovalAmount::Max)).await;

    let senders: Vec<_> = wallet
        .contract()
        .sent()
        .into_iter()
        .map(|call| call.options.from)
        .collect();
    assert_eq!(senders, vec![OWNER.to_string(), OTHER.to_string()]);
}
