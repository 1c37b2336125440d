//! Common test setup utilities shared across integration tests.
#![allow(dead_code)] // not every test file uses every helper

use action::Approver;
use approver::{build_approver_with_delay, config::Config};
use client::mock::{ImmediateDelay, MockHost, MockWallet};
use std::sync::Arc;

pub const OWNER: &str = "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL";
pub const SPENDER: &str = "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf";
pub const OTHER: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";

/// Load test configuration. Panics if not found or invalid.
pub fn load_test_config() -> Config {
    Config::from_file("tests/test-config.toml").expect("Failed to load tests/test-config.toml.")
}

/// Approver over a scripted host, wired from the test configuration.
pub struct Harness {
    pub approver: Approver,
    pub host: Arc<MockHost>,
    pub delay: Arc<ImmediateDelay>,
    pub config: Config,
}

pub fn setup_empty_host() -> Harness {
    let config = load_test_config();
    let network = config.network_config();
    let host = Arc::new(MockHost::new());
    let delay = Arc::new(ImmediateDelay::new());

    let approver = build_approver_with_delay(
        host.clone(),
        delay.clone(),
        &network,
        config.polling,
    );

    Harness {
        approver,
        host,
        delay,
        config,
    }
}

pub fn setup_with_wallet(wallet: Arc<MockWallet>) -> Harness {
    let harness = setup_empty_host();
    harness.host.set_wallet(wallet);
    harness
}
