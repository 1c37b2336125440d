//! Scripted host, wallet and contract fakes.
//!
//! Every fake yields once per async call so concurrent callers genuinely
//! overlap on a single-threaded runtime.

use crate::{
    delay::Delay,
    provider::{
        AccountHandshake, ContractHandle, HostEnvironment, Injected, InjectedProvider,
        ProviderError, WriteOptions,
    },
};
use alloy_primitives::U256;
use async_trait::async_trait;
use binding::{InterfaceDescription, MethodDescriptor, Value};
use std::{
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Host whose injected globals tests can swap at any time.
#[derive(Default)]
pub struct MockHost {
    wallet: Mutex<Option<Injected>>,
    handshake: Mutex<Option<Arc<MockHandshake>>>,
}

impl MockHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_wallet(&self, wallet: Arc<MockWallet>) {
        *lock(&self.wallet) = Some(Injected::Wallet(wallet));
    }

    pub fn set_malformed(&self, global: &str) {
        *lock(&self.wallet) = Some(Injected::Malformed {
            global: global.to_string(),
        });
    }

    pub fn set_handshake(&self, handshake: Arc<MockHandshake>) {
        *lock(&self.handshake) = Some(handshake);
    }
}

impl HostEnvironment for MockHost {
    fn wallet(&self) -> Option<Injected> {
        lock(&self.wallet).clone()
    }

    fn handshake(&self) -> Option<Arc<dyn AccountHandshake>> {
        lock(&self.handshake)
            .clone()
            .map(|h| h as Arc<dyn AccountHandshake>)
    }
}

/// Wallet object that turns ready after a scripted number of checks.
pub struct MockWallet {
    address: Mutex<Option<String>>,
    ready_after: u32,
    ready_checks: AtomicU32,
    contract: Arc<MockContract>,
    contract_error: Mutex<Option<String>>,
}

impl MockWallet {
    /// Ready from the first check.
    pub fn new(address: &str) -> Self {
        Self::ready_after(address, 0)
    }

    /// Reports not-ready for the first `checks` readiness checks.
    pub fn ready_after(address: &str, checks: u32) -> Self {
        Self {
            address: Mutex::new(Some(address.to_string())),
            ready_after: checks,
            ready_checks: AtomicU32::new(0),
            contract: Arc::new(MockContract::default()),
            contract_error: Mutex::new(None),
        }
    }

    pub fn never_ready(address: &str) -> Self {
        Self::ready_after(address, u32::MAX)
    }

    pub fn set_address(&self, address: Option<&str>) {
        *lock(&self.address) = address.map(str::to_string);
    }

    /// Make the contract factory fail with `message`.
    pub fn fail_contract(&self, message: &str) {
        *lock(&self.contract_error) = Some(message.to_string());
    }

    pub fn ready_checks(&self) -> u32 {
        self.ready_checks.load(Ordering::SeqCst)
    }

    /// The single contract every `contract()` call hands out.
    pub fn contract(&self) -> Arc<MockContract> {
        Arc::clone(&self.contract)
    }
}

#[async_trait]
impl InjectedProvider for MockWallet {
    fn is_ready(&self) -> bool {
        let checks = self.ready_checks.fetch_add(1, Ordering::SeqCst) + 1;
        checks > self.ready_after
    }

    fn default_address(&self) -> Option<String> {
        lock(&self.address).clone()
    }

    async fn contract(
        &self,
        _interface: Arc<InterfaceDescription>,
        _address: &str,
    ) -> Result<Arc<dyn ContractHandle>, ProviderError> {
        tokio::task::yield_now().await;
        if let Some(message) = lock(&self.contract_error).clone() {
            return Err(ProviderError::new(message));
        }
        self.contract.binds.fetch_add(1, Ordering::SeqCst);
        Ok(Arc::clone(&self.contract) as Arc<dyn ContractHandle>)
    }
}

/// A transaction the mock contract accepted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentCall {
    pub method: String,
    pub args: Vec<Value>,
    pub options: WriteOptions,
    pub tx_id: String,
}

/// TRC20 contract answering `balanceOf` and `allowance` from memory.
#[derive(Default)]
pub struct MockContract {
    balance: Mutex<U256>,
    allowance: Mutex<U256>,
    read_error: Mutex<Option<String>>,
    send_error: Mutex<Option<String>>,
    reads: AtomicU32,
    binds: AtomicU32,
    sent: Mutex<Vec<SentCall>>,
}

impl MockContract {
    pub fn set_balance(&self, balance: U256) {
        *lock(&self.balance) = balance;
    }

    pub fn set_allowance(&self, allowance: U256) {
        *lock(&self.allowance) = allowance;
    }

    pub fn fail_reads(&self, message: Option<&str>) {
        *lock(&self.read_error) = message.map(str::to_string);
    }

    pub fn fail_sends(&self, message: Option<&str>) {
        *lock(&self.send_error) = message.map(str::to_string);
    }

    /// Number of read calls that reached the contract.
    pub fn reads(&self) -> u32 {
        self.reads.load(Ordering::SeqCst)
    }

    /// Number of bindings created against this contract.
    pub fn binds(&self) -> u32 {
        self.binds.load(Ordering::SeqCst)
    }

    pub fn sent(&self) -> Vec<SentCall> {
        lock(&self.sent).clone()
    }
}

#[async_trait]
impl ContractHandle for MockContract {
    async fn call(
        &self,
        method: &MethodDescriptor,
        _args: &[Value],
    ) -> Result<Vec<Value>, ProviderError> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        tokio::task::yield_now().await;

        if let Some(message) = lock(&self.read_error).clone() {
            return Err(ProviderError::new(message));
        }

        match method.name.as_str() {
            "balanceOf" => Ok(vec![Value::Uint(*lock(&self.balance))]),
            "allowance" => Ok(vec![Value::Uint(*lock(&self.allowance))]),
            other => Err(ProviderError::new(format!("method {other} not mocked"))),
        }
    }

    async fn send(
        &self,
        method: &MethodDescriptor,
        args: &[Value],
        options: &WriteOptions,
    ) -> Result<String, ProviderError> {
        tokio::task::yield_now().await;

        if let Some(message) = lock(&self.send_error).clone() {
            return Err(ProviderError::new(message));
        }

        let mut sent = lock(&self.sent);
        let tx_id = format!("mock-tx-{}", sent.len() + 1);
        sent.push(SentCall {
            method: method.name.clone(),
            args: args.to_vec(),
            options: options.clone(),
            tx_id: tx_id.clone(),
        });
        Ok(tx_id)
    }
}

/// Extension handshake that records requested methods.
#[derive(Default)]
pub struct MockHandshake {
    error: Option<String>,
    requests: Mutex<Vec<String>>,
}

impl MockHandshake {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            error: Some(message.to_string()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<String> {
        lock(&self.requests).clone()
    }
}

#[async_trait]
impl AccountHandshake for MockHandshake {
    async fn request(
        &self,
        method: &str,
        _params: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError> {
        lock(&self.requests).push(method.to_string());
        tokio::task::yield_now().await;

        match &self.error {
            Some(message) => Err(ProviderError::new(message.clone())),
            None => Ok(serde_json::json!({ "code": 200, "message": "ok" })),
        }
    }
}

/// Records requested delays and only yields instead of sleeping.
#[derive(Default)]
pub struct ImmediateDelay {
    sleeps: Mutex<Vec<Duration>>,
}

impl ImmediateDelay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sleeps(&self) -> Vec<Duration> {
        lock(&self.sleeps).clone()
    }
}

#[async_trait]
impl Delay for ImmediateDelay {
    async fn sleep(&self, duration: Duration) {
        lock(&self.sleeps).push(duration);
        tokio::task::yield_now().await;
    }
}
