//! The wallet surface a host exposes to the page.
//!
//! In a browser these are the objects a wallet extension injects into the
//! global scope (`tronWeb`, `tronLink`). [`crate::NodeHost`] provides the same
//! surface on top of a full node.

use async_trait::async_trait;
use binding::{InterfaceDescription, MethodDescriptor, Value};
use std::{fmt, sync::Arc};
use thiserror::Error;

/// A failure reported by the wallet or the chain, carried as raw text.
///
/// The text is what error classification matches against, so it is kept
/// verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct ProviderError {
    message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("Network error: {err}"))
    }
}

/// Parameters of a state-changing call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteOptions {
    /// Maximum fee the caller authorizes, in sun
    pub fee_limit: u64,
    /// Native value sent along with the call, in sun
    pub call_value: u64,
    /// Account submitting the transaction
    pub from: String,
}

/// A callable handle produced by a provider's contract factory.
#[async_trait]
pub trait ContractHandle: Send + Sync {
    /// Side-effect-free call.
    async fn call(
        &self,
        method: &MethodDescriptor,
        args: &[Value],
    ) -> Result<Vec<Value>, ProviderError>;

    /// Sign and submit a transaction. Returns the transaction id.
    async fn send(
        &self,
        method: &MethodDescriptor,
        args: &[Value],
        options: &WriteOptions,
    ) -> Result<String, ProviderError>;
}

/// The account-bearing wallet object.
#[async_trait]
pub trait InjectedProvider: Send + Sync {
    fn is_ready(&self) -> bool;

    /// Currently selected account, if the wallet exposes one.
    fn default_address(&self) -> Option<String>;

    /// Contract factory taking the interface and the contract address.
    async fn contract(
        &self,
        interface: Arc<InterfaceDescription>,
        address: &str,
    ) -> Result<Arc<dyn ContractHandle>, ProviderError>;
}

/// Extension object that hands out accounts on request.
#[async_trait]
pub trait AccountHandshake: Send + Sync {
    async fn request(
        &self,
        method: &str,
        params: serde_json::Value,
    ) -> Result<serde_json::Value, ProviderError>;
}

/// What sits under the wallet global.
#[derive(Clone)]
pub enum Injected {
    /// An object with the expected members.
    Wallet(Arc<dyn InjectedProvider>),
    /// Something is injected under a wallet name but lacks the expected members.
    Malformed { global: String },
}

impl fmt::Debug for Injected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wallet(_) => f.write_str("Wallet"),
            Self::Malformed { global } => f.debug_struct("Malformed").field("global", global).finish(),
        }
    }
}

/// Read-only view of the globals a host has injected.
///
/// Scripts may inject late, so every call reflects the current moment.
pub trait HostEnvironment: Send + Sync {
    fn wallet(&self) -> Option<Injected>;

    fn handshake(&self) -> Option<Arc<dyn AccountHandshake>>;
}
