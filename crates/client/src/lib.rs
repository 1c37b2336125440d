//! Wallet provider access for the TRC20 approval client.
//!
//! - [`provider`]: the surface a host's injected wallet objects expose
//! - [`detect`]: classify what the host has injected
//! - [`connection`]: bounded connect state machine, single-flight
//! - [`contract`]: contract handles bound to a live session
//! - [`node`]: headless host backed by a full node and a remote signer

pub mod connection;
pub mod contract;
pub mod delay;
pub mod detect;
#[cfg(any(test, feature = "test-utils"))]
pub mod mock;
pub mod node;
pub mod provider;
mod remote_signer;
pub mod session;
pub mod status;

pub use connection::{ConnectionError, ConnectionManager, ConnectionState, WatchHandle};
pub use contract::{BindError, CallError, ContractBinding};
pub use delay::{Delay, TokioDelay};
pub use detect::{detect, ProviderKind};
pub use node::NodeHost;
pub use provider::{
    AccountHandshake, ContractHandle, HostEnvironment, Injected, InjectedProvider, ProviderError,
    WriteOptions,
};
pub use remote_signer::RemoteSigner;
pub use session::WalletSession;
pub use status::StatusFeed;
