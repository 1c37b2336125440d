use crate::{detect::ProviderKind, provider::InjectedProvider};
use std::{fmt, sync::Arc};

/// A ready, address-bearing wallet session.
///
/// Immutable once captured. An account change produces a new session with a
/// higher epoch rather than mutating this one.
#[derive(Clone)]
pub struct WalletSession {
    address: String,
    kind: ProviderKind,
    ready: bool,
    epoch: u64,
    provider: Arc<dyn InjectedProvider>,
}

impl WalletSession {
    pub(crate) fn new(
        address: String,
        kind: ProviderKind,
        epoch: u64,
        provider: Arc<dyn InjectedProvider>,
    ) -> Self {
        Self {
            address,
            kind,
            ready: true,
            epoch,
            provider,
        }
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub const fn provider_kind(&self) -> ProviderKind {
        self.kind
    }

    pub const fn is_ready(&self) -> bool {
        self.ready
    }

    /// Connection cycle that produced this session.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }

    pub(crate) fn provider(&self) -> &Arc<dyn InjectedProvider> {
        &self.provider
    }
}

impl PartialEq for WalletSession {
    fn eq(&self, other: &Self) -> bool {
        self.address == other.address
            && self.kind == other.kind
            && self.ready == other.ready
            && self.epoch == other.epoch
    }
}

impl Eq for WalletSession {}

impl fmt::Debug for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletSession")
            .field("address", &self.address)
            .field("kind", &self.kind)
            .field("ready", &self.ready)
            .field("epoch", &self.epoch)
            .finish_non_exhaustive()
    }
}
