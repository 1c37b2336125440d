use crate::provider::{HostEnvironment, Injected};
use std::fmt;

/// Which kind of wallet the host exposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    None,
    /// The wallet object carries a ready session directly.
    PrimaryInjected,
    /// An extension must hand out the account before the session appears.
    SecondaryInjectedViaChainSwitch,
    /// Wallet-looking globals that match no known shape.
    Unknown,
}

impl ProviderKind {
    pub const fn is_connectable(&self) -> bool {
        matches!(
            self,
            Self::PrimaryInjected | Self::SecondaryInjectedViaChainSwitch
        )
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::None => "none",
            Self::PrimaryInjected => "primary-injected",
            Self::SecondaryInjectedViaChainSwitch => "secondary-injected",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Classify the host's injected globals.
///
/// Pure inspection: safe to call on every poll.
pub fn detect(host: &dyn HostEnvironment) -> ProviderKind {
    let wallet = host.wallet();

    if host.handshake().is_some() {
        let ready = matches!(&wallet, Some(Injected::Wallet(provider)) if provider.is_ready());
        if !ready {
            return ProviderKind::SecondaryInjectedViaChainSwitch;
        }
    }

    match wallet {
        Some(Injected::Wallet(_)) => ProviderKind::PrimaryInjected,
        Some(Injected::Malformed { .. }) => ProviderKind::Unknown,
        None => ProviderKind::None,
    }
}
