//! Error classification.
//!
//! Wallets and nodes report failures as free text. [`classify`] walks the
//! ordered [`RULES`] table and the first case-insensitive substring match
//! decides the [`ErrorKind`].

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    UserRejected,
    InsufficientFunds,
    ContractReverted,
    WalletLocked,
    NetworkError,
    NotConnected,
    InvalidInput,
    BindingUnavailable,
    Unknown,
}

impl ErrorKind {
    pub const ALL: [Self; 9] = [
        Self::UserRejected,
        Self::InsufficientFunds,
        Self::ContractReverted,
        Self::WalletLocked,
        Self::NetworkError,
        Self::NotConnected,
        Self::InvalidInput,
        Self::BindingUnavailable,
        Self::Unknown,
    ];

    /// Human-readable status for a failure of this kind.
    pub const fn status(&self) -> &'static str {
        match self {
            Self::UserRejected => "Request rejected in wallet",
            Self::InsufficientFunds => "Insufficient balance or energy for this transaction",
            Self::ContractReverted => "Contract reverted the transaction",
            Self::WalletLocked => "Wallet is locked",
            Self::NetworkError => "Network error",
            Self::NotConnected => "Please connect your wallet first",
            Self::InvalidInput => "Invalid input",
            Self::BindingUnavailable => "Token contract unavailable",
            Self::Unknown => "Transaction failed",
        }
    }

    /// Stable snake_case label, used for metrics.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::UserRejected => "user_rejected",
            Self::InsufficientFunds => "insufficient_funds",
            Self::ContractReverted => "contract_reverted",
            Self::WalletLocked => "wallet_locked",
            Self::NetworkError => "network_error",
            Self::NotConnected => "not_connected",
            Self::InvalidInput => "invalid_input",
            Self::BindingUnavailable => "binding_unavailable",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A pattern and the kind it maps to. Patterns are lowercase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rule {
    pub pattern: &'static str,
    pub kind: ErrorKind,
}

impl Rule {
    const fn new(pattern: &'static str, kind: ErrorKind) -> Self {
        Self { pattern, kind }
    }
}

/// Ordered classification rules; first match wins.
pub const RULES: &[Rule] = &[
    Rule::new("user rejected", ErrorKind::UserRejected),
    Rule::new("declined by user", ErrorKind::UserRejected),
    Rule::new("user denied", ErrorKind::UserRejected),
    Rule::new("balance is not sufficient", ErrorKind::InsufficientFunds),
    Rule::new("insufficient", ErrorKind::InsufficientFunds),
    Rule::new("not enough energy", ErrorKind::InsufficientFunds),
    Rule::new("revert", ErrorKind::ContractReverted),
    Rule::new("wallet is locked", ErrorKind::WalletLocked),
    Rule::new("please unlock", ErrorKind::WalletLocked),
    Rule::new("network error", ErrorKind::NetworkError),
    Rule::new("error sending request", ErrorKind::NetworkError),
    Rule::new("failed to fetch", ErrorKind::NetworkError),
    Rule::new("timed out", ErrorKind::NetworkError),
    Rule::new("timeout", ErrorKind::NetworkError),
    Rule::new("connection refused", ErrorKind::NetworkError),
    Rule::new("connect your wallet", ErrorKind::NotConnected),
    Rule::new("not connected", ErrorKind::NotConnected),
    Rule::new("no wallet found", ErrorKind::NotConnected),
    Rule::new("invalid address", ErrorKind::InvalidInput),
    Rule::new("invalid amount", ErrorKind::InvalidInput),
    Rule::new("invalid input", ErrorKind::InvalidInput),
    Rule::new("failed to bind contract", ErrorKind::BindingUnavailable),
    Rule::new("contract does not exist", ErrorKind::BindingUnavailable),
];

/// A failure with its kind and the diagnostic text it came from.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {message}", kind.status())]
pub struct Classified {
    pub kind: ErrorKind,
    pub message: String,
}

impl Classified {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Classify a raw failure description. The text is kept verbatim.
pub fn classify(raw: &str) -> Classified {
    let haystack = raw.to_lowercase();
    let kind = RULES
        .iter()
        .find(|rule| haystack.contains(rule.pattern))
        .map_or(ErrorKind::Unknown, |rule| rule.kind);

    Classified::new(kind, raw)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_rejected() {
        assert_eq!(classify("User rejected the request").kind, ErrorKind::UserRejected);
        assert_eq!(
            classify("Confirmation declined by user").kind,
            ErrorKind::UserRejected
        );
    }

    #[test]
    fn test_revert() {
        let classified = classify("REVERT opcode executed");
        assert_eq!(classified.kind, ErrorKind::ContractReverted);
        assert_eq!(classified.message, "REVERT opcode executed");
    }

    #[test]
    fn test_unknown_preserves_text() {
        let raw = "Something odd happened: 0xdeadbeef";
        let classified = classify(raw);
        assert_eq!(classified.kind, ErrorKind::Unknown);
        assert_eq!(classified.message, raw);
    }

    #[test]
    fn test_first_match_wins() {
        // both "user rejected" and "insufficient" appear
        let classified = classify("User rejected: insufficient energy prompt");
        assert_eq!(classified.kind, ErrorKind::UserRejected);

        let classified = classify("Network error: node returned 503: REVERT");
        assert_eq!(classified.kind, ErrorKind::ContractReverted);
    }

    #[test]
    fn test_every_rule_classifies_its_pattern() {
        for rule in RULES {
            let earlier = RULES
                .iter()
                .take_while(|r| r.pattern != rule.pattern)
                .find(|r| rule.pattern.contains(r.pattern));

            let expected = earlier.map_or(rule.kind, |r| r.kind);
            let raw = format!("wallet says: {}", rule.pattern.to_uppercase());
            assert_eq!(classify(&raw).kind, expected, "pattern {:?}", rule.pattern);
        }
    }

    #[test]
    fn test_every_kind_has_a_status() {
        for kind in ErrorKind::ALL {
            assert!(!kind.status().is_empty());
            assert!(!kind.as_str().is_empty());
        }
    }

    #[test]
    fn test_display() {
        let classified = classify("Wallet is locked: no signer configured");
        assert_eq!(classified.kind, ErrorKind::WalletLocked);
        assert_eq!(
            classified.to_string(),
            "Wallet is locked: Wallet is locked: no signer configured"
        );
    }
}
