use crate::classify::ErrorKind;

/// Lifecycle of one approval request.
///
/// `Pending` settles exactly once, into `Submitted` or `Failed`. Submission
/// is not confirmation: a submitted transaction may still fail on chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransactionOutcome {
    Pending,
    Submitted(String),
    Failed { kind: ErrorKind, detail: String },
}

impl TransactionOutcome {
    pub fn failed(kind: ErrorKind, detail: impl Into<String>) -> Self {
        Self::Failed {
            kind,
            detail: detail.into(),
        }
    }

    pub const fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn tx_id(&self) -> Option<&str> {
        match self {
            Self::Submitted(tx_id) => Some(tx_id),
            _ => None,
        }
    }

    pub const fn error_kind(&self) -> Option<ErrorKind> {
        match self {
            Self::Failed { kind, .. } => Some(*kind),
            _ => None,
        }
    }

    /// Settle a pending outcome. Returns false, leaving `self` untouched, if it
    /// was already terminal or `next` is `Pending`.
    pub fn settle(&mut self, next: Self) -> bool {
        if self.is_terminal() || !next.is_terminal() {
            return false;
        }
        *self = next;
        true
    }

    /// Status line for a settled outcome.
    pub fn status(&self) -> Option<String> {
        match self {
            Self::Pending => None,
            Self::Submitted(tx_id) => Some(format!("Approval submitted! TxID: {tx_id}")),
            Self::Failed {
                kind: ErrorKind::Unknown,
                detail,
            } => Some(format!("Transaction failed: {detail}")),
            Self::Failed { kind, detail } => Some(format!("{}: {detail}", kind.status())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settles_once() {
        let mut outcome = TransactionOutcome::Pending;
        assert!(!outcome.is_terminal());
        assert!(outcome.status().is_none());

        assert!(outcome.settle(TransactionOutcome::Submitted("abc".to_string())));
        assert!(outcome.is_terminal());
        assert_eq!(outcome.tx_id(), Some("abc"));

        assert!(!outcome.settle(TransactionOutcome::failed(ErrorKind::Unknown, "late")));
        assert_eq!(outcome, TransactionOutcome::Submitted("abc".to_string()));
    }

    #[test]
    fn test_pending_does_not_settle() {
        let mut outcome = TransactionOutcome::Pending;
        assert!(!outcome.settle(TransactionOutcome::Pending));
        assert_eq!(outcome, TransactionOutcome::Pending);
    }

    #[test]
    fn test_status_lines() {
        assert_eq!(
            TransactionOutcome::Submitted("abc".to_string()).status().unwrap(),
            "Approval submitted! TxID: abc"
        );
        assert_eq!(
            TransactionOutcome::failed(ErrorKind::Unknown, "weird").status().unwrap(),
            "Transaction failed: weird"
        );

        let rejected = TransactionOutcome::failed(ErrorKind::UserRejected, "declined by user");
        assert_eq!(rejected.error_kind(), Some(ErrorKind::UserRejected));
        assert_eq!(
            rejected.status().unwrap(),
            "Request rejected in wallet: declined by user"
        );
    }
}
