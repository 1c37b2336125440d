use std::sync::Arc;
use tokio::sync::watch;

/// Latest human-readable status line, for whatever renders it.
///
/// Free text: nothing in this workspace branches on it.
#[derive(Debug, Clone)]
pub struct StatusFeed {
    tx: Arc<watch::Sender<String>>,
}

impl Default for StatusFeed {
    fn default() -> Self {
        Self::new()
    }
}

impl StatusFeed {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(String::new());
        Self { tx: Arc::new(tx) }
    }

    pub fn publish(&self, message: impl Into<String>) {
        self.tx.send_replace(message.into());
    }

    pub fn subscribe(&self) -> watch::Receiver<String> {
        self.tx.subscribe()
    }

    pub fn latest(&self) -> String {
        self.tx.borrow().clone()
    }
}
