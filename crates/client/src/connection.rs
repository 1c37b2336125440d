//! Wallet connection state machine.
//!
//! ```text
//! Idle -> Detecting -> AwaitingReadiness -> Connected
//!            |               |                  |
//!            +----> Failed <-+                  +--> Detecting (account changed)
//! ```
//!
//! Every attempt is bounded: detection gets one retry, readiness polling gets
//! `PollingConfig::max_attempts` checks.

use crate::{
    delay::{Delay, TokioDelay},
    detect::{detect, ProviderKind},
    provider::{HostEnvironment, Injected, InjectedProvider},
    session::WalletSession,
    status::StatusFeed,
};
use config::PollingConfig;
use futures::future::{BoxFuture, FutureExt, Shared};
use serde_json::json;
use std::{
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc, Mutex, MutexGuard, PoisonError,
    },
    time::Duration,
};
use thiserror::Error;
use tokio::task::JoinHandle;
use tokio_retry::strategy::FixedInterval;
use tracing::{debug, info, warn};

/// Handshake method that asks the extension to expose an account.
const REQUEST_ACCOUNTS: &str = "tron_requestAccounts";

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectionError {
    #[error("No wallet found. Open in Trust Wallet or TronLink DApp browser")]
    NoProvider,

    #[error("Unrecognized wallet provider")]
    UnrecognizedProvider,

    #[error("Wallet not ready after {attempts} attempts")]
    NotReady { attempts: u32 },

    #[error("Connection attempt aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionState {
    Idle,
    Detecting,
    AwaitingReadiness { kind: ProviderKind, attempt: u32 },
    Connected(WalletSession),
    Failed(ConnectionError),
}

type ConnectFuture = Shared<BoxFuture<'static, Result<WalletSession, ConnectionError>>>;

struct Inner {
    host: Arc<dyn HostEnvironment>,
    delay: Arc<dyn Delay>,
    polling: PollingConfig,
    status: StatusFeed,
    state: Mutex<ConnectionState>,
    inflight: Mutex<Option<ConnectFuture>>,
    epoch: AtomicU64,
}

/// Owns the process-wide wallet session.
///
/// Cheap to clone; clones share the same state.
#[derive(Clone)]
pub struct ConnectionManager {
    inner: Arc<Inner>,
}

impl ConnectionManager {
    pub fn new(host: Arc<dyn HostEnvironment>, polling: PollingConfig, status: StatusFeed) -> Self {
        Self::with_delay(host, Arc::new(TokioDelay), polling, status)
    }

    pub fn with_delay(
        host: Arc<dyn HostEnvironment>,
        delay: Arc<dyn Delay>,
        polling: PollingConfig,
        status: StatusFeed,
    ) -> Self {
        Self {
            inner: Arc::new(Inner {
                host,
                delay,
                polling,
                status,
                state: Mutex::new(ConnectionState::Idle),
                inflight: Mutex::new(None),
                epoch: AtomicU64::new(0),
            }),
        }
    }

    pub fn state(&self) -> ConnectionState {
        self.inner.state().clone()
    }

    /// The active session, if connected.
    pub fn session(&self) -> Option<WalletSession> {
        match &*self.inner.state() {
            ConnectionState::Connected(session) => Some(session.clone()),
            _ => None,
        }
    }

    pub fn detect(&self) -> ProviderKind {
        detect(self.inner.host.as_ref())
    }

    pub fn status(&self) -> &StatusFeed {
        &self.inner.status
    }

    /// Obtain a ready session.
    ///
    /// Returns the existing session untouched when the account is unchanged.
    /// Concurrent callers share a single attempt and see the same result. The
    /// attempt runs on its own task and settles whether or not anyone is still
    /// waiting for it.
    pub async fn connect(&self) -> Result<WalletSession, ConnectionError> {
        if let Some(session) = self.inner.unchanged_session() {
            return Ok(session);
        }

        let attempt = {
            let mut inflight = self.inner.inflight();
            if let Some(attempt) = inflight.as_ref() {
                debug!("Joining in-flight connection attempt");
                attempt.clone()
            } else {
                let attempt = self.inner.spawn_attempt();
                *inflight = Some(attempt.clone());
                attempt
            }
        };

        attempt.await
    }

    /// Clear the session.
    pub fn disconnect(&self) {
        let mut state = self.inner.state();
        if let ConnectionState::Connected(session) = &*state {
            info!(address = session.address(), "Wallet disconnected");
        }
        *state = ConnectionState::Idle;
        drop(state);
        self.inner.status.publish("Wallet disconnected");
    }

    /// One background check: connect once a provider shows up, reconnect when
    /// the active account changes.
    pub async fn poll_once(&self) {
        let reconnect = match self.state() {
            ConnectionState::Connected(session) => {
                let changed = self.inner.live_address().as_deref() != Some(session.address());
                if changed {
                    info!(previous = session.address(), "Active account changed");
                }
                changed
            }
            _ => self.detect().is_connectable(),
        };

        if reconnect {
            if let Err(err) = self.connect().await {
                debug!(error = %err, "Background connect failed");
            }
        }
    }

    /// Run [`Self::poll_once`] every `interval` until the handle is dropped.
    pub fn watch(&self, interval: Duration) -> WatchHandle {
        let manager = self.clone();
        let task = tokio::spawn(async move {
            loop {
                manager.inner.delay.sleep(interval).await;
                manager.poll_once().await;
            }
        });
        WatchHandle { task }
    }
}

/// Stops the background watcher when dropped.
#[derive(Debug)]
pub struct WatchHandle {
    task: JoinHandle<()>,
}

impl Drop for WatchHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl Inner {
    fn state(&self) -> MutexGuard<'_, ConnectionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn inflight(&self) -> MutexGuard<'_, Option<ConnectFuture>> {
        self.inflight.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_state(&self, next: ConnectionState) {
        *self.state() = next;
    }

    /// The connected session, if the wallet still reports the same account.
    fn unchanged_session(&self) -> Option<WalletSession> {
        let session = match &*self.state() {
            ConnectionState::Connected(session) => session.clone(),
            _ => return None,
        };
        (self.live_address().as_deref() == Some(session.address())).then_some(session)
    }

    fn live_address(&self) -> Option<String> {
        self.ready_provider().map(|(_, address)| address)
    }

    fn ready_provider(&self) -> Option<(Arc<dyn InjectedProvider>, String)> {
        let Some(Injected::Wallet(provider)) = self.host.wallet() else {
            return None;
        };
        if !provider.is_ready() {
            return None;
        }
        let address = provider.default_address().filter(|a| !a.is_empty())?;
        Some((provider, address))
    }

    /// Must be called with the `inflight` slot locked.
    fn spawn_attempt(self: &Arc<Self>) -> ConnectFuture {
        let inner = Arc::clone(self);
        let task = tokio::spawn(async move {
            let result = inner.run_attempt().await;
            *inner.inflight() = None;
            result
        });

        let inner = Arc::downgrade(self);
        task.map(move |joined| {
            joined.unwrap_or_else(|err| {
                let err = ConnectionError::Aborted(err.to_string());
                warn!(error = %err, "Wallet connection failed");
                if let Some(inner) = inner.upgrade() {
                    *inner.inflight() = None;
                    inner.set_state(ConnectionState::Failed(err.clone()));
                }
                Err(err)
            })
        })
        .boxed()
        .shared()
    }

    async fn run_attempt(&self) -> Result<WalletSession, ConnectionError> {
        if let Some(session) = self.unchanged_session() {
            return Ok(session);
        }

        self.set_state(ConnectionState::Detecting);
        let result = match self.detect_with_retry().await {
            Ok(kind) => self.await_readiness(kind).await,
            Err(err) => Err(err),
        };

        match &result {
            Ok(session) => {
                info!(
                    address = session.address(),
                    kind = %session.provider_kind(),
                    epoch = session.epoch(),
                    "Wallet connected"
                );
                self.set_state(ConnectionState::Connected(session.clone()));
                self.status.publish(format!("Connected: {}", session.address()));
            }
            Err(err) => {
                warn!(error = %err, "Wallet connection failed");
                self.set_state(ConnectionState::Failed(err.clone()));
                self.status.publish(err.to_string());
            }
        }

        result
    }

    /// Scripts may inject late: a miss gets one more look after one interval.
    async fn detect_with_retry(&self) -> Result<ProviderKind, ConnectionError> {
        let mut kind = detect(self.host.as_ref());
        if !kind.is_connectable() {
            debug!(%kind, "No usable provider yet, retrying detection once");
            self.delay.sleep(self.polling.interval()).await;
            kind = detect(self.host.as_ref());
        }

        match kind {
            ProviderKind::None => Err(ConnectionError::NoProvider),
            ProviderKind::Unknown => Err(ConnectionError::UnrecognizedProvider),
            kind => Ok(kind),
        }
    }

    async fn await_readiness(&self, kind: ProviderKind) -> Result<WalletSession, ConnectionError> {
        if kind == ProviderKind::SecondaryInjectedViaChainSwitch {
            self.request_accounts().await;
        }

        let max_attempts = self.polling.max_attempts.max(1);
        let mut schedule =
            FixedInterval::new(self.polling.interval()).take(max_attempts as usize - 1);
        let mut attempt = 0;

        loop {
            attempt += 1;
            self.set_state(ConnectionState::AwaitingReadiness { kind, attempt });

            if let Some((provider, address)) = self.ready_provider() {
                let epoch = self.epoch.fetch_add(1, Ordering::SeqCst) + 1;
                return Ok(WalletSession::new(address, kind, epoch, provider));
            }

            let Some(delay) = schedule.next() else {
                return Err(ConnectionError::NotReady { attempts: attempt });
            };
            debug!(attempt, max_attempts, "Wallet not ready, waiting");
            self.delay.sleep(delay).await;
        }
    }

    /// Rejection is not fatal; readiness polling follows either way.
    async fn request_accounts(&self) {
        let Some(handshake) = self.host.handshake() else {
            return;
        };

        match handshake.request(REQUEST_ACCOUNTS, json!({})).await {
            Ok(response) => {
                if let Some(code) = response.get("code").and_then(|c| c.as_u64()) {
                    if code != 200 {
                        warn!(code, %response, "Account request not granted, polling anyway");
                        return;
                    }
                }
                debug!(%response, "Account request granted");
            }
            Err(err) => {
                warn!(error = %err, "Account request failed, polling anyway");
            }
        }
    }
}
