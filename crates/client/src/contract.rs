use crate::{
    connection::ConnectionManager,
    provider::{ContractHandle, ProviderError, WriteOptions},
    session::WalletSession,
};
use binding::{abi::check_args, AbiError, InterfaceDescription, MethodDescriptor, Value};
use std::{fmt, sync::Arc};
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
    #[error("Please connect your wallet first")]
    NotConnected,

    #[error("Contract address is empty")]
    EmptyAddress,

    #[error("Failed to bind contract {address}: {source}")]
    Provider {
        address: String,
        #[source]
        source: ProviderError,
    },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("Unknown contract method: {0}")]
    UnknownMethod(String),

    #[error("Method {0} changes state and cannot be called read-only")]
    NotView(String),

    #[error("Method {0} is view-only and cannot be submitted")]
    NotWritable(String),

    #[error("Fee limit required for {0}")]
    MissingFeeLimit(String),

    #[error("Unauthorized: {from} is not the connected account {session}")]
    Unauthorized { from: String, session: String },

    #[error("Invalid input: {0}")]
    Abi(#[from] AbiError),

    #[error(transparent)]
    Provider(#[from] ProviderError),
}

/// A contract handle tied to the session that created it.
///
/// Once the session is replaced the binding is stale and must be re-created;
/// see [`ContractBinding::is_current`].
#[derive(Clone)]
pub struct ContractBinding {
    address: String,
    interface: Arc<InterfaceDescription>,
    handle: Arc<dyn ContractHandle>,
    session: WalletSession,
}

impl ContractBinding {
    /// Bind against the manager's active session.
    pub async fn bind(
        address: &str,
        interface: Arc<InterfaceDescription>,
        connection: &ConnectionManager,
    ) -> Result<Self, BindError> {
        let session = connection.session().ok_or(BindError::NotConnected)?;
        Self::bind_session(address, interface, session).await
    }

    pub async fn bind_session(
        address: &str,
        interface: Arc<InterfaceDescription>,
        session: WalletSession,
    ) -> Result<Self, BindError> {
        if address.is_empty() {
            return Err(BindError::EmptyAddress);
        }

        let handle = session
            .provider()
            .contract(Arc::clone(&interface), address)
            .await
            .map_err(|source| BindError::Provider {
                address: address.to_string(),
                source,
            })?;

        debug!(
            contract = address,
            session = session.address(),
            epoch = session.epoch(),
            "Contract bound"
        );

        Ok(Self {
            address: address.to_string(),
            interface,
            handle,
            session,
        })
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub const fn session(&self) -> &WalletSession {
        &self.session
    }

    /// Whether this binding still belongs to `session`.
    pub fn is_current(&self, session: &WalletSession) -> bool {
        self.session == *session
    }

    /// Side-effect-free call; no fee limit involved.
    pub async fn call_read(&self, method: &str, args: &[Value]) -> Result<Vec<Value>, CallError> {
        let descriptor = self.method(method)?;
        if !descriptor.mutability.is_view() {
            return Err(CallError::NotView(method.to_string()));
        }
        check_args(&descriptor.inputs, args)?;

        debug!(contract = %self.address, method, "Read call");
        Ok(self.handle.call(descriptor, args).await?)
    }

    /// Submit a state-changing call from the bound account.
    pub async fn call_write(
        &self,
        method: &str,
        args: &[Value],
        options: WriteOptions,
    ) -> Result<String, CallError> {
        let descriptor = self.method(method)?;
        if descriptor.mutability.is_view() {
            return Err(CallError::NotWritable(method.to_string()));
        }
        if options.from != self.session.address() {
            return Err(CallError::Unauthorized {
                from: options.from,
                session: self.session.address().to_string(),
            });
        }
        if options.fee_limit == 0 {
            return Err(CallError::MissingFeeLimit(method.to_string()));
        }
        check_args(&descriptor.inputs, args)?;

        debug!(
            contract = %self.address,
            method,
            fee_limit = options.fee_limit,
            call_value = options.call_value,
            "Write call"
        );
        Ok(self.handle.send(descriptor, args, &options).await?)
    }

    fn method(&self, name: &str) -> Result<&MethodDescriptor, CallError> {
        self.interface
            .method(name)
            .ok_or_else(|| CallError::UnknownMethod(name.to_string()))
    }
}

impl fmt::Debug for ContractBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ContractBinding")
            .field("address", &self.address)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        mock::{ImmediateDelay, MockHost, MockWallet},
        StatusFeed,
    };
    use alloy_primitives::U256;
    use config::PollingConfig;

    const OWNER: &str = "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL";
    const TOKEN: &str = "TR7NHqjeKQxGTCi8q8ZY4pL8otSzgjLj6t";
    const SPENDER: &str = "TXYZopYRdj2D9XRtbG411XZZ3kM5VkAeBf";

    async fn connected(wallet: Arc<MockWallet>) -> ConnectionManager {
        let host = Arc::new(MockHost::new());
        host.set_wallet(wallet);
        let manager = ConnectionManager::with_delay(
            host,
            Arc::new(ImmediateDelay::new()),
            PollingConfig::new(3, 10),
            StatusFeed::new(),
        );
        manager.connect().await.unwrap();
        manager
    }

    fn write_options(from: &str) -> WriteOptions {
        WriteOptions {
            fee_limit: 100_000_000,
            call_value: 0,
            from: from.to_string(),
        }
    }

    #[tokio::test]
    async fn test_bind_requires_connection() {
        let host = Arc::new(MockHost::new());
        let manager = ConnectionManager::with_delay(
            host,
            Arc::new(ImmediateDelay::new()),
            PollingConfig::new(3, 10),
            StatusFeed::new(),
        );

        let result =
            ContractBinding::bind(TOKEN, Arc::new(InterfaceDescription::trc20()), &manager).await;
        assert_eq!(result.unwrap_err(), BindError::NotConnected);
    }

    #[tokio::test]
    async fn test_bind_surfaces_factory_failure() {
        let wallet = Arc::new(MockWallet::new(OWNER));
        wallet.fail_contract("contract does not exist");
        let manager = connected(wallet).await;

        let err = ContractBinding::bind(TOKEN, Arc::new(InterfaceDescription::trc20()), &manager)
            .await
            .unwrap_err();
        assert!(matches!(err, BindError::Provider { .. }));

        let err = ContractBinding::bind("", Arc::new(InterfaceDescription::trc20()), &manager)
            .await
            .unwrap_err();
        assert_eq!(err, BindError::EmptyAddress);
    }

    #[tokio::test]
    async fn test_call_read() {
        let wallet = Arc::new(MockWallet::new(OWNER));
        wallet.contract().set_balance(U256::from(1_500_000u64));
        let manager = connected(wallet.clone()).await;
        let binding = ContractBinding::bind(TOKEN, Arc::new(InterfaceDescription::trc20()), &manager)
            .await
            .unwrap();

        let values = binding
            .call_read("balanceOf", &[Value::Address(OWNER.to_string())])
            .await
            .unwrap();
        assert_eq!(values, vec![Value::Uint(U256::from(1_500_000u64))]);
        assert_eq!(wallet.contract().reads(), 1);
    }

    #[tokio::test]
    async fn test_call_read_rejects_write_method() {
        let manager = connected(Arc::new(MockWallet::new(OWNER))).await;
        let binding = ContractBinding::bind(TOKEN, Arc::new(InterfaceDescription::trc20()), &manager)
            .await
            .unwrap();

        let err = binding
            .call_read(
                "approve",
                &[Value::Address(SPENDER.to_string()), Value::Uint(U256::MAX)],
            )
            .await
            .unwrap_err();
        assert_eq!(err, CallError::NotView("approve".to_string()));

        let err = binding.call_read("transfer", &[]).await.unwrap_err();
        assert_eq!(err, CallError::UnknownMethod("transfer".to_string()));
    }

    #[tokio::test]
    async fn test_call_write_submits() {
        let wallet = Arc::new(MockWallet::new(OWNER));
        let manager = connected(wallet.clone()).await;
        let binding = ContractBinding::bind(TOKEN, Arc::new(InterfaceDescription::trc20()), &manager)
            .await
            .unwrap();

        let args = [Value::Address(SPENDER.to_string()), Value::Uint(U256::from(5u64))];
        let tx_id = binding
            .call_write("approve", &args, write_options(OWNER))
            .await
            .unwrap();

        let sent = wallet.contract().sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].tx_id, tx_id);
        assert_eq!(sent[0].method, "approve");
        assert_eq!(sent[0].args, args.to_vec());
        assert_eq!(sent[0].options, write_options(OWNER));
    }

    #[tokio::test]
    async fn test_call_write_rejects_foreign_sender() {
        let wallet = Arc::new(MockWallet::new(OWNER));
        let manager = connected(wallet.clone()).await;
        let binding = ContractBinding::bind(TOKEN, Arc::new(InterfaceDescription::trc20()), &manager)
            .await
            .unwrap();

        let args = [Value::Address(SPENDER.to_string()), Value::Uint(U256::from(5u64))];
        let err = binding
            .call_write("approve", &args, write_options(SPENDER))
            .await
            .unwrap_err();

        assert!(matches!(err, CallError::Unauthorized { .. }));
        assert!(wallet.contract().sent().is_empty());
    }

    #[tokio::test]
    async fn test_call_write_validates_before_submission() {
        let wallet = Arc::new(MockWallet::new(OWNER));
        let manager = connected(wallet.clone()).await;
        let binding = ContractBinding::bind(TOKEN, Arc::new(InterfaceDescription::trc20()), &manager)
            .await
            .unwrap();

        let err = binding
            .call_write(
                "balanceOf",
                &[Value::Address(OWNER.to_string())],
                write_options(OWNER),
            )
            .await
            .unwrap_err();
        assert_eq!(err, CallError::NotWritable("balanceOf".to_string()));

        let mut options = write_options(OWNER);
        options.fee_limit = 0;
        let args = [Value::Address(SPENDER.to_string()), Value::Uint(U256::from(5u64))];
        let err = binding.call_write("approve", &args, options).await.unwrap_err();
        assert_eq!(err, CallError::MissingFeeLimit("approve".to_string()));

        let err = binding
            .call_write("approve", &args[..1], write_options(OWNER))
            .await
            .unwrap_err();
        assert!(matches!(err, CallError::Abi(AbiError::ArgumentCount { .. })));

        assert!(wallet.contract().sent().is_empty());
    }

    #[tokio::test]
    async fn test_binding_goes_stale_on_account_change() {
        let wallet = Arc::new(MockWallet::new(OWNER));
        let manager = connected(wallet.clone()).await;
        let binding = ContractBinding::bind(TOKEN, Arc::new(InterfaceDescription::trc20()), &manager)
            .await
            .unwrap();
        assert!(binding.is_current(&manager.session().unwrap()));

        wallet.set_address(Some(SPENDER));
        let session = manager.connect().await.unwrap();
        assert!(!binding.is_current(&session));
    }
}
