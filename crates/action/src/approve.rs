//! The approval flow.
//!
//! 1. ensure a connected session (connecting if needed)
//! 2. validate spender and amount
//! 3. compute the raw amount: `Max` is `2^256 - 1`, anything else is scaled
//! 4. reuse or create the contract binding for the session
//! 5. submit `approve(spender, raw)` with the configured fee limit
//! 6. refresh the balance in the background
//! 7. settle into exactly one [`TransactionOutcome`]
//!
//! Nothing is retried.

use crate::{
    classify::{classify, Classified, ErrorKind},
    outcome::TransactionOutcome,
};
use alloy_primitives::U256;
use balance::{format_units, parse_units, BalanceQueryService, BalanceReading};
use binding::{address::decode_address, InterfaceDescription, Value};
use client::{
    BindError, CallError, ConnectionManager, ContractBinding, StatusFeed, WalletSession,
    WriteOptions,
};
use config::TokenConfig;
use std::{convert::Infallible, fmt, str::FromStr, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// What the user asked to approve.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApprovalAmount {
    /// Decimal amount in display units, e.g. `"12.5"`.
    Exact(String),
    /// Unlimited allowance.
    Max,
}

impl FromStr for ApprovalAmount {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("max") {
            Ok(Self::Max)
        } else {
            Ok(Self::Exact(s.to_string()))
        }
    }
}

impl fmt::Display for ApprovalAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exact(amount) => f.write_str(amount),
            Self::Max => f.write_str("max"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApproveParams {
    pub spender: String,
    pub amount: ApprovalAmount,
}

/// A validated approval, ready to submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalRequest {
    pub spender: String,
    pub raw_amount: U256,
    pub fee_limit: u64,
}

impl ApprovalRequest {
    pub fn new(params: &ApproveParams, token: &TokenConfig) -> Result<Self, Classified> {
        let spender = params.spender.trim();
        if spender.is_empty() {
            return Err(Classified::new(
                ErrorKind::InvalidInput,
                "Spender address is empty",
            ));
        }
        decode_address(spender)
            .map_err(|err| Classified::new(ErrorKind::InvalidInput, err.to_string()))?;

        let raw_amount = match &params.amount {
            ApprovalAmount::Max => U256::MAX,
            ApprovalAmount::Exact(amount) => parse_units(amount, token.decimals)
                .map_err(|err| Classified::new(ErrorKind::InvalidInput, err.to_string()))?,
        };

        Ok(Self {
            spender: spender.to_string(),
            raw_amount,
            fee_limit: token.fee_limit,
        })
    }
}

/// Approval orchestrator for one token.
pub struct Approver {
    connection: ConnectionManager,
    balances: BalanceQueryService,
    token: TokenConfig,
    interface: Arc<InterfaceDescription>,
    binding: Mutex<Option<ContractBinding>>,
    status: StatusFeed,
}

impl Approver {
    pub fn new(
        connection: ConnectionManager,
        balances: BalanceQueryService,
        token: TokenConfig,
    ) -> Self {
        let status = connection.status().clone();
        Self {
            connection,
            balances,
            token,
            interface: Arc::new(InterfaceDescription::trc20()),
            binding: Mutex::new(None),
            status,
        }
    }

    pub const fn connection(&self) -> &ConnectionManager {
        &self.connection
    }

    pub const fn balances(&self) -> &BalanceQueryService {
        &self.balances
    }

    pub const fn token(&self) -> &TokenConfig {
        &self.token
    }

    /// Run one approval to completion. Never panics on wallet errors; every
    /// failure is classified into the returned outcome.
    pub async fn approve(&self, params: ApproveParams) -> TransactionOutcome {
        let mut outcome = TransactionOutcome::Pending;

        let next = match self.submit(&params).await {
            Ok(tx_id) => TransactionOutcome::Submitted(tx_id),
            Err(err) => {
                warn!(kind = %err.kind, error = %err.message, "Approval failed");
                TransactionOutcome::failed(err.kind, err.message)
            }
        };
        outcome.settle(next);

        if let Some(status) = outcome.status() {
            self.status.publish(status);
        }
        outcome
    }

    async fn submit(&self, params: &ApproveParams) -> Result<String, Classified> {
        let session = self.session().await?;
        let request = ApprovalRequest::new(params, &self.token)?;
        let binding = self.binding_for(&session).await?;

        let display = match params.amount {
            ApprovalAmount::Max => "unlimited".to_string(),
            ApprovalAmount::Exact(_) => format_units(request.raw_amount, self.token.decimals)
                .map_err(|err| Classified::new(ErrorKind::InvalidInput, err.to_string()))?,
        };
        info!(
            spender = %request.spender,
            amount = %params.amount,
            raw_amount = %request.raw_amount,
            fee_limit = request.fee_limit,
            "Submitting approval"
        );
        self.status.publish(format!(
            "Approving {display} {} for {}",
            self.token.symbol, request.spender
        ));

        let args = [
            Value::Address(request.spender.clone()),
            Value::Uint(request.raw_amount),
        ];
        let options = WriteOptions {
            fee_limit: request.fee_limit,
            call_value: 0,
            from: session.address().to_string(),
        };
        let tx_id = binding
            .call_write("approve", &args, options)
            .await
            .map_err(classify_call_error)?;

        info!(tx_id = %tx_id, spender = %request.spender, "Approval submitted");
        self.spawn_refresh(binding, session.address().to_string());

        Ok(tx_id)
    }

    /// Balance of the connected account.
    pub async fn balance(&self) -> Result<BalanceReading, Classified> {
        let session = self.session().await?;
        let binding = self.binding_for(&session).await?;
        Ok(self.balances.query_balance(&binding, session.address()).await)
    }

    pub(crate) async fn session(&self) -> Result<WalletSession, Classified> {
        self.connection
            .connect()
            .await
            .map_err(|err| Classified::new(ErrorKind::NotConnected, err.to_string()))
    }

    /// The binding for `session`, created on first use and re-created once
    /// the session it belongs to is replaced.
    pub(crate) async fn binding_for(
        &self,
        session: &WalletSession,
    ) -> Result<ContractBinding, Classified> {
        let mut cached = self.binding.lock().await;
        if let Some(binding) = cached.as_ref().filter(|b| b.is_current(session)) {
            return Ok(binding.clone());
        }

        let binding = ContractBinding::bind_session(
            &self.token.contract,
            Arc::clone(&self.interface),
            session.clone(),
        )
        .await
        .map_err(classify_bind_error)?;

        debug!(contract = %self.token.contract, epoch = session.epoch(), "Token binding cached");
        *cached = Some(binding.clone());
        Ok(binding)
    }

    fn spawn_refresh(&self, binding: ContractBinding, holder: String) {
        let balances = self.balances.clone();
        tokio::spawn(async move {
            let reading = balances.query_balance(&binding, &holder).await;
            debug!(holder = %holder, balance = %reading.scaled, "Balance refreshed after approval");
        });
    }
}

fn classify_bind_error(err: BindError) -> Classified {
    match err {
        BindError::NotConnected => Classified::new(ErrorKind::NotConnected, err.to_string()),
        BindError::EmptyAddress | BindError::Provider { .. } => {
            Classified::new(ErrorKind::BindingUnavailable, err.to_string())
        }
    }
}

fn classify_call_error(err: CallError) -> Classified {
    match &err {
        CallError::Provider(source) => classify(source.message()),
        CallError::Abi(_) => Classified::new(ErrorKind::InvalidInput, err.to_string()),
        CallError::Unauthorized { .. } => Classified::new(ErrorKind::NotConnected, err.to_string()),
        CallError::UnknownMethod(_)
        | CallError::NotView(_)
        | CallError::NotWritable(_)
        | CallError::MissingFeeLimit(_) => {
            Classified::new(ErrorKind::BindingUnavailable, err.to_string())
        }
    }
}
