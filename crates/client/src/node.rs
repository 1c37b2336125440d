//! Headless host backed by a TRON full node.
//!
//! The wallet is always ready and holds one configured account. Reads go
//! through `triggerconstantcontract`; writes are built by
//! `triggersmartcontract`, signed by a [`RemoteSigner`] and broadcast.

use crate::{
    provider::{
        AccountHandshake, ContractHandle, HostEnvironment, Injected, InjectedProvider,
        ProviderError, WriteOptions,
    },
    remote_signer::RemoteSigner,
};
use alloy_primitives::hex;
use async_trait::async_trait;
use binding::{
    abi::{decode_outputs, encode_params},
    address::decode_address,
    InterfaceDescription, MethodDescriptor, Value,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Host exposing a node-backed wallet under the primary wallet global.
pub struct NodeHost {
    wallet: Arc<NodeWallet>,
}

impl NodeHost {
    pub fn new(
        full_node_url: &str,
        owner: &str,
        signer: Option<RemoteSigner>,
        api_key: Option<String>,
    ) -> Result<Self, ProviderError> {
        decode_address(owner).map_err(|e| ProviderError::new(e.to_string()))?;
        if let Some(signer) = signer.as_ref().filter(|s| s.address() != owner) {
            return Err(ProviderError::new(format!(
                "Signer holds {}, not the configured account {owner}",
                signer.address()
            )));
        }

        let api = NodeApi {
            client: reqwest::Client::new(),
            base_url: full_node_url.trim_end_matches('/').to_string(),
            api_key,
            signer,
        };

        Ok(Self {
            wallet: Arc::new(NodeWallet {
                api,
                owner: owner.to_string(),
            }),
        })
    }
}

impl HostEnvironment for NodeHost {
    fn wallet(&self) -> Option<Injected> {
        Some(Injected::Wallet(self.wallet.clone()))
    }

    fn handshake(&self) -> Option<Arc<dyn AccountHandshake>> {
        None
    }
}

struct NodeWallet {
    api: NodeApi,
    owner: String,
}

#[async_trait]
impl InjectedProvider for NodeWallet {
    fn is_ready(&self) -> bool {
        true
    }

    fn default_address(&self) -> Option<String> {
        Some(self.owner.clone())
    }

    async fn contract(
        &self,
        _interface: Arc<InterfaceDescription>,
        address: &str,
    ) -> Result<Arc<dyn ContractHandle>, ProviderError> {
        decode_address(address).map_err(|e| ProviderError::new(e.to_string()))?;

        Ok(Arc::new(NodeContract {
            api: self.api.clone(),
            address: address.to_string(),
            owner: self.owner.clone(),
        }))
    }
}

#[derive(Clone)]
struct NodeApi {
    client: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    signer: Option<RemoteSigner>,
}

impl NodeApi {
    async fn post<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp, ProviderError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let url = format!("{}/wallet/{}", self.base_url, path);
        let mut request = self.client.post(&url).json(body);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            return Err(ProviderError::new(format!(
                "Network error: node returned {status}: {body}"
            )));
        }

        Ok(response.json().await?)
    }
}

struct NodeContract {
    api: NodeApi,
    address: String,
    owner: String,
}

impl NodeContract {
    fn trigger<'a>(
        &'a self,
        method: &MethodDescriptor,
        args: &[Value],
        options: Option<&WriteOptions>,
    ) -> Result<TriggerRequest<'a>, ProviderError> {
        let parameter = encode_params(args).map_err(|e| ProviderError::new(e.to_string()))?;

        Ok(TriggerRequest {
            owner_address: options.map_or(self.owner.as_str(), |o| o.from.as_str()).to_string(),
            contract_address: &self.address,
            function_selector: method.signature(),
            parameter: hex::encode(parameter),
            fee_limit: options.map(|o| o.fee_limit),
            call_value: options.map(|o| o.call_value),
            visible: true,
        })
    }
}

#[async_trait]
impl ContractHandle for NodeContract {
    async fn call(
        &self,
        method: &MethodDescriptor,
        args: &[Value],
    ) -> Result<Vec<Value>, ProviderError> {
        let request = self.trigger(method, args, None)?;
        debug!(contract = %self.address, method = %request.function_selector, "triggerconstantcontract");

        let response: TriggerResponse = self.api.post("triggerconstantcontract", &request).await?;
        response.result.check()?;

        let output = response
            .constant_result
            .first()
            .ok_or_else(|| ProviderError::new("Node returned no constant result"))?;
        let data = hex::decode(output).map_err(|e| ProviderError::new(e.to_string()))?;

        decode_outputs(&method.outputs, &data).map_err(|e| ProviderError::new(e.to_string()))
    }

    async fn send(
        &self,
        method: &MethodDescriptor,
        args: &[Value],
        options: &WriteOptions,
    ) -> Result<String, ProviderError> {
        let signer = self
            .api
            .signer
            .as_ref()
            .ok_or_else(|| ProviderError::new("Wallet is locked: no signer configured"))?;

        let request = self.trigger(method, args, Some(options))?;
        let response: TriggerResponse = self.api.post("triggersmartcontract", &request).await?;
        response.result.check()?;

        let unsigned = response
            .transaction
            .ok_or_else(|| ProviderError::new("Node returned no transaction"))?;

        let signed = signer
            .sign_transaction(unsigned)
            .await
            .map_err(|e| ProviderError::new(e.to_string()))?;

        let broadcast: BroadcastResponse = self.api.post("broadcasttransaction", &signed).await?;
        if !broadcast.result {
            let code = broadcast.code.unwrap_or_else(|| "UNKNOWN".to_string());
            let message = broadcast.message.as_deref().map(node_message).unwrap_or_default();
            return Err(ProviderError::new(format!("{code}: {message}")));
        }

        let tx_id = broadcast
            .txid
            .or_else(|| signed.get("txID").and_then(|id| id.as_str()).map(str::to_string))
            .ok_or_else(|| ProviderError::new("Broadcast accepted without a transaction id"))?;

        info!(tx_id = %tx_id, contract = %self.address, method = %method.name, "Transaction broadcast");
        Ok(tx_id)
    }
}

#[derive(Debug, Serialize)]
struct TriggerRequest<'a> {
    owner_address: String,
    contract_address: &'a str,
    function_selector: String,
    parameter: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    fee_limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    call_value: Option<u64>,
    visible: bool,
}

#[derive(Debug, Deserialize)]
struct TriggerResponse {
    #[serde(default)]
    result: TriggerResult,
    #[serde(default)]
    constant_result: Vec<String>,
    transaction: Option<serde_json::Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TriggerResult {
    #[serde(default)]
    result: bool,
    code: Option<String>,
    message: Option<String>,
}

impl TriggerResult {
    fn check(&self) -> Result<(), ProviderError> {
        if self.result && self.message.is_none() {
            return Ok(());
        }

        let code = self.code.as_deref().unwrap_or("CONTRACT_EXE_ERROR");
        let message = self.message.as_deref().map(node_message).unwrap_or_default();
        Err(ProviderError::new(format!("{code}: {message}")))
    }
}

#[derive(Debug, Deserialize)]
struct BroadcastResponse {
    #[serde(default)]
    result: bool,
    txid: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

/// Node messages arrive hex-encoded; fall back to the raw text otherwise.
fn node_message(message: &str) -> String {
    hex::decode(message)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_else(|| message.to_string())
}
