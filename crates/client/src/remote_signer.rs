//! Remote transaction signer that delegates signing to a signer-proxy service.
//!
//! The remote signer sends `tron_signTransaction` JSON-RPC requests to a proxy
//! service, which handles the actual signing (typically via an HSM or secure
//! enclave).

use eyre::{bail, Result};
use serde::{Deserialize, Serialize};

/// A remote signer that delegates transaction signing to a signer-proxy service.
///
/// The proxy receives the unsigned transaction object exactly as the full node
/// built it and returns the same object with its `signature` list filled in,
/// ready for `/wallet/broadcasttransaction`.
///
/// # Example
///
/// ```ignore
/// let signer = RemoteSigner::new("http://localhost:9060", "TNPeeaaFB7K9cmo4uQpcU32zGK8G1NYqeL");
/// let signed = signer.sign_transaction(unsigned).await?;
/// ```
#[derive(Debug, Clone)]
pub struct RemoteSigner {
    client: reqwest::Client,
    proxy_url: String,
    address: String,
}

impl RemoteSigner {
    /// Creates a new remote signer.
    ///
    /// # Arguments
    /// * `proxy_url` - The URL of the signer-proxy service (e.g., "http://localhost:9060")
    /// * `address` - The base58 TRON address of the signer
    pub fn new(proxy_url: impl Into<String>, address: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), proxy_url, address)
    }

    /// Creates a new remote signer with a custom HTTP client.
    pub fn with_client(
        client: reqwest::Client,
        proxy_url: impl Into<String>,
        address: impl Into<String>,
    ) -> Self {
        Self {
            client,
            proxy_url: proxy_url.into(),
            address: address.into(),
        }
    }

    /// Returns the signer's address.
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Signs a transaction via the remote signer-proxy.
    pub async fn sign_transaction(&self, tx: serde_json::Value) -> Result<serde_json::Value> {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "tron_signTransaction",
            params: [tx],
            id: 1,
        };

        let response = self
            .client
            .post(&self.proxy_url)
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown".to_string());
            bail!("signer-proxy returned {status}: {body}");
        }

        let rpc_response: JsonRpcResponse<serde_json::Value> = response.json().await?;

        match rpc_response.result {
            Some(signed) => Ok(signed),
            None => {
                let error = rpc_response.error.unwrap_or(JsonRpcError {
                    code: -1,
                    message: "unknown error".to_string(),
                });
                bail!("JSON-RPC error {}: {}", error.code, error.message);
            }
        }
    }
}

#[derive(Debug, Serialize)]
struct JsonRpcRequest<T> {
    jsonrpc: &'static str,
    method: &'static str,
    params: T,
    id: u32,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse<T> {
    result: Option<T>,
    error: Option<JsonRpcError>,
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = JsonRpcRequest {
            jsonrpc: "2.0",
            method: "tron_signTransaction",
            params: [serde_json::json!({ "txID": "abc" })],
            id: 1,
        };

        let encoded = serde_json::to_value(&request).unwrap();
        assert_eq!(encoded["method"], "tron_signTransaction");
        assert_eq!(encoded["params"][0]["txID"], "abc");
    }

    #[test]
    fn test_error_response_parses() {
        let body = r#"{"jsonrpc":"2.0","id":1,"error":{"code":-32000,"message":"key locked"}}"#;
        let response: JsonRpcResponse<serde_json::Value> = serde_json::from_str(body).unwrap();
        assert!(response.result.is_none());
        assert_eq!(response.error.unwrap().message, "key locked");
    }
}
