use super::RpcTransport;
use crate::{Result, WalletError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::{debug, trace};

const JSONRPC_VERSION: &str = "2.0";

#[derive(Debug, Serialize)]
struct JsonRpcRequest<'a> {
    jsonrpc: &'static str,
    id: u64,
    method: &'a str,
    params: Value,
}

#[derive(Debug, Deserialize)]
struct JsonRpcResponse {
    /// `None` only when the member is absent; `"result": null` is `Some(Null)`
    #[serde(default, deserialize_with = "present")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<JsonRpcError>,
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl JsonRpcResponse {
    fn into_result(self) -> Result<Value> {
        if let Some(error) = self.error {
            return Err(WalletError::Rpc {
                code: error.code,
                message: error.message,
            });
        }
        self.result
            .ok_or_else(|| WalletError::Transport("response has neither result nor error".to_string()))
    }
}

#[derive(Debug, Deserialize)]
struct JsonRpcError {
    code: i64,
    message: String,
}

/// JSON-RPC 2.0 client over HTTP
#[derive(Debug)]
pub struct JsonRpcClient {
    inner: reqwest::Client,
    endpoint: String,
    next_id: AtomicU64,
}

impl JsonRpcClient {
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self> {
        let inner = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WalletError::Transport(e.to_string()))?;
        Ok(Self {
            inner,
            endpoint: endpoint.into(),
            next_id: AtomicU64::new(1),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl RpcTransport for JsonRpcClient {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let request = JsonRpcRequest {
            jsonrpc: JSONRPC_VERSION,
            id,
            method,
            params,
        };
        debug!(id, method, endpoint = self.endpoint.as_str(), "RPC request");

        let response = self
            .inner
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| WalletError::Transport(e.to_string()))?;

        if !response.status().is_success() {
            return Err(WalletError::Transport(format!(
                "HTTP status {} returned by {}",
                response.status(),
                self.endpoint
            )));
        }

        let response: JsonRpcResponse = response
            .json()
            .await
            .map_err(|e| WalletError::Transport(format!("malformed response: {}", e)))?;
        trace!(id, ?response, "RPC response");

        response.into_result()
    }
}
