use abi_wallet::rpc::{
    ReadContractParams, RpcTransport, SubmitTransactionParams, METHOD_GET_ACCOUNT_NONCE,
    METHOD_READ_CONTRACT, METHOD_SUBMIT_TRANSACTION,
};
use abi_wallet::{Result, WalletError};
use base64::{engine::general_purpose, Engine};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;

/// Canned read results keyed by contract id and entry point
#[derive(Default, Clone)]
pub struct MockRegistry {
    reads: HashMap<(Vec<u8>, u32), Vec<u8>>,
}

impl MockRegistry {
    pub fn register(&mut self, contract_id: Vec<u8>, entry_point: u32, result: Vec<u8>) {
        self.reads.insert((contract_id, entry_point), result);
    }

    pub fn lookup(&self, contract_id: &[u8], entry_point: u32) -> Option<&Vec<u8>> {
        self.reads.get(&(contract_id.to_vec(), entry_point))
    }
}

/// One request seen by the transport
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    pub method: String,
    pub params: Value,
}

/// In-memory node answering the wallet's JSON-RPC methods
pub struct MockTransport {
    pub(crate) registry: MockRegistry,
    pub(crate) nonce: u64,
    pub(crate) failure: Option<(i64, String)>,
    pub(crate) hang: bool,
    pub(crate) calls: Mutex<Vec<RecordedCall>>,
}

impl MockTransport {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().map(|c| c.len()).unwrap_or_default()
    }

    /// Transactions submitted so far
    pub fn submitted(&self) -> Vec<SubmitTransactionParams> {
        self.calls()
            .into_iter()
            .filter(|c| c.method == METHOD_SUBMIT_TRANSACTION)
            .filter_map(|c| serde_json::from_value(c.params).ok())
            .collect()
    }

    fn read(&self, params: &Value) -> Result<Value> {
        let params: ReadContractParams = serde_json::from_value(params.clone())
            .map_err(|e| WalletError::Rpc {
                code: -32602,
                message: e.to_string(),
            })?;
        let result = self
            .registry
            .lookup(&params.contract_id, params.entry_point)
            .ok_or_else(|| WalletError::Rpc {
                code: -32000,
                message: format!(
                    "no contract 0x{} entry point {}",
                    hex::encode(&params.contract_id),
                    params.entry_point
                ),
            })?;
        Ok(json!({ "result": general_purpose::STANDARD.encode(result) }))
    }
}

impl RpcTransport for MockTransport {
    async fn call(&self, method: &str, params: Value) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedCall {
                method: method.to_string(),
                params: params.clone(),
            });
        }

        if self.hang {
            std::future::pending::<()>().await;
        }
        if let Some((code, message)) = &self.failure {
            return Err(WalletError::Rpc {
                code: *code,
                message: message.clone(),
            });
        }

        match method {
            METHOD_READ_CONTRACT => self.read(&params),
            METHOD_GET_ACCOUNT_NONCE => Ok(json!({ "nonce": self.nonce.to_string() })),
            METHOD_SUBMIT_TRANSACTION => Ok(Value::Null),
            other => Err(WalletError::Rpc {
                code: -32601,
                message: format!("method not found: {}", other),
            }),
        }
    }
}
