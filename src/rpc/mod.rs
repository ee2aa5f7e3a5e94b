//! Node RPC boundary
//!
//! [`RpcTransport`] is the seam between the wallet and the chain: a single
//! `call` primitive plus the contract read/write conveniences built on top of
//! it. [`JsonRpcClient`] speaks JSON-RPC 2.0 over HTTP.

pub mod client;
pub mod transaction;

pub use client::JsonRpcClient;
pub use transaction::{build_transaction, CallContractOperation, SignedTransaction};

use crate::key::WalletKey;
use crate::{Result, WalletError};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

pub const METHOD_READ_CONTRACT: &str = "chain.read_contract";
pub const METHOD_GET_ACCOUNT_NONCE: &str = "chain.get_account_nonce";
pub const METHOD_SUBMIT_TRANSACTION: &str = "chain.submit_transaction";

/// Serde adapter for byte fields carried as standard base64 strings
pub mod base64_bytes {
    use base64::{engine::general_purpose, Engine};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&general_purpose::STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let text = String::deserialize(deserializer)?;
        general_purpose::STANDARD
            .decode(text)
            .map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadContractParams {
    #[serde(with = "base64_bytes")]
    pub contract_id: Vec<u8>,
    pub entry_point: u32,
    #[serde(with = "base64_bytes")]
    pub args: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReadContractResponse {
    #[serde(with = "base64_bytes", default)]
    pub result: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountNonceParams {
    #[serde(with = "base64_bytes")]
    pub account: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AccountNonceResponse {
    #[serde(default)]
    pub nonce: NonceRepr,
}

/// Nodes report nonces either as JSON numbers or as decimal strings
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum NonceRepr {
    Number(u64),
    Text(String),
}

impl Default for NonceRepr {
    fn default() -> Self {
        NonceRepr::Number(0)
    }
}

impl NonceRepr {
    pub fn value(&self) -> Result<u64> {
        match self {
            NonceRepr::Number(n) => Ok(*n),
            NonceRepr::Text(text) => text
                .parse()
                .map_err(|e| WalletError::Decode(format!("invalid nonce '{}': {}", text, e))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitTransactionParams {
    pub transaction: SignedTransaction,
}

/// Acknowledgement of a submitted write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionReceipt {
    /// Hex transaction id
    pub id: String,
}

fn to_params<T: Serialize>(params: &T) -> Result<Value> {
    serde_json::to_value(params)
        .map_err(|e| WalletError::Transport(format!("failed to encode request: {}", e)))
}

fn from_response<T: DeserializeOwned>(method: &str, value: Value) -> Result<T> {
    serde_json::from_value(value)
        .map_err(|e| WalletError::Decode(format!("unexpected {} response: {}", method, e)))
}

/// Remote procedure calls against a node
#[allow(async_fn_in_trait)]
pub trait RpcTransport {
    /// Invoke `method` with JSON `params`, yielding the JSON result
    async fn call(&self, method: &str, params: Value) -> Result<Value>;

    /// Execute a read-only contract entry point, yielding the raw result bytes
    async fn read_contract(&self, args: &[u8], contract_id: &[u8], entry_point: u32) -> Result<Vec<u8>> {
        let params = to_params(&ReadContractParams {
            contract_id: contract_id.to_vec(),
            entry_point,
            args: args.to_vec(),
        })?;
        let response: ReadContractResponse =
            from_response(METHOD_READ_CONTRACT, self.call(METHOD_READ_CONTRACT, params).await?)?;
        Ok(response.result)
    }

    async fn get_account_nonce(&self, account: &[u8]) -> Result<u64> {
        let params = to_params(&AccountNonceParams {
            account: account.to_vec(),
        })?;
        let response: AccountNonceResponse = from_response(
            METHOD_GET_ACCOUNT_NONCE,
            self.call(METHOD_GET_ACCOUNT_NONCE, params).await?,
        )?;
        response.nonce.value()
    }

    /// Sign and submit a transaction calling one contract entry point
    async fn submit_contract_call(
        &self,
        args: &[u8],
        key: &WalletKey,
        contract_id: &[u8],
        entry_point: u32,
    ) -> Result<TransactionReceipt> {
        let nonce = self
            .get_account_nonce(&key.address_bytes())
            .await?
            .checked_add(1)
            .ok_or_else(|| WalletError::Decode("account nonce is exhausted".to_string()))?;
        let operation = CallContractOperation {
            contract_id: contract_id.to_vec(),
            entry_point,
            args: args.to_vec(),
        };
        let transaction = build_transaction(operation, nonce, key);
        let id = transaction.id_hex();
        debug!(id = id.as_str(), nonce, "Submitting transaction");

        let params = to_params(&SubmitTransactionParams { transaction })?;
        self.call(METHOD_SUBMIT_TRANSACTION, params).await?;
        Ok(TransactionReceipt { id })
    }
}
