//! Transaction construction for contract writes

use crate::key::WalletKey;
use prost::Message;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::base64_bytes;

#[derive(Clone, PartialEq, Message)]
pub struct CallContractOperation {
    #[prost(bytes = "vec", tag = "1")]
    pub contract_id: Vec<u8>,
    #[prost(uint32, tag = "2")]
    pub entry_point: u32,
    #[prost(bytes = "vec", tag = "3")]
    pub args: Vec<u8>,
}

#[derive(Clone, PartialEq, Message)]
pub struct TransactionBody {
    #[prost(bytes = "vec", tag = "1")]
    pub payer: Vec<u8>,
    #[prost(uint64, tag = "2")]
    pub nonce: u64,
    #[prost(message, repeated, tag = "3")]
    pub operations: Vec<CallContractOperation>,
}

/// A signed transaction as submitted over JSON-RPC
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    /// SHA-256 of `body`
    #[serde(with = "base64_bytes")]
    pub id: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub body: Vec<u8>,
    /// Signer's public key
    #[serde(with = "base64_bytes")]
    pub signer: Vec<u8>,
    #[serde(with = "base64_bytes")]
    pub signature: Vec<u8>,
}

impl SignedTransaction {
    pub fn id_hex(&self) -> String {
        format!("0x{}", hex::encode(&self.id))
    }

    pub fn decode_body(&self) -> Result<TransactionBody, prost::DecodeError> {
        TransactionBody::decode(self.body.as_slice())
    }
}

pub fn build_transaction(
    operation: CallContractOperation,
    nonce: u64,
    key: &WalletKey,
) -> SignedTransaction {
    let body = TransactionBody {
        payer: key.address_bytes(),
        nonce,
        operations: vec![operation],
    }
    .encode_to_vec();
    let id = Sha256::digest(&body).to_vec();
    let signature = key.sign(&id);

    SignedTransaction {
        id,
        body,
        signer: key.public_bytes().to_vec(),
        signature,
    }
}
