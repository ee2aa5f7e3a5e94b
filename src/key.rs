//! Signing keys
use crate::{Result, WalletError};
use ed25519_dalek::{Signer, SigningKey};
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use std::fmt;

/// Length of an account address in bytes
pub const ADDRESS_LEN: usize = 20;

/// An ed25519 signing key and the account address derived from it
#[derive(Clone)]
pub struct WalletKey {
    signing: SigningKey,
}

impl WalletKey {
    pub fn generate() -> Self {
        Self {
            signing: SigningKey::generate(&mut OsRng),
        }
    }

    /// Restore a key from its 32 byte secret
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let secret: [u8; 32] = bytes.try_into().map_err(|_| {
            WalletError::InvalidKey(format!("expected 32 bytes, got {}", bytes.len()))
        })?;
        Ok(Self {
            signing: SigningKey::from_bytes(&secret),
        })
    }

    pub fn private_bytes(&self) -> [u8; 32] {
        self.signing.to_bytes()
    }

    pub fn public_bytes(&self) -> [u8; 32] {
        self.signing.verifying_key().to_bytes()
    }

    /// First 20 bytes of the SHA-256 of the public key
    pub fn address_bytes(&self) -> Vec<u8> {
        let digest = Sha256::digest(self.public_bytes());
        digest[..ADDRESS_LEN].to_vec()
    }

    pub fn address(&self) -> String {
        format!("0x{}", hex::encode(self.address_bytes()))
    }

    /// Displayable form of the secret
    pub fn private(&self) -> String {
        hex::encode(self.private_bytes())
    }

    pub fn sign(&self, message: &[u8]) -> Vec<u8> {
        self.signing.sign(message).to_bytes().to_vec()
    }
}

impl fmt::Debug for WalletKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WalletKey")
            .field("address", &self.address())
            .finish_non_exhaustive()
    }
}
