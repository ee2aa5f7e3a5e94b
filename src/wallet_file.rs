//! Password protected wallet files
//!
//! A wallet file is a small JSON document holding the key secret encrypted
//! with ChaCha20-Poly1305 under a PBKDF2-HMAC-SHA256 derived key.

use crate::{Result, WalletError};
use chacha20poly1305::aead::{Aead, KeyInit};
use chacha20poly1305::{ChaCha20Poly1305, Key, Nonce};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::Path;

const FORMAT_VERSION: u32 = 1;
const KDF_NAME: &str = "pbkdf2-sha256";
const DEFAULT_ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct WalletFile {
    pub version: u32,
    pub kdf: String,
    pub iterations: u32,
    /// Hex encoded
    pub salt: String,
    /// Hex encoded
    pub nonce: String,
    /// Hex encoded, includes the authentication tag
    pub ciphertext: String,
}

impl WalletFile {
    pub fn seal(password: &str, secret: &[u8]) -> Result<Self> {
        Self::seal_with_iterations(password, secret, DEFAULT_ITERATIONS)
    }

    pub fn seal_with_iterations(password: &str, secret: &[u8], iterations: u32) -> Result<Self> {
        if password.is_empty() {
            return Err(WalletError::EmptyPassphrase);
        }

        let mut salt = [0u8; SALT_LEN];
        let mut nonce = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        rand::thread_rng().fill_bytes(&mut nonce);

        let cipher = cipher_for(password, &salt, iterations);
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce), secret)
            .map_err(|e| WalletError::InvalidKey(format!("encryption failed: {}", e)))?;

        Ok(Self {
            version: FORMAT_VERSION,
            kdf: KDF_NAME.to_string(),
            iterations,
            salt: hex::encode(salt),
            nonce: hex::encode(nonce),
            ciphertext: hex::encode(ciphertext),
        })
    }

    /// Decrypt the secret; a wrong password fails authentication
    pub fn unseal(&self, password: &str) -> Result<Vec<u8>> {
        if password.is_empty() {
            return Err(WalletError::EmptyPassphrase);
        }
        if self.version != FORMAT_VERSION || self.kdf != KDF_NAME {
            return Err(WalletError::WalletDecrypt(format!(
                "unsupported wallet format {} ({})",
                self.version, self.kdf
            )));
        }

        let field = |name: &str, text: &str| {
            hex::decode(text)
                .map_err(|e| WalletError::WalletDecrypt(format!("malformed {}: {}", name, e)))
        };
        let salt = field("salt", &self.salt)?;
        let nonce = field("nonce", &self.nonce)?;
        let ciphertext = field("ciphertext", &self.ciphertext)?;
        if nonce.len() != NONCE_LEN {
            return Err(WalletError::WalletDecrypt(format!(
                "malformed nonce: expected {} bytes",
                NONCE_LEN
            )));
        }

        cipher_for(password, &salt, self.iterations)
            .decrypt(Nonce::from_slice(&nonce), ciphertext.as_slice())
            .map_err(|_| WalletError::WalletDecrypt("check your password".to_string()))
    }
}

fn cipher_for(password: &str, salt: &[u8], iterations: u32) -> ChaCha20Poly1305 {
    let mut key = [0u8; 32];
    pbkdf2::pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut key);
    ChaCha20Poly1305::new(Key::from_slice(&key))
}

/// Write a new wallet file; an existing file is never overwritten
pub fn create(path: &Path, password: &str, secret: &[u8]) -> Result<()> {
    let sealed = WalletFile::seal(password, secret)?;
    let json = serde_json::to_string_pretty(&sealed)
        .map_err(|e| WalletError::FileError(format!("Failed to serialize wallet: {}", e)))?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            ErrorKind::AlreadyExists => WalletError::WalletExists(path.display().to_string()),
            _ => WalletError::FileError(format!("Failed to create {:?}: {}", path, e)),
        })?;
    file.write_all(json.as_bytes())
        .map_err(|e| WalletError::FileError(format!("Failed to write {:?}: {}", path, e)))?;

    Ok(())
}

/// Read and decrypt a wallet file
pub fn open(path: &Path, password: &str) -> Result<Vec<u8>> {
    if password.is_empty() {
        return Err(WalletError::EmptyPassphrase);
    }

    let content = fs::read_to_string(path)
        .map_err(|e| WalletError::FileError(format!("Failed to read {:?}: {}", path, e)))?;
    let sealed: WalletFile = serde_json::from_str(&content)
        .map_err(|e| WalletError::WalletDecrypt(format!("not a wallet file: {}", e)))?;

    sealed.unseal(password)
}
