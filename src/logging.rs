//! Structured logging helpers for the wallet.
//!
//! Thin wrappers around `tracing` so the same events carry the same field
//! names wherever they are emitted.

/// Log ABI file loading.
pub fn log_loading_abi(contract: &str, path: &str) {
    tracing::info!(contract, path, "Loading ABI");
}

/// Log a parsed ABI.
pub fn log_abi_loaded(contract: &str, methods: usize, schema_bytes: usize) {
    tracing::debug!(contract, methods, schema_bytes, "Contract ABI loaded");
}

/// Log a contract read before it is sent.
pub fn log_contract_read(command: &str, entry_point: u32, arg_bytes: usize) {
    tracing::info!(command, entry_point, arg_bytes, "Reading contract");
}

/// Log a contract write before it is submitted.
pub fn log_contract_write(command: &str, entry_point: u32, arg_bytes: usize) {
    tracing::info!(command, entry_point, arg_bytes, "Submitting contract call");
}

/// Log a read response.
pub fn log_contract_result(command: &str, result_bytes: usize) {
    tracing::debug!(command, result_bytes, "Contract read completed");
}

pub fn log_wallet_opened(address: &str) {
    tracing::info!(address, "Wallet opened");
}

pub fn log_wallet_closed() {
    tracing::info!("Wallet closed");
}

/// Log a command failure that was reported to the user.
pub fn log_command_failed(command: &str, error: &str) {
    tracing::debug!(command, error, "Command failed");
}

pub fn log_session_start(endpoint: &str) {
    tracing::info!(endpoint, "Wallet session started");
}
