use crate::mock::{MockRegistry, MockTransport};
use abi_wallet::config::TokenConfig;
use abi_wallet::ExecutionEnvironment;
use std::sync::Mutex;

pub struct MockTransportBuilder {
    registry: MockRegistry,
    nonce: u64,
    failure: Option<(i64, String)>,
    hang: bool,
    token: TokenConfig,
}

impl Default for MockTransportBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockTransportBuilder {
    pub fn new() -> Self {
        Self {
            registry: MockRegistry::default(),
            nonce: 0,
            failure: None,
            hang: false,
            token: TokenConfig::default(),
        }
    }

    /// Answer reads of `entry_point` on `contract_id` with `result`
    pub fn with_read_result(mut self, contract_id: &[u8], entry_point: u32, result: Vec<u8>) -> Self {
        self.registry.register(contract_id.to_vec(), entry_point, result);
        self
    }

    /// Current account nonce reported by the node
    pub fn with_nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Fail every call with a JSON-RPC error
    pub fn failing_with(mut self, code: i64, message: &str) -> Self {
        self.failure = Some((code, message.to_string()));
        self
    }

    /// Never answer any call
    pub fn hanging(mut self) -> Self {
        self.hang = true;
        self
    }

    /// Native token used by `balance` in environments built from this builder
    pub fn with_token(mut self, contract: &str, balance_of_entry: &str) -> Self {
        self.token.contract = Some(contract.to_string());
        self.token.balance_of_entry = Some(balance_of_entry.to_string());
        self
    }

    pub fn build(self) -> MockTransport {
        MockTransport {
            registry: self.registry,
            nonce: self.nonce,
            failure: self.failure,
            hang: self.hang,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn build_env(self) -> ExecutionEnvironment<MockTransport> {
        let token = self.token.clone();
        ExecutionEnvironment::new(self.build(), token)
    }
}
