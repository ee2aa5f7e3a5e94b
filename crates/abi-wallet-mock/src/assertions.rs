use crate::mock::MockTransport;
use abi_wallet::rpc::{ReadContractParams, METHOD_READ_CONTRACT};

pub struct CallAssertions<'a> {
    transport: &'a MockTransport,
}

impl<'a> CallAssertions<'a> {
    pub fn new(transport: &'a MockTransport) -> Self {
        Self { transport }
    }

    pub fn assert_no_calls(&self) {
        let calls = self.transport.calls();
        assert!(calls.is_empty(), "expected no RPC calls, got {:?}", calls);
    }

    pub fn assert_methods(&self, expected: &[&str]) {
        let methods: Vec<String> = self.transport.calls().into_iter().map(|c| c.method).collect();
        assert_eq!(methods, expected);
    }

    /// The most recent read targeted `contract_id` at `entry_point` with `args`
    pub fn assert_last_read(&self, contract_id: &[u8], entry_point: u32, args: &[u8]) {
        let read = self
            .transport
            .calls()
            .into_iter()
            .rev()
            .find(|c| c.method == METHOD_READ_CONTRACT)
            .expect("no read_contract call recorded");
        let params: ReadContractParams =
            serde_json::from_value(read.params).expect("malformed read_contract params");
        assert_eq!(params.contract_id, contract_id, "contract id");
        assert_eq!(params.entry_point, entry_point, "entry point");
        assert_eq!(params.args, args, "arguments");
    }
}
