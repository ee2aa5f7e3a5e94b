use abi_wallet::key::WalletKey;
use abi_wallet::rpc::{METHOD_GET_ACCOUNT_NONCE, METHOD_READ_CONTRACT, METHOD_SUBMIT_TRANSACTION};
use abi_wallet::{ExecutionEnvironment, WalletError};
use abi_wallet_mock::{token_abi, uint64_result, CallAssertions, MockTransport, MockTransportBuilder};
use tempfile::TempDir;

const TOKEN_ID: [u8; 2] = [0x12, 0x34];

async fn token_env(builder: MockTransportBuilder) -> (TempDir, ExecutionEnvironment<MockTransport>) {
    let dir = TempDir::new().unwrap();
    let abi = token_abi().write_to(dir.path(), "token.abi");
    let mut ee = builder.build_env();
    ee.execute_line(&format!("register token 0x1234 \"{}\"", abi.display()))
        .await
        .unwrap();
    (dir, ee)
}

#[tokio::test]
async fn test_balance_of_example() {
    let builder = MockTransportBuilder::new().with_read_result(&TOKEN_ID, 16, uint64_result(500));
    let (_dir, mut ee) = token_env(builder).await;

    let result = ee.execute_line("token.balance_of 0xabcd").await.unwrap();

    assert_eq!(result.messages, vec!["value: 500"]);
    // owner = 0xabcd as field 1, length delimited
    CallAssertions::new(&ee.rpc).assert_last_read(&TOKEN_ID, 16, &[0x0a, 0x02, 0xab, 0xcd]);
}

#[tokio::test]
async fn test_read_without_wallet_is_allowed() {
    let builder = MockTransportBuilder::new().with_read_result(&TOKEN_ID, 16, Vec::new());
    let (_dir, mut ee) = token_env(builder).await;
    assert!(!ee.is_wallet_open());

    let result = ee.execute_line("token.balance_of abcd").await.unwrap();
    assert_eq!(result.messages, vec!["value: 0"]);
}

#[tokio::test]
async fn test_write_without_wallet_makes_no_call() {
    let (_dir, mut ee) = token_env(MockTransportBuilder::new()).await;

    let err = ee
        .execute_line("token.transfer 0x01 0x02 10")
        .await
        .unwrap_err();

    assert!(matches!(err, WalletError::WalletClosed(_)));
    CallAssertions::new(&ee.rpc).assert_no_calls();
}

#[tokio::test]
async fn test_write_submits_signed_transaction() {
    let (_dir, mut ee) = token_env(MockTransportBuilder::new().with_nonce(6)).await;
    let key = WalletKey::generate();
    ee.key = Some(key.clone());

    let result = ee.execute_line("token.transfer 0x01 0x02 10").await.unwrap();

    assert_eq!(
        result.messages[0],
        "Transaction submitted to contract 'token' at address 0x1234 ."
    );
    assert!(result.messages[1].starts_with("Transaction id: 0x"));
    CallAssertions::new(&ee.rpc)
        .assert_methods(&[METHOD_GET_ACCOUNT_NONCE, METHOD_SUBMIT_TRANSACTION]);

    let submitted = ee.rpc.submitted();
    assert_eq!(submitted.len(), 1);
    let tx = &submitted[0].transaction;
    assert_eq!(tx.signer, key.public_bytes().to_vec());

    let body = tx.decode_body().unwrap();
    assert_eq!(body.nonce, 7);
    assert_eq!(body.payer, key.address_bytes());
    assert_eq!(body.operations.len(), 1);
    assert_eq!(body.operations[0].contract_id, TOKEN_ID.to_vec());
    assert_eq!(body.operations[0].entry_point, 0x27f5_76ca);
}

#[tokio::test]
async fn test_coercion_failure_names_field() {
    let (_dir, mut ee) = token_env(MockTransportBuilder::new()).await;
    ee.key = Some(WalletKey::generate());

    let err = ee
        .execute_line("token.transfer 0x01 0x02 ten")
        .await
        .unwrap_err();

    assert!(matches!(err, WalletError::InvalidAbi(_)));
    assert!(err.to_string().contains("field value"));
    CallAssertions::new(&ee.rpc).assert_no_calls();
}

#[tokio::test]
async fn test_malformed_hex_argument() {
    let (_dir, mut ee) = token_env(MockTransportBuilder::new()).await;

    let err = ee.execute_line("token.balance_of 0xabc").await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidAbi(_)));
    CallAssertions::new(&ee.rpc).assert_no_calls();
}

#[tokio::test]
async fn test_missing_arguments() {
    let (_dir, mut ee) = token_env(MockTransportBuilder::new()).await;

    let err = ee.execute_line("token.transfer 0x01").await.unwrap_err();
    assert!(matches!(
        err,
        WalletError::NotEnoughArguments {
            expected: 3,
            got: 1,
            ..
        }
    ));
}

#[tokio::test]
async fn test_node_error_passes_through() {
    let (_dir, mut ee) =
        token_env(MockTransportBuilder::new().failing_with(-32000, "contract reverted")).await;

    let err = ee.execute_line("token.balance_of 0xabcd").await.unwrap_err();
    match err {
        WalletError::Rpc { code, message } => {
            assert_eq!(code, -32000);
            assert_eq!(message, "contract reverted");
        }
        other => panic!("unexpected error: {:?}", other),
    }
    CallAssertions::new(&ee.rpc).assert_methods(&[METHOD_READ_CONTRACT]);
}

#[tokio::test]
async fn test_cancelled_call_leaves_state_untouched() {
    let (_dir, mut ee) = token_env(MockTransportBuilder::new().hanging()).await;
    ee.key = Some(WalletKey::generate());
    let commands = ee.commands.names();

    let err = ee
        .execute_line_or_cancel("token.transfer 0x01 0x02 10", std::future::ready(()))
        .await
        .unwrap_err();

    assert!(matches!(err, WalletError::Cancelled));
    assert!(ee.is_wallet_open());
    assert_eq!(ee.commands.names(), commands);
    assert!(ee.rpc.submitted().is_empty());
}

#[tokio::test]
async fn test_balance_command_formats_amount() {
    let builder = MockTransportBuilder::new()
        .with_token("0x1234", "0x10")
        .with_read_result(&TOKEN_ID, 16, uint64_result(150_000_000));
    let mut ee = builder.build_env();

    let result = ee.execute_line("balance 0xabcd").await.unwrap();
    assert_eq!(result.messages, vec!["1.5 KOIN"]);
    CallAssertions::new(&ee.rpc).assert_last_read(&TOKEN_ID, 16, &[0x0a, 0x02, 0xab, 0xcd]);
}

#[tokio::test]
async fn test_balance_without_token_config() {
    let mut ee = MockTransportBuilder::new().build_env();

    let err = ee.execute_line("balance 0xabcd").await.unwrap_err();
    assert!(matches!(err, WalletError::ContractNotFound(_)));
    CallAssertions::new(&ee.rpc).assert_no_calls();
}
