use abi_wallet::{Result, WalletError};
use abi_wallet::{ExecutionEnvironment, ExecutionResult};
use abi_wallet_mock::{token_abi, AbiBuilder, FieldType, MockTransport, MockTransportBuilder};
use std::path::Path;
use tempfile::TempDir;

async fn register(
    ee: &mut ExecutionEnvironment<MockTransport>,
    name: &str,
    address: &str,
    abi: &Path,
) -> Result<ExecutionResult> {
    ee.execute_line(&format!("register {} {} \"{}\"", name, address, abi.display()))
        .await
}

#[tokio::test]
async fn test_register_installs_one_command_per_method() {
    let dir = TempDir::new().unwrap();
    let abi = token_abi().write_to(dir.path(), "token.abi");
    let mut ee = MockTransportBuilder::new().build_env();
    let before = ee.commands.len();

    let result = register(&mut ee, "token", "0x1234", &abi).await.unwrap();

    assert_eq!(
        result.messages,
        vec!["Contract 'token' at address 0x1234 registered."]
    );
    assert_eq!(ee.commands.len(), before + 2);
    assert!(ee.commands.contains("token.balance_of"));
    assert!(ee.commands.contains("token.transfer"));
    assert_eq!(ee.contracts.len(), 1);

    let transfer = ee.commands.get("token.transfer").unwrap();
    let args: Vec<_> = transfer.args.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(args, vec!["from", "to", "value"]);
    assert_eq!(transfer.description, "transfer method");
}

#[tokio::test]
async fn test_register_twice_is_rejected() {
    let dir = TempDir::new().unwrap();
    let abi = token_abi().write_to(dir.path(), "token.abi");
    let mut ee = MockTransportBuilder::new().build_env();

    register(&mut ee, "token", "0x1234", &abi).await.unwrap();
    let commands = ee.commands.names();

    let err = register(&mut ee, "token", "0x5678", &abi).await.unwrap_err();
    assert!(matches!(err, WalletError::ContractExists(ref n) if n == "token"));
    assert_eq!(ee.commands.names(), commands);
    assert_eq!(ee.contracts.get("token").unwrap().address, "0x1234");
}

#[tokio::test]
async fn test_unresolvable_argument_type_registers_nothing() {
    let dir = TempDir::new().unwrap();
    let abi = AbiBuilder::new()
        .message("name_result", &[("value", FieldType::String)])
        .method("name", "0x01", "name_result", "name_result", true)
        .method("burn", "0x02", "burn_arguments", "name_result", false)
        .write_to(dir.path(), "broken.abi");
    let mut ee = MockTransportBuilder::new().build_env();
    let before = ee.commands.names();

    let err = register(&mut ee, "broken", "0x1234", &abi).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidAbi(_)));
    assert!(err.to_string().contains("burn_arguments"));
    assert_eq!(ee.commands.names(), before);
    assert!(ee.contracts.is_empty());
}

#[tokio::test]
async fn test_method_names_must_be_single_words() {
    let dir = TempDir::new().unwrap();
    let mut ee = MockTransportBuilder::new().build_env();
    let before = ee.commands.names();

    for (i, bad) in ["x.y", "two words"].into_iter().enumerate() {
        let abi = AbiBuilder::new()
            .message("empty", &[])
            .method("ok", "0x01", "empty", "empty", true)
            .method(bad, "0x02", "empty", "empty", false)
            .write_to(dir.path(), &format!("bad{}.abi", i));

        let err = register(&mut ee, "c", "0x1234", &abi).await.unwrap_err();
        assert!(matches!(err, WalletError::InvalidAbi(_)));
        assert!(err.to_string().contains(bad));
    }

    assert_eq!(ee.commands.names(), before);
    assert!(!ee.commands.contains("c.ok"));
    assert!(!ee.commands.contains("c.x.y"));
    assert!(ee.contracts.is_empty());
}

#[tokio::test]
async fn test_invalid_address_rejected() {
    let dir = TempDir::new().unwrap();
    let abi = token_abi().write_to(dir.path(), "token.abi");
    let mut ee = MockTransportBuilder::new().build_env();

    let err = register(&mut ee, "token", "0xnothex", &abi).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidAddress(_)));
    assert!(ee.contracts.is_empty());
}

#[tokio::test]
async fn test_unreadable_or_malformed_abi() {
    let dir = TempDir::new().unwrap();
    let mut ee = MockTransportBuilder::new().build_env();

    let err = register(&mut ee, "token", "0x1234", &dir.path().join("absent.abi"))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::InvalidAbi(_)));

    let garbage = dir.path().join("garbage.abi");
    std::fs::write(&garbage, "{\"methods\": 5}").unwrap();
    let err = register(&mut ee, "token", "0x1234", &garbage).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidAbi(_)));
    assert!(err.to_string().contains("methods"));

    assert!(ee.contracts.is_empty());
}

#[tokio::test]
async fn test_schema_set_with_two_files_rejected() {
    use base64::{engine::general_purpose, Engine};
    use prost::Message;

    let dir = TempDir::new().unwrap();
    let mut set = token_abi().descriptor_set();
    set.file.push(set.file[0].clone());
    let doc = serde_json::json!({
        "methods": [],
        "types": general_purpose::STANDARD.encode(set.encode_to_vec()),
    });
    let path = dir.path().join("two.abi");
    std::fs::write(&path, doc.to_string()).unwrap();

    let mut ee = MockTransportBuilder::new().build_env();
    let err = register(&mut ee, "two", "0x1234", &path).await.unwrap_err();
    assert!(matches!(err, WalletError::InvalidAbi(_)));
}
