use abi_wallet::WalletError;
use abi_wallet_mock::{token_abi, CallAssertions, MockTransportBuilder};
use tempfile::TempDir;

fn address_line(messages: &[String]) -> String {
    messages
        .iter()
        .find(|m| m.starts_with("Address: "))
        .cloned()
        .expect("no address line")
}

#[tokio::test]
async fn test_create_close_open_cycle() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wallet.json");
    let mut ee = MockTransportBuilder::new().build_env();

    let created = ee
        .execute_line(&format!("create \"{}\" hunter2", path.display()))
        .await
        .unwrap();
    assert_eq!(
        created.messages,
        vec![
            format!("Created and opened new wallet: {}", path.display()),
            "Use the info command to see details".to_string(),
        ]
    );
    assert!(ee.is_wallet_open());

    let info = ee.execute_line("info").await.unwrap();
    assert_eq!(info.messages[0], "Wallet information:");
    let address = address_line(&info.messages);

    ee.execute_line("close").await.unwrap();
    assert!(!ee.is_wallet_open());
    assert!(matches!(
        ee.execute_line("info").await,
        Err(WalletError::WalletClosed(_))
    ));

    let err = ee
        .execute_line(&format!("open \"{}\" wrong", path.display()))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::WalletDecrypt(_)));
    assert!(!ee.is_wallet_open());

    let opened = ee
        .execute_line(&format!("open \"{}\" hunter2", path.display()))
        .await
        .unwrap();
    assert_eq!(
        opened.messages,
        vec![format!("Opened wallet: {}", path.display())]
    );
    let info = ee.execute_line("info").await.unwrap();
    assert_eq!(address_line(&info.messages), address);

    CallAssertions::new(&ee.rpc).assert_no_calls();
}

#[tokio::test]
async fn test_create_refuses_existing_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wallet.json");
    std::fs::write(&path, "keep me").unwrap();
    let mut ee = MockTransportBuilder::new().build_env();

    let err = ee
        .execute_line(&format!("create \"{}\" pw", path.display()))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::WalletExists(_)));
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "keep me");
    assert!(!ee.is_wallet_open());
}

#[tokio::test]
async fn test_create_requires_password() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("wallet.json");
    let mut ee = MockTransportBuilder::new().build_env();

    let err = ee
        .execute_line(&format!("create \"{}\" \"\"", path.display()))
        .await
        .unwrap_err();
    assert!(matches!(err, WalletError::EmptyPassphrase));
    assert!(!path.exists());
}

#[tokio::test]
async fn test_generate_does_not_open_wallet() {
    let mut ee = MockTransportBuilder::new().build_env();

    let result = ee.execute_line("generate").await.unwrap();
    assert_eq!(result.messages.len(), 3);
    assert!(result.messages[1].starts_with("Address: 0x"));
    assert!(result.messages[2].starts_with("Private: "));
    assert!(!ee.is_wallet_open());
}

#[tokio::test]
async fn test_exit_and_quit() {
    let mut ee = MockTransportBuilder::new().build_env();
    assert!(ee.execute_line("exit").await.unwrap().quit);
    assert!(ee.execute_line("quit").await.unwrap().quit);
    assert!(!ee.execute_line("help").await.unwrap().quit);
}

#[tokio::test]
async fn test_help_and_list_include_registered_commands() {
    let dir = TempDir::new().unwrap();
    let abi = token_abi().write_to(dir.path(), "token.abi");
    let mut ee = MockTransportBuilder::new().build_env();

    let list = ee.execute_line("list").await.unwrap();
    assert_eq!(list.messages, vec!["No contracts registered"]);

    ee.execute_line(&format!("register token 0x1234 \"{}\"", abi.display()))
        .await
        .unwrap();

    let help = ee.execute_line("help").await.unwrap();
    assert!(help.messages.iter().any(|m| m.contains("token.balance_of <owner>")));
    assert!(help.messages.iter().any(|m| m.contains("register <name> <address> <abi-filename>")));
    assert!(!help.messages.iter().any(|m| m.trim_start().starts_with("quit")));

    let list = ee.execute_line("list").await.unwrap();
    assert_eq!(
        list.messages,
        vec![
            "token at 0x1234",
            "  token.balance_of (read)",
            "  token.transfer (write)",
        ]
    );
}
