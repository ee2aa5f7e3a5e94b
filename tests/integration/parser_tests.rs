use abi_wallet::WalletError;
use abi_wallet_mock::{token_abi, MockTransportBuilder};
use tempfile::TempDir;

#[tokio::test]
async fn test_parse_errors_on_registered_commands() {
    let dir = TempDir::new().unwrap();
    let abi = token_abi().write_to(dir.path(), "token.abi");
    let mut ee = MockTransportBuilder::new().build_env();
    ee.execute_line(&format!("register token 0x1234 \"{}\"", abi.display()))
        .await
        .unwrap();

    assert!(matches!(ee.parse(""), Err(WalletError::EmptyCommandName)));
    assert!(matches!(
        ee.parse("token.mint 1"),
        Err(WalletError::UnknownCommand(_))
    ));
    assert!(matches!(
        ee.parse("token.transfer 0x01 0x02"),
        Err(WalletError::NotEnoughArguments { .. })
    ));
    assert!(matches!(
        ee.parse("token.transfer \"0x01 0x02 3"),
        Err(WalletError::InvalidString(_))
    ));

    let parsed = ee.parse("token.transfer 0x01 0x02 3 extra").unwrap();
    assert_eq!(parsed.command_name, "token.transfer");
    assert_eq!(parsed.args.len(), 3);
    assert_eq!(parsed.args["value"], "3");
}

#[tokio::test]
async fn test_unknown_command_before_registration() {
    let mut ee = MockTransportBuilder::new().build_env();
    let err = ee.execute_line("token.balance_of 0xabcd").await.unwrap_err();
    assert!(matches!(err, WalletError::UnknownCommand(ref n) if n == "token.balance_of"));
}
