use crate::utils::{plain_word, plain_words};
use abi_wallet::commands::parser::tokenize;
use abi_wallet::{CommandSet, WalletError};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_plain_words_split_on_whitespace(words in plain_words(0, 8), gap in "[ \t]{1,3}") {
        let line = words.join(&gap);
        prop_assert_eq!(tokenize(&line).unwrap(), words);
    }

    #[test]
    fn test_hash_and_backslash_are_literal(words in prop::collection::vec("[#\\\\a-zA-Z0-9:.]{1,12}", 1..6)) {
        let line = words.join(" ");
        prop_assert_eq!(tokenize(&line).unwrap(), words);
    }

    #[test]
    fn test_quoted_token_is_kept_whole(inner in "[a-z ]{0,20}") {
        let line = format!("open \"{}\" pw", inner);
        let tokens = tokenize(&line).unwrap();
        prop_assert_eq!(tokens, vec!["open".to_string(), inner, "pw".to_string()]);
    }

    #[test]
    fn test_register_binds_positionally(args in plain_words(3, 8)) {
        let commands = CommandSet::with_builtins();
        let line = format!("register {}", args.join(" "));
        let parsed = commands.parse(&line).unwrap();

        prop_assert_eq!(parsed.command_name.as_str(), "register");
        prop_assert_eq!(&parsed.args["name"], &args[0]);
        prop_assert_eq!(&parsed.args["address"], &args[1]);
        prop_assert_eq!(&parsed.args["abi-filename"], &args[2]);
    }

    #[test]
    fn test_short_register_lines_rejected(args in plain_words(0, 3)) {
        let commands = CommandSet::with_builtins();
        let line = format!("register {}", args.join(" "));
        let err = commands.parse(&line).unwrap_err();
        let is_not_enough = matches!(err, WalletError::NotEnoughArguments { expected: 3, got, .. } if got == args.len());
        prop_assert!(is_not_enough);
    }

    #[test]
    fn test_unknown_names_rejected(name in plain_word()) {
        let commands = CommandSet::with_builtins();
        prop_assume!(!commands.contains(&name));
        let is_unknown = matches!(commands.parse(&name), Err(WalletError::UnknownCommand(_)));
        prop_assert!(is_unknown);
    }

    #[test]
    fn test_tokenize_never_panics(line in "\\PC*") {
        let _ = tokenize(&line);
    }
}
