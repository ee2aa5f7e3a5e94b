use crate::utils::mixed_schema;
use abi_wallet::codec::{self, parse_bytes};
use abi_wallet::ui::Formatter;
use base64::{engine::general_purpose, Engine};
use proptest::prelude::*;
use std::collections::HashMap;

proptest! {
    #[test]
    fn test_parse_bytes_accepts_hex_forms(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let plain = hex::encode(&bytes);
        prop_assert_eq!(parse_bytes(&plain).unwrap(), bytes.clone());
        prop_assert_eq!(parse_bytes(&format!("0x{}", plain)).unwrap(), bytes.clone());
        prop_assert_eq!(parse_bytes(&plain.to_uppercase()).unwrap(), bytes);
    }

    #[test]
    fn test_parse_bytes_accepts_base64(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let text = format!("base64:{}", general_purpose::STANDARD.encode(&bytes));
        prop_assert_eq!(parse_bytes(&text).unwrap(), bytes);
    }

    #[test]
    fn test_encoded_arguments_decode_to_same_text(
        count in any::<u64>(),
        delta in any::<i64>(),
        small in any::<i32>(),
        flag in any::<bool>(),
        memo in "[a-zA-Z0-9 ]{0,24}",
        blob in prop::collection::vec(any::<u8>(), 0..16),
    ) {
        let (descriptor, schema) = mixed_schema();
        let args: HashMap<String, String> = [
            ("count", count.to_string()),
            ("delta", delta.to_string()),
            ("small", small.to_string()),
            ("flag", flag.to_string()),
            ("memo", memo),
            ("blob", hex::encode(&blob)),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect();

        let built = codec::build_message(&args, &descriptor, &schema).unwrap();
        let bytes = codec::encode(&args, &descriptor, &schema).unwrap();
        let rendered = codec::render(&bytes, &descriptor, &schema).unwrap();
        prop_assert_eq!(rendered, built.to_string());
    }

    #[test]
    fn test_decode_arbitrary_bytes_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        let (descriptor, schema) = mixed_schema();
        let _ = codec::decode(&bytes, &descriptor, &schema);
    }

    #[test]
    fn test_format_amount_preserves_value(value in any::<u64>(), precision in 0u32..12) {
        let text = Formatter::format_amount(value, precision);
        let (whole, fraction) = text.split_once('.').unwrap_or((text.as_str(), ""));
        prop_assert!(!fraction.ends_with('0'));
        prop_assert!(fraction.len() <= precision as usize);

        let padded = format!("{}{}", fraction, "0".repeat(precision as usize - fraction.len()));
        let digits = format!("{}{}", whole, padded);
        prop_assert_eq!(digits.parse::<u128>().unwrap(), u128::from(value));
    }
}
