use abi_wallet::abi::{MessageDescriptor, SchemaFile};
use abi_wallet::Abi;
use abi_wallet_mock::{AbiBuilder, FieldType};
use proptest::prelude::*;

/// Tokens the shell splitter passes through untouched
pub fn plain_word() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9_.:-]{1,16}"
}

pub fn plain_words(min: usize, max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(plain_word(), min..max)
}

/// Schema with one field of each common scalar kind
pub fn mixed_schema() -> (MessageDescriptor, SchemaFile) {
    let doc = AbiBuilder::new()
        .message(
            "mixed",
            &[
                ("count", FieldType::Uint64),
                ("delta", FieldType::Sint64),
                ("small", FieldType::Int32),
                ("flag", FieldType::Bool),
                ("memo", FieldType::String),
                ("blob", FieldType::Bytes),
            ],
        )
        .method("noop", "0x01", "mixed", "mixed", true)
        .to_json();
    let (_, schema) = Abi::parse(doc.as_bytes()).expect("fixture ABI parses");
    let descriptor = schema.resolve("mixed").expect("fixture type resolves").clone();
    (descriptor, schema)
}
