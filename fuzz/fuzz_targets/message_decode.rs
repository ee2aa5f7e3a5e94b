#![no_main]

use abi_wallet::abi::SchemaFile;
use abi_wallet::codec;
use libfuzzer_sys::fuzz_target;

// Input layout: [len: u16 le][descriptor set bytes][message bytes]
fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let split = usize::from(u16::from_le_bytes([data[0], data[1]]));
    let rest = &data[2..];
    if split > rest.len() {
        return;
    }
    let (types, message) = rest.split_at(split);

    if let Ok(schema) = SchemaFile::load(types) {
        for descriptor in schema.messages() {
            let _ = codec::decode(message, descriptor, &schema);
        }
    }
});
