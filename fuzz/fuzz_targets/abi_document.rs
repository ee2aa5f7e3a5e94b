#![no_main]

use abi_wallet::commands::compile;
use abi_wallet::Abi;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok((abi, schema)) = Abi::parse(data) {
        let _ = compile("fuzz", &abi, &schema);
    }
});
