#![no_main]

use abi_wallet::CommandSet;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(line) = std::str::from_utf8(data) {
        let commands = CommandSet::with_builtins();
        let _ = commands.parse(line);
    }
});
