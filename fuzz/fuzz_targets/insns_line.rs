#![no_main]

use libfuzzer_sys::fuzz_target;
use insndb_nasm::InsnsDatabase;

fuzz_target!(|data: &[u8]| {
    // Parsing arbitrary text should never panic - errors are fine.
    if let Ok(text) = std::str::from_utf8(data) {
        let _ = insndb_nasm::parse_line(text);

        // Also run the whole-file path with its line attribution.
        let _ = InsnsDatabase::parse(text);
    }
});
