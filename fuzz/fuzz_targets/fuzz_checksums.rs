#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Malformed input must come back as InvalidFormat, never a panic.
        let _ = nota::checksum::check_tax_id(s);
        let _ = nota::checksum::check_access_key(s);
        let _ = nota::checksum::AccessKey::parse(s);
    }
});
