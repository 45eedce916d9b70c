#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let (uf, rest) = data.split_at(2);
    if let (Ok(uf), Ok(value)) = (std::str::from_utf8(uf), std::str::from_utf8(rest)) {
        let _ = nota::checksum::check_registration(uf, value);
    }
});
