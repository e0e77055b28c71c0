#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Arbitrary text as an account number; must not panic.
        let _ = qrfacture::qrbill::validate_iban(s);
        let _ = qrfacture::qrbill::is_qr_iban(s);
    }
});
