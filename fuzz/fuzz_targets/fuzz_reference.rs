#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Must not panic; errors are fine, panics are bugs.
        let _ = qrfacture::qrbill::validate_qr_reference(s);
        let _ = qrfacture::qrbill::generate_qr_reference(s);
    }
});
