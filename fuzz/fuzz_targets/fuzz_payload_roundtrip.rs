#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(s) = std::str::from_utf8(data) {
        // Parse -> generate -> parse must not panic at any step.
        if let Ok(bill) = qrfacture::qrbill::parse_payload(s) {
            if let Ok(text) = qrfacture::qrbill::generate_payload(&bill) {
                let _ = qrfacture::qrbill::parse_payload(&text);
            }
        }
    }
});
