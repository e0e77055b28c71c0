//! IBAN validation for Swiss and Liechtenstein accounts.

use crate::core::{FindingCode, ValidationError};

/// Institution identifications reserved for QR-IBANs.
const QR_IID_MIN: u32 = 30_000;
const QR_IID_MAX: u32 = 31_999;

/// Validate a CH/LI IBAN and return it grouped in blocks of four.
///
/// Whitespace is stripped and the input upper-cased before checking.
/// The check digits are verified with the ISO 7064 Mod 97-10 scheme,
/// computed digit by digit so no big-integer arithmetic is needed.
pub fn validate_iban(raw: &str) -> Result<String, ValidationError> {
    let compact: String = raw.split_whitespace().collect::<String>().to_uppercase();

    if compact.len() != 21 {
        return Err(ValidationError::new(
            FindingCode::InvalidIban,
            "iban",
            format!("must be 21 characters for a CH/LI IBAN, got {}", compact.len()),
        ));
    }
    if !(compact.starts_with("CH") || compact.starts_with("LI")) {
        return Err(ValidationError::new(
            FindingCode::InvalidIban,
            "iban",
            "must start with country code CH or LI",
        ));
    }
    let bytes = compact.as_bytes();
    if !bytes[2..4].iter().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(
            FindingCode::InvalidIban,
            "iban",
            "check digits must be numeric",
        ));
    }
    if !bytes[4..].iter().all(|b| b.is_ascii_alphanumeric()) {
        return Err(ValidationError::new(
            FindingCode::InvalidIban,
            "iban",
            "account part contains characters outside A-Z and 0-9",
        ));
    }
    if mod97(&compact) != 1 {
        return Err(ValidationError::new(
            FindingCode::InvalidIban,
            "iban",
            "mod 97 checksum failed",
        ));
    }

    Ok(format_iban(&compact))
}

/// Group an IBAN into blocks of four for display.
pub fn format_iban(iban: &str) -> String {
    let compact: String = iban.split_whitespace().collect();
    let mut out = String::with_capacity(compact.len() + compact.len() / 4);
    for (i, c) in compact.chars().enumerate() {
        if i > 0 && i % 4 == 0 {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

/// True when the institution identification (characters 5-9) falls in
/// the range reserved for QR-IBANs.
///
/// A QR-IBAN is required for QRR references; a regular IBAN pairs with
/// SCOR or no reference.
pub fn is_qr_iban(iban: &str) -> bool {
    let compact: String = iban.split_whitespace().collect();
    let bytes = compact.as_bytes();
    if bytes.len() != 21 {
        return false;
    }
    let iid = &bytes[4..9];
    if !iid.iter().all(|b| b.is_ascii_digit()) {
        return false;
    }
    let iid: u32 = iid.iter().fold(0, |n, b| n * 10 + u32::from(b - b'0'));
    (QR_IID_MIN..=QR_IID_MAX).contains(&iid)
}

// ISO 7064 Mod 97-10: move the first four characters to the end, expand
// letters to two digits (A=10 .. Z=35), reduce left to right.
// Expects an upper-cased alphanumeric input.
fn mod97(iban: &str) -> u32 {
    let (head, tail) = iban.split_at(4);
    let mut remainder: u32 = 0;
    for c in tail.chars().chain(head.chars()) {
        remainder = match c {
            '0'..='9' => (remainder * 10 + (c as u32 - '0' as u32)) % 97,
            'A'..='Z' => (remainder * 100 + (c as u32 - 55)) % 97,
            _ => return 0,
        };
    }
    remainder
}
