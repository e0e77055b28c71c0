//! QR-reference (QRR) check digits, generation, and display grouping.

use crate::core::{FindingCode, ValidationError};

/// Transition table for the recursive Modulo-10 check digit.
const MOD10_TABLE: [u8; 10] = [0, 9, 4, 6, 8, 2, 7, 1, 3, 5];

/// Validate a 27-digit QR reference and return it in display grouping.
///
/// Whitespace is stripped first, so both the compact and the grouped
/// form are accepted. The last digit must equal the Modulo-10 check
/// digit computed over the first 26.
pub fn validate_qr_reference(raw: &str) -> Result<String, ValidationError> {
    let compact: String = raw.split_whitespace().collect();

    if compact.len() != 27 || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(
            FindingCode::InvalidReference,
            "reference",
            "must be exactly 27 digits",
        ));
    }

    let (base, check) = compact.split_at(26);
    let expected = check_digit(base);
    let actual = check.as_bytes()[0] - b'0';
    if actual != expected {
        return Err(ValidationError::new(
            FindingCode::InvalidReference,
            "reference",
            format!("check digit {actual} does not match computed {expected}"),
        ));
    }

    Ok(format_qr_reference(&compact))
}

/// Build a QR reference from caller-supplied digits.
///
/// The base is left-padded with zeros to 26 digits, then the Modulo-10
/// check digit is appended. Returns the compact 27-digit form; callers
/// typically derive the base from invoice and customer numbers.
pub fn generate_qr_reference(base: &str) -> Result<String, ValidationError> {
    let compact: String = base.split_whitespace().collect();

    if compact.is_empty() || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new(
            FindingCode::InvalidReference,
            "reference",
            "base must contain only digits",
        ));
    }
    if compact.len() > 26 {
        return Err(ValidationError::new(
            FindingCode::InvalidReference,
            "reference",
            format!("base must be at most 26 digits, got {}", compact.len()),
        ));
    }

    let padded = format!("{compact:0>26}");
    let check = check_digit(&padded);
    Ok(format!("{padded}{check}"))
}

/// Group a 27-digit reference for display: a block of two, then five
/// blocks of five (`21 00000 00003 13947 14300 09017`).
///
/// Inputs that are not 27 digits are returned compacted but ungrouped.
pub fn format_qr_reference(reference: &str) -> String {
    let compact: String = reference.split_whitespace().collect();
    if compact.len() != 27 || !compact.bytes().all(|b| b.is_ascii_digit()) {
        return compact;
    }
    let mut out = String::with_capacity(32);
    for (i, c) in compact.chars().enumerate() {
        if i == 2 || (i > 2 && (i - 2) % 5 == 0) {
            out.push(' ');
        }
        out.push(c);
    }
    out
}

// Recursive Modulo-10: the carry feeds back through the transition
// table for every digit; the check digit is the carry's complement.
// Expects ASCII digits only.
fn check_digit(digits: &str) -> u8 {
    let mut carry: u8 = 0;
    for b in digits.bytes() {
        carry = MOD10_TABLE[usize::from((carry + (b - b'0')) % 10)];
    }
    (10 - carry) % 10
}
