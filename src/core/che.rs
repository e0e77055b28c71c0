/// Error for a malformed Swiss enterprise identification number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheFormatError {
    /// The offending input, as given.
    pub value: String,
    /// Why it was rejected.
    pub reason: String,
}

impl std::fmt::Display for CheFormatError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid CHE number '{}': {}", self.value, self.reason)
    }
}

impl std::error::Error for CheFormatError {}

/// Validate and normalize a Swiss enterprise identification number (UID).
///
/// Accepts the dotted register form `CHE-123.456.789`, the compact
/// `CHE123456789`, and an optional ` TVA` / ` MWST` / ` IVA` register
/// suffix. Returns the canonical dotted form without suffix.
pub fn validate_che_number(raw: &str) -> Result<String, CheFormatError> {
    let upper = raw.trim().to_uppercase();
    let body = upper
        .strip_suffix(" TVA")
        .or_else(|| upper.strip_suffix(" MWST"))
        .or_else(|| upper.strip_suffix(" IVA"))
        .unwrap_or(&upper);

    let compact: String = body
        .chars()
        .filter(|c| !matches!(c, '.' | '-' | ' '))
        .collect();

    let digits = compact.strip_prefix("CHE").ok_or_else(|| CheFormatError {
        value: raw.to_string(),
        reason: "must start with CHE".into(),
    })?;

    if digits.len() != 9 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(CheFormatError {
            value: raw.to_string(),
            reason: "must contain exactly 9 digits after the CHE prefix".into(),
        });
    }

    Ok(format!(
        "CHE-{}.{}.{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9]
    ))
}
