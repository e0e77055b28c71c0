//! Structured addresses and the character set the payment standard allows.

use serde::{Deserialize, Serialize};

use crate::core::{FindingCode, ValidationError};

/// Address kind on the payment slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AddressType {
    /// Separate street, house number, postal code, and city fields.
    Structured,
    /// Two free-form address lines.
    Combined,
}

impl AddressType {
    /// Single-letter code used in the payment-slip payload.
    pub fn code(&self) -> &'static str {
        match self {
            AddressType::Structured => "S",
            AddressType::Combined => "K",
        }
    }

    /// Parse the payload code back into an address type.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "S" => Some(AddressType::Structured),
            "K" => Some(AddressType::Combined),
            _ => None,
        }
    }
}

/// A structured postal address as printed on the payment slip.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredAddress {
    /// Person or company name.
    pub name: String,
    /// Street name without the house number.
    pub street: String,
    /// House number, free form (e.g. "27a").
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub house_number: Option<String>,
    /// Postal code without country prefix.
    pub postal_code: String,
    /// City or locality.
    pub city: String,
    /// ISO 3166-1 alpha-2 country code, upper case.
    pub country: String,
}

impl StructuredAddress {
    /// Create a structured address without a house number.
    pub fn new(
        name: impl Into<String>,
        street: impl Into<String>,
        postal_code: impl Into<String>,
        city: impl Into<String>,
        country: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            street: street.into(),
            house_number: None,
            postal_code: postal_code.into(),
            city: city.into(),
            country: country.into(),
        }
    }

    /// Attach a house number.
    pub fn house_number(mut self, number: impl Into<String>) -> Self {
        self.house_number = Some(number.into());
        self
    }
}

/// Validate a structured address, collecting every violation.
///
/// `prefix` is prepended to the field path of each finding
/// (e.g. "creditor" gives "creditor.postal_code"). Findings are never
/// short-circuited; a slip must report every defect at once.
pub fn validate_address(address: &StructuredAddress, prefix: &str) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if address.name.trim().is_empty() {
        errors.push(ValidationError::new(
            FindingCode::MissingField,
            format!("{prefix}.name"),
            "is required",
        ));
    } else {
        check_charset(&address.name, &format!("{prefix}.name"), &mut errors);
    }

    if address.street.trim().is_empty() {
        errors.push(ValidationError::new(
            FindingCode::UnstructuredAddress,
            format!("{prefix}.street"),
            "structured address requires a street",
        ));
    } else {
        check_charset(&address.street, &format!("{prefix}.street"), &mut errors);
    }

    if address.postal_code.trim().is_empty() {
        errors.push(ValidationError::new(
            FindingCode::UnstructuredAddress,
            format!("{prefix}.postal_code"),
            "structured address requires a postal code",
        ));
    } else if address.country == "CH" && !is_swiss_postal_code(&address.postal_code) {
        errors.push(ValidationError::new(
            FindingCode::InvalidPostalCode,
            format!("{prefix}.postal_code"),
            "Swiss postal codes have exactly 4 digits",
        ));
    }

    if address.city.trim().is_empty() {
        errors.push(ValidationError::new(
            FindingCode::UnstructuredAddress,
            format!("{prefix}.city"),
            "structured address requires a city",
        ));
    } else {
        check_charset(&address.city, &format!("{prefix}.city"), &mut errors);
    }

    if !is_country_code(&address.country) {
        errors.push(ValidationError::new(
            FindingCode::InvalidCountry,
            format!("{prefix}.country"),
            "must be a 2-letter uppercase ISO country code",
        ));
    }

    errors
}

/// Character set accepted for name, street, and city fields: basic
/// Latin letters and digits, the Latin-1 supplement, and slip
/// punctuation.
pub fn is_allowed_text(text: &str) -> bool {
    !text.is_empty() && text.chars().all(is_allowed_char)
}

fn is_allowed_char(c: char) -> bool {
    matches!(c,
        'A'..='Z'
        | 'a'..='z'
        | '0'..='9'
        | '\u{00C0}'..='\u{00FF}'
        | ' ' | '.' | ',' | ';' | ':' | '\'' | '"' | '-' | '/' | '(' | ')')
}

fn check_charset(text: &str, field: &str, errors: &mut Vec<ValidationError>) {
    if !is_allowed_text(text) {
        errors.push(ValidationError::new(
            FindingCode::UnsupportedCharacter,
            field,
            "contains characters outside the accepted Latin set",
        ));
    }
}

fn is_swiss_postal_code(code: &str) -> bool {
    code.len() == 4 && code.bytes().all(|b| b.is_ascii_digit())
}

fn is_country_code(code: &str) -> bool {
    code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase())
}
