use thiserror::Error;

/// Errors that can occur during payment-slip or declaration processing.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ComplianceError {
    /// One or more validation rules failed.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Builder encountered invalid or missing configuration.
    #[error("builder error: {0}")]
    Builder(String),

    /// Declaration export could not be produced.
    #[error("export error: {0}")]
    Export(String),

    /// Declaration submission was refused.
    #[error("submission error: {0}")]
    Submission(String),

    /// Period data for the requested year/period does not exist.
    #[error("source unavailable: {0}")]
    SourceUnavailable(String),

    /// XML generation or parsing error.
    #[error("XML error: {0}")]
    Xml(String),
}

/// Stable finding codes for payment-slip validation.
///
/// The numeric codes are part of the public contract and never change
/// meaning between releases; match on the variant, report the code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FindingCode {
    /// Invalid IBAN (format or check digit).
    InvalidIban,
    /// Invalid QR reference (format or check digit).
    InvalidReference,
    /// Unstructured address where structured is required.
    UnstructuredAddress,
    /// Unsupported character in a text field.
    UnsupportedCharacter,
    /// Amount out of bounds.
    AmountOutOfBounds,
    /// Unsupported currency.
    UnsupportedCurrency,
    /// Invalid reference type.
    InvalidReferenceType,
    /// Invalid ISO country code.
    InvalidCountry,
    /// Invalid postal code for the declared country.
    InvalidPostalCode,
    /// Missing required field.
    MissingField,
}

impl FindingCode {
    /// Stable code string (e.g. "QR001").
    pub fn code(&self) -> &'static str {
        match self {
            FindingCode::InvalidIban => "QR001",
            FindingCode::InvalidReference => "QR002",
            FindingCode::UnstructuredAddress => "QR003",
            FindingCode::UnsupportedCharacter => "QR004",
            FindingCode::AmountOutOfBounds => "QR005",
            FindingCode::UnsupportedCurrency => "QR006",
            FindingCode::InvalidReferenceType => "QR007",
            FindingCode::InvalidCountry => "QR008",
            FindingCode::InvalidPostalCode => "QR009",
            FindingCode::MissingField => "QR010",
        }
    }

    /// Parse a stable code string back into a finding code.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "QR001" => Some(FindingCode::InvalidIban),
            "QR002" => Some(FindingCode::InvalidReference),
            "QR003" => Some(FindingCode::UnstructuredAddress),
            "QR004" => Some(FindingCode::UnsupportedCharacter),
            "QR005" => Some(FindingCode::AmountOutOfBounds),
            "QR006" => Some(FindingCode::UnsupportedCurrency),
            "QR007" => Some(FindingCode::InvalidReferenceType),
            "QR008" => Some(FindingCode::InvalidCountry),
            "QR009" => Some(FindingCode::InvalidPostalCode),
            "QR010" => Some(FindingCode::MissingField),
            _ => None,
        }
    }
}

impl std::fmt::Display for FindingCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

/// How a validation finding affects slip generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Blocks generation.
    Error,
    /// Reported but does not block.
    Warning,
}

/// A single validation finding with field path, code, and message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dot-separated path to the invalid field (e.g. "creditor.postal_code").
    pub field: String,
    /// Human-readable error description.
    pub message: String,
    /// Stable finding code.
    pub code: FindingCode,
    /// Whether the finding blocks slip generation.
    pub severity: Severity,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}: {}", self.code, self.field, self.message)
    }
}

impl ValidationError {
    /// Create a blocking validation error.
    pub fn new(code: FindingCode, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
            severity: Severity::Error,
        }
    }

    /// Create a non-blocking warning with the same code taxonomy.
    pub fn warning(
        code: FindingCode,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
            code,
            severity: Severity::Warning,
        }
    }

    /// Downgrade a blocking error to a warning, keeping code and message.
    pub fn into_warning(mut self) -> Self {
        self.severity = Severity::Warning;
        self
    }

    /// True when the finding blocks slip generation.
    pub fn is_blocking(&self) -> bool {
        self.severity == Severity::Error
    }
}
