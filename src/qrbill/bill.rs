//! The QR-bill model, its builder, and the full validation pass.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::{round_half_up, ComplianceError, FindingCode, ValidationError};

use super::address::{validate_address, StructuredAddress};
use super::iban::{is_qr_iban, validate_iban};
use super::reference::validate_qr_reference;

/// Inclusive bounds for a slip amount, in CHF or EUR.
pub const AMOUNT_MIN: Decimal = dec!(0.01);
pub const AMOUNT_MAX: Decimal = dec!(999_999_999.99);

/// Reference slot kind on the payment slip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReferenceType {
    /// 27-digit QR reference with Modulo-10 check digit, for QR-IBANs.
    Qrr,
    /// ISO 11649 creditor reference.
    Scor,
    /// No reference.
    Non,
}

impl ReferenceType {
    /// Code used in the payment-slip payload.
    pub fn code(&self) -> &'static str {
        match self {
            ReferenceType::Qrr => "QRR",
            ReferenceType::Scor => "SCOR",
            ReferenceType::Non => "NON",
        }
    }

    /// Parse the payload code back into a reference type.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "QRR" => Some(ReferenceType::Qrr),
            "SCOR" => Some(ReferenceType::Scor),
            "NON" => Some(ReferenceType::Non),
            _ => None,
        }
    }
}

/// A complete QR payment slip ready for validation and encoding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QrBill {
    /// Creditor account, QR-IBAN or regular CH/LI IBAN.
    pub iban: String,
    /// Payee address.
    pub creditor: StructuredAddress,
    /// Payer address; open slips may omit it.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub debtor: Option<StructuredAddress>,
    /// Payment amount; omitted on open-amount slips.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub amount: Option<Decimal>,
    /// "CHF" or "EUR".
    pub currency: String,
    /// Reference slot kind.
    pub reference_type: ReferenceType,
    /// Reference value; required for QRR.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub reference: Option<String>,
    /// Unstructured message to the payee.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub message: Option<String>,
    /// Structured billing information (Swico S1 string).
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub billing_info: Option<String>,
}

/// Outcome of a full slip validation pass.
///
/// Blocking findings land in `errors` and clear `valid`; debtor-address
/// findings land in `warnings` and do not prevent slip generation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    /// True when no blocking errors were found.
    pub valid: bool,
    /// Blocking findings.
    pub errors: Vec<ValidationError>,
    /// Non-blocking findings.
    pub warnings: Vec<ValidationError>,
}

/// Check a slip amount against the standard's inclusive bounds.
///
/// Returns the amount rounded half-up to the cent. Zero is out of
/// bounds; open-amount slips omit the amount instead.
pub fn validate_amount(amount: Decimal) -> Result<Decimal, ValidationError> {
    if amount < AMOUNT_MIN || amount > AMOUNT_MAX {
        return Err(ValidationError::new(
            FindingCode::AmountOutOfBounds,
            "amount",
            format!("must be between {AMOUNT_MIN} and {AMOUNT_MAX}"),
        ));
    }
    Ok(round_half_up(amount, 2))
}

/// Check a currency code; accepts any case and returns the uppercase form.
pub fn validate_currency(raw: &str) -> Result<String, ValidationError> {
    let upper = raw.trim().to_uppercase();
    if upper == "CHF" || upper == "EUR" {
        Ok(upper)
    } else {
        Err(ValidationError::new(
            FindingCode::UnsupportedCurrency,
            "currency",
            format!("'{raw}' is not supported, use CHF or EUR"),
        ))
    }
}

/// Run every slip check and collect all findings in one pass.
///
/// IBAN, creditor address, currency, and amount (when present) are
/// always checked. The reference itself is checked only for QRR slips;
/// a reference on a NON slip is an error, and a reference type that
/// does not match the account's QR-IBAN status is a warning. Debtor
/// findings are downgraded to warnings so a malformed payer address
/// flags the slip without blocking it.
pub fn validate_qr_bill(bill: &QrBill) -> ValidationReport {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();

    let iban_ok = match validate_iban(&bill.iban) {
        Ok(_) => true,
        Err(e) => {
            errors.push(e);
            false
        }
    };

    errors.extend(validate_address(&bill.creditor, "creditor"));

    if let Err(e) = validate_currency(&bill.currency) {
        errors.push(e);
    }

    if let Some(amount) = bill.amount {
        if let Err(e) = validate_amount(amount) {
            errors.push(e);
        }
    }

    match bill.reference_type {
        ReferenceType::Qrr => {
            match bill.reference.as_deref() {
                Some(reference) => {
                    if let Err(e) = validate_qr_reference(reference) {
                        errors.push(e);
                    }
                }
                None => errors.push(ValidationError::new(
                    FindingCode::MissingField,
                    "reference",
                    "QRR slips require a reference",
                )),
            }
            if iban_ok && !is_qr_iban(&bill.iban) {
                warnings.push(ValidationError::warning(
                    FindingCode::InvalidReferenceType,
                    "reference_type",
                    "QRR reference paired with a non-QR-IBAN account",
                ));
            }
        }
        ReferenceType::Scor | ReferenceType::Non => {
            if bill.reference_type == ReferenceType::Non && bill.reference.is_some() {
                errors.push(ValidationError::new(
                    FindingCode::InvalidReferenceType,
                    "reference",
                    "NON slips do not carry a reference",
                ));
            }
            if iban_ok && is_qr_iban(&bill.iban) {
                warnings.push(ValidationError::warning(
                    FindingCode::InvalidReferenceType,
                    "reference_type",
                    "QR-IBAN accounts require a QRR reference",
                ));
            }
        }
    }

    if let Some(debtor) = &bill.debtor {
        warnings.extend(
            validate_address(debtor, "debtor")
                .into_iter()
                .map(ValidationError::into_warning),
        );
    }

    ValidationReport {
        valid: errors.is_empty(),
        errors,
        warnings,
    }
}

/// Builder for [`QrBill`] with validation on `build`.
#[derive(Debug, Clone)]
pub struct QrBillBuilder {
    iban: String,
    creditor: Option<StructuredAddress>,
    debtor: Option<StructuredAddress>,
    amount: Option<Decimal>,
    currency: String,
    reference_type: ReferenceType,
    reference: Option<String>,
    message: Option<String>,
    billing_info: Option<String>,
}

impl QrBillBuilder {
    /// Start a slip for the given creditor account. Currency defaults
    /// to CHF and the reference slot to NON.
    pub fn new(iban: impl Into<String>) -> Self {
        Self {
            iban: iban.into(),
            creditor: None,
            debtor: None,
            amount: None,
            currency: "CHF".into(),
            reference_type: ReferenceType::Non,
            reference: None,
            message: None,
            billing_info: None,
        }
    }

    /// Payee address (required).
    pub fn creditor(mut self, address: StructuredAddress) -> Self {
        self.creditor = Some(address);
        self
    }

    /// Payer address.
    pub fn debtor(mut self, address: StructuredAddress) -> Self {
        self.debtor = Some(address);
        self
    }

    /// Payment amount in the slip currency.
    pub fn amount(mut self, amount: Decimal) -> Self {
        self.amount = Some(amount);
        self
    }

    /// Slip currency, CHF or EUR.
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = currency.into();
        self
    }

    /// Attach a 27-digit QR reference and set the slot to QRR.
    pub fn qr_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_type = ReferenceType::Qrr;
        self.reference = Some(reference.into());
        self
    }

    /// Attach an ISO 11649 creditor reference and set the slot to SCOR.
    pub fn creditor_reference(mut self, reference: impl Into<String>) -> Self {
        self.reference_type = ReferenceType::Scor;
        self.reference = Some(reference.into());
        self
    }

    /// Unstructured message to the payee.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Structured billing information (Swico S1 string).
    pub fn billing_info(mut self, info: impl Into<String>) -> Self {
        self.billing_info = Some(info.into());
        self
    }

    /// Build and validate the slip.
    ///
    /// Fails on missing required fields or any blocking finding; the
    /// messages of all findings are joined into the error.
    pub fn build(self) -> Result<QrBill, ComplianceError> {
        let bill = self.assemble()?;
        let report = validate_qr_bill(&bill);
        if !report.valid {
            let joined = report
                .errors
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            return Err(ComplianceError::Validation(joined));
        }
        Ok(bill)
    }

    /// Build without running the validation pass.
    ///
    /// Required fields are still enforced. Useful when a caller wants
    /// the full finding report from [`validate_qr_bill`] instead of a
    /// pass/fail error.
    pub fn build_unchecked(self) -> Result<QrBill, ComplianceError> {
        self.assemble()
    }

    fn assemble(self) -> Result<QrBill, ComplianceError> {
        let creditor = self
            .creditor
            .ok_or_else(|| ComplianceError::Builder("creditor is required".into()))?;
        if self.reference_type != ReferenceType::Non && self.reference.is_none() {
            return Err(ComplianceError::Builder(
                "reference is required for QRR and SCOR slips".into(),
            ));
        }
        Ok(QrBill {
            iban: self.iban,
            creditor,
            debtor: self.debtor,
            amount: self.amount,
            currency: self.currency,
            reference_type: self.reference_type,
            reference: self.reference,
            message: self.message,
            billing_info: self.billing_info,
        })
    }
}
