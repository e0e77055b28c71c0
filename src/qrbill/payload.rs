//! Payment-slip payload codec: the newline-separated text behind the
//! Swiss QR code (SPC format, version 0200).

use rust_decimal::Decimal;

use crate::core::{format_fixed2, ComplianceError};

use super::address::{AddressType, StructuredAddress};
use super::bill::{validate_qr_bill, QrBill, ReferenceType};

const PAYLOAD_TYPE: &str = "SPC";
const PAYLOAD_VERSION: &str = "0200";
const PAYLOAD_CODING: &str = "1";

/// Fields emitted by the generator. Parsers accept the trailing
/// billing-information field missing and extra alternative-scheme
/// lines after it.
const FIELD_COUNT: usize = 32;

// Character limits from the payment standard; longer values are
// truncated on encoding.
const MAX_NAME: usize = 70;
const MAX_STREET: usize = 70;
const MAX_HOUSE_NUMBER: usize = 16;
const MAX_POSTAL_CODE: usize = 16;
const MAX_CITY: usize = 35;
const MAX_ADDITIONAL_INFO: usize = 140;

/// Encode a bill into the payload text.
///
/// The bill is validated first; any blocking finding aborts the
/// encoding. Text fields beyond the standard's limits are truncated.
/// The amount line is empty for open-amount slips, and the reference
/// is written compact (no display grouping).
pub fn generate_payload(bill: &QrBill) -> Result<String, ComplianceError> {
    let report = validate_qr_bill(bill);
    if !report.valid {
        let joined = report
            .errors
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        return Err(ComplianceError::Validation(joined));
    }

    let mut fields: Vec<String> = Vec::with_capacity(FIELD_COUNT);

    // Header
    fields.push(PAYLOAD_TYPE.into());
    fields.push(PAYLOAD_VERSION.into());
    fields.push(PAYLOAD_CODING.into());

    // Creditor account and address
    fields.push(compact(&bill.iban));
    push_address(&mut fields, &bill.creditor);

    // Ultimate creditor, reserved for future use
    for _ in 0..7 {
        fields.push(String::new());
    }

    // Payment amount and currency
    fields.push(bill.amount.map(format_fixed2).unwrap_or_default());
    fields.push(bill.currency.trim().to_uppercase());

    // Ultimate debtor
    match &bill.debtor {
        Some(debtor) => push_address(&mut fields, debtor),
        None => {
            for _ in 0..7 {
                fields.push(String::new());
            }
        }
    }

    // Payment reference
    fields.push(bill.reference_type.code().into());
    fields.push(bill.reference.as_deref().map(compact).unwrap_or_default());

    // Additional information
    fields.push(limit(bill.message.as_deref().unwrap_or(""), MAX_ADDITIONAL_INFO));
    fields.push("EPD".into());
    fields.push(limit(bill.billing_info.as_deref().unwrap_or(""), MAX_ADDITIONAL_INFO));

    Ok(fields.join("\n"))
}

/// Decode a payload back into a bill.
///
/// Structural errors (wrong header, missing trailer, misplaced fields)
/// are reported as validation failures. The returned bill is not
/// revalidated; run [`validate_qr_bill`] on it when full checking is
/// needed.
pub fn parse_payload(text: &str) -> Result<QrBill, ComplianceError> {
    let fields: Vec<&str> = text.split('\n').collect();

    if fields.len() < FIELD_COUNT - 1 {
        return Err(ComplianceError::Validation(format!(
            "payload has {} fields, expected at least {}",
            fields.len(),
            FIELD_COUNT - 1
        )));
    }
    if fields[0] != PAYLOAD_TYPE {
        return Err(ComplianceError::Validation(
            "payload does not start with the SPC header".into(),
        ));
    }
    if fields[1] != PAYLOAD_VERSION {
        return Err(ComplianceError::Validation(format!(
            "unsupported payload version '{}'",
            fields[1]
        )));
    }

    let creditor = parse_address(&fields[4..11], "creditor")?;
    let creditor = creditor.ok_or_else(|| {
        ComplianceError::Validation("payload is missing the creditor address".into())
    })?;

    let amount = match fields[18] {
        "" => None,
        raw => Some(raw.parse::<Decimal>().map_err(|_| {
            ComplianceError::Validation(format!("amount '{raw}' is not a decimal number"))
        })?),
    };

    let debtor = parse_address(&fields[20..27], "debtor")?;

    let reference_type = ReferenceType::from_code(fields[27]).ok_or_else(|| {
        ComplianceError::Validation(format!("unknown reference type '{}'", fields[27]))
    })?;

    if fields[30] != "EPD" {
        return Err(ComplianceError::Validation(
            "payload is missing the EPD trailer".into(),
        ));
    }

    Ok(QrBill {
        iban: fields[3].to_string(),
        creditor,
        debtor,
        amount,
        currency: fields[19].to_string(),
        reference_type,
        reference: non_empty(fields[28]),
        message: non_empty(fields[29]),
        billing_info: fields.get(31).copied().and_then(non_empty),
    })
}

fn push_address(fields: &mut Vec<String>, address: &StructuredAddress) {
    fields.push(AddressType::Structured.code().into());
    fields.push(limit(&address.name, MAX_NAME));
    fields.push(limit(&address.street, MAX_STREET));
    fields.push(limit(
        address.house_number.as_deref().unwrap_or(""),
        MAX_HOUSE_NUMBER,
    ));
    fields.push(limit(&address.postal_code, MAX_POSTAL_CODE));
    fields.push(limit(&address.city, MAX_CITY));
    fields.push(address.country.clone());
}

// Seven payload lines: address type, name, street, house number,
// postal code, city, country. All empty means the address is absent.
fn parse_address(
    fields: &[&str],
    role: &str,
) -> Result<Option<StructuredAddress>, ComplianceError> {
    if fields.iter().all(|f| f.is_empty()) {
        return Ok(None);
    }
    match AddressType::from_code(fields[0]) {
        Some(AddressType::Structured) => {}
        Some(AddressType::Combined) => {
            return Err(ComplianceError::Validation(format!(
                "{role} uses the combined address form, only structured is supported"
            )));
        }
        None => {
            return Err(ComplianceError::Validation(format!(
                "{role} has unknown address type '{}'",
                fields[0]
            )));
        }
    }
    Ok(Some(StructuredAddress {
        name: fields[1].to_string(),
        street: fields[2].to_string(),
        house_number: non_empty(fields[3]),
        postal_code: fields[4].to_string(),
        city: fields[5].to_string(),
        country: fields[6].to_string(),
    }))
}

fn compact(text: &str) -> String {
    text.split_whitespace().collect()
}

fn limit(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn non_empty(field: &str) -> Option<String> {
    if field.is_empty() {
        None
    } else {
        Some(field.to_string())
    }
}
