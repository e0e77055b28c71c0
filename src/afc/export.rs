//! Declaration serialization for the AFC e-filing portal.

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::Event;
use rust_decimal::Decimal;

use crate::core::ComplianceError;
use crate::vat::{ControlStatus, VatDeclaration, has_blocking_errors, run_coherence_controls};

use super::xml::{XmlResult, XmlWriter};

/// Namespace of the AFC VAT declaration schema.
pub const AFC_NAMESPACE: &str = "http://www.estv.admin.ch/xmlns/mwst/vat-declaration/1.0";

/// Serialize a declaration to the AFC XML schema.
///
/// The coherence controls run first; any error-level result refuses
/// the export. Rubrique numbers follow the official form: 302/312/342
/// carry the net revenue per rate class, 303/313/343 the VAT on it,
/// 399 the collected total, 400/405/410 the deductible categories,
/// 415 corrections, 479 the deductible total, and 500/510 the net
/// outcome. `PaymentReference` appears only once a declaration has
/// been submitted.
pub fn generate_afc_export(declaration: &VatDeclaration) -> XmlResult {
    let controls = run_coherence_controls(declaration);
    if has_blocking_errors(&controls) {
        let failing: Vec<&str> = controls
            .iter()
            .filter(|c| c.status == ControlStatus::Error)
            .map(|c| c.name.as_str())
            .collect();
        return Err(ComplianceError::Export(format!(
            "coherence controls failed: {}",
            failing.join(", ")
        )));
    }

    let mut xml = XmlWriter::new()?;
    xml.start_element_with_attrs("VATDeclaration", &[("xmlns", AFC_NAMESPACE)])?;

    xml.start_element("Header")?;
    xml.text_element("DeclarationId", &declaration.id)?;
    xml.text_element("VATNumber", &declaration.vat_number)?;
    xml.start_element("Period")?;
    xml.text_element("Year", &declaration.period.year.to_string())?;
    xml.text_element("Type", declaration.period.period_type.code())?;
    xml.text_element("Code", &declaration.period.code)?;
    xml.end_element("Period")?;
    let created = declaration.created_at.format("%Y-%m-%dT%H:%M:%S").to_string();
    xml.text_element("CreatedDate", &created)?;
    xml.end_element("Header")?;

    let collected = &declaration.collected;
    xml.start_element("Revenue")?;
    xml.amount_element("Rubrique302", collected.normal.net_amount)?;
    xml.amount_element("Rubrique303", collected.normal.vat_amount)?;
    xml.amount_element("Rubrique312", collected.reduced.net_amount)?;
    xml.amount_element("Rubrique313", collected.reduced.vat_amount)?;
    xml.amount_element("Rubrique342", collected.lodging.net_amount)?;
    xml.amount_element("Rubrique343", collected.lodging.vat_amount)?;
    xml.amount_element("Rubrique399", collected.total)?;
    xml.end_element("Revenue")?;

    let deductible = &declaration.deductible;
    xml.start_element("Deductible")?;
    xml.amount_element("Rubrique400", deductible.goods.vat_amount)?;
    xml.amount_element("Rubrique405", deductible.services.vat_amount)?;
    xml.amount_element("Rubrique410", deductible.investments.vat_amount)?;
    xml.amount_element("Rubrique415", deductible.corrections)?;
    xml.amount_element("Rubrique479", deductible.total)?;
    xml.end_element("Deductible")?;

    xml.start_element("Result")?;
    xml.amount_element("Rubrique500", declaration.result.vat_to_pay)?;
    xml.amount_element("Rubrique510", declaration.result.vat_to_recover)?;
    if let Some(reference) = &declaration.result.payment_reference {
        xml.text_element("PaymentReference", reference)?;
    }
    xml.end_element("Result")?;

    xml.end_element("VATDeclaration")?;
    xml.into_string()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Rubrique values read back from an AFC export document.
///
/// Keyed by rubrique number ("302", "399", "500", ...).
#[derive(Debug, Clone, PartialEq)]
pub struct AfcDocument {
    pub declaration_id: String,
    pub vat_number: String,
    pub rubriques: BTreeMap<String, Decimal>,
    pub payment_reference: Option<String>,
}

/// Read an AFC export back into its rubrique values.
///
/// Used to reconcile a stored document against a recomputed
/// declaration without re-submitting it.
pub fn parse_afc_export(xml: &str) -> Result<AfcDocument, ComplianceError> {
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut declaration_id = None;
    let mut vat_number = None;
    let mut payment_reference = None;
    let mut rubriques = BTreeMap::new();
    let mut current: Option<String> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) => {
                let name = std::str::from_utf8(e.name().as_ref())
                    .unwrap_or("")
                    .to_string();
                current = Some(name);
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default().to_string();
                if text.is_empty() {
                    continue;
                }
                match current.as_deref() {
                    Some("DeclarationId") => declaration_id = Some(text),
                    Some("VATNumber") => vat_number = Some(text),
                    Some("PaymentReference") => payment_reference = Some(text),
                    Some(name) => {
                        if let Some(number) = name.strip_prefix("Rubrique") {
                            let value = text.parse::<Decimal>().map_err(|e| {
                                ComplianceError::Xml(format!("rubrique {number}: {e}"))
                            })?;
                            rubriques.insert(number.to_string(), value);
                        }
                    }
                    None => {}
                }
            }
            Ok(Event::End(_)) => current = None,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(ComplianceError::Xml(format!("XML parse error: {e}")));
            }
            _ => {}
        }
    }

    Ok(AfcDocument {
        declaration_id: declaration_id
            .ok_or_else(|| ComplianceError::Xml("missing DeclarationId".into()))?,
        vat_number: vat_number.ok_or_else(|| ComplianceError::Xml("missing VATNumber".into()))?,
        rubriques,
        payment_reference,
    })
}
