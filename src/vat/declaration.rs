//! VAT declarations: calculation from period records, submission, and
//! archiving.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::{validate_che_number, ComplianceError};

use super::controls::{run_coherence_controls, ControlStatus};
use super::period::DeclarationPeriod;
use super::rates::{calculate_vat, RateClass, RateConfig};
use super::source::{DeductibleCategory, PeriodRecords};

/// Declarations must stay retrievable for ten years.
pub const RETENTION_YEARS: i32 = 10;

/// Collected-side bucket for one rate class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateBucket {
    /// Net revenue taxed at this rate.
    pub net_amount: Decimal,
    /// Rate fraction applied (e.g. 0.081).
    pub rate: Decimal,
    /// VAT due, rounded half-up to the cent.
    pub vat_amount: Decimal,
}

/// Deductible-side bucket. The VAT comes from the source documents
/// rather than a rate computation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DeductibleBucket {
    /// Net purchases booked to this category.
    pub net_amount: Decimal,
    /// Input tax actually paid.
    pub vat_amount: Decimal,
}

/// Collected VAT, bucketed by rate class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CollectedVat {
    pub normal: RateBucket,
    pub reduced: RateBucket,
    pub lodging: RateBucket,
    /// Sum of the per-rate VAT amounts (rubrique 399).
    pub total: Decimal,
}

/// Deductible input tax, bucketed by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeductibleVat {
    pub goods: DeductibleBucket,
    pub services: DeductibleBucket,
    pub investments: DeductibleBucket,
    /// Input-tax corrections (rubrique 415), may be negative.
    pub corrections: Decimal,
    /// Sum of category VAT plus corrections (rubrique 479).
    pub total: Decimal,
}

/// Net outcome of a declaration. At most one of the two amounts is
/// positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeclarationResult {
    /// Amount owed to the tax authority (rubrique 500).
    pub vat_to_pay: Decimal,
    /// Credit carried forward (rubrique 510).
    pub vat_to_recover: Decimal,
    /// Assigned at submission; drafts have none.
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// Lifecycle state of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationStatus {
    Draft,
    Submitted,
}

/// Settlement method the declaration is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeclarationMethod {
    /// Effective method: actual collected minus deductible.
    Effective,
    /// Net-tax-rate (forfait) method.
    FlatRate,
}

/// Retention stamp added when a declaration is archived.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArchiveStamp {
    pub archived_on: NaiveDate,
    /// Last day the record must remain retrievable.
    pub retention_until: NaiveDate,
}

/// A complete VAT declaration for one period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VatDeclaration {
    /// Stable identifier, `TVA-{year}-{period}`.
    pub id: String,
    /// Legal entity filing the declaration.
    pub entity: String,
    /// Enterprise identification number, canonical dotted form.
    pub vat_number: String,
    pub period: DeclarationPeriod,
    pub method: DeclarationMethod,
    pub collected: CollectedVat,
    pub deductible: DeductibleVat,
    pub result: DeclarationResult,
    pub status: DeclarationStatus,
    pub created_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub submitted_at: Option<NaiveDateTime>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub submitted_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[serde(default)]
    pub archive: Option<ArchiveStamp>,
}

impl VatDeclaration {
    /// Total net revenue across all rate classes.
    pub fn total_revenue(&self) -> Decimal {
        self.collected.normal.net_amount
            + self.collected.reduced.net_amount
            + self.collected.lodging.net_amount
    }
}

/// Builder for [`VatDeclaration`].
///
/// Revenue and deductible amounts accumulate across calls, so period
/// records and manual adjustments can be combined before `build`.
#[derive(Debug, Clone)]
pub struct DeclarationBuilder {
    entity: String,
    vat_number: String,
    period: DeclarationPeriod,
    rates: RateConfig,
    method: DeclarationMethod,
    created_at: Option<NaiveDateTime>,
    revenue: [Decimal; 3],
    deductible: [DeductibleBucket; 3],
    corrections: Decimal,
}

impl DeclarationBuilder {
    /// Start a declaration for an entity and period. Rates default to
    /// [`RateConfig::swiss_2024`] and the method to effective.
    pub fn new(
        entity: impl Into<String>,
        vat_number: impl Into<String>,
        period: DeclarationPeriod,
    ) -> Self {
        Self {
            entity: entity.into(),
            vat_number: vat_number.into(),
            period,
            rates: RateConfig::swiss_2024(),
            method: DeclarationMethod::Effective,
            created_at: None,
            revenue: [Decimal::ZERO; 3],
            deductible: [
                DeductibleBucket::default(),
                DeductibleBucket::default(),
                DeductibleBucket::default(),
            ],
            corrections: Decimal::ZERO,
        }
    }

    /// Rate table for the tax year.
    pub fn rates(mut self, rates: RateConfig) -> Self {
        self.rates = rates;
        self
    }

    /// Settlement method.
    pub fn method(mut self, method: DeclarationMethod) -> Self {
        self.method = method;
        self
    }

    /// Creation timestamp; defaults to midnight on the period start.
    pub fn created_at(mut self, created_at: NaiveDateTime) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Add net revenue taxed at a rate class.
    pub fn add_revenue(mut self, class: RateClass, net: Decimal) -> Self {
        self.revenue[class_index(class)] += net;
        self
    }

    /// Add a deductible amount with its documented input tax.
    pub fn add_deductible(mut self, category: DeductibleCategory, net: Decimal, vat: Decimal) -> Self {
        let bucket = &mut self.deductible[category_index(category)];
        bucket.net_amount += net;
        bucket.vat_amount += vat;
        self
    }

    /// Input-tax corrections (rubrique 415).
    pub fn corrections(mut self, amount: Decimal) -> Self {
        self.corrections = amount;
        self
    }

    /// Fold a period's records into the declaration.
    ///
    /// Client invoices land on the collected side under their rate
    /// class; supplier invoices under their deductible category; and
    /// expenses under services.
    pub fn records(mut self, records: &PeriodRecords) -> Self {
        for invoice in &records.client_invoices {
            self = self.add_revenue(invoice.rate_class, invoice.net_amount);
        }
        for invoice in &records.supplier_invoices {
            self = self.add_deductible(invoice.category, invoice.net_amount, invoice.vat_amount);
        }
        for expense in &records.expenses {
            self = self.add_deductible(
                DeductibleCategory::Services,
                expense.net_amount,
                expense.vat_amount,
            );
        }
        self
    }

    /// Compute buckets, totals, and the net result.
    ///
    /// Per-bucket VAT is `round(net * rate, 2)`; rounding happens on
    /// the bucket total, not per record. Fails when the enterprise
    /// identification number is malformed.
    pub fn build(self) -> Result<VatDeclaration, ComplianceError> {
        let vat_number = validate_che_number(&self.vat_number)
            .map_err(|e| ComplianceError::Validation(e.to_string()))?;

        let bucket = |class: RateClass| {
            let net = self.revenue[class_index(class)];
            let rate = self.rates.rate(class);
            RateBucket {
                net_amount: net,
                rate,
                vat_amount: calculate_vat(net, rate),
            }
        };
        let normal = bucket(RateClass::Normal);
        let reduced = bucket(RateClass::Reduced);
        let lodging = bucket(RateClass::Lodging);
        let total_collected = normal.vat_amount + reduced.vat_amount + lodging.vat_amount;

        let [goods, services, investments] = self.deductible;
        let total_deductible = goods.vat_amount
            + services.vat_amount
            + investments.vat_amount
            + self.corrections;

        let balance = total_collected - total_deductible;
        let result = DeclarationResult {
            vat_to_pay: balance.max(Decimal::ZERO),
            vat_to_recover: (-balance).max(Decimal::ZERO),
            payment_reference: None,
        };

        let created_at = self
            .created_at
            .unwrap_or_else(|| NaiveDateTime::new(self.period.start, NaiveTime::MIN));

        Ok(VatDeclaration {
            id: format!("TVA-{}-{}", self.period.year, self.period.code),
            entity: self.entity,
            vat_number,
            period: self.period,
            method: self.method,
            collected: CollectedVat {
                normal,
                reduced,
                lodging,
                total: total_collected,
            },
            deductible: DeductibleVat {
                goods,
                services,
                investments,
                corrections: self.corrections,
                total: total_deductible,
            },
            result,
            status: DeclarationStatus::Draft,
            created_at,
            submitted_at: None,
            submitted_by: None,
            archive: None,
        })
    }
}

/// Submit a draft declaration.
///
/// Submission is refused while any coherence control reports an
/// error-level result, and a declaration cannot be submitted twice.
/// On success the status flips to submitted and a payment reference is
/// assigned: the declaration id plus the submission timestamp in
/// base-36.
pub fn submit_declaration(
    declaration: &mut VatDeclaration,
    submitted_by: &str,
    submitted_at: NaiveDateTime,
) -> Result<(), ComplianceError> {
    if declaration.status == DeclarationStatus::Submitted {
        return Err(ComplianceError::Submission(format!(
            "declaration {} was already submitted",
            declaration.id
        )));
    }

    let controls = run_coherence_controls(declaration);
    let failing: Vec<&str> = controls
        .iter()
        .filter(|c| c.status == ControlStatus::Error)
        .map(|c| c.name.as_str())
        .collect();
    if !failing.is_empty() {
        return Err(ComplianceError::Submission(format!(
            "blocked by error-level controls: {}",
            failing.join(", ")
        )));
    }

    let suffix = base36_upper(submitted_at.and_utc().timestamp_millis().unsigned_abs());
    declaration.result.payment_reference = Some(format!("{}-{}", declaration.id, suffix));
    declaration.status = DeclarationStatus::Submitted;
    declaration.submitted_at = Some(submitted_at);
    declaration.submitted_by = Some(submitted_by.to_string());
    Ok(())
}

/// Stamp a declaration with its archive date and the ten-year
/// retention horizon.
pub fn archive_declaration(declaration: &mut VatDeclaration, archived_on: NaiveDate) {
    declaration.archive = Some(ArchiveStamp {
        archived_on,
        retention_until: plus_years(archived_on, RETENTION_YEARS),
    });
}

fn class_index(class: RateClass) -> usize {
    match class {
        RateClass::Normal => 0,
        RateClass::Reduced => 1,
        RateClass::Lodging => 2,
    }
}

fn category_index(category: DeductibleCategory) -> usize {
    match category {
        DeductibleCategory::Goods => 0,
        DeductibleCategory::Services => 1,
        DeductibleCategory::Investments => 2,
    }
}

// 29 February rolls forward to 1 March when the target year is not a
// leap year.
fn plus_years(date: NaiveDate, years: i32) -> NaiveDate {
    date.with_year(date.year() + years).unwrap_or_else(|| {
        NaiveDate::from_ymd_opt(date.year() + years, 3, 1).unwrap_or(date)
    })
}

fn base36_upper(mut value: u64) -> String {
    const DIGITS: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
    if value == 0 {
        return "0".into();
    }
    let mut digits = Vec::new();
    while value > 0 {
        digits.push(DIGITS[(value % 36) as usize] as char);
        value /= 36;
    }
    digits.into_iter().rev().collect()
}
