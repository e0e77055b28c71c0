//! Coherence controls run against a declaration before submission.
//!
//! Error-level results block submission and AFC export; warnings are
//! advisory.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::core::format_swiss_amount;

use super::declaration::VatDeclaration;
use super::rates::calculate_vat;

/// Largest accepted gap between the collected total and the sum of
/// its rate buckets.
pub const TOTALS_TOLERANCE: Decimal = dec!(0.01);

/// Accepted deviation when recomputing a bucket's VAT from its rate.
pub const RATE_TOLERANCE: Decimal = dec!(0.05);

/// Annualized revenue above which monthly filing is recommended.
pub const MONTHLY_FILING_THRESHOLD: Decimal = dec!(5_000_000);

/// Outcome level of a single control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlStatus {
    Success,
    Warning,
    Error,
}

impl ControlStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ControlStatus::Success => "success",
            ControlStatus::Warning => "warning",
            ControlStatus::Error => "error",
        }
    }
}

/// Result of one coherence control.
#[derive(Debug, Clone, PartialEq)]
pub struct ControlResult {
    /// Stable control identifier.
    pub name: String,
    /// What the control checks.
    pub description: String,
    pub status: ControlStatus,
    /// Human-readable outcome, with amounts where relevant.
    pub message: String,
}

impl ControlResult {
    fn new(
        name: &str,
        description: &str,
        status: ControlStatus,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            status,
            message: message.into(),
        }
    }
}

impl std::fmt::Display for ControlResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} [{}]: {}", self.name, self.status.label(), self.message)
    }
}

/// Run the full battery of coherence controls, in a fixed order.
pub fn run_coherence_controls(declaration: &VatDeclaration) -> Vec<ControlResult> {
    vec![
        totals_coherence(declaration),
        rate_verification(declaration),
        revenue_threshold(declaration),
        collected_sign(declaration),
        deductible_proportion(declaration),
    ]
}

/// True when any control is at error level.
pub fn has_blocking_errors(results: &[ControlResult]) -> bool {
    results.iter().any(|c| c.status == ControlStatus::Error)
}

fn totals_coherence(declaration: &VatDeclaration) -> ControlResult {
    const NAME: &str = "totals_coherence";
    const DESC: &str = "collected total equals the sum of the rate buckets";
    let collected = &declaration.collected;
    let bucket_sum =
        collected.normal.vat_amount + collected.reduced.vat_amount + collected.lodging.vat_amount;
    let gap = (collected.total - bucket_sum).abs();
    if gap < TOTALS_TOLERANCE {
        ControlResult::new(NAME, DESC, ControlStatus::Success, "totals agree")
    } else {
        ControlResult::new(
            NAME,
            DESC,
            ControlStatus::Error,
            format!(
                "collected total {} does not match the rate-bucket sum {}",
                format_swiss_amount(collected.total),
                format_swiss_amount(bucket_sum)
            ),
        )
    }
}

fn rate_verification(declaration: &VatDeclaration) -> ControlResult {
    const NAME: &str = "rate_verification";
    const DESC: &str = "each bucket's VAT matches its declared rate";
    let collected = &declaration.collected;
    let buckets = [
        ("normal", &collected.normal),
        ("reduced", &collected.reduced),
        ("lodging", &collected.lodging),
    ];
    let mut deviations = Vec::new();
    for (label, bucket) in buckets {
        let expected = calculate_vat(bucket.net_amount, bucket.rate);
        let gap = (bucket.vat_amount - expected).abs();
        if gap > RATE_TOLERANCE {
            deviations.push(format!("{label} ({})", format_swiss_amount(gap)));
        }
    }
    if deviations.is_empty() {
        ControlResult::new(
            NAME,
            DESC,
            ControlStatus::Success,
            "bucket VAT amounts match their rates",
        )
    } else {
        ControlResult::new(
            NAME,
            DESC,
            ControlStatus::Warning,
            format!("recomputed VAT deviates for {}", deviations.join(", ")),
        )
    }
}

fn revenue_threshold(declaration: &VatDeclaration) -> ControlResult {
    const NAME: &str = "revenue_threshold";
    const DESC: &str = "annualized revenue stays under the monthly-filing threshold";
    let multiplier = Decimal::from(declaration.period.period_type.periods_per_year());
    let annualized = declaration.total_revenue() * multiplier;
    if annualized > MONTHLY_FILING_THRESHOLD {
        ControlResult::new(
            NAME,
            DESC,
            ControlStatus::Warning,
            format!(
                "estimated annual revenue {} exceeds {}; monthly filing is recommended",
                format_swiss_amount(annualized),
                format_swiss_amount(MONTHLY_FILING_THRESHOLD)
            ),
        )
    } else {
        ControlResult::new(
            NAME,
            DESC,
            ControlStatus::Success,
            format!("estimated annual revenue {}", format_swiss_amount(annualized)),
        )
    }
}

fn collected_sign(declaration: &VatDeclaration) -> ControlResult {
    const NAME: &str = "collected_sign";
    const DESC: &str = "collected VAT total is not negative";
    let total = declaration.collected.total;
    if total < Decimal::ZERO {
        ControlResult::new(
            NAME,
            DESC,
            ControlStatus::Error,
            format!("collected VAT total is negative ({})", format_swiss_amount(total)),
        )
    } else {
        ControlResult::new(NAME, DESC, ControlStatus::Success, "collected total is non-negative")
    }
}

fn deductible_proportion(declaration: &VatDeclaration) -> ControlResult {
    const NAME: &str = "deductible_proportion";
    const DESC: &str = "deductible stays within half of collected VAT";
    let collected = declaration.collected.total;
    let deductible = declaration.deductible.total;
    if deductible > collected * dec!(0.5) {
        ControlResult::new(
            NAME,
            DESC,
            ControlStatus::Warning,
            format!(
                "deductible {} exceeds half of collected {}",
                format_swiss_amount(deductible),
                format_swiss_amount(collected)
            ),
        )
    } else {
        ControlResult::new(NAME, DESC, ControlStatus::Success, "deductible proportion is plausible")
    }
}
