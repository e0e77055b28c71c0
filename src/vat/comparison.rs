//! Settlement-method comparison: effective VAT against the net-tax-rate
//! (forfait) alternatives.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::round_half_up;

/// Which settlement method a comparison favours.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Recommendation {
    /// Keep the effective method.
    Effective,
    /// Switch to the named net-tax-rate sector.
    FlatRate(String),
}

/// Outcome of [`compare_declaration_methods`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodComparison {
    /// VAT due under the effective method.
    pub effective: Decimal,
    /// VAT due per net-tax-rate sector, `revenue * rate` to the cent.
    pub forfait: BTreeMap<String, Decimal>,
    pub recommendation: Recommendation,
}

/// Sector net-tax-rate fractions published for Swiss SMEs.
pub fn swiss_flat_rates() -> BTreeMap<String, Decimal> {
    BTreeMap::from([
        ("services".to_string(), dec!(0.062)),
        ("retail".to_string(), dec!(0.042)),
        ("hospitality".to_string(), dec!(0.052)),
        ("construction".to_string(), dec!(0.035)),
    ])
}

/// Compare the effective VAT due for a period against each flat-rate
/// sector.
///
/// The effective method wins only when it is strictly cheaper than the
/// best flat-rate figure; with no sectors to compare, it wins by
/// default. Sector ties resolve to the alphabetically first name.
pub fn compare_declaration_methods(
    effective: Decimal,
    period_revenue: Decimal,
    flat_rates: &BTreeMap<String, Decimal>,
) -> MethodComparison {
    let forfait: BTreeMap<String, Decimal> = flat_rates
        .iter()
        .map(|(sector, rate)| (sector.clone(), round_half_up(period_revenue * rate, 2)))
        .collect();

    let best = forfait
        .iter()
        .min_by(|a, b| a.1.cmp(b.1))
        .map(|(sector, amount)| (sector.clone(), *amount));

    let recommendation = match best {
        Some((_, amount)) if effective < amount => Recommendation::Effective,
        Some((sector, _)) => Recommendation::FlatRate(sector),
        None => Recommendation::Effective,
    };

    MethodComparison {
        effective,
        forfait,
        recommendation,
    }
}
