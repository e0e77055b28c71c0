//! VAT rate classes and the injectable per-year rate table.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::core::round_half_up;

/// Rate classes on the collected side of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RateClass {
    /// Standard rate for most goods and services.
    Normal,
    /// Reduced rate for essentials (food, books, medication).
    Reduced,
    /// Special rate for lodging services.
    Lodging,
}

impl RateClass {
    /// Stable lowercase code used in exports and period data.
    pub fn code(&self) -> &'static str {
        match self {
            RateClass::Normal => "normal",
            RateClass::Reduced => "reduced",
            RateClass::Lodging => "lodging",
        }
    }

    /// Parse the code back into a rate class.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "normal" => Some(RateClass::Normal),
            "reduced" => Some(RateClass::Reduced),
            "lodging" => Some(RateClass::Lodging),
            _ => None,
        }
    }
}

/// VAT rates as fractions of the net amount.
///
/// Rates are configuration, not business logic: construct the table
/// for the tax year in force and pass it where declarations are
/// calculated. [`RateConfig::swiss_2024`] carries the rates effective
/// since 1 January 2024.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RateConfig {
    /// Standard rate (0.081 = 8.1%).
    pub normal: Decimal,
    /// Reduced rate (0.026 = 2.6%).
    pub reduced: Decimal,
    /// Lodging rate (0.038 = 3.8%).
    pub lodging: Decimal,
}

impl RateConfig {
    /// Swiss rates in force since 1 January 2024.
    pub fn swiss_2024() -> Self {
        Self {
            normal: dec!(0.081),
            reduced: dec!(0.026),
            lodging: dec!(0.038),
        }
    }

    /// The fraction for a rate class.
    pub fn rate(&self, class: RateClass) -> Decimal {
        match class {
            RateClass::Normal => self.normal,
            RateClass::Reduced => self.reduced,
            RateClass::Lodging => self.lodging,
        }
    }
}

impl Default for RateConfig {
    fn default() -> Self {
        Self::swiss_2024()
    }
}

/// VAT for a net amount at a rate fraction, rounded half-up to the
/// cent per the tax authority's convention.
pub fn calculate_vat(net: Decimal, rate: Decimal) -> Decimal {
    round_half_up(net * rate, 2)
}
