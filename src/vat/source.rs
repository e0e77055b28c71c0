//! Period records and the collaborator seams to bookkeeping and storage.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::ComplianceError;

use super::declaration::VatDeclaration;
use super::rates::RateClass;

/// Deductible categories on the input-tax side (AFC rubriques 400/405/410).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DeductibleCategory {
    /// Goods purchased for resale or production.
    Goods,
    /// Purchased services.
    Services,
    /// Capital investments.
    Investments,
}

impl DeductibleCategory {
    /// AFC register label, as it appears in bookkeeping exports.
    pub fn label(&self) -> &'static str {
        match self {
            DeductibleCategory::Goods => "Marchandises",
            DeductibleCategory::Services => "Services",
            DeductibleCategory::Investments => "Investissements",
        }
    }

    /// Parse the register label; unknown labels fall back to goods,
    /// matching the bookkeeping default.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Services" => DeductibleCategory::Services,
            "Investissements" => DeductibleCategory::Investments,
            _ => DeductibleCategory::Goods,
        }
    }
}

/// A client invoice line contributing collected VAT.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientInvoice {
    /// Net amount excluding VAT.
    pub net_amount: Decimal,
    /// Rate class the revenue is taxed at.
    pub rate_class: RateClass,
}

impl ClientInvoice {
    /// Revenue at the standard rate, the default for client billing.
    pub fn new(net_amount: Decimal) -> Self {
        Self {
            net_amount,
            rate_class: RateClass::Normal,
        }
    }

    /// Revenue at an explicit rate class.
    pub fn at_rate(net_amount: Decimal, rate_class: RateClass) -> Self {
        Self {
            net_amount,
            rate_class,
        }
    }
}

/// A supplier invoice carrying deductible input tax.
///
/// The VAT amount comes from the supplier's document, not from a rate
/// computation; suppliers may invoice at any rate class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupplierInvoice {
    /// Net amount excluding VAT.
    pub net_amount: Decimal,
    /// VAT actually paid per the document.
    pub vat_amount: Decimal,
    /// Deductible category the purchase books to.
    pub category: DeductibleCategory,
}

/// An employee expense with deductible VAT. Expenses book to the
/// services category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// Net amount excluding VAT.
    pub net_amount: Decimal,
    /// VAT actually paid per the receipt.
    pub vat_amount: Decimal,
}

/// A period's records, pre-filtered to the three VAT-relevant sets.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodRecords {
    pub client_invoices: Vec<ClientInvoice>,
    pub supplier_invoices: Vec<SupplierInvoice>,
    pub expenses: Vec<Expense>,
}

/// Loads a period's records from the bookkeeping system.
///
/// Implementations own the I/O boundary: they may be slow, and they
/// report missing period data as
/// [`ComplianceError::SourceUnavailable`].
pub trait InvoiceSource {
    /// Records with document dates inside the inclusive range.
    fn load_invoices_for_period(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<PeriodRecords, ComplianceError>;
}

/// Persists declarations and serves submission history.
pub trait DeclarationStore {
    /// Save a declaration, returning the storage reference.
    fn save(&mut self, declaration: &VatDeclaration) -> Result<String, ComplianceError>;

    /// All stored declarations for a year, oldest first.
    fn history(&self, year: i32) -> Result<Vec<VatDeclaration>, ComplianceError>;
}
