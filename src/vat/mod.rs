//! Swiss VAT declarations: period bookkeeping, coherence controls,
//! and settlement-method comparison.
//!
//! Builds a declaration from a period's invoice records, runs the
//! pre-submission control battery, and compares the effective method
//! against the published net-tax-rate sectors.
//!
//! # Example
//!
//! ```ignore
//! use qrfacture::vat::*;
//!
//! let period = DeclarationPeriod::quarterly(2024, 1)?;
//! let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", period)
//!     .add_revenue(RateClass::Normal, dec!(125_000))
//!     .build()?;
//!
//! // Pre-submission checks
//! let controls = run_coherence_controls(&declaration);
//! assert!(!has_blocking_errors(&controls));
//! ```

mod comparison;
mod controls;
mod declaration;
mod period;
mod rates;
mod source;

pub use comparison::{
    MethodComparison, Recommendation, compare_declaration_methods, swiss_flat_rates,
};
pub use controls::{
    ControlResult, ControlStatus, MONTHLY_FILING_THRESHOLD, RATE_TOLERANCE, TOTALS_TOLERANCE,
    has_blocking_errors, run_coherence_controls,
};
pub use declaration::{
    ArchiveStamp, CollectedVat, DeclarationBuilder, DeclarationMethod, DeclarationResult,
    DeclarationStatus, DeductibleBucket, DeductibleVat, RETENTION_YEARS, RateBucket,
    VatDeclaration, archive_declaration, submit_declaration,
};
pub use period::{DeclarationPeriod, PeriodType};
pub use rates::{RateClass, RateConfig, calculate_vat};
pub use source::{
    ClientInvoice, DeclarationStore, DeductibleCategory, Expense, InvoiceSource, PeriodRecords,
    SupplierInvoice,
};
