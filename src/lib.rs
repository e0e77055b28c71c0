//! # qrfacture
//!
//! Swiss financial compliance library covering the payment and tax
//! reporting lifecycle: QR-bill validation, QR-reference handling,
//! VAT declarations, and AFC e-filing export.
//!
//! All monetary values use [`rust_decimal::Decimal`] — never floating point.
//! The QR-bill rules follow the [Swiss Payment Standards](https://www.six-group.com/en/products-services/banking-services/payment-standardization/standards/qr-bill.html)
//! implementation guidelines; VAT rates are injectable per tax year.
//!
//! ## Quick Start
//!
//! ```rust
//! use qrfacture::core::*;
//! use rust_decimal_macros::dec;
//!
//! // Cash amounts round to the nearest five centimes.
//! let cash = round_to_five_centimes(dec!(1999.98));
//! assert_eq!(format_swiss_amount(cash), "2'000.00");
//!
//! // Enterprise identification numbers normalize to the dotted form.
//! let uid = validate_che_number("CHE-123.456.789 TVA").unwrap();
//! assert_eq!(uid, "CHE-123.456.789");
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Error taxonomy, Swiss formatting, CHE/UID numbers |
//! | `qrbill` | QR-bill validation, QRR references, payment-slip payload |
//! | `vat` | VAT declarations, coherence controls, flat-rate comparison |
//! | `afc` | AFC declaration XML export |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "qrbill")]
pub mod qrbill;

#[cfg(feature = "vat")]
pub mod vat;

#[cfg(feature = "afc")]
pub mod afc;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
