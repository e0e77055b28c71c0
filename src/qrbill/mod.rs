//! Swiss QR-bill validation and payload handling.
//!
//! Covers the payment-slip checks from the Swiss Payment Standards:
//! IBAN and QR-IBAN rules, the 27-digit QR reference with its
//! recursive Modulo-10 check digit, structured addresses, amount and
//! currency bounds, and the SPC payload text encoded into the QR code.
//!
//! Validation collects findings instead of stopping at the first
//! failure; a slip must surface everything wrong at once.

mod address;
mod bill;
mod iban;
mod payload;
mod reference;

pub use address::*;
pub use bill::*;
pub use iban::*;
pub use payload::*;
pub use reference::*;
