//! AFC (Federal Tax Administration) e-filing export.
//!
//! Serializes a declaration into the AFC VAT declaration XML schema.
//! Exports are refused while any coherence control reports an
//! error-level result.

mod export;
mod xml;

pub use export::{AFC_NAMESPACE, AfcDocument, generate_afc_export, parse_afc_export};
