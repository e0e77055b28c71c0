use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use qrfacture::afc::{AFC_NAMESPACE, generate_afc_export};
use qrfacture::vat::*;
use rust_decimal_macros::dec;

fn main() {
    let mut declaration = DeclarationBuilder::new(
        "Hypervisual SA",
        "CHE-123.456.789",
        DeclarationPeriod::quarterly(2024, 1).expect("Q1 is a valid quarter"),
    )
    .add_revenue(RateClass::Normal, dec!(125_000))
    .add_revenue(RateClass::Reduced, dec!(5_000))
    .add_deductible(DeductibleCategory::Goods, dec!(30_000), dec!(2_430))
    .add_deductible(DeductibleCategory::Services, dec!(40_000), dec!(3_240))
    .build()
    .expect("declaration should build");

    let submitted_at = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
        NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
    );
    submit_declaration(&mut declaration, "comptabilite@hypervisual.ch", submitted_at)
        .expect("coherent declarations submit");

    // The e-filing document sent to the tax administration
    println!("=== AFC Export ===");
    println!("namespace: {AFC_NAMESPACE}\n");
    let xml = generate_afc_export(&declaration).expect("export should succeed");
    println!("{xml}");

    // Exports are refused while a coherence control reports an error
    let mut broken = declaration.clone();
    broken.collected.total += dec!(500);
    println!("\n=== Incoherent Figures ===");
    match generate_afc_export(&broken) {
        Ok(_) => println!("exported (unexpected)"),
        Err(e) => println!("refused: {e}"),
    }
}
