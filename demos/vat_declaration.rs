use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use qrfacture::core::format_swiss_amount;
use qrfacture::vat::*;
use rust_decimal_macros::dec;

fn main() {
    let period = DeclarationPeriod::quarterly(2024, 1).expect("Q1 is a valid quarter");
    println!("=== Period ===");
    println!(
        "{}: {} to {}, due {}",
        period.code, period.start, period.end, period.due_date
    );

    // Effective-method declaration for the quarter
    let mut declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", period)
        .add_revenue(RateClass::Normal, dec!(125_000))
        .add_revenue(RateClass::Reduced, dec!(5_000))
        .add_deductible(DeductibleCategory::Goods, dec!(30_000), dec!(2_430))
        .add_deductible(DeductibleCategory::Services, dec!(40_000), dec!(3_240))
        .build()
        .expect("declaration should build");

    println!("\n=== Declaration {} ===", declaration.id);
    println!("Revenue:    {}", format_swiss_amount(declaration.total_revenue()));
    println!("Collected:  {}", format_swiss_amount(declaration.collected.total));
    println!("Deductible: {}", format_swiss_amount(declaration.deductible.total));
    println!("To pay:     {}", format_swiss_amount(declaration.result.vat_to_pay));

    println!("\n=== Coherence Controls ===");
    let results = run_coherence_controls(&declaration);
    for result in &results {
        println!("  {result}");
    }

    // Submission stamps the declaration with a payment reference
    let submitted_at = NaiveDateTime::new(
        NaiveDate::from_ymd_opt(2024, 4, 15).unwrap(),
        NaiveTime::from_hms_opt(10, 30, 0).unwrap(),
    );
    submit_declaration(&mut declaration, "comptabilite@hypervisual.ch", submitted_at)
        .expect("coherent declarations submit");
    println!("\n=== Submission ===");
    println!("Status:    {:?}", declaration.status);
    println!(
        "Reference: {}",
        declaration.result.payment_reference.as_deref().unwrap()
    );

    // Would a flat-rate sector have been cheaper this quarter?
    println!("\n=== Method Comparison ===");
    let comparison = compare_declaration_methods(
        declaration.result.vat_to_pay,
        declaration.total_revenue(),
        &swiss_flat_rates(),
    );
    println!("  effective     {}", format_swiss_amount(comparison.effective));
    for (sector, amount) in &comparison.forfait {
        println!("  {sector:<13} {}", format_swiss_amount(*amount));
    }
    match &comparison.recommendation {
        Recommendation::Effective => println!("  => stay on the effective method"),
        Recommendation::FlatRate(sector) => println!("  => flat rate '{sector}' is cheaper"),
    }

    // Ten-year retention stamp
    archive_declaration(
        &mut declaration,
        NaiveDate::from_ymd_opt(2024, 4, 30).unwrap(),
    );
    let archive = declaration.archive.as_ref().unwrap();
    println!("\n=== Archive ===");
    println!("Archived {}, retained until {}", archive.archived_on, archive.retention_until);
}
