#![cfg(feature = "vat")]

use chrono::NaiveDate;
use qrfacture::core::ComplianceError;
use qrfacture::vat::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn q1_2024() -> DeclarationPeriod {
    DeclarationPeriod::quarterly(2024, 1).unwrap()
}

// ---------------------------------------------------------------------------
// Declaration Periods
// ---------------------------------------------------------------------------

#[test]
fn quarterly_period_bounds() {
    let q2 = DeclarationPeriod::quarterly(2024, 2).unwrap();
    assert_eq!(q2.code, "Q2");
    assert_eq!(q2.start, date(2024, 4, 1));
    assert_eq!(q2.end, date(2024, 6, 30));
    assert_eq!(q2.due_date, date(2024, 7, 30));
}

#[test]
fn fourth_quarter_due_in_january() {
    let q4 = DeclarationPeriod::quarterly(2024, 4).unwrap();
    assert_eq!(q4.end, date(2024, 12, 31));
    assert_eq!(q4.due_date, date(2025, 1, 30));
}

#[test]
fn monthly_period_bounds() {
    let m6 = DeclarationPeriod::monthly(2024, 6).unwrap();
    assert_eq!(m6.code, "M6");
    assert_eq!(m6.start, date(2024, 6, 1));
    assert_eq!(m6.end, date(2024, 6, 30));
    assert_eq!(m6.due_date, date(2024, 7, 30));
}

#[test]
fn january_due_date_clamps_to_february() {
    let m1 = DeclarationPeriod::monthly(2024, 1).unwrap();
    assert_eq!(m1.due_date, date(2024, 2, 29));
    let m1 = DeclarationPeriod::monthly(2025, 1).unwrap();
    assert_eq!(m1.due_date, date(2025, 2, 28));
}

#[test]
fn december_due_in_january_next_year() {
    let m12 = DeclarationPeriod::monthly(2024, 12).unwrap();
    assert_eq!(m12.due_date, date(2025, 1, 30));
}

#[test]
fn out_of_range_periods_rejected() {
    assert!(DeclarationPeriod::quarterly(2024, 0).is_err());
    assert!(DeclarationPeriod::quarterly(2024, 5).is_err());
    assert!(DeclarationPeriod::monthly(2024, 13).is_err());
}

#[test]
fn period_codes_parse_back() {
    let q3 = DeclarationPeriod::parse(2024, "Q3").unwrap();
    assert_eq!(q3, DeclarationPeriod::quarterly(2024, 3).unwrap());
    let m11 = DeclarationPeriod::parse(2024, "M11").unwrap();
    assert_eq!(m11, DeclarationPeriod::monthly(2024, 11).unwrap());
    assert!(DeclarationPeriod::parse(2024, "T1").is_err());
}

// ---------------------------------------------------------------------------
// Rates
// ---------------------------------------------------------------------------

#[test]
fn swiss_2024_rates() {
    let rates = RateConfig::swiss_2024();
    assert_eq!(rates.rate(RateClass::Normal), dec!(0.081));
    assert_eq!(rates.rate(RateClass::Reduced), dec!(0.026));
    assert_eq!(rates.rate(RateClass::Lodging), dec!(0.038));
}

#[test]
fn vat_rounds_half_up_to_the_cent() {
    assert_eq!(calculate_vat(dec!(10_000), dec!(0.081)), dec!(810.00));
    assert_eq!(calculate_vat(dec!(123.45), dec!(0.081)), dec!(10.00));
    assert_eq!(calculate_vat(dec!(0), dec!(0.081)), dec!(0.00));
}

// ---------------------------------------------------------------------------
// Declaration Building
// ---------------------------------------------------------------------------

#[test]
fn mixed_rate_declaration() {
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(125_000))
        .add_revenue(RateClass::Reduced, dec!(5_000))
        .add_deductible(DeductibleCategory::Goods, dec!(30_000), dec!(2_430))
        .add_deductible(DeductibleCategory::Services, dec!(40_000), dec!(3_240))
        .build()
        .unwrap();

    assert_eq!(declaration.collected.normal.vat_amount, dec!(10_125.00));
    assert_eq!(declaration.collected.reduced.vat_amount, dec!(130.00));
    assert_eq!(declaration.collected.total, dec!(10_255.00));
    assert_eq!(declaration.deductible.total, dec!(5_670));
    assert_eq!(declaration.result.vat_to_pay, dec!(4_585.00));
    assert_eq!(declaration.result.vat_to_recover, dec!(0));
    assert_eq!(declaration.status, DeclarationStatus::Draft);
}

#[test]
fn revenue_accumulates_across_calls() {
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(60_000))
        .add_revenue(RateClass::Normal, dec!(40_000))
        .build()
        .unwrap();
    assert_eq!(declaration.collected.normal.net_amount, dec!(100_000));
    assert_eq!(declaration.collected.normal.vat_amount, dec!(8_100.00));
}

#[test]
fn vat_computed_on_bucket_totals_not_per_invoice() {
    // Three invoices of 5.00: per-invoice rounding would give
    // 0.41 * 3 = 1.23, the bucket rounds once: round(15.00 * 0.081) = 1.22.
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(5))
        .add_revenue(RateClass::Normal, dec!(5))
        .add_revenue(RateClass::Normal, dec!(5))
        .build()
        .unwrap();
    assert_eq!(declaration.collected.normal.net_amount, dec!(15));
    assert_eq!(declaration.collected.normal.vat_amount, dec!(1.22));
}

#[test]
fn corrections_count_toward_the_deductible_total() {
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(50_000))
        .add_deductible(DeductibleCategory::Goods, dec!(10_000), dec!(810))
        .corrections(dec!(-110.50))
        .build()
        .unwrap();
    assert_eq!(declaration.deductible.corrections, dec!(-110.50));
    assert_eq!(declaration.deductible.total, dec!(699.50));
    assert_eq!(declaration.result.vat_to_pay, dec!(3_350.50));
}

#[test]
fn lodging_rate_applies() {
    let declaration = DeclarationBuilder::new("Hotel Bellevue SA", "CHE-987.654.321", q1_2024())
        .add_revenue(RateClass::Lodging, dec!(80_000))
        .build()
        .unwrap();
    assert_eq!(declaration.collected.lodging.vat_amount, dec!(3_040.00));
}

#[test]
fn rates_are_swappable_per_year() {
    let rates_2017 = RateConfig {
        normal: dec!(0.077),
        reduced: dec!(0.025),
        lodging: dec!(0.037),
    };
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .rates(rates_2017)
        .add_revenue(RateClass::Normal, dec!(10_000))
        .build()
        .unwrap();
    assert_eq!(declaration.collected.normal.rate, dec!(0.077));
    assert_eq!(declaration.collected.normal.vat_amount, dec!(770.00));
}

#[test]
fn vat_number_is_normalized_on_build() {
    let declaration = DeclarationBuilder::new("Hypervisual SA", "che 123456789 tva", q1_2024())
        .build()
        .unwrap();
    assert_eq!(declaration.vat_number, "CHE-123.456.789");
}

#[test]
fn malformed_vat_number_rejected() {
    let err = DeclarationBuilder::new("Muster AG", "CHE-12.34", q1_2024())
        .build()
        .unwrap_err();
    assert!(matches!(err, ComplianceError::Validation(_)));
}

// ---------------------------------------------------------------------------
// Invoice Sources
// ---------------------------------------------------------------------------

struct FixtureSource;

impl InvoiceSource for FixtureSource {
    fn load_invoices_for_period(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<PeriodRecords, ComplianceError> {
        Ok(PeriodRecords {
            client_invoices: vec![
                ClientInvoice::new(dec!(125_000)),
                ClientInvoice::at_rate(dec!(5_000), RateClass::Reduced),
            ],
            supplier_invoices: vec![
                SupplierInvoice {
                    net_amount: dec!(30_000),
                    vat_amount: dec!(2_430),
                    category: DeductibleCategory::Goods,
                },
                SupplierInvoice {
                    net_amount: dec!(15_000),
                    vat_amount: dec!(1_215),
                    category: DeductibleCategory::Services,
                },
            ],
            expenses: vec![Expense {
                net_amount: dec!(25_000),
                vat_amount: dec!(2_025),
            }],
        })
    }
}

struct BrokenSource;

impl InvoiceSource for BrokenSource {
    fn load_invoices_for_period(
        &self,
        _start: NaiveDate,
        _end: NaiveDate,
    ) -> Result<PeriodRecords, ComplianceError> {
        Err(ComplianceError::SourceUnavailable(
            "accounting database is offline".into(),
        ))
    }
}

#[test]
fn declaration_from_an_invoice_source() {
    let period = q1_2024();
    let records = FixtureSource
        .load_invoices_for_period(period.start, period.end)
        .unwrap();
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", period)
        .records(&records)
        .build()
        .unwrap();

    assert_eq!(declaration.total_revenue(), dec!(130_000));
    assert_eq!(declaration.collected.total, dec!(10_255.00));
    assert_eq!(declaration.deductible.services.vat_amount, dec!(3_240));
    assert_eq!(declaration.result.vat_to_pay, dec!(4_585.00));
}

#[test]
fn unavailable_source_surfaces_as_error() {
    let period = q1_2024();
    let err = BrokenSource
        .load_invoices_for_period(period.start, period.end)
        .unwrap_err();
    assert!(matches!(err, ComplianceError::SourceUnavailable(_)));
    assert!(err.to_string().contains("offline"));
}

// ---------------------------------------------------------------------------
// Coherence Controls
// ---------------------------------------------------------------------------

#[test]
fn control_battery_runs_in_order() {
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(100_000))
        .build()
        .unwrap();
    let results = run_coherence_controls(&declaration);
    let names: Vec<&str> = results.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(
        names,
        [
            "totals_coherence",
            "rate_verification",
            "revenue_threshold",
            "collected_sign",
            "deductible_proportion",
        ]
    );
    assert!(!has_blocking_errors(&results));
}

#[test]
fn annualization_respects_the_filing_cadence() {
    let quarterly = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(1_300_000))
        .build()
        .unwrap();
    let results = run_coherence_controls(&quarterly);
    assert_eq!(results[2].status, ControlStatus::Warning);

    let monthly = DeclarationBuilder::new(
        "Hypervisual SA",
        "CHE-123.456.789",
        DeclarationPeriod::monthly(2024, 1).unwrap(),
    )
    .add_revenue(RateClass::Normal, dec!(400_000))
    .build()
    .unwrap();
    let results = run_coherence_controls(&monthly);
    // 400'000 x 12 = 4'800'000 stays under the threshold.
    assert_eq!(results[2].status, ControlStatus::Success);
}

#[test]
fn warnings_do_not_block_submission() {
    let mut declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(1_300_000))
        .build()
        .unwrap();
    let submitted_at = date(2024, 4, 15).and_hms_opt(10, 30, 0).unwrap();
    assert!(submit_declaration(&mut declaration, "Paul Martin", submitted_at).is_ok());
}

// ---------------------------------------------------------------------------
// Submission Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn submission_stamps_reference_author_and_time() {
    let mut declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(10_000))
        .build()
        .unwrap();
    let submitted_at = date(2024, 4, 15).and_hms_opt(10, 30, 0).unwrap();

    submit_declaration(&mut declaration, "Paul Martin", submitted_at).unwrap();

    assert_eq!(declaration.status, DeclarationStatus::Submitted);
    assert_eq!(declaration.submitted_by.as_deref(), Some("Paul Martin"));
    assert_eq!(declaration.submitted_at, Some(submitted_at));
    // 2024-04-15T10:30:00Z is 1713177000000 ms, LV0TCPC0 in base 36.
    assert_eq!(
        declaration.result.payment_reference.as_deref(),
        Some("TVA-2024-Q1-LV0TCPC0")
    );
}

#[test]
fn resubmission_is_refused() {
    let mut declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(10_000))
        .build()
        .unwrap();
    let submitted_at = date(2024, 4, 15).and_hms_opt(10, 30, 0).unwrap();
    submit_declaration(&mut declaration, "Paul Martin", submitted_at).unwrap();

    let err = submit_declaration(&mut declaration, "Paul Martin", submitted_at).unwrap_err();
    assert!(matches!(err, ComplianceError::Submission(_)));
    assert!(err.to_string().contains("already submitted"));
}

#[test]
fn negative_collected_blocks_submission() {
    let mut declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(-20_000))
        .build()
        .unwrap();
    let submitted_at = date(2024, 4, 15).and_hms_opt(10, 30, 0).unwrap();
    let err = submit_declaration(&mut declaration, "Paul Martin", submitted_at).unwrap_err();
    assert!(err.to_string().contains("collected_sign"));
    assert_eq!(declaration.status, DeclarationStatus::Draft);
    assert!(declaration.result.payment_reference.is_none());
}

// ---------------------------------------------------------------------------
// Declaration Store
// ---------------------------------------------------------------------------

#[derive(Default)]
struct MemoryStore {
    saved: Vec<VatDeclaration>,
}

impl DeclarationStore for MemoryStore {
    fn save(&mut self, declaration: &VatDeclaration) -> Result<String, ComplianceError> {
        self.saved.push(declaration.clone());
        Ok(declaration.id.clone())
    }

    fn history(&self, year: i32) -> Result<Vec<VatDeclaration>, ComplianceError> {
        Ok(self
            .saved
            .iter()
            .filter(|d| d.period.year == year)
            .cloned()
            .collect())
    }
}

#[test]
fn store_keeps_yearly_history() {
    let mut store = MemoryStore::default();
    for quarter in 1..=4 {
        let declaration = DeclarationBuilder::new(
            "Hypervisual SA",
            "CHE-123.456.789",
            DeclarationPeriod::quarterly(2024, quarter).unwrap(),
        )
        .add_revenue(RateClass::Normal, Decimal::from(quarter) * dec!(10_000))
        .build()
        .unwrap();
        let reference = store.save(&declaration).unwrap();
        assert_eq!(reference, declaration.id);
    }
    let other_year = DeclarationBuilder::new(
        "Hypervisual SA",
        "CHE-123.456.789",
        DeclarationPeriod::quarterly(2023, 4).unwrap(),
    )
    .build()
    .unwrap();
    store.save(&other_year).unwrap();

    let history = store.history(2024).unwrap();
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].id, "TVA-2024-Q1");
    assert_eq!(history[3].id, "TVA-2024-Q4");
}

// ---------------------------------------------------------------------------
// Method Comparison
// ---------------------------------------------------------------------------

#[test]
fn comparison_uses_period_revenue() {
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(100_000))
        .build()
        .unwrap();
    let comparison = compare_declaration_methods(
        declaration.result.vat_to_pay,
        declaration.total_revenue(),
        &swiss_flat_rates(),
    );
    assert_eq!(comparison.effective, dec!(8_100.00));
    assert_eq!(comparison.forfait["construction"], dec!(3_500.00));
    assert_eq!(
        comparison.recommendation,
        Recommendation::FlatRate("construction".to_string())
    );
}

#[test]
fn heavy_input_tax_favours_the_effective_method() {
    let declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(100_000))
        .add_deductible(DeductibleCategory::Investments, dec!(80_000), dec!(6_480))
        .build()
        .unwrap();
    let comparison = compare_declaration_methods(
        declaration.result.vat_to_pay,
        declaration.total_revenue(),
        &swiss_flat_rates(),
    );
    // 8'100 collected less 6'480 deductible leaves 1'620.
    assert_eq!(comparison.effective, dec!(1_620.00));
    assert_eq!(comparison.recommendation, Recommendation::Effective);
}

// ---------------------------------------------------------------------------
// Archiving
// ---------------------------------------------------------------------------

#[test]
fn archive_adds_a_ten_year_retention_stamp() {
    let mut declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .build()
        .unwrap();
    archive_declaration(&mut declaration, date(2025, 1, 31));
    let stamp = declaration.archive.unwrap();
    assert_eq!(stamp.archived_on, date(2025, 1, 31));
    assert_eq!(stamp.retention_until, date(2035, 1, 31));
}

#[test]
fn submitted_declarations_serialize_round_trip() {
    let mut declaration = DeclarationBuilder::new("Hypervisual SA", "CHE-123.456.789", q1_2024())
        .add_revenue(RateClass::Normal, dec!(10_000))
        .build()
        .unwrap();
    let submitted_at = date(2024, 4, 15).and_hms_opt(10, 30, 0).unwrap();
    submit_declaration(&mut declaration, "Paul Martin", submitted_at).unwrap();
    archive_declaration(&mut declaration, date(2024, 5, 1));

    let json = serde_json::to_string(&declaration).unwrap();
    let back: VatDeclaration = serde_json::from_str(&json).unwrap();
    assert_eq!(back, declaration);
}
