use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use qrfacture::afc;
use qrfacture::qrbill::*;
use qrfacture::vat::*;

fn full_bill() -> QrBill {
    QrBillBuilder::new("CH4431999123000889012")
        .creditor(
            StructuredAddress::new("Hypervisual SA", "Rue du Rhône", "1204", "Genève", "CH")
                .house_number("49"),
        )
        .debtor(
            StructuredAddress::new("Marie Dupont", "Avenue de la Gare", "1003", "Lausanne", "CH")
                .house_number("10"),
        )
        .amount(dec!(1999.95))
        .qr_reference("210000000003139471430009017")
        .message("Facture 2024-001")
        .build()
        .unwrap()
}

fn quarterly_declaration() -> VatDeclaration {
    DeclarationBuilder::new(
        "Benchmark SA",
        "CHE-123.456.789",
        DeclarationPeriod::quarterly(2024, 1).unwrap(),
    )
    .add_revenue(RateClass::Normal, dec!(125_000))
    .add_revenue(RateClass::Reduced, dec!(5_000))
    .add_deductible(DeductibleCategory::Goods, dec!(30_000), dec!(2_430))
    .add_deductible(DeductibleCategory::Services, dec!(40_000), dec!(3_240))
    .build()
    .unwrap()
}

fn records_1000() -> PeriodRecords {
    let mut records = PeriodRecords::default();
    for i in 1..=800u32 {
        let class = if i % 4 == 0 {
            RateClass::Reduced
        } else {
            RateClass::Normal
        };
        let net = dec!(450) + dec!(0.05) * Decimal::from(i);
        records.client_invoices.push(ClientInvoice::at_rate(net, class));
    }
    for i in 1..=150u32 {
        records.supplier_invoices.push(SupplierInvoice {
            net_amount: dec!(200) + Decimal::from(i),
            vat_amount: dec!(16.20),
            category: if i % 3 == 0 {
                DeductibleCategory::Investments
            } else {
                DeductibleCategory::Goods
            },
        });
    }
    for _ in 1..=50u32 {
        records.expenses.push(Expense {
            net_amount: dec!(85),
            vat_amount: dec!(6.89),
        });
    }
    records
}

// ── QR-bill benchmarks ─────────────────────────────────────────────

fn bench_validate_iban(c: &mut Criterion) {
    c.bench_function("validate_iban", |b| {
        b.iter(|| black_box(validate_iban(black_box("CH44 3199 9123 0008 8901 2"))));
    });
}

fn bench_qr_reference(c: &mut Criterion) {
    c.bench_function("validate_qr_reference", |b| {
        b.iter(|| {
            black_box(validate_qr_reference(black_box(
                "210000000003139471430009017",
            )))
        });
    });
    c.bench_function("generate_qr_reference", |b| {
        b.iter(|| black_box(generate_qr_reference(black_box("313947143000901"))));
    });
}

fn bench_validate_bill(c: &mut Criterion) {
    let bill = full_bill();
    c.bench_function("validate_qr_bill", |b| {
        b.iter(|| black_box(validate_qr_bill(black_box(&bill))));
    });
}

fn bench_payload_roundtrip(c: &mut Criterion) {
    let bill = full_bill();
    c.bench_function("payload_generate", |b| {
        b.iter(|| black_box(generate_payload(black_box(&bill))));
    });

    let payload = generate_payload(&bill).unwrap();
    c.bench_function("payload_parse", |b| {
        b.iter(|| black_box(parse_payload(black_box(&payload))));
    });
}

// ── VAT benchmarks ─────────────────────────────────────────────────

fn bench_build_declaration(c: &mut Criterion) {
    c.bench_function("build_declaration", |b| {
        b.iter(|| black_box(quarterly_declaration()));
    });
}

fn bench_declaration_1000_records(c: &mut Criterion) {
    let records = records_1000();
    c.bench_function("declaration_1000_records", |b| {
        b.iter(|| {
            black_box(
                DeclarationBuilder::new(
                    "Benchmark SA",
                    "CHE-123.456.789",
                    DeclarationPeriod::quarterly(2024, 1).unwrap(),
                )
                .records(black_box(&records))
                .build(),
            )
        });
    });
}

fn bench_coherence_controls(c: &mut Criterion) {
    let declaration = quarterly_declaration();
    c.bench_function("run_coherence_controls", |b| {
        b.iter(|| black_box(run_coherence_controls(black_box(&declaration))));
    });
}

fn bench_afc_export(c: &mut Criterion) {
    let declaration = quarterly_declaration();
    c.bench_function("afc_export", |b| {
        b.iter(|| black_box(afc::generate_afc_export(black_box(&declaration))));
    });
}

criterion_group!(
    benches,
    bench_validate_iban,
    bench_qr_reference,
    bench_validate_bill,
    bench_payload_roundtrip,
    bench_build_declaration,
    bench_declaration_1000_records,
    bench_coherence_controls,
    bench_afc_export,
);
criterion_main!(benches);
