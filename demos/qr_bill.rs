use qrfacture::qrbill::*;
use rust_decimal_macros::dec;

fn main() {
    // A fully specified QRR slip on a QR-IBAN
    let bill = QrBillBuilder::new("CH4431999123000889012")
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
        .expect("slip should be valid");

    println!("=== QR-Bill ===");
    println!("Account:   {}", format_iban(&bill.iban));
    println!(
        "Reference: {}",
        format_qr_reference(bill.reference.as_deref().unwrap())
    );
    println!("Amount:    {} {}", bill.amount.unwrap(), bill.currency);

    // The SPC text that goes into the QR code
    let payload = generate_payload(&bill).expect("payload generation failed");
    println!("\n=== Payload ===");
    println!("{payload}");

    let parsed = parse_payload(&payload).expect("payload parsing failed");
    println!(
        "Roundtrip: {} fields -> creditor {}",
        payload.split('\n').count(),
        parsed.creditor.name
    );

    // A defective slip reports every finding at once
    println!("\n=== Validation Findings ===");
    let defective = QrBillBuilder::new("CH9300762011623852957")
        .creditor(StructuredAddress::new("Muster AG", "", "12345", "Zürich", "CH"))
        .amount(dec!(0))
        .qr_reference("210000000003139471430009017")
        .build_unchecked()
        .expect("assembly only needs a creditor");
    let report = validate_qr_bill(&defective);
    println!("valid: {}", report.valid);
    for e in &report.errors {
        println!("  error:   {e}");
    }
    for w in &report.warnings {
        println!("  warning: {w}");
    }

    // IBAN classification
    println!("\n=== IBAN Classification ===");
    let accounts = [
        "CH93 0076 2011 6238 5295 7",  // regular IBAN
        "CH44 3199 9123 0008 8901 2",  // QR-IID range
        "LI21 0881 0000 2324 013A A",  // Liechtenstein
        "CH93 0076 2011 6238 5295 8",  // checksum broken
        "DE89 3704 0044 0532 0130 00", // not CH/LI
    ];
    for account in &accounts {
        match validate_iban(account) {
            Ok(iban) => {
                let kind = if is_qr_iban(&iban) { "QR-IBAN" } else { "IBAN" };
                println!("  {iban} => {kind}");
            }
            Err(e) => println!("  {account} => INVALID: {e}"),
        }
    }

    // References for new invoices, from a customer or invoice number
    println!("\n=== Reference Generation ===");
    for base in ["313947143000901", "42"] {
        let reference = generate_qr_reference(base).expect("base fits in 26 digits");
        println!("  {base:>15} => {}", format_qr_reference(&reference));
    }
}
