//! Check-number extraction example

use reconciliation_core::{extract_check_numbers, ExtractionConfig, Extractor};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    println!("🔎 Reconciliation Core - Check Extraction Example\n");

    let descriptions = [
        "Pago proveedores (100234)",
        "Pago combinado (100234, 100235)",
        "Pago combinado (100234/100235)",
        "Pago (00100234) (100234)",
        "Pago (100234) (ver nota)",
        "Pago cheque 100234",
        "Pago (ver nota)",
    ];

    // 1. Default convention: parenthetical groups, `,` and `/` lists
    println!("📄 Default convention:");
    for description in &descriptions {
        let checks: Vec<String> = extract_check_numbers(description)
            .iter()
            .map(|check| format!("{} -> {}", check.raw(), check.key()))
            .collect();
        println!("  {:<36} {:?}", description, checks);
    }
    println!();

    // 2. Full extraction with status and rejected groups
    let extractor = Extractor::new(&ExtractionConfig::default())?;
    println!("🧾 Extraction status:");
    for description in &descriptions {
        let extraction = extractor.extract(description);
        println!(
            "  {:<36} {:?} rejected={:?}",
            description, extraction.status, extraction.rejected_groups
        );
    }
    println!();

    // 3. A ledger that writes checks in brackets and never lists them
    let config = ExtractionConfig {
        open_delimiter: '[',
        close_delimiter: ']',
        split_lists: false,
        ..ExtractionConfig::default()
    };
    let brackets = Extractor::new(&config)?;
    println!("🔧 Bracket convention:");
    for description in ["Pago [100234]", "Pago [100234, 100235]", "Pago (100234)"] {
        let extraction = brackets.extract(description);
        println!(
            "  {:<36} {:?} {:?}",
            description,
            extraction.tokens.iter().map(|c| c.key()).collect::<Vec<_>>(),
            extraction.status
        );
    }

    println!("\n✅ Extraction complete!");

    Ok(())
}
