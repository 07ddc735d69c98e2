//! Basic reconciliation example

use reconciliation_core::utils::MemorySource;
use reconciliation_core::{
    LedgerRowResult, RawBankRow, RawLedgerRow, ReconciliationConfig, ReconciliationReport,
    ReconciliationResult, ReconciliationRun, ReportRenderer,
};
use std::fmt::Write;
use tracing_subscriber::EnvFilter;

/// Renders a report as plain text, one line per ledger row
struct TextRenderer;

impl ReportRenderer for TextRenderer {
    type Output = String;

    fn render(&self, report: &ReconciliationReport) -> ReconciliationResult<String> {
        let mut out = String::new();

        for row in &report.rows {
            match row {
                LedgerRowResult::Evaluated(outcome) => {
                    let _ = writeln!(
                        out,
                        "  {:>3}  {:<40} {:>12} {:>12} {:>10}  {}",
                        outcome.row(),
                        outcome.ledger.description,
                        outcome.declared_amount(),
                        outcome.aggregated_amount,
                        outcome.delta,
                        outcome.state
                    );
                    for warning in &outcome.warnings {
                        let _ = writeln!(out, "       ⚠ {}", warning);
                    }
                }
                LedgerRowResult::Rejected(rejected) => {
                    let _ = writeln!(out, "  {:>3}  ✗ {}", rejected.row, rejected);
                }
            }
        }

        Ok(out)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("🏦 Reconciliation Core - Basic Reconciliation Example\n");

    // 1. Ledger ("Libro") and bank statement ("Extracto") as exported
    let source = MemorySource::default()
        .with_ledger_row(RawLedgerRow::outflow("Pago proveedores (100234)", "500,00"))
        .with_ledger_row(RawLedgerRow::outflow(
            "Pago combinado (100235, 100236)",
            "1.050.000,00",
        ))
        .with_ledger_row(RawLedgerRow::outflow("Cheque (999999)", "100,00"))
        .with_ledger_row(RawLedgerRow::outflow("Combo (100237, 999998)", "900,00"))
        .with_ledger_row(RawLedgerRow::outflow("Honorarios (100238)", "1.200,00"))
        .with_ledger_row(RawLedgerRow::new("Depósito efectivo", "3.000,00"))
        .with_ledger_row(RawLedgerRow::outflow("Pago (100239)", "12,3,4"))
        .with_bank_row(RawBankRow::debit("100234", "500,00").with_balance("99.500,00"))
        .with_bank_row(RawBankRow::debit("100235", "550.000,00"))
        .with_bank_row(RawBankRow::debit("100236", "500.000,00"))
        .with_bank_row(RawBankRow::debit("00100237", "400,00"))
        .with_bank_row(RawBankRow::debit("100238", "1.150,00"))
        .with_bank_row(
            RawBankRow::debit("", "35,00").with_description("Comisión mantenimiento de cuenta"),
        )
        .with_bank_row(RawBankRow::debit("100240", "250,00").with_balance("-951.835,00"));

    // 2. Run with the default configuration (tolerance 0.01, `1.050.000,00` amounts)
    let run = ReconciliationRun::new(ReconciliationConfig::default())?;
    let report = run.execute_from_source(&source).await?;

    println!("📋 Ledger rows:");
    print!("{}", TextRenderer.render(&report)?);
    println!();

    // 3. Unmatched items
    println!("🔍 Differences:");
    for difference in &report.differences {
        let kind = if difference.category.is_temporary() {
            "temporary"
        } else {
            "permanent"
        };
        print!(
            "  {} row {}: {} {} ({}, {})",
            difference.side,
            difference.row,
            difference.description,
            difference.amount,
            kind,
            difference.category.subcategory
        );
        match &difference.pending_check {
            Some(check) => println!(" - pending check {}", check),
            None => println!(),
        }
    }
    println!();

    // 4. Totals
    let summary = &report.summary;
    println!("📊 Summary:");
    println!("  Reconciled:        {}", summary.counts.reconciled);
    println!("  Amount mismatch:   {}", summary.counts.amount_mismatch);
    println!("  Partially matched: {}", summary.counts.partially_matched);
    println!("  Not found:         {}", summary.counts.not_found);
    println!("  Rejected rows:     {}", summary.rejected_ledger_rows);
    println!("  Ledger balance:    {}", summary.ledger_balance);
    println!("  Bank balance:      {}", summary.bank_balance);
    println!("  Difference:        {}", summary.total_difference);

    println!("\n✅ Reconciliation complete!");

    Ok(())
}
