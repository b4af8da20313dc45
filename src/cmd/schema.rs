//! Schema command - print the expected workbook layout

use clap::Args;
use folio_report::report::PortfolioAnalysis;
use folio_report::workbook::{
    LedgerRow, SheetColumn, SheetRow, ValuationRow, LEDGER_SHEET, VALUATION_SHEET,
};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// Output format: sheet-fields or json
    #[arg(value_enum, default_value = "sheet-fields")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// Columns read from each worksheet
    SheetFields,
    /// JSON Schema of `inspect --json` output
    Json,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::SheetFields => {
                print_sheet(LEDGER_SHEET, LedgerRow::schema());
                println!();
                print_sheet(VALUATION_SHEET, ValuationRow::schema());
                println!();
                println!("Row 1 of each sheet is a header and is ignored.");
                Ok(())
            }
            SchemaFormat::Json => {
                let schema = schema_for!(PortfolioAnalysis);
                println!("{}", serde_json::to_string_pretty(&schema)?);
                Ok(())
            }
        }
    }
}

fn print_sheet(name: &str, columns: &[SheetColumn]) {
    println!("Sheet \"{}\"", name);
    println!("{}", "=".repeat(name.len() + 8));
    for column in columns {
        let req = if column.required { "required" } else { "optional" };
        println!(
            "  {:3} {:26} ({:8})  {}",
            column.column, column.field, req, column.description
        );
    }
}
