use super::schema::{Amount, DateCell, SheetRow};
use crate::core::CellValue;

/// One entry of the "Capital Contribution" ledger
#[derive(Debug, Clone, SheetRow)]
pub struct LedgerRow {
    /// Date of the contribution or withdrawal
    #[sheet(column = "A")]
    pub date: DateCell,
    /// Amount added to the portfolio
    #[sheet(column = "B")]
    pub amount_added: Amount,
    /// Amount withdrawn from the portfolio
    #[sheet(column = "D")]
    pub amount_withdrawn: Amount,
}

/// One row of the "Performance Report" valuation sheet
#[derive(Debug, Clone, SheetRow)]
pub struct ValuationRow {
    /// Valuation date
    #[sheet(column = "A")]
    pub date: DateCell,
    /// Portfolio value on that date
    #[sheet(column = "B")]
    pub portfolio_value: CellValue,
    /// Absolute gain from market appreciation
    #[sheet(column = "C", optional)]
    pub absolute_appreciation: CellValue,
    /// Portfolio return as a fraction (0.15 = 15%)
    #[sheet(column = "D", optional)]
    pub subject_pct: CellValue,
    /// Benchmark value for the same investments
    #[sheet(column = "E", optional)]
    pub benchmark_value: CellValue,
    /// Benchmark return as a fraction
    #[sheet(column = "F", optional)]
    pub benchmark_pct: CellValue,
    /// Portfolio annualized return as a fraction
    #[sheet(column = "G", optional)]
    pub subject_annualized_pct: CellValue,
    /// Benchmark annualized return as a fraction
    #[sheet(column = "H", optional)]
    pub benchmark_annualized_pct: CellValue,
}
