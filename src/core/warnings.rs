use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Data-quality notes raised while reading the workbook or assembling the
/// document. None of these stop a report from being generated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Ledger row had activity but no date; the row was skipped.
    MissingDate { sheet: String, row: usize },
    /// Date cell could not be parsed; the row was skipped.
    UnparseableDate {
        sheet: String,
        row: usize,
        value: String,
    },
    /// Amount cell held non-numeric text or an out-of-range number and was
    /// counted as zero.
    NonNumericAmount {
        sheet: String,
        row: usize,
        column: String,
        value: String,
    },
    /// Page background image was not found; a plain page was drawn instead.
    MissingBackground { page: String, path: String },
}

impl std::fmt::Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::MissingDate { sheet, row } => {
                write!(f, "{sheet} row {row}: missing date, row skipped")
            }
            Warning::UnparseableDate { sheet, row, value } => {
                write!(f, "{sheet} row {row}: unrecognised date '{value}', row skipped")
            }
            Warning::NonNumericAmount {
                sheet,
                row,
                column,
                value,
            } => write!(
                f,
                "{sheet} row {row} column {column}: '{value}' is not a usable amount, counted as 0"
            ),
            Warning::MissingBackground { page, path } => {
                write!(f, "{page} page background not found at {path}")
            }
        }
    }
}
