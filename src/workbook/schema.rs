//! Typed row schema for worksheet rows.
//!
//! Row structs derive [`SheetRow`], which records the column each field is
//! read from and converts cells through [`FromCell`]. Conversions are lenient:
//! anything unusable becomes an empty or zero value and keeps the original
//! text so the reader can report it.

use crate::core::CellValue;
use calamine::Data;
use chrono::{Duration, NaiveDate};
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

pub use folio_report_derive::SheetRow;

/// Column metadata generated by `#[derive(SheetRow)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SheetColumn {
    pub field: &'static str,
    /// Spreadsheet column letter, e.g. "B"
    pub column: &'static str,
    /// Zero-based column index
    pub index: usize,
    pub required: bool,
    pub description: &'static str,
}

/// A struct that can be read from one worksheet row
pub trait SheetRow: Sized {
    fn schema() -> &'static [SheetColumn];

    fn from_row(row: &RowCells<'_>) -> Self;
}

/// Conversion from a raw worksheet cell
pub trait FromCell: Sized {
    fn from_cell(cell: &Data) -> Self;
}

static EMPTY: Data = Data::Empty;

/// Cells of one worksheet row, addressed by absolute column index
#[derive(Debug, Clone, Copy)]
pub struct RowCells<'a> {
    cells: &'a [Data],
    first_column: usize,
    /// One-based row number as shown in the spreadsheet
    pub number: usize,
}

impl<'a> RowCells<'a> {
    pub fn new(cells: &'a [Data], first_column: usize, number: usize) -> Self {
        RowCells {
            cells,
            first_column,
            number,
        }
    }

    pub fn get(&self, column: usize) -> &'a Data {
        column
            .checked_sub(self.first_column)
            .and_then(|i| self.cells.get(i))
            .unwrap_or(&EMPTY)
    }

    /// True when the cell holds something other than blanks
    pub fn is_populated(&self, column: usize) -> bool {
        match self.get(column) {
            Data::Empty => false,
            Data::String(s) => !s.trim().is_empty(),
            _ => true,
        }
    }
}

/// A date column that tolerates blanks and junk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DateCell {
    Date(NaiveDate),
    Invalid(String),
    Empty,
}

impl DateCell {
    pub fn date(&self) -> Option<NaiveDate> {
        match self {
            DateCell::Date(d) => Some(*d),
            _ => None,
        }
    }
}

impl FromCell for DateCell {
    fn from_cell(cell: &Data) -> Self {
        match cell {
            Data::Empty => DateCell::Empty,
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(datetime) => DateCell::Date(datetime.date()),
                None => DateCell::Invalid(dt.to_string()),
            },
            Data::DateTimeIso(s) => parse_date_text(s),
            Data::Float(f) => from_excel_serial(*f),
            Data::Int(i) => from_excel_serial(*i as f64),
            Data::String(s) if s.trim().is_empty() => DateCell::Empty,
            Data::String(s) => parse_date_text(s),
            Data::Bool(b) => DateCell::Invalid(b.to_string()),
            Data::DurationIso(s) => DateCell::Invalid(s.clone()),
            Data::Error(e) => DateCell::Invalid(format!("{e:?}")),
        }
    }
}

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%d/%m/%Y",
    "%m-%d-%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d %b %Y",
    "%d-%b-%Y",
    "%d %B %Y",
    "%b %d, %Y",
    "%B %d, %Y",
];

fn parse_date_text(text: &str) -> DateCell {
    let text = text.trim();
    let date_part = text.split(['T', ' ']).next().unwrap_or(text);

    [text, date_part]
        .iter()
        .find_map(|candidate| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(candidate, fmt).ok())
        })
        .map(DateCell::Date)
        .unwrap_or_else(|| DateCell::Invalid(text.to_string()))
}

/// Excel serial day numbers count from 30 December 1899
fn from_excel_serial(serial: f64) -> DateCell {
    if !serial.is_finite() || !(1.0..=2_958_465.0).contains(&serial) {
        return DateCell::Invalid(serial.to_string());
    }
    NaiveDate::from_ymd_opt(1899, 12, 30)
        .and_then(|epoch| epoch.checked_add_signed(Duration::days(serial.trunc() as i64)))
        .map(DateCell::Date)
        .unwrap_or_else(|| DateCell::Invalid(serial.to_string()))
}

/// A money amount; blanks count as zero, unusable text is kept for reporting
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Amount {
    pub value: Decimal,
    /// Original text when the cell could not be read as a number
    pub rejected: Option<String>,
}

impl Amount {
    fn accepted(value: Decimal) -> Self {
        Amount {
            value,
            rejected: None,
        }
    }

    fn rejected(text: impl Into<String>) -> Self {
        Amount {
            value: Decimal::ZERO,
            rejected: Some(text.into()),
        }
    }
}

impl FromCell for Amount {
    fn from_cell(cell: &Data) -> Self {
        match cell {
            Data::Float(f) if f.is_nan() => Amount::default(),
            Data::Float(f) => match Decimal::from_f64(*f) {
                Some(value) => Amount::accepted(value),
                None => Amount::rejected(f.to_string()),
            },
            Data::Int(i) => Amount::accepted(Decimal::from(*i)),
            Data::String(s) => match parse_number(s) {
                Some(value) => Amount::accepted(value),
                None => Amount::rejected(s.trim()),
            },
            // Blank and error cells (#N/A, #DIV/0!) read as missing
            Data::Empty | Data::Error(_) => Amount::default(),
            Data::Bool(b) => Amount::rejected(b.to_string()),
            Data::DateTime(dt) => Amount::rejected(dt.to_string()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Amount::rejected(s.clone()),
        }
    }
}

/// Strips the rupee sign, thousands separators and whitespace.
/// Blank, "nan" and "None" are zero; `None` means the text is not a number.
pub fn parse_number(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| *c != '₹' && *c != ',' && !c.is_whitespace())
        .collect();

    if cleaned.is_empty() || cleaned.eq_ignore_ascii_case("nan") || cleaned == "None" {
        return Some(Decimal::ZERO);
    }

    cleaned
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(&cleaned).ok())
}

/// Blank cells read as `None`
impl<T: FromCell> FromCell for Option<T> {
    fn from_cell(cell: &Data) -> Self {
        match cell {
            Data::Empty => None,
            Data::String(s) if s.trim().is_empty() => None,
            other => Some(T::from_cell(other)),
        }
    }
}

impl FromCell for CellValue {
    fn from_cell(cell: &Data) -> Self {
        match cell {
            Data::Float(f) => match Decimal::from_f64(*f) {
                Some(n) => CellValue::Number(n),
                None => CellValue::Empty,
            },
            Data::Int(i) => CellValue::Number(Decimal::from(*i)),
            Data::String(s) if s.trim().is_empty() => CellValue::Empty,
            Data::String(s) => CellValue::Text(s.trim().to_string()),
            Data::Bool(b) => CellValue::Text(b.to_string()),
            Data::DateTime(dt) => CellValue::Text(dt.to_string()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
            Data::Empty | Data::Error(_) => CellValue::Empty,
        }
    }
}
