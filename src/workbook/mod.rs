//! Reading the client portfolio workbook

mod rows;
mod schema;

pub use rows::{LedgerRow, ValuationRow};
pub use schema::{parse_number, Amount, DateCell, FromCell, RowCells, SheetColumn, SheetRow};

use crate::core::{CashFlowRow, ReturnSnapshot, ValuationPoint, Warning};
use crate::error::ReportError;
use calamine::{open_workbook_auto_from_rs, Data, Range, Reader, Sheets};
use std::io::{Cursor, Read, Seek};

pub const LEDGER_SHEET: &str = "Capital Contribution";
pub const VALUATION_SHEET: &str = "Performance Report";

/// A worksheet whose first row is a header
#[derive(Debug)]
struct Sheet {
    name: String,
    range: Range<Data>,
}

impl Sheet {
    fn open<RS: Read + Seek>(workbook: &mut Sheets<RS>, name: &str) -> Result<Self, ReportError> {
        if !workbook.sheet_names().iter().any(|s| s == name) {
            return Err(ReportError::MissingSheet(name.to_string()));
        }
        let range = workbook
            .worksheet_range(name)
            .map_err(|source| ReportError::UnreadableSheet {
                sheet: name.to_string(),
                source,
            })?;
        Ok(Sheet {
            name: name.to_string(),
            range,
        })
    }

    fn name(&self) -> &str {
        &self.name
    }

    /// Rows below the header, top to bottom
    fn data_rows(&self) -> Vec<RowCells<'_>> {
        let (first_row, first_column) = self.range.start().unwrap_or((0, 0));
        self.range
            .rows()
            .enumerate()
            .filter_map(|(i, cells)| {
                let row = first_row as usize + i;
                (row > 0).then(|| RowCells::new(cells, first_column as usize, row + 1))
            })
            .collect()
    }

    /// Check once that the used range reaches every required column
    fn require_columns<R: SheetRow>(&self) -> Result<(), ReportError> {
        let Some((_, last_column)) = self.range.end() else {
            return Ok(());
        };
        match R::schema()
            .iter()
            .find(|c| c.required && c.index > last_column as usize)
        {
            Some(column) => Err(ReportError::MissingColumn {
                sheet: self.name.clone(),
                column: column.column,
                field: column.field,
            }),
            None => Ok(()),
        }
    }
}

/// Column letter a row field is read from
fn column_of<R: SheetRow>(field: &str) -> &'static str {
    R::schema()
        .iter()
        .find(|c| c.field == field)
        .map_or("?", |c| c.column)
}

/// Capital contributions read from the ledger sheet
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    pub rows: Vec<CashFlowRow>,
    pub warnings: Vec<Warning>,
}

/// The two sheets a report is built from
#[derive(Debug)]
pub struct PortfolioWorkbook {
    ledger: Sheet,
    valuation: Sheet,
}

impl PortfolioWorkbook {
    /// Open an xlsx/xls/ods workbook held in memory
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, ReportError> {
        let mut workbook =
            open_workbook_auto_from_rs(Cursor::new(bytes)).map_err(ReportError::Workbook)?;

        let ledger = Sheet::open(&mut workbook, LEDGER_SHEET)?;
        ledger.require_columns::<LedgerRow>()?;
        let valuation = Sheet::open(&mut workbook, VALUATION_SHEET)?;
        valuation.require_columns::<ValuationRow>()?;

        log::debug!(
            "Opened workbook: {} ledger rows, {} valuation rows",
            ledger.data_rows().len(),
            valuation.data_rows().len()
        );

        Ok(PortfolioWorkbook { ledger, valuation })
    }

    /// Ledger rows with activity. Rows with neither an addition nor a
    /// withdrawal are dropped; rows with activity but no usable date are
    /// skipped and reported.
    pub fn cash_flows(&self) -> Ledger {
        let mut ledger = Ledger::default();
        let sheet = self.ledger.name();

        for cells in self.ledger.data_rows() {
            let row = LedgerRow::from_row(&cells);

            let amounts = [
                (column_of::<LedgerRow>("amount_added"), &row.amount_added),
                (column_of::<LedgerRow>("amount_withdrawn"), &row.amount_withdrawn),
            ];
            for (column, amount) in amounts {
                if let Some(value) = &amount.rejected {
                    ledger.warnings.push(Warning::NonNumericAmount {
                        sheet: sheet.to_string(),
                        row: cells.number,
                        column: column.to_string(),
                        value: value.clone(),
                    });
                }
            }

            if row.amount_added.value.is_zero() && row.amount_withdrawn.value.is_zero() {
                continue;
            }

            match row.date {
                DateCell::Date(date) => ledger.rows.push(CashFlowRow::new(
                    date,
                    row.amount_added.value,
                    row.amount_withdrawn.value,
                )),
                DateCell::Empty => ledger.warnings.push(Warning::MissingDate {
                    sheet: sheet.to_string(),
                    row: cells.number,
                }),
                DateCell::Invalid(value) => ledger.warnings.push(Warning::UnparseableDate {
                    sheet: sheet.to_string(),
                    row: cells.number,
                    value,
                }),
            }
        }

        for warning in &ledger.warnings {
            log::warn!("{}", warning);
        }
        log::info!("Read {} cash flow rows", ledger.rows.len());
        ledger
    }

    /// The last valuation row with a readable date
    pub fn valuation_point(&self) -> Result<ValuationPoint, ReportError> {
        self.valuation
            .data_rows()
            .iter()
            .rev()
            .find_map(|cells| {
                let row = ValuationRow::from_row(cells);
                row.date.date().map(|date| ValuationPoint {
                    date,
                    portfolio_value: row.portfolio_value.as_decimal(),
                })
            })
            .ok_or_else(|| ReportError::EmptySnapshot(self.valuation.name().to_string()))
    }

    /// Return figures from the last row whose first column is populated
    pub fn snapshot(&self) -> Result<ReturnSnapshot, ReportError> {
        let first_column = ValuationRow::schema().first().map_or(0, |c| c.index);
        let rows = self.valuation.data_rows();
        let cells = rows
            .iter()
            .rev()
            .find(|r| r.is_populated(first_column))
            .ok_or_else(|| ReportError::EmptySnapshot(self.valuation.name().to_string()))?;

        log::debug!("Snapshot taken from {} row {}", self.valuation.name(), cells.number);

        let row = ValuationRow::from_row(cells);
        Ok(ReturnSnapshot {
            as_of: row.date.date(),
            subject_value: row.portfolio_value,
            benchmark_value: row.benchmark_value,
            absolute_appreciation: row.absolute_appreciation,
            subject_pct: row.subject_pct,
            benchmark_pct: row.benchmark_pct,
            subject_annualized_pct: row.subject_annualized_pct,
            benchmark_annualized_pct: row.benchmark_annualized_pct,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::CellValue;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};

    #[derive(Clone, Copy)]
    enum Cell {
        Date(u16, u8, u8),
        Text(&'static str),
        Num(f64),
        Blank,
    }
    use Cell::*;

    fn sheet(workbook: &mut Workbook, name: &str, header: &[&str], rows: &[Vec<Cell>]) {
        let date_format = Format::new().set_num_format("yyyy-mm-dd");
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(name).unwrap();
        for (col, title) in header.iter().enumerate() {
            worksheet.write_string(0, col as u16, *title).unwrap();
        }
        for (i, row) in rows.iter().enumerate() {
            let r = i as u32 + 1;
            for (col, cell) in row.iter().enumerate() {
                let c = col as u16;
                match *cell {
                    Date(y, m, d) => {
                        let date = ExcelDateTime::from_ymd(y, m, d).unwrap();
                        worksheet.write_datetime_with_format(r, c, &date, &date_format).unwrap();
                    }
                    Text(s) => {
                        worksheet.write_string(r, c, s).unwrap();
                    }
                    Num(n) => {
                        worksheet.write_number(r, c, n).unwrap();
                    }
                    Blank => {}
                }
            }
        }
    }

    const LEDGER_HEADER: &[&str] = &["Date", "Amount Added", "Notes", "Amount Withdrawn"];
    const VALUATION_HEADER: &[&str] = &[
        "Date", "Value", "Gain", "Return", "Benchmark", "Benchmark Return", "XIRR", "Benchmark XIRR",
    ];

    fn build(ledger: &[Vec<Cell>], valuation: &[Vec<Cell>]) -> Vec<u8> {
        let mut workbook = Workbook::new();
        sheet(&mut workbook, LEDGER_SHEET, LEDGER_HEADER, ledger);
        sheet(&mut workbook, VALUATION_SHEET, VALUATION_HEADER, valuation);
        workbook.save_to_buffer().unwrap()
    }

    fn valuation_rows() -> Vec<Vec<Cell>> {
        vec![
            vec![Date(2023, 5, 31), Num(101000.0), Num(1000.0), Num(0.01)],
            vec![
                Date(2023, 6, 1),
                Num(105000.0),
                Num(5000.0),
                Num(0.05),
                Num(103000.0),
                Num(0.03),
                Num(0.3),
                Num(0.2),
            ],
        ]
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn reads_cash_flows() {
        let ledger = vec![
            vec![Date(2023, 5, 1), Num(100000.0), Text("initial"), Blank],
            vec![Text("2023-07-10"), Blank, Blank, Num(20000.0)],
            vec![Blank, Num(0.0), Blank, Num(0.0)],
        ];
        let workbook = PortfolioWorkbook::from_bytes(&build(&ledger, &valuation_rows())).unwrap();
        let flows = workbook.cash_flows();

        assert_eq!(
            flows.rows,
            vec![
                CashFlowRow::new(date(2023, 5, 1), dec!(100000), dec!(0)),
                CashFlowRow::new(date(2023, 7, 10), dec!(0), dec!(20000)),
            ]
        );
        assert!(flows.warnings.is_empty());
    }

    #[test]
    fn bad_rows_become_warnings() {
        let ledger = vec![
            vec![Blank, Num(500.0), Blank, Blank],
            vec![Text("Total"), Num(100500.0), Blank, Blank],
            vec![Date(2023, 8, 1), Text("pending"), Blank, Blank],
        ];
        let workbook = PortfolioWorkbook::from_bytes(&build(&ledger, &valuation_rows())).unwrap();
        let flows = workbook.cash_flows();

        assert!(flows.rows.is_empty());
        assert_eq!(
            flows.warnings,
            vec![
                Warning::MissingDate {
                    sheet: LEDGER_SHEET.to_string(),
                    row: 2,
                },
                Warning::UnparseableDate {
                    sheet: LEDGER_SHEET.to_string(),
                    row: 3,
                    value: "Total".to_string(),
                },
                Warning::NonNumericAmount {
                    sheet: LEDGER_SHEET.to_string(),
                    row: 4,
                    column: "B".to_string(),
                    value: "pending".to_string(),
                },
            ]
        );
    }

    #[test]
    fn valuation_and_snapshot_from_last_row() {
        let workbook = PortfolioWorkbook::from_bytes(&build(&[], &valuation_rows())).unwrap();

        let point = workbook.valuation_point().unwrap();
        assert_eq!(point.date, date(2023, 6, 1));
        assert_eq!(point.portfolio_value, dec!(105000));

        let snapshot = workbook.snapshot().unwrap();
        assert_eq!(snapshot.as_of, Some(date(2023, 6, 1)));
        assert_eq!(snapshot.absolute_appreciation, CellValue::Number(dec!(5000)));
        assert_eq!(snapshot.subject_pct, CellValue::Number(dec!(0.05)));
        assert_eq!(snapshot.benchmark_annualized_pct, CellValue::Number(dec!(0.2)));
    }

    #[test]
    fn summary_row_is_snapshot_but_not_valuation() {
        let mut rows = valuation_rows();
        rows.push(vec![Text("Since inception"), Num(106000.0), Num(6000.0), Text("6.00%")]);
        let workbook = PortfolioWorkbook::from_bytes(&build(&[], &rows)).unwrap();

        assert_eq!(workbook.valuation_point().unwrap().date, date(2023, 6, 1));
        let snapshot = workbook.snapshot().unwrap();
        assert_eq!(snapshot.as_of, None);
        assert_eq!(snapshot.subject_pct, CellValue::Text("6.00%".into()));
        assert_eq!(snapshot.benchmark_pct, CellValue::Empty);
    }

    #[test]
    fn missing_sheet() {
        let mut workbook = Workbook::new();
        sheet(&mut workbook, LEDGER_SHEET, LEDGER_HEADER, &[]);
        let bytes = workbook.save_to_buffer().unwrap();

        let err = PortfolioWorkbook::from_bytes(&bytes).unwrap_err();
        assert!(matches!(err, ReportError::MissingSheet(name) if name == VALUATION_SHEET));
    }

    #[test]
    fn out_of_range_amount_becomes_warning() {
        let ledger = vec![
            vec![Date(2023, 5, 1), Num(1e30), Blank, Blank],
            vec![Date(2023, 6, 1), Num(500.0), Blank, Blank],
        ];
        let workbook = PortfolioWorkbook::from_bytes(&build(&ledger, &valuation_rows())).unwrap();
        let flows = workbook.cash_flows();

        assert_eq!(flows.rows, vec![CashFlowRow::new(date(2023, 6, 1), dec!(500), dec!(0))]);
        assert_eq!(
            flows.warnings,
            vec![Warning::NonNumericAmount {
                sheet: LEDGER_SHEET.to_string(),
                row: 2,
                column: "B".to_string(),
                value: 1e30.to_string(),
            }]
        );
    }

    #[test]
    fn valuation_needs_only_date_and_value() {
        let mut workbook = Workbook::new();
        sheet(&mut workbook, LEDGER_SHEET, LEDGER_HEADER, &[]);
        sheet(
            &mut workbook,
            VALUATION_SHEET,
            &["Date", "Value"],
            &[vec![Date(2023, 6, 1), Num(105000.0)]],
        );
        let bytes = workbook.save_to_buffer().unwrap();

        let workbook = PortfolioWorkbook::from_bytes(&bytes).unwrap();
        let snapshot = workbook.snapshot().unwrap();
        assert_eq!(snapshot.subject_value, CellValue::Number(dec!(105000)));
        assert_eq!(snapshot.absolute_appreciation, CellValue::Empty);
        assert_eq!(snapshot.subject_pct, CellValue::Empty);
    }

    #[test]
    fn missing_required_column() {
        let mut workbook = Workbook::new();
        sheet(
            &mut workbook,
            LEDGER_SHEET,
            &["Date", "Amount Added"],
            &[vec![Date(2023, 5, 1), Num(100.0)]],
        );
        sheet(&mut workbook, VALUATION_SHEET, VALUATION_HEADER, &valuation_rows());
        let bytes = workbook.save_to_buffer().unwrap();

        let err = PortfolioWorkbook::from_bytes(&bytes).unwrap_err();
        assert!(matches!(
            err,
            ReportError::MissingColumn { column: "D", field: "amount_withdrawn", .. }
        ));
    }

    #[test]
    fn empty_valuation_sheet() {
        let workbook = PortfolioWorkbook::from_bytes(&build(&[], &[])).unwrap();
        assert!(matches!(
            workbook.valuation_point(),
            Err(ReportError::EmptySnapshot(_))
        ));
        assert!(matches!(workbook.snapshot(), Err(ReportError::EmptySnapshot(_))));
    }
}
