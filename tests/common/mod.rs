//! In-memory workbook fixtures

#![allow(dead_code)]

use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use std::path::PathBuf;

pub const LEDGER_SHEET: &str = "Capital Contribution";
pub const VALUATION_SHEET: &str = "Performance Report";

#[derive(Clone, Copy)]
pub enum Cell {
    Date(u16, u8, u8),
    Text(&'static str),
    Num(f64),
    Blank,
}

pub fn add_sheet(workbook: &mut Workbook, name: &str, header: &[&str], rows: &[Vec<Cell>]) {
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
                Cell::Date(y, m, d) => {
                    let date = ExcelDateTime::from_ymd(y, m, d).unwrap();
                    worksheet
                        .write_datetime_with_format(r, c, &date, &date_format)
                        .unwrap();
                }
                Cell::Text(s) => {
                    worksheet.write_string(r, c, s).unwrap();
                }
                Cell::Num(n) => {
                    worksheet.write_number(r, c, n).unwrap();
                }
                Cell::Blank => {}
            }
        }
    }
}

pub const LEDGER_HEADER: &[&str] = &["Date", "Amount Added", "Notes", "Amount Withdrawn"];
pub const VALUATION_HEADER: &[&str] = &[
    "Date",
    "Value",
    "Gain",
    "Return",
    "Benchmark",
    "Benchmark Return",
    "XIRR",
    "Benchmark XIRR",
];

pub fn workbook(ledger: &[Vec<Cell>], valuation: &[Vec<Cell>]) -> Vec<u8> {
    let mut workbook = Workbook::new();
    add_sheet(&mut workbook, LEDGER_SHEET, LEDGER_HEADER, ledger);
    add_sheet(&mut workbook, VALUATION_SHEET, VALUATION_HEADER, valuation);
    workbook.save_to_buffer().unwrap()
}

/// One contribution of 100000 on 2023-05-01, valued at 105000 on 2023-06-01
pub fn single_contribution() -> Vec<u8> {
    workbook(
        &[vec![
            Cell::Date(2023, 5, 1),
            Cell::Num(100000.0),
            Cell::Blank,
            Cell::Blank,
        ]],
        &[vec![
            Cell::Date(2023, 6, 1),
            Cell::Num(105000.0),
            Cell::Num(5000.0),
            Cell::Num(0.05),
            Cell::Num(103000.0),
            Cell::Num(0.03),
            Cell::Num(0.3),
            Cell::Num(0.2),
        ]],
    )
}

/// Several fiscal years with a withdrawal
pub fn multi_year() -> Vec<u8> {
    workbook(
        &[
            vec![Cell::Date(2021, 4, 1), Cell::Num(500000.0), Cell::Blank, Cell::Blank],
            vec![Cell::Date(2022, 3, 31), Cell::Num(100000.0), Cell::Blank, Cell::Blank],
            vec![Cell::Date(2022, 9, 15), Cell::Blank, Cell::Blank, Cell::Num(150000.0)],
            vec![Cell::Date(2023, 11, 2), Cell::Num(250000.0), Cell::Blank, Cell::Num(50000.0)],
        ],
        &[vec![
            Cell::Date(2024, 3, 28),
            Cell::Num(812345.5),
            Cell::Num(162345.5),
            Cell::Num(0.2497),
            Cell::Num(745000.0),
            Cell::Num(0.1462),
            Cell::Num(0.1123),
            Cell::Num(0.0688),
        ]],
    )
}

/// A fresh scratch directory under the system temp dir
pub fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("folio-report-it-{}-{}", name, std::process::id()));
    if dir.exists() {
        std::fs::remove_dir_all(&dir).unwrap();
    }
    std::fs::create_dir_all(&dir).unwrap();
    dir
}
