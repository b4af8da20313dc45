use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::Serialize;

/// Indian financial year (runs 1 April to 31 March)
/// The year value represents the start year (e.g., 2023 = FY 2023-24)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, JsonSchema)]
pub struct FiscalYear(pub i32);

impl FiscalYear {
    /// Create a fiscal year from a date
    pub fn from_date(date: NaiveDate) -> Self {
        // April onwards belongs to the year starting this calendar year,
        // January to March to the one that started last year
        if date.month() >= 4 {
            FiscalYear(date.year())
        } else {
            FiscalYear(date.year() - 1)
        }
    }

    /// Display as "FY 2023-24" format
    pub fn label(&self) -> String {
        format!("FY {}-{:02}", self.0, (self.0 + 1).rem_euclid(100))
    }
}

impl std::fmt::Display for FiscalYear {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fiscal_year_from_april_first() {
        // 1 April 2023 opens FY 2023-24
        assert_eq!(FiscalYear::from_date(date(2023, 4, 1)), FiscalYear(2023));
        assert_eq!(FiscalYear::from_date(date(2023, 4, 1)).label(), "FY 2023-24");
    }

    #[test]
    fn fiscal_year_from_march_thirty_first() {
        // 31 March 2024 closes FY 2023-24
        assert_eq!(FiscalYear::from_date(date(2024, 3, 31)), FiscalYear(2023));
        assert_eq!(FiscalYear::from_date(date(2024, 3, 31)).label(), "FY 2023-24");
    }

    #[test]
    fn fiscal_year_from_january() {
        assert_eq!(FiscalYear::from_date(date(2024, 1, 15)), FiscalYear(2023));
    }

    #[test]
    fn fiscal_year_from_december() {
        assert_eq!(FiscalYear::from_date(date(2024, 12, 31)), FiscalYear(2024));
    }

    #[test]
    fn fiscal_year_label_century_rollover() {
        assert_eq!(FiscalYear(1999).label(), "FY 1999-00");
        assert_eq!(FiscalYear(2009).label(), "FY 2009-10");
        assert_eq!(FiscalYear(2099).to_string(), "FY 2099-00");
    }

    #[test]
    fn fiscal_years_order_chronologically() {
        assert!(FiscalYear(2022) < FiscalYear(2023));
    }
}
