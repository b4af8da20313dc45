//! Return figures read from the terminal row of the valuation sheet

use super::format::{format_currency, format_percentage};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;

/// A snapshot cell: numbers are used as-is, text is shown verbatim
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, JsonSchema)]
#[serde(untagged)]
pub enum CellValue {
    Number(Decimal),
    Text(String),
    #[default]
    Empty,
}

impl CellValue {
    /// Numeric value for charting. Text is parsed leniently ("15.23%" is
    /// 0.1523); anything else counts as zero.
    pub fn as_decimal(&self) -> Decimal {
        match self {
            CellValue::Number(n) => *n,
            CellValue::Text(text) => parse_numeric_text(text).unwrap_or(Decimal::ZERO),
            CellValue::Empty => Decimal::ZERO,
        }
    }

    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Number(n) => n.is_zero(),
            CellValue::Text(text) => text.trim().is_empty(),
            CellValue::Empty => true,
        }
    }

    /// Percentage display; text cells pass through unchanged
    pub fn display_percentage(&self) -> String {
        match self {
            CellValue::Text(text) => text.trim().to_string(),
            other => format_percentage(other.as_decimal()),
        }
    }

    /// Currency display; text cells pass through unchanged
    pub fn display_currency(&self) -> String {
        match self {
            CellValue::Text(text) => text.trim().to_string(),
            other => format_currency(other.as_decimal()),
        }
    }
}

fn parse_numeric_text(text: &str) -> Option<Decimal> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '₹' | ',' | ' '))
        .collect();
    match cleaned.strip_suffix('%') {
        Some(pct) => pct
            .parse::<Decimal>()
            .ok()
            .map(|p| p / Decimal::ONE_HUNDRED),
        None => cleaned.parse::<Decimal>().ok(),
    }
}

/// Subject portfolio versus benchmark, as of the last populated row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReturnSnapshot {
    /// Date in the first column of the snapshot row, if it parses
    pub as_of: Option<NaiveDate>,
    pub subject_value: CellValue,
    pub benchmark_value: CellValue,
    /// Absolute gain from market appreciation
    pub absolute_appreciation: CellValue,
    pub subject_pct: CellValue,
    pub benchmark_pct: CellValue,
    pub subject_annualized_pct: CellValue,
    pub benchmark_annualized_pct: CellValue,
}

/// A piece of the narrative sentence
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct NarrativeSpan {
    pub text: String,
    /// Highlighted figures
    pub emphasis: bool,
}

/// Summary sentence shown under the performance chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct Narrative {
    pub spans: Vec<NarrativeSpan>,
    /// True when no appreciation figures were available
    pub fallback: bool,
}

pub const FALLBACK_NARRATIVE: &str = "YOUR PORTFOLIO INVESTMENT PERFORMANCE SUMMARY";

impl Narrative {
    /// Build the appreciation sentence from the snapshot.
    ///
    /// Each figure renders as formatted currency/percentage when numeric and
    /// non-zero, verbatim when text, and empty otherwise. With both figures
    /// empty the generic summary line is used instead.
    pub fn from_snapshot(snapshot: &ReturnSnapshot) -> Self {
        let amount = appreciation_fragment(&snapshot.absolute_appreciation, CellValue::display_currency);
        let pct = appreciation_fragment(&snapshot.subject_pct, CellValue::display_percentage);

        if amount.is_empty() && pct.is_empty() {
            return Narrative {
                spans: vec![plain(FALLBACK_NARRATIVE)],
                fallback: true,
            };
        }

        Narrative {
            spans: vec![
                plain("YOUR PORTFOLIO INVESTMENT VALUE HAS INCREASED BY "),
                emphasized(&amount),
                plain(" OR "),
                emphasized(&pct),
                plain(" ON ACCOUNT OF MARKET APPRECIATION."),
            ],
            fallback: false,
        }
    }

    pub fn text(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

fn appreciation_fragment(value: &CellValue, display: fn(&CellValue) -> String) -> String {
    if value.is_blank() {
        String::new()
    } else {
        display(value)
    }
}

fn plain(text: &str) -> NarrativeSpan {
    NarrativeSpan {
        text: text.to_string(),
        emphasis: false,
    }
}

fn emphasized(text: &str) -> NarrativeSpan {
    NarrativeSpan {
        text: text.to_string(),
        emphasis: true,
    }
}
