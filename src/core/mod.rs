pub mod aggregate;
pub mod client;
pub mod fiscal;
pub mod format;
pub mod snapshot;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use aggregate::{
    aggregate_fiscal_years, build_series, CashFlowRow, FiscalYearBucket, PerformanceSeries,
    PointKind, SeriesPoint, ValuationPoint,
};
pub use client::{client_name_from_filename, DEFAULT_CLIENT_NAME};
pub use fiscal::FiscalYear;
pub use format::{format_currency, format_indian_number, format_percentage, CURRENCY_SYMBOL};
pub use snapshot::{CellValue, Narrative, NarrativeSpan, ReturnSnapshot, FALLBACK_NARRATIVE};
pub use warnings::Warning;
