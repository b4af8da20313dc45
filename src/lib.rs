//! Client portfolio reports.
//!
//! A workbook with a capital contribution ledger and a performance sheet is
//! turned into a four-page report: cover, cumulative performance chart with a
//! narrative, subject versus benchmark return comparison, and a closing page.

pub mod chart;
pub mod core;
pub mod document;
pub mod error;
pub mod report;
pub mod workbook;

pub use error::ReportError;
pub use report::{
    analyze, generate_report, prepare, FontSize, PortfolioAnalysis, PreparedReport,
    ReportRequest, ReportSettings,
};
