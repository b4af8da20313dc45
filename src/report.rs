//! The report pipeline: workbook bytes in, four-page document out.

use crate::chart::{ChartRenderer, ComparisonLabels};
use crate::core::{
    aggregate_fiscal_years, build_series, FiscalYearBucket, Narrative, PerformanceSeries,
    ReturnSnapshot, ValuationPoint, Warning,
};
use crate::document::{self, compose, Backgrounds, ReportContent, ReportDocument};
use crate::error::ReportError;
use crate::workbook::PortfolioWorkbook;
use chrono::NaiveDate;
use schemars::JsonSchema;
use serde::Serialize;
use std::path::PathBuf;

/// Cover page client name size in points
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FontSize(u32);

impl FontSize {
    pub const MIN: u32 = 20;
    pub const MAX: u32 = 80;
    pub const DEFAULT: u32 = 45;

    pub fn get(self) -> u32 {
        self.0
    }
}

impl Default for FontSize {
    fn default() -> Self {
        FontSize(Self::DEFAULT)
    }
}

impl TryFrom<u32> for FontSize {
    type Error = ReportError;

    fn try_from(size: u32) -> Result<Self, Self::Error> {
        if (Self::MIN..=Self::MAX).contains(&size) {
            Ok(FontSize(size))
        } else {
            Err(ReportError::InvalidFontSize(size))
        }
    }
}

/// Presentation options for a report
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub report_date: NaiveDate,
    pub font_size: FontSize,
    pub labels: ComparisonLabels,
    /// Directory holding the page background images
    pub assets_dir: Option<PathBuf>,
    /// Extra font directories for charts and the PDF
    pub font_dirs: Vec<PathBuf>,
}

impl ReportSettings {
    pub fn new(report_date: NaiveDate) -> Self {
        ReportSettings {
            report_date,
            font_size: FontSize::default(),
            labels: ComparisonLabels::default(),
            assets_dir: None,
            font_dirs: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ReportRequest<'a> {
    /// Raw workbook file contents
    pub workbook: &'a [u8],
    pub client_name: String,
    pub settings: ReportSettings,
}

/// Everything derived from the workbook, before any rendering
#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct PortfolioAnalysis {
    pub buckets: Vec<FiscalYearBucket>,
    pub valuation: ValuationPoint,
    pub series: PerformanceSeries,
    pub snapshot: ReturnSnapshot,
    pub narrative: Narrative,
    pub warnings: Vec<Warning>,
}

/// Read the workbook and compute the series, snapshot and narrative.
pub fn analyze(workbook: &[u8]) -> Result<PortfolioAnalysis, ReportError> {
    let workbook = PortfolioWorkbook::from_bytes(workbook)?;

    let ledger = workbook.cash_flows();
    let buckets = aggregate_fiscal_years(&ledger.rows)?;
    let valuation = workbook.valuation_point()?;
    let series = build_series(&buckets, &valuation);
    let snapshot = workbook.snapshot()?;
    let narrative = Narrative::from_snapshot(&snapshot);

    log::info!(
        "{} fiscal years, valuation {} on {}",
        buckets.len(),
        valuation.portfolio_value,
        valuation.date
    );

    Ok(PortfolioAnalysis {
        buckets,
        valuation,
        series,
        snapshot,
        narrative,
        warnings: ledger.warnings,
    })
}

/// A laid-out report ready to be written as PDF or HTML
pub struct PreparedReport {
    pub analysis: PortfolioAnalysis,
    pub document: ReportDocument,
    renderer: ChartRenderer,
}

impl PreparedReport {
    /// Workbook and asset warnings collected while preparing the report
    pub fn warnings(&self) -> &[Warning] {
        &self.analysis.warnings
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>, ReportError> {
        document::pdf::render(&self.document, self.renderer.fonts())
    }

    pub fn to_html(&self) -> String {
        document::html::render(&self.document)
    }
}

/// Analyze the workbook, render both charts and lay out the pages.
pub fn prepare(request: &ReportRequest<'_>) -> Result<PreparedReport, ReportError> {
    let settings = &request.settings;
    let mut analysis = analyze(request.workbook)?;

    let renderer = ChartRenderer::new(&settings.font_dirs);
    let performance_chart = renderer.performance_chart(&analysis.series)?;
    let comparison_chart = renderer.comparison_chart(&analysis.snapshot, &settings.labels)?;

    let backgrounds = match &settings.assets_dir {
        Some(dir) => Backgrounds::load(dir, &mut analysis.warnings)?,
        None => {
            log::info!("No assets directory, pages drawn without backgrounds");
            Backgrounds::default()
        }
    };

    let document = compose(
        ReportContent {
            client_name: &request.client_name,
            report_date: settings.report_date,
            name_font_size: settings.font_size.get(),
            performance_chart,
            comparison_chart,
            narrative: &analysis.narrative,
        },
        &backgrounds,
    );

    Ok(PreparedReport {
        analysis,
        document,
        renderer,
    })
}

/// Generate the four-page PDF report for a workbook.
pub fn generate_report(request: &ReportRequest<'_>) -> Result<Vec<u8>, ReportError> {
    prepare(request)?.to_pdf()
}

/// Conventional output file name for a client's report
pub fn report_file_name(client_name: &str, extension: &str) -> String {
    format!("{client_name}_Asset_Report.{extension}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn font_size_bounds() {
        assert_eq!(FontSize::default().get(), 45);
        assert_eq!(FontSize::try_from(20).unwrap().get(), 20);
        assert_eq!(FontSize::try_from(80).unwrap().get(), 80);
        assert!(matches!(
            FontSize::try_from(19),
            Err(ReportError::InvalidFontSize(19))
        ));
        assert!(FontSize::try_from(81).is_err());
    }

    #[test]
    fn font_size_error_message() {
        let err = FontSize::try_from(100).unwrap_err();
        assert_eq!(
            err.to_string(),
            "client name font size 100 is outside 20..=80"
        );
    }

    #[test]
    fn file_name() {
        assert_eq!(
            report_file_name("Jane Doe", "pdf"),
            "Jane Doe_Asset_Report.pdf"
        );
    }

    #[test]
    fn garbage_bytes_are_a_workbook_error() {
        let err = analyze(b"not a spreadsheet").unwrap_err();
        assert!(matches!(err, ReportError::Workbook(_)));
    }
}
