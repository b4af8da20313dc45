//! Generate command - build the client report from a workbook

use super::{print_warnings, read_workbook};
use anyhow::Context;
use chrono::NaiveDate;
use clap::Args;
use folio_report::chart::ComparisonLabels;
use folio_report::core::client_name_from_filename;
use folio_report::report::{prepare, report_file_name, FontSize, ReportRequest, ReportSettings};
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct GenerateCommand {
    /// Client workbook (xlsx, xls or ods)
    #[arg(short, long)]
    workbook: PathBuf,

    /// Client name (default: taken from the workbook file name)
    #[arg(short, long)]
    name: Option<String>,

    /// Report date shown on the cover, YYYY-MM-DD (default: today)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Cover page client name font size (20-80)
    #[arg(short, long, default_value_t = FontSize::DEFAULT)]
    font_size: u32,

    /// Directory containing cover.png, performance.png, comparison.png and closing.png
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    /// Additional font directory (repeatable)
    #[arg(long = "font-dir")]
    font_dirs: Vec<PathBuf>,

    /// Label for the benchmark bars
    #[arg(long, default_value = "Benchmark")]
    benchmark: String,

    /// Label for the client's portfolio bars
    #[arg(long, default_value = "Your Portfolio")]
    subject: String,

    /// Output file (default: <client>_Asset_Report.pdf)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write a self-contained HTML file instead of PDF
    #[arg(long)]
    html: bool,

    /// Open the report once written
    #[arg(long)]
    open: bool,
}

impl GenerateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let font_size = FontSize::try_from(self.font_size)?;
        let workbook = read_workbook(&self.workbook)?;

        let client_name = match &self.name {
            Some(name) => name.clone(),
            None => {
                let file_name = self
                    .workbook
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                client_name_from_filename(&file_name)
            }
        };
        log::info!("Generating report for {}", client_name);

        let request = ReportRequest {
            workbook: &workbook,
            client_name: client_name.clone(),
            settings: ReportSettings {
                report_date: self
                    .date
                    .unwrap_or_else(|| chrono::Local::now().date_naive()),
                font_size,
                labels: ComparisonLabels {
                    subject: self.subject.clone(),
                    benchmark: self.benchmark.clone(),
                },
                assets_dir: Some(self.assets.clone()),
                font_dirs: self.font_dirs.clone(),
            },
        };

        let report = prepare(&request).context("Failed to generate report")?;
        print_warnings(report.warnings());

        let extension = if self.html { "html" } else { "pdf" };
        let output = self
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(report_file_name(&client_name, extension)));

        let written = if self.html {
            std::fs::write(&output, report.to_html())
        } else {
            std::fs::write(&output, report.to_pdf().context("Failed to render PDF")?)
        };
        written.with_context(|| format!("Failed to write {}", output.display()))?;

        println!("Report written to: {}", output.display());
        println!("{}", report.analysis.narrative.text());

        if self.open {
            opener::open(&output)?;
        }
        Ok(())
    }
}
