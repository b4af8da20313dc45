//! Inspect command - show what a workbook yields without rendering

use super::{print_warnings, read_workbook};
use clap::Args;
use folio_report::core::{format_currency, PointKind};
use folio_report::report::{analyze, PortfolioAnalysis};
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct InspectCommand {
    /// Client workbook (xlsx, xls or ods)
    #[arg(short, long)]
    workbook: PathBuf,

    /// Output the full analysis as JSON
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output the chart series as CSV
    #[arg(long)]
    csv: bool,
}

/// One point of the performance chart
#[derive(Debug, Clone, Tabled, serde::Serialize)]
struct PointRow {
    #[tabled(rename = "Label")]
    label: String,

    #[tabled(rename = "Date")]
    date: String,

    #[tabled(rename = "Net Flow")]
    net_flow: String,

    #[tabled(rename = "Value")]
    value: String,
}

#[derive(Debug, Clone, Tabled)]
struct FigureRow {
    #[tabled(rename = "Figure")]
    figure: &'static str,

    #[tabled(rename = "Portfolio")]
    subject: String,

    #[tabled(rename = "Benchmark")]
    benchmark: String,
}

impl InspectCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let workbook = read_workbook(&self.workbook)?;
        let analysis = analyze(&workbook)?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&analysis)?);
            return Ok(());
        }

        let rows = point_rows(&analysis);
        if self.csv {
            self.write_csv(&rows)?;
        } else {
            self.print_tables(&analysis, rows);
        }
        print_warnings(&analysis.warnings);
        Ok(())
    }

    fn print_tables(&self, analysis: &PortfolioAnalysis, rows: Vec<PointRow>) {
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("PERFORMANCE SERIES");
        println!("{}", table);
        println!();

        let snapshot = &analysis.snapshot;
        let figures = vec![
            FigureRow {
                figure: "Value",
                subject: snapshot.subject_value.display_currency(),
                benchmark: snapshot.benchmark_value.display_currency(),
            },
            FigureRow {
                figure: "Absolute Return",
                subject: snapshot.subject_pct.display_percentage(),
                benchmark: snapshot.benchmark_pct.display_percentage(),
            },
            FigureRow {
                figure: "Annualized Return",
                subject: snapshot.subject_annualized_pct.display_percentage(),
                benchmark: snapshot.benchmark_annualized_pct.display_percentage(),
            },
        ];
        let as_of = snapshot
            .as_of
            .map_or("latest row".to_string(), |d| d.format("%d %b %Y").to_string());
        println!("RETURNS ({})", as_of);
        println!(
            "{}",
            Table::new(figures)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        );
        println!();
        println!("{}", analysis.narrative.text());
    }

    fn write_csv(&self, rows: &[PointRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

fn point_rows(analysis: &PortfolioAnalysis) -> Vec<PointRow> {
    analysis
        .series
        .points
        .iter()
        .map(|point| PointRow {
            label: point.label.clone(),
            date: point.date.format("%Y-%m-%d").to_string(),
            net_flow: match point.kind {
                PointKind::Flow { net } => format_currency(net),
                PointKind::Valuation => String::new(),
            },
            value: format_currency(point.value),
        })
        .collect()
}
