use super::svg::{approx_text_width, Axis, SvgDocument, TextStyle};
use crate::core::{CellValue, ReturnSnapshot};
use rust_decimal::prelude::*;

const WIDTH: f32 = 1000.0;
const HEIGHT: f32 = 520.0;
const PANEL_WIDTH: f32 = WIDTH / 2.0;
const PLOT_TOP: f32 = 90.0;
const PLOT_BOTTOM: f32 = HEIGHT - 70.0;
const BAR_WIDTH: f32 = 130.0;

const SUBJECT_COLOR: &str = "#CC5500";
const BENCHMARK_COLOR: &str = "#4A6FA5";
const TEXT_COLOR: &str = "#333333";
const INSIDE_LABEL_SIZE: f32 = 20.0;

/// Legend text for the two bars of each group
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonLabels {
    pub subject: String,
    pub benchmark: String,
}

impl Default for ComparisonLabels {
    fn default() -> Self {
        ComparisonLabels {
            subject: "Your Portfolio".to_string(),
            benchmark: "Benchmark".to_string(),
        }
    }
}

struct Bar<'a> {
    label: &'a str,
    value: &'a CellValue,
    color: &'static str,
}

/// Build the two-panel return comparison: absolute return on the left,
/// annualized return on the right, subject and benchmark side by side.
pub fn comparison_chart_svg(snapshot: &ReturnSnapshot, labels: &ComparisonLabels) -> String {
    let mut doc = SvgDocument::new(WIDTH, HEIGHT);

    let panels = [
        (
            "Absolute Return",
            &snapshot.subject_pct,
            &snapshot.benchmark_pct,
        ),
        (
            "Annualized Return",
            &snapshot.subject_annualized_pct,
            &snapshot.benchmark_annualized_pct,
        ),
    ];

    for (i, (title, subject, benchmark)) in panels.into_iter().enumerate() {
        let bars = [
            Bar {
                label: &labels.subject,
                value: subject,
                color: SUBJECT_COLOR,
            },
            Bar {
                label: &labels.benchmark,
                value: benchmark,
                color: BENCHMARK_COLOR,
            },
        ];
        draw_panel(&mut doc, PANEL_WIDTH * i as f32, title, &bars);
    }

    doc.finish()
}

fn draw_panel(doc: &mut SvgDocument, left: f32, title: &str, bars: &[Bar<'_>]) {
    let center = left + PANEL_WIDTH / 2.0;
    doc.text(center, 45.0, title, TextStyle::new(24.0, TEXT_COLOR).bold());

    let values: Vec<f64> = bars
        .iter()
        .map(|b| b.value.as_decimal().to_f64().unwrap_or(0.0))
        .collect();
    let lo = values.iter().copied().fold(0.0, f64::min);
    let hi = values.iter().copied().fold(0.0, f64::max);
    let span = (hi - lo).abs();
    let axis = Axis::covering(lo - span * 0.1, hi + span * 0.1, 4);
    let y = |v: f64| axis.project(v, PLOT_BOTTOM, PLOT_TOP);

    let zero = y(0.0);
    doc.line(
        (left + 40.0, zero),
        (left + PANEL_WIDTH - 40.0, zero),
        TEXT_COLOR,
        1.0,
        false,
        1.0,
    );

    let slot = (PANEL_WIDTH - 80.0) / bars.len() as f32;
    for (j, (bar, value)) in bars.iter().zip(&values).enumerate() {
        let x_center = left + 40.0 + slot * (j as f32 + 0.5);
        let top = y(value.max(0.0));
        let bottom = y(value.min(0.0));
        let height = bottom - top;
        doc.rect(x_center - BAR_WIDTH / 2.0, top, BAR_WIDTH, height, bar.color);

        let text = bar.value.display_percentage();
        let fits = height >= INSIDE_LABEL_SIZE + 10.0
            && approx_text_width(&text, INSIDE_LABEL_SIZE) <= BAR_WIDTH;
        if fits {
            doc.text(
                x_center,
                top + height / 2.0 + INSIDE_LABEL_SIZE * 0.35,
                &text,
                TextStyle::new(INSIDE_LABEL_SIZE, "#FFFFFF").bold(),
            );
        } else {
            // too small to hold the label: place it just outside the bar
            let ty = if *value < 0.0 { bottom + INSIDE_LABEL_SIZE + 4.0 } else { top - 8.0 };
            doc.text(
                x_center,
                ty,
                &text,
                TextStyle::new(INSIDE_LABEL_SIZE, TEXT_COLOR).bold(),
            );
        }

        doc.text(
            x_center,
            PLOT_BOTTOM + 40.0,
            bar.label,
            TextStyle::new(18.0, TEXT_COLOR),
        );
    }
}
