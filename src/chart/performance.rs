use super::svg::{approx_text_width, Anchor, Axis, SvgDocument, TextStyle};
use crate::core::{format_currency, format_indian_number, PerformanceSeries, PointKind};
use rust_decimal::prelude::*;

const WIDTH: f32 = 900.0;
const HEIGHT: f32 = 600.0;
const PLOT_LEFT: f32 = 120.0;
const PLOT_RIGHT: f32 = WIDTH - 40.0;
const PLOT_TOP: f32 = 40.0;
const PLOT_BOTTOM: f32 = HEIGHT - 90.0;

const AREA_FILL: &str = "#FFA366";
const LINE_COLOR: &str = "#CC5500";
const GAIN_COLOR: &str = "#1B7F3B";
const LOSS_COLOR: &str = "#C62828";
const TEXT_COLOR: &str = "#333333";
const GRID_COLOR: &str = "#000000";

const ANNOTATION_SIZE: f32 = 15.0;
const LABEL_SIZE: f32 = 14.0;

/// Build the cumulative capital chart: a filled area with a line and markers,
/// each fiscal-year point annotated with its net flow and the final point
/// with the portfolio value.
pub fn performance_chart_svg(series: &PerformanceSeries) -> String {
    let mut doc = SvgDocument::new(WIDTH, HEIGHT);
    let values: Vec<f64> = series
        .points
        .iter()
        .map(|p| p.value.to_f64().unwrap_or(0.0))
        .collect();

    let lo = values.iter().copied().fold(0.0, f64::min);
    let hi = values.iter().copied().fold(0.0, f64::max);
    // headroom above the highest point for its annotation
    let axis = Axis::covering(lo, hi + (hi - lo).abs() * 0.15, 5);
    let y = |v: f64| axis.project(v, PLOT_BOTTOM, PLOT_TOP);

    for tick in axis.ticks() {
        let ty = y(tick);
        doc.line((PLOT_LEFT, ty), (PLOT_RIGHT, ty), GRID_COLOR, 1.0, true, 0.3);
        let label = Decimal::from_f64(tick)
            .map(|d| format_indian_number(d, 0))
            .unwrap_or_default();
        doc.text(
            PLOT_LEFT - 10.0,
            ty + 5.0,
            &label,
            TextStyle::new(LABEL_SIZE, TEXT_COLOR).anchor(Anchor::End),
        );
    }
    doc.line((PLOT_LEFT, PLOT_BOTTOM), (PLOT_RIGHT, PLOT_BOTTOM), TEXT_COLOR, 1.0, false, 1.0);

    let count = series.len().max(1) as f32;
    let step = (PLOT_RIGHT - PLOT_LEFT) / count;
    let points: Vec<(f32, f32)> = values
        .iter()
        .enumerate()
        .map(|(i, v)| (PLOT_LEFT + step * (i as f32 + 0.5), y(*v)))
        .collect();

    if let (Some(first), Some(last)) = (points.first(), points.last()) {
        let base = y(0.0);
        let mut area = Vec::with_capacity(points.len() + 2);
        area.push((first.0, base));
        area.extend(points.iter().copied());
        area.push((last.0, base));
        if points.len() == 1 {
            // a lone point still gets a visible column of fill
            let half = (step * 0.15).min(20.0);
            area = vec![
                (first.0 - half, base),
                (first.0 - half, first.1),
                (first.0 + half, first.1),
                (first.0 + half, base),
            ];
        }
        doc.polygon(&area, AREA_FILL, 0.9);
        doc.polyline(&points, LINE_COLOR, 2.0);
    }

    let rotate_labels = series.len() > 6;
    for (point, &(px, py)) in series.points.iter().zip(&points) {
        doc.circle((px, py), 5.0, LINE_COLOR);

        match point.kind {
            PointKind::Flow { net } => annotate_flow(&mut doc, px, py, net),
            PointKind::Valuation => doc.text(
                px,
                py - 14.0,
                &format_currency(point.value),
                TextStyle::new(ANNOTATION_SIZE, LINE_COLOR).bold(),
            ),
        }

        let mut style = TextStyle::new(LABEL_SIZE, TEXT_COLOR);
        if matches!(point.kind, PointKind::Valuation) {
            style = style.bold();
        }
        if rotate_labels {
            style = style.anchor(Anchor::End).rotate(-30.0);
        }
        doc.text(px, PLOT_BOTTOM + 24.0, &point.label, style);
    }

    doc.finish()
}

/// Net flow label with a direction marker: "▲ 1,00,000" or "▼ (40,000)"
fn annotate_flow(doc: &mut SvgDocument, x: f32, y: f32, net: Decimal) {
    let gain = !net.is_sign_negative();
    let text = if gain {
        format_indian_number(net, 0)
    } else {
        format!("({})", format_indian_number(net.abs(), 0))
    };
    let color = if gain { GAIN_COLOR } else { LOSS_COLOR };

    let baseline = y - 14.0;
    let text_width = approx_text_width(&text, ANNOTATION_SIZE);
    let marker_x = x - text_width / 2.0 - 10.0;
    let mid = baseline - ANNOTATION_SIZE * 0.35;
    let marker = if gain {
        [(marker_x - 6.0, mid + 5.0), (marker_x + 6.0, mid + 5.0), (marker_x, mid - 6.0)]
    } else {
        [(marker_x - 6.0, mid - 5.0), (marker_x + 6.0, mid - 5.0), (marker_x, mid + 6.0)]
    };
    doc.polygon(&marker, color, 1.0);
    doc.text(x, baseline, &text, TextStyle::new(ANNOTATION_SIZE, color).bold());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{aggregate_fiscal_years, build_series, CashFlowRow, ValuationPoint};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(rows: &[CashFlowRow], valuation: Decimal) -> PerformanceSeries {
        let buckets = aggregate_fiscal_years(rows).unwrap();
        build_series(
            &buckets,
            &ValuationPoint {
                date: date(2024, 6, 1),
                portfolio_value: valuation,
            },
        )
    }

    #[test]
    fn annotates_flows_and_terminal_value() {
        let rows = vec![
            CashFlowRow::new(date(2022, 5, 1), dec!(100000), dec!(0)),
            CashFlowRow::new(date(2023, 7, 1), dec!(0), dec!(40000)),
        ];
        let svg = performance_chart_svg(&series(&rows, dec!(75000)));

        assert!(svg.contains(">1,00,000</text>"));
        assert!(svg.contains(">(40,000)</text>"));
        assert!(svg.contains(GAIN_COLOR));
        assert!(svg.contains(LOSS_COLOR));
        assert!(svg.contains(">₹ 75,000.00</text>"));
        assert!(svg.contains(">FY 2022-23</text>"));
        assert!(svg.contains(">FY 2023-24</text>"));
        assert!(svg.contains(">01 Jun 2024</text>"));
        assert_eq!(svg.matches("<circle").count(), 3);
    }

    #[test]
    fn single_point_chart() {
        let svg = performance_chart_svg(&series(&[], dec!(105000)));
        assert_eq!(svg.matches("<circle").count(), 1);
        assert!(svg.contains("<polygon"));
        assert!(!svg.contains("<polyline"));
        assert!(svg.contains(">₹ 1,05,000.00</text>"));
    }

    #[test]
    fn long_series_rotates_labels() {
        let rows: Vec<_> = (2015..2023)
            .map(|y| CashFlowRow::new(date(y, 6, 1), dec!(1000), dec!(0)))
            .collect();
        let svg = performance_chart_svg(&series(&rows, dec!(9000)));
        assert!(svg.contains("rotate(-30"));
    }
}
