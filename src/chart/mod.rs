//! Chart rendering.
//!
//! Charts are assembled as SVG and rasterized to PNG with `resvg`, using a
//! font database owned by the [`ChartRenderer`] for the current request.

mod comparison;
mod performance;
pub(crate) mod svg;

pub use comparison::{comparison_chart_svg, ComparisonLabels};
pub use performance::performance_chart_svg;

use crate::core::{PerformanceSeries, ReturnSnapshot};
use resvg::tiny_skia::{Pixmap, Transform};
use std::{fmt, path::PathBuf};

/// Raster scale applied to the SVG canvas (150 dpi for a 9x6in figure)
pub const RASTER_SCALE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Performance,
    Comparison,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Performance => write!(f, "performance"),
            ChartKind::Comparison => write!(f, "comparison"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
#[error("failed to render {chart} chart: {reason}")]
pub struct RenderingFailure {
    pub chart: ChartKind,
    pub reason: String,
}

/// An encoded PNG chart
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartImage {
    png: Vec<u8>,
    width: u32,
    height: u32,
}

impl ChartImage {
    /// `None` for an empty encoding or a zero-sized image
    pub fn new(png: Vec<u8>, width: u32, height: u32) -> Option<Self> {
        if png.is_empty() || width == 0 || height == 0 {
            return None;
        }
        Some(ChartImage { png, width, height })
    }

    pub fn png(&self) -> &[u8] {
        &self.png
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Height over width
    pub fn aspect_ratio(&self) -> f32 {
        self.height as f32 / self.width as f32
    }
}

pub struct ChartRenderer {
    options: usvg::Options<'static>,
    scale: f32,
}

impl ChartRenderer {
    /// Renderer with system fonts plus any fonts found in `font_dirs`
    pub fn new(font_dirs: &[PathBuf]) -> Self {
        let mut options = usvg::Options {
            font_family: "DejaVu Sans".to_string(),
            ..usvg::Options::default()
        };
        let fontdb = options.fontdb_mut();
        fontdb.load_system_fonts();
        for dir in font_dirs {
            log::debug!("Loading fonts from {}", dir.display());
            fontdb.load_fonts_dir(dir);
        }
        log::debug!("Font database holds {} faces", fontdb.len());

        ChartRenderer {
            options,
            scale: RASTER_SCALE,
        }
    }

    /// Font database shared with the PDF writer
    pub fn fonts(&self) -> &usvg::fontdb::Database {
        &self.options.fontdb
    }

    pub fn performance_chart(&self, series: &PerformanceSeries) -> Result<ChartImage, RenderingFailure> {
        if series.is_empty() {
            return Err(RenderingFailure {
                chart: ChartKind::Performance,
                reason: "series has no points".to_string(),
            });
        }
        self.rasterize(ChartKind::Performance, &performance_chart_svg(series))
    }

    pub fn comparison_chart(
        &self,
        snapshot: &ReturnSnapshot,
        labels: &ComparisonLabels,
    ) -> Result<ChartImage, RenderingFailure> {
        self.rasterize(ChartKind::Comparison, &comparison_chart_svg(snapshot, labels))
    }

    fn rasterize(&self, chart: ChartKind, svg: &str) -> Result<ChartImage, RenderingFailure> {
        let fail = |reason: String| RenderingFailure { chart, reason };

        let tree = usvg::Tree::from_str(svg, &self.options).map_err(|e| fail(e.to_string()))?;
        let size = tree.size();
        let width = (size.width() * self.scale).ceil() as u32;
        let height = (size.height() * self.scale).ceil() as u32;

        let mut pixmap = Pixmap::new(width, height)
            .ok_or_else(|| fail(format!("cannot allocate a {width}x{height} canvas")))?;
        resvg::render(&tree, Transform::from_scale(self.scale, self.scale), &mut pixmap.as_mut());

        let png = pixmap.encode_png().map_err(|e| fail(e.to_string()))?;
        log::debug!("Rendered {} chart: {}x{}, {} bytes", chart, width, height, png.len());
        ChartImage::new(png, width, height).ok_or_else(|| fail("empty image".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{build_series, CellValue, ValuationPoint};
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    const PNG_MAGIC: &[u8] = b"\x89PNG\r\n\x1a\n";

    #[test]
    fn chart_image_rejects_empty() {
        assert!(ChartImage::new(vec![], 10, 10).is_none());
        assert!(ChartImage::new(vec![1], 0, 10).is_none());
        let image = ChartImage::new(vec![1, 2, 3], 200, 100).unwrap();
        assert_eq!(image.aspect_ratio(), 0.5);
    }

    #[test]
    fn failure_message() {
        let failure = RenderingFailure {
            chart: ChartKind::Comparison,
            reason: "boom".to_string(),
        };
        assert_eq!(failure.to_string(), "failed to render comparison chart: boom");
    }

    #[test]
    fn renders_performance_png() {
        let renderer = ChartRenderer::new(&[]);
        let valuation = ValuationPoint {
            date: NaiveDate::from_ymd_opt(2023, 6, 1).unwrap(),
            portfolio_value: dec!(105000),
        };
        let image = renderer
            .performance_chart(&build_series(&[], &valuation))
            .unwrap();
        assert!(image.png().starts_with(PNG_MAGIC));
        assert_eq!(image.width(), 1350);
        assert_eq!(image.height(), 900);
    }

    #[test]
    fn renders_comparison_png() {
        let renderer = ChartRenderer::new(&[]);
        let snapshot = ReturnSnapshot {
            as_of: None,
            subject_value: CellValue::Number(dec!(105000)),
            benchmark_value: CellValue::Empty,
            absolute_appreciation: CellValue::Number(dec!(5000)),
            subject_pct: CellValue::Number(dec!(0.05)),
            benchmark_pct: CellValue::Number(dec!(0.03)),
            subject_annualized_pct: CellValue::Number(dec!(0.3)),
            benchmark_annualized_pct: CellValue::Number(dec!(0.2)),
        };
        let image = renderer
            .comparison_chart(&snapshot, &ComparisonLabels::default())
            .unwrap();
        assert!(image.png().starts_with(PNG_MAGIC));
    }

    #[test]
    fn empty_series_is_a_failure() {
        let renderer = ChartRenderer::new(&[]);
        let err = renderer
            .performance_chart(&PerformanceSeries { points: vec![] })
            .unwrap_err();
        assert_eq!(err.chart, ChartKind::Performance);
    }
}
