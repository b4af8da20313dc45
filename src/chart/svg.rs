//! Minimal SVG writer used by the chart builders

pub(crate) const FONT_FAMILY: &str =
    "Open Sans, DejaVu Sans, Liberation Sans, Arial, Helvetica, sans-serif";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Anchor {
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct TextStyle<'a> {
    pub size: f32,
    pub fill: &'a str,
    pub anchor: Anchor,
    pub bold: bool,
    /// Rotation in degrees around the text origin
    pub rotate: Option<f32>,
}

impl<'a> TextStyle<'a> {
    pub fn new(size: f32, fill: &'a str) -> Self {
        TextStyle {
            size,
            fill,
            anchor: Anchor::Middle,
            bold: false,
            rotate: None,
        }
    }

    pub fn anchor(mut self, anchor: Anchor) -> Self {
        self.anchor = anchor;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn rotate(mut self, degrees: f32) -> Self {
        self.rotate = Some(degrees);
        self
    }
}

pub(crate) struct SvgDocument {
    width: f32,
    height: f32,
    body: String,
}

impl SvgDocument {
    pub fn new(width: f32, height: f32) -> Self {
        SvgDocument {
            width,
            height,
            body: String::new(),
        }
    }

    pub fn rect(&mut self, x: f32, y: f32, width: f32, height: f32, fill: &str) {
        self.body.push_str(&format!(
            r#"<rect x="{x:.2}" y="{y:.2}" width="{:.2}" height="{:.2}" fill="{fill}"/>"#,
            width.max(0.0),
            height.max(0.0)
        ));
        self.body.push('\n');
    }

    pub fn line(&mut self, from: (f32, f32), to: (f32, f32), stroke: &str, width: f32, dashed: bool, opacity: f32) {
        let dash = if dashed { r#" stroke-dasharray="6 4""# } else { "" };
        self.body.push_str(&format!(
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{stroke}" stroke-width="{width}" stroke-opacity="{opacity}"{dash}/>"#,
            from.0, from.1, to.0, to.1
        ));
        self.body.push('\n');
    }

    /// Closed filled polygon
    pub fn polygon(&mut self, points: &[(f32, f32)], fill: &str, opacity: f32) {
        if points.len() < 3 {
            return;
        }
        self.body.push_str(&format!(
            r#"<polygon points="{}" fill="{fill}" fill-opacity="{opacity}"/>"#,
            point_list(points)
        ));
        self.body.push('\n');
    }

    pub fn polyline(&mut self, points: &[(f32, f32)], stroke: &str, width: f32) {
        if points.len() < 2 {
            return;
        }
        self.body.push_str(&format!(
            r#"<polyline points="{}" fill="none" stroke="{stroke}" stroke-width="{width}" stroke-linejoin="round"/>"#,
            point_list(points)
        ));
        self.body.push('\n');
    }

    pub fn circle(&mut self, center: (f32, f32), radius: f32, fill: &str) {
        self.body.push_str(&format!(
            r#"<circle cx="{:.2}" cy="{:.2}" r="{radius}" fill="{fill}" stroke="white" stroke-width="1.5"/>"#,
            center.0, center.1
        ));
        self.body.push('\n');
    }

    pub fn text(&mut self, x: f32, y: f32, content: &str, style: TextStyle<'_>) {
        let weight = if style.bold { "bold" } else { "normal" };
        let transform = style
            .rotate
            .map(|deg| format!(r#" transform="rotate({deg} {x:.2} {y:.2})""#))
            .unwrap_or_default();
        self.body.push_str(&format!(
            r#"<text x="{x:.2}" y="{y:.2}" font-family="{FONT_FAMILY}" font-size="{}" font-weight="{weight}" fill="{}" text-anchor="{}"{transform}>{}</text>"#,
            style.size,
            style.fill,
            style.anchor.as_str(),
            escape(content)
        ));
        self.body.push('\n');
    }

    pub fn finish(self) -> String {
        format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">
{body}</svg>
"#,
            w = self.width,
            h = self.height,
            body = self.body
        )
    }
}

fn point_list(points: &[(f32, f32)]) -> String {
    points
        .iter()
        .map(|(x, y)| format!("{x:.2},{y:.2}"))
        .collect::<Vec<_>>()
        .join(" ")
}

pub(crate) fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Rough text width for layout decisions; fonts are not measured
pub(crate) fn approx_text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.55
}

/// A linear value axis with "nice" tick spacing
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Axis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

impl Axis {
    /// Axis covering `lo..=hi` (always including zero) with roughly
    /// `target_ticks` intervals. A degenerate range becomes `0..=1`.
    pub fn covering(lo: f64, hi: f64, target_ticks: usize) -> Self {
        let lo = if lo.is_finite() { lo.min(0.0) } else { 0.0 };
        let mut hi = if hi.is_finite() { hi.max(0.0) } else { 0.0 };
        if hi - lo <= f64::EPSILON {
            hi = lo + 1.0;
        }
        let step = nice_step((hi - lo) / target_ticks.max(1) as f64);
        Axis {
            min: (lo / step).floor() * step,
            max: (hi / step).ceil() * step,
            step,
        }
    }

    pub fn ticks(&self) -> Vec<f64> {
        let count = ((self.max - self.min) / self.step).round() as usize;
        (0..=count).map(|i| self.min + self.step * i as f64).collect()
    }

    /// Map a value onto the pixel interval `bottom..top` (SVG y grows down)
    pub fn project(&self, value: f64, bottom: f32, top: f32) -> f32 {
        let span = self.max - self.min;
        let t = ((value - self.min) / span).clamp(0.0, 1.0) as f32;
        bottom - t * (bottom - top)
    }
}

fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powf(raw.log10().floor());
    let residual = raw / magnitude;
    let nice = if residual <= 1.0 {
        1.0
    } else if residual <= 2.0 {
        2.0
    } else if residual <= 2.5 {
        2.5
    } else if residual <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
