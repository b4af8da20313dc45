//! Four-page report layout.
//!
//! [`compose`] places the cover details, charts and narrative onto fixed
//! pages. Positions are normalized to the page (0..1 from the top-left), so
//! the same [`ReportDocument`] feeds both the PDF and HTML writers.

mod assets;
pub mod html;
pub mod pdf;

pub use assets::{Background, Backgrounds};

use crate::chart::ChartImage;
use crate::core::Narrative;
use chrono::NaiveDate;
use std::fmt;

/// 16:9 landscape page
pub const PAGE_WIDTH_MM: f32 = 338.67;
pub const PAGE_HEIGHT_MM: f32 = 190.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageKind {
    Cover,
    Performance,
    Comparison,
    Closing,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [
        PageKind::Cover,
        PageKind::Performance,
        PageKind::Comparison,
        PageKind::Closing,
    ];

    /// Background image file name within the assets directory
    pub fn background_file(self) -> &'static str {
        match self {
            PageKind::Cover => "cover.png",
            PageKind::Performance => "performance.png",
            PageKind::Comparison => "comparison.png",
            PageKind::Closing => "closing.png",
        }
    }

    /// Heading drawn when the page has no background artwork
    pub fn fallback_heading(self) -> &'static str {
        match self {
            PageKind::Cover => "Portfolio Report",
            PageKind::Performance => "Portfolio Performance",
            PageKind::Comparison => "Return Comparison",
            PageKind::Closing => "Thank You",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Cover => write!(f, "cover"),
            PageKind::Performance => write!(f, "performance"),
            PageKind::Comparison => write!(f, "comparison"),
            PageKind::Closing => write!(f, "closing"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const INK: Color = Color::rgb(0x1F, 0x1F, 0x1F);
    pub const ACCENT: Color = Color::rgb(0xCC, 0x55, 0x00);
    pub const PAPER: Color = Color::rgb(0xF7, 0xF3, 0xEE);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }

    pub fn hex(&self) -> String {
        format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Normalized rectangle, origin top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextRun {
    pub text: String,
    pub emphasis: bool,
}

impl TextRun {
    pub fn plain(text: impl Into<String>) -> Self {
        TextRun {
            text: text.into(),
            emphasis: false,
        }
    }
}

/// Text anchored at `x` (left edge or center) with its first baseline at `y`,
/// wrapped to `max_width`.
#[derive(Debug, Clone, PartialEq)]
pub struct TextBlock {
    pub runs: Vec<TextRun>,
    pub x: f32,
    pub y: f32,
    pub max_width: f32,
    /// Font size in points
    pub size: f32,
    pub align: Align,
    pub color: Color,
    /// Color of emphasized runs
    pub emphasis_color: Color,
}

impl TextBlock {
    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    Text(TextBlock),
    Image { image: ChartImage, frame: Frame },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    pub background: Option<Background>,
    pub elements: Vec<Element>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportDocument {
    pub title: String,
    pub pages: Vec<Page>,
}

/// Everything that appears on the report besides the backgrounds
#[derive(Debug, Clone)]
pub struct ReportContent<'a> {
    pub client_name: &'a str,
    pub report_date: NaiveDate,
    pub name_font_size: u32,
    pub performance_chart: ChartImage,
    pub comparison_chart: ChartImage,
    pub narrative: &'a Narrative,
}

/// Lay out the four report pages.
pub fn compose(content: ReportContent<'_>, backgrounds: &Backgrounds) -> ReportDocument {
    let page = |kind: PageKind, mut elements: Vec<Element>| {
        let background = backgrounds.get(kind).cloned();
        if background.is_none() {
            elements.insert(0, heading(kind.fallback_heading()));
        }
        Page {
            kind,
            background,
            elements,
        }
    };

    let cover = vec![
        Element::Text(TextBlock {
            runs: vec![TextRun::plain(content.client_name)],
            x: 0.08,
            y: 0.55,
            max_width: 0.84,
            size: content.name_font_size as f32,
            align: Align::Left,
            color: Color::INK,
            emphasis_color: Color::ACCENT,
        }),
        Element::Text(TextBlock {
            runs: vec![TextRun::plain(
                content.report_date.format("%d %B %Y").to_string(),
            )],
            x: 0.08,
            y: 0.55 + 0.05 + content.name_font_size as f32 / 540.0,
            max_width: 0.84,
            size: 20.0,
            align: Align::Left,
            color: Color::INK,
            emphasis_color: Color::ACCENT,
        }),
    ];

    let narrative = TextBlock {
        runs: content
            .narrative
            .spans
            .iter()
            .map(|s| TextRun {
                text: s.text.clone(),
                emphasis: s.emphasis,
            })
            .collect(),
        x: 0.5,
        y: 0.89,
        max_width: 0.84,
        size: 16.0,
        align: Align::Center,
        color: Color::INK,
        emphasis_color: Color::ACCENT,
    };
    let performance = vec![
        image_centered(content.performance_chart, 0.12, 0.70),
        Element::Text(narrative),
    ];

    let comparison = vec![image_centered(content.comparison_chart, 0.14, 0.74)];

    ReportDocument {
        title: format!("{} Asset Report", content.client_name),
        pages: vec![
            page(PageKind::Cover, cover),
            page(PageKind::Performance, performance),
            page(PageKind::Comparison, comparison),
            page(PageKind::Closing, Vec::new()),
        ],
    }
}

fn heading(text: &str) -> Element {
    Element::Text(TextBlock {
        runs: vec![TextRun::plain(text)],
        x: 0.05,
        y: 0.1,
        max_width: 0.9,
        size: 28.0,
        align: Align::Left,
        color: Color::ACCENT,
        emphasis_color: Color::ACCENT,
    })
}

/// Center an image horizontally, fitting it within the given height and
/// 90% of the page width while keeping its aspect ratio.
fn image_centered(image: ChartImage, top: f32, max_height: f32) -> Element {
    let page_aspect = PAGE_HEIGHT_MM / PAGE_WIDTH_MM;
    // image height as a fraction of page height, for a given width fraction
    let height_for = |width: f32| width * image.aspect_ratio() / page_aspect;

    let mut width = 0.9;
    let mut height = height_for(width);
    if height > max_height {
        height = max_height;
        width = max_height * page_aspect / image.aspect_ratio();
    }

    Element::Image {
        frame: Frame {
            x: (1.0 - width) / 2.0,
            y: top,
            width,
            height,
        },
        image,
    }
}

/// Greedy word wrap of styled runs into lines no wider than `max_width`,
/// measuring with `measure(text)`. Words longer than a line are kept whole.
pub fn wrap_runs(
    runs: &[TextRun],
    max_width: f32,
    measure: impl Fn(&str) -> f32,
) -> Vec<Vec<TextRun>> {
    let mut lines: Vec<Vec<TextRun>> = Vec::new();
    let mut line: Vec<TextRun> = Vec::new();
    let mut line_text = String::new();

    for run in runs {
        for word in run.text.split_inclusive(' ') {
            let candidate = format!("{line_text}{}", word.trim_end());
            if !line_text.is_empty() && measure(&candidate) > max_width {
                trim_line_end(&mut line);
                lines.push(std::mem::take(&mut line));
                line_text.clear();
            }
            if line_text.is_empty() && word.trim().is_empty() {
                continue;
            }
            line_text.push_str(word);
            match line.last_mut() {
                Some(last) if last.emphasis == run.emphasis => last.text.push_str(word),
                _ => line.push(TextRun {
                    text: word.to_string(),
                    emphasis: run.emphasis,
                }),
            }
        }
    }
    trim_line_end(&mut line);
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

fn trim_line_end(line: &mut Vec<TextRun>) {
    if let Some(last) = line.last_mut() {
        let trimmed = last.text.trim_end().len();
        last.text.truncate(trimmed);
        if last.text.is_empty() {
            line.pop();
        }
    }
}

/// Width estimate used for layout: 0.6em per character
pub fn approx_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * 0.6
}
