//! Self-contained HTML rendition of the report
//!
//! Images are inlined as base64 data URIs, so the file can be opened or
//! printed without the assets directory.

use super::{Align, Element, Frame, Page, ReportDocument, TextBlock, PAGE_HEIGHT_MM, PAGE_WIDTH_MM};
use crate::chart::svg::escape;
use base64::{engine::general_purpose::STANDARD, Engine as _};

pub fn render(document: &ReportDocument) -> String {
    let pages: String = document.pages.iter().map(page).collect();

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
{css}
    </style>
</head>
<body>
{pages}</body>
</html>
"##,
        title = escape(&document.title),
        css = css(),
        pages = pages,
    )
}

fn css() -> String {
    format!(
        r#"        @page {{ size: {w}mm {h}mm; margin: 0; }}
        * {{ box-sizing: border-box; margin: 0; padding: 0; }}
        body {{ font-family: "DejaVu Sans", "Liberation Sans", Arial, sans-serif; }}
        .page {{
            position: relative;
            width: {w}mm;
            height: {h}mm;
            overflow: hidden;
            page-break-after: always;
            background-color: #F7F3EE;
            background-size: cover;
            background-position: center;
        }}
        .page:last-child {{ page-break-after: auto; }}
        .text {{ position: absolute; line-height: 1.3; }}
        .image {{ position: absolute; }}"#,
        w = PAGE_WIDTH_MM,
        h = PAGE_HEIGHT_MM,
    )
}

fn page(page: &Page) -> String {
    let background = page
        .background
        .as_ref()
        .map(|bg| format!(r#" style="background-image: url('{}')""#, data_uri(&bg.png)))
        .unwrap_or_default();
    let elements: String = page
        .elements
        .iter()
        .map(|element| match element {
            Element::Text(block) => text(block),
            Element::Image { image, frame } => image_tag(image.png(), frame),
        })
        .collect();

    format!(
        "<section class=\"page {kind}\"{background}>\n{elements}</section>\n",
        kind = page.kind,
    )
}

fn text(block: &TextBlock) -> String {
    let (left, align) = match block.align {
        Align::Left => (block.x, "left"),
        Align::Center => (block.x - block.max_width / 2.0, "center"),
    };
    let runs: String = block
        .runs
        .iter()
        .map(|run| {
            if run.emphasis {
                format!(
                    r#"<strong style="color: {}">{}</strong>"#,
                    block.emphasis_color.hex(),
                    escape(&run.text)
                )
            } else {
                escape(&run.text)
            }
        })
        .collect();

    format!(
        "<div class=\"text\" style=\"left: {:.2}%; top: calc({:.2}% - {:.1}pt); width: {:.2}%; font-size: {}pt; color: {}; text-align: {align}\">{runs}</div>\n",
        left * 100.0,
        block.y * 100.0,
        block.size,
        block.max_width * 100.0,
        block.size,
        block.color.hex(),
    )
}

fn image_tag(png: &[u8], frame: &Frame) -> String {
    format!(
        "<img class=\"image\" src=\"{}\" style=\"left: {:.2}%; top: {:.2}%; width: {:.2}%; height: {:.2}%\">\n",
        data_uri(png),
        frame.x * 100.0,
        frame.y * 100.0,
        frame.width * 100.0,
        frame.height * 100.0,
    )
}

fn data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}
