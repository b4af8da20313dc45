//! PDF output via `printpdf`

use super::{
    approx_width, wrap_runs, Align, Color, Element, Frame, Page, ReportDocument, TextBlock,
    PAGE_HEIGHT_MM, PAGE_WIDTH_MM,
};
use crate::core::CURRENCY_SYMBOL;
use crate::error::ReportError;
use printpdf::font::ParsedFont;
use printpdf::graphics::{LinePoint, PaintMode, Point, Polygon, PolygonRing, WindingOrder};
use printpdf::image::RawImage;
use printpdf::matrix::TextMatrix;
use printpdf::ops::Op;
use printpdf::text::TextItem;
use printpdf::xobject::{XObject, XObjectTransform};
use printpdf::{BuiltinFont, FontId, Mm, PdfDocument, PdfPage, PdfSaveOptions, Pt, Rgb, XObjectId};
use usvg::fontdb;

const LINE_SPACING: f32 = 1.3;

/// Sans-serif families tried, in order, for the embedded font
const FONT_FAMILIES: &[&str] = &["DejaVu Sans", "Liberation Sans", "Noto Sans", "Open Sans", "Arial"];

#[derive(Debug, Clone)]
enum PdfFont {
    Embedded(FontId),
    /// No usable face in the font database; text is limited to WinAnsi
    Builtin(BuiltinFont),
}

/// Render the document to PDF bytes, embedding a sans-serif face from
/// `fonts` when one is available.
pub fn render(document: &ReportDocument, fonts: &fontdb::Database) -> Result<Vec<u8>, ReportError> {
    let mut doc = PdfDocument::new(&document.title);

    let font = match find_font(fonts) {
        Some(parsed) => PdfFont::Embedded(doc.add_font(&parsed)),
        None => {
            log::warn!("No sans-serif font found, falling back to built-in Helvetica");
            PdfFont::Builtin(BuiltinFont::Helvetica)
        }
    };

    let mut writer = PageWriter {
        doc: &mut doc,
        font,
        width: Mm(PAGE_WIDTH_MM).into_pt().0,
        height: Mm(PAGE_HEIGHT_MM).into_pt().0,
    };
    let mut pages = Vec::with_capacity(document.pages.len());
    for page in &document.pages {
        let ops = writer.page_ops(page)?;
        pages.push(PdfPage::new(Mm(PAGE_WIDTH_MM), Mm(PAGE_HEIGHT_MM), ops));
    }
    doc.pages.extend(pages);

    let mut warnings = Vec::new();
    let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
    if !warnings.is_empty() {
        log::debug!("PDF writer reported {} warnings", warnings.len());
    }
    log::info!("Rendered {} pages ({} bytes)", document.pages.len(), bytes.len());
    Ok(bytes)
}

fn find_font(fonts: &fontdb::Database) -> Option<ParsedFont> {
    let mut families: Vec<fontdb::Family<'_>> =
        FONT_FAMILIES.iter().map(|&name| fontdb::Family::Name(name)).collect();
    families.push(fontdb::Family::SansSerif);

    let id = fonts.query(&fontdb::Query {
        families: &families,
        ..fontdb::Query::default()
    })?;
    let (data, index) = fonts.with_face_data(id, |data, index| (data.to_vec(), index))?;

    let mut warnings = Vec::new();
    let parsed = ParsedFont::from_bytes(&data, index as usize, &mut warnings);
    if let Some(face) = fonts.face(id) {
        log::debug!("Embedding font {:?}", face.families.first().map(|(name, _)| name));
    }
    parsed
}

struct PageWriter<'a> {
    doc: &'a mut PdfDocument,
    font: PdfFont,
    /// Page size in points
    width: f32,
    height: f32,
}

impl PageWriter<'_> {
    fn page_ops(&mut self, page: &Page) -> Result<Vec<Op>, ReportError> {
        let mut ops = Vec::new();

        match &page.background {
            Some(background) => {
                let full_page = Frame {
                    x: 0.0,
                    y: 0.0,
                    width: 1.0,
                    height: 1.0,
                };
                self.image(&mut ops, &background.png, full_page)
                    .map_err(|e| ReportError::Document(format!("{}: {}", background.path.display(), e)))?;
            }
            None => self.fill(&mut ops, Color::PAPER),
        }

        for element in &page.elements {
            match element {
                Element::Image { image, frame } => self
                    .image(&mut ops, image.png(), *frame)
                    .map_err(|e| ReportError::Document(format!("{} chart: {}", page.kind, e)))?,
                Element::Text(block) => self.text(&mut ops, block),
            }
        }
        Ok(ops)
    }

    fn fill(&self, ops: &mut Vec<Op>, color: Color) {
        let corner = |x: f32, y: f32| LinePoint {
            p: Point { x: Pt(x), y: Pt(y) },
            bezier: false,
        };
        let polygon = Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    corner(0.0, 0.0),
                    corner(self.width, 0.0),
                    corner(self.width, self.height),
                    corner(0.0, self.height),
                ],
            }],
            mode: PaintMode::Fill,
            winding_order: WindingOrder::EvenOdd,
        };
        ops.push(Op::SetFillColor { col: pdf_color(color) });
        ops.push(Op::DrawPolygon { polygon });
    }

    fn image(&mut self, ops: &mut Vec<Op>, png: &[u8], frame: Frame) -> Result<(), String> {
        let mut warnings = Vec::new();
        let raw = RawImage::decode_from_bytes(png, &mut warnings).map_err(|e| e.to_string())?;
        let (img_w, img_h) = (raw.width as f32, raw.height as f32);
        let id = XObjectId::new();
        self.doc.resources.xobjects.map.insert(id.clone(), XObject::Image(raw));

        let width = frame.width * self.width;
        let height = frame.height * self.height;
        let transform = XObjectTransform {
            translate_x: Some(Pt(frame.x * self.width)),
            translate_y: Some(Pt(self.height - frame.y * self.height - height)),
            scale_x: Some(width / img_w),
            scale_y: Some(height / img_h),
            rotate: None,
            dpi: Some(72.0),
        };
        ops.push(Op::UseXobject { id, transform });
        Ok(())
    }

    fn text(&self, ops: &mut Vec<Op>, block: &TextBlock) {
        let measure = |text: &str| approx_width(&self.encode(text), block.size);
        let lines = wrap_runs(&block.runs, block.max_width * self.width, measure);

        ops.push(Op::StartTextSection);
        let mut baseline = self.height - block.y * self.height;
        for line in lines {
            let line_width: f32 = line.iter().map(|run| measure(&run.text)).sum();
            let mut x = match block.align {
                Align::Left => block.x * self.width,
                Align::Center => block.x * self.width - line_width / 2.0,
            };
            for run in &line {
                let color = if run.emphasis {
                    block.emphasis_color
                } else {
                    block.color
                };
                ops.push(Op::SetFillColor { col: pdf_color(color) });
                ops.push(Op::SetTextMatrix {
                    matrix: TextMatrix::Translate(Pt(x), Pt(baseline)),
                });
                self.write(ops, &run.text, block.size);
                x += measure(&run.text);
            }
            baseline -= block.size * LINE_SPACING;
        }
        ops.push(Op::EndTextSection);
    }

    fn write(&self, ops: &mut Vec<Op>, text: &str, size: f32) {
        let items = vec![TextItem::Text(self.encode(text))];
        match &self.font {
            PdfFont::Embedded(font) => {
                ops.push(Op::SetFontSize {
                    size: Pt(size),
                    font: font.clone(),
                });
                ops.push(Op::WriteText {
                    items,
                    font: font.clone(),
                });
            }
            PdfFont::Builtin(font) => {
                ops.push(Op::SetFontSizeBuiltinFont {
                    size: Pt(size),
                    font: *font,
                });
                ops.push(Op::WriteTextBuiltinFont { items, font: *font });
            }
        }
    }

    /// The built-in fonts have no rupee glyph
    fn encode(&self, text: &str) -> String {
        match self.font {
            PdfFont::Embedded(_) => text.to_string(),
            PdfFont::Builtin(_) => text.replace(CURRENCY_SYMBOL, "Rs."),
        }
    }
}

fn pdf_color(color: Color) -> printpdf::color::Color {
    printpdf::color::Color::Rgb(Rgb::new(
        color.r as f32 / 255.0,
        color.g as f32 / 255.0,
        color.b as f32 / 255.0,
        None,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::tests::document;
    use crate::document::{Background, Backgrounds, PageKind};
    use std::path::PathBuf;

    #[test]
    fn renders_four_page_pdf_with_builtin_font() {
        let doc = document(&Backgrounds::default());
        let bytes = render(&doc, &fontdb::Database::new()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
        assert!(bytes.len() > 1000);
    }

    #[test]
    fn renders_with_system_fonts() {
        let mut fonts = fontdb::Database::new();
        fonts.load_system_fonts();
        let bytes = render(&document(&Backgrounds::default()), &fonts).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn background_is_embedded() {
        let pixmap = resvg::tiny_skia::Pixmap::new(16, 9).unwrap();
        let mut backgrounds = Backgrounds::default();
        backgrounds.insert(
            PageKind::Closing,
            Background {
                png: pixmap.encode_png().unwrap(),
                path: PathBuf::from("closing.png"),
            },
        );
        let bytes = render(&document(&backgrounds), &fontdb::Database::new()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn corrupt_background_is_a_document_error() {
        let mut backgrounds = Backgrounds::default();
        backgrounds.insert(
            PageKind::Cover,
            Background {
                png: b"\x89PNG\r\n\x1a\nnot really".to_vec(),
                path: PathBuf::from("cover.png"),
            },
        );
        let err = render(&document(&backgrounds), &fontdb::Database::new()).unwrap_err();
        assert!(matches!(err, ReportError::Document(msg) if msg.contains("cover.png")));
    }
}
