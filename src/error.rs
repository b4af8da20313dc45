use crate::chart::RenderingFailure;

/// Terminal failures of a report request
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("could not open workbook")]
    Workbook(#[source] calamine::Error),
    #[error("required sheet '{0}' not found in workbook")]
    MissingSheet(String),
    #[error("could not read sheet '{sheet}'")]
    UnreadableSheet {
        sheet: String,
        #[source]
        source: calamine::Error,
    },
    #[error("sheet '{sheet}' has no column {column} ({field})")]
    MissingColumn {
        sheet: String,
        column: &'static str,
        field: &'static str,
    },
    #[error("contributions in {period} are too large to total")]
    AmountOverflow { period: String },
    #[error("sheet '{0}' has no populated rows")]
    EmptySnapshot(String),
    #[error(transparent)]
    Rendering(#[from] RenderingFailure),
    #[error("client name font size {0} is outside {min}..={max}", min = crate::report::FontSize::MIN, max = crate::report::FontSize::MAX)]
    InvalidFontSize(u32),
    #[error("could not build document: {0}")]
    Document(String),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
