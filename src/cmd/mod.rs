pub mod generate;
pub mod inspect;
pub mod schema;

use anyhow::Context;
use folio_report::core::Warning;
use std::path::Path;

/// Read a workbook file into memory
pub fn read_workbook(path: &Path) -> anyhow::Result<Vec<u8>> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read workbook {}", path.display()))?;
    if bytes.is_empty() {
        anyhow::bail!("Workbook {} is empty", path.display());
    }
    Ok(bytes)
}

pub fn print_warnings(warnings: &[Warning]) {
    if warnings.is_empty() {
        return;
    }
    eprintln!("\u{26A0} {} warning(s):", warnings.len());
    for warning in warnings {
        eprintln!("  - {}", warning);
    }
}
