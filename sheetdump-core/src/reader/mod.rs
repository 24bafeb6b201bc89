//! Workbook readers.
//!
//! Two capabilities are compiled in through cargo features: the full
//! calamine-backed reader (`calamine`, default) and a minimal XLSX-only
//! XML reader (`xml-fallback`). `read_workbook` uses the full reader when
//! present and falls back to the minimal one otherwise.

use crate::error::DumpError;
use std::path::Path;

pub mod workbook;
#[cfg(feature = "xml-fallback")]
pub mod xml_fallback;

pub use workbook::{CellValue, ReadMode, Sheet, Workbook, row_is_empty};

/// Read a workbook from a file path with the best available capability.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook, DumpError> {
    let path = path.as_ref();

    #[cfg(feature = "calamine")]
    return read_full(path);

    #[cfg(all(not(feature = "calamine"), feature = "xml-fallback"))]
    return xml_fallback::read_minimal(path);

    #[cfg(all(not(feature = "calamine"), not(feature = "xml-fallback")))]
    Err(DumpError::UnsupportedFormat {
        path: path.to_path_buf(),
    })
}

/// Full-capability reader backed by calamine.
#[cfg(feature = "calamine")]
pub fn read_full(path: &Path) -> Result<Workbook, DumpError> {
    use calamine::{Reader, Sheets, open_workbook_auto};

    let mut excel: Sheets<_> =
        open_workbook_auto(path).map_err(|e| DumpError::read(path, e))?;

    let sheet_names = excel.sheet_names();
    let mut sheets = Vec::with_capacity(sheet_names.len());

    for sheet_name in &sheet_names {
        let range = excel
            .worksheet_range(sheet_name)
            .map_err(|e| DumpError::read(path, anyhow::anyhow!("{e} (sheet '{sheet_name}')")))?;
        sheets.push(parse_sheet(sheet_name, &range));
    }

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
        mode: ReadMode::Full,
    })
}

/// Convert a calamine range into the dense sheet model, preserving the
/// range's start offset so row/column numbers match spreadsheet
/// coordinates.
#[cfg(feature = "calamine")]
fn parse_sheet(name: &str, range: &calamine::Range<calamine::Data>) -> Sheet {
    let mut sheet = Sheet::new(name);

    if let Some((start_row, start_col)) = range.start() {
        for _ in 0..start_row {
            sheet.push_row(Vec::new());
        }
        let lead = start_col as usize;
        for row in range.rows() {
            let mut cells = vec![CellValue::Empty; lead];
            cells.extend(row.iter().map(parse_cell_value));
            sheet.push_row(cells);
        }
    }

    sheet.normalize();
    sheet
}

#[cfg(feature = "calamine")]
fn parse_cell_value(data: &calamine::Data) -> CellValue {
    use calamine::Data;

    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(format!("{}", e)),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::DateTime(s.clone()),
        Data::DurationIso(s) => CellValue::DateTime(s.clone()),
    }
}
