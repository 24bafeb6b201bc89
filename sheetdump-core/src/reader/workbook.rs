//! Workbook data structures

use std::path::PathBuf;

/// Which reading capability produced a workbook.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadMode {
    /// Primary reader, all cell types and formats.
    Full,
    /// Capability-limited XML fallback; only materializes rows that
    /// contain at least one cell.
    Minimal,
}

/// Represents a complete workbook
#[derive(Debug, Clone)]
pub struct Workbook {
    pub path: PathBuf,
    pub sheets: Vec<Sheet>,
    pub mode: ReadMode,
}

impl Workbook {
    /// Get a sheet by name
    pub fn get_sheet(&self, name: &str) -> Option<&Sheet> {
        self.sheets.iter().find(|s| s.name == name)
    }

    /// Get all sheet names in file order
    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}

/// Represents a worksheet as a dense grid.
///
/// Rows are kept in original order and every row is padded to `n_cols`
/// with `CellValue::Empty`, so column positions always line up.
#[derive(Debug, Clone)]
pub struct Sheet {
    pub name: String,
    pub rows: Vec<Vec<CellValue>>,
    pub n_cols: usize,
}

impl Sheet {
    pub fn new(name: impl Into<String>) -> Self {
        Sheet {
            name: name.into(),
            rows: Vec::new(),
            n_cols: 0,
        }
    }

    /// Append a row, growing the sheet width if needed.
    pub fn push_row(&mut self, row: Vec<CellValue>) {
        if row.len() > self.n_cols {
            self.n_cols = row.len();
        }
        self.rows.push(row);
    }

    /// Pad every row to the sheet width. Call once after the last `push_row`.
    pub fn normalize(&mut self) {
        for row in &mut self.rows {
            row.resize(self.n_cols, CellValue::Empty);
        }
    }

    /// (rows, columns) of the used range
    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows.len(), self.n_cols)
    }

    /// First row of the sheet, treated as the header
    pub fn header(&self) -> Option<&[CellValue]> {
        self.rows.first().map(|r| r.as_slice())
    }

    /// Rows after the header, paired with their 1-indexed row number
    /// (the header is row 1, so data starts at 2).
    pub fn data_rows(&self) -> impl Iterator<Item = (usize, &[CellValue])> {
        self.rows
            .iter()
            .enumerate()
            .skip(1)
            .map(|(i, r)| (i + 1, r.as_slice()))
    }
}

/// Cell value types
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Empty,
    Number(f64),
    Text(String),
    Boolean(bool),
    /// ISO-formatted date/time or duration text
    DateTime(String),
    Error(String),
}

impl CellValue {
    /// Check if the cell is empty
    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Stringify the value for display. Absent cells render as the
    /// empty string; whole numbers render without a decimal point.
    pub fn display(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(true) => "TRUE".to_string(),
            CellValue::Boolean(false) => "FALSE".to_string(),
            CellValue::DateTime(s) => s.clone(),
            CellValue::Error(e) => e.clone(),
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// True if every cell in the row is empty
pub fn row_is_empty(row: &[CellValue]) -> bool {
    row.iter().all(|c| c.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_empty_is_blank() {
        assert_eq!(CellValue::Empty.display(), "");
    }

    #[test]
    fn test_display_whole_number_has_no_decimal() {
        assert_eq!(CellValue::Number(42.0).display(), "42");
        assert_eq!(CellValue::Number(-3.0).display(), "-3");
    }

    #[test]
    fn test_display_fractional_number() {
        assert_eq!(CellValue::Number(3.25).display(), "3.25");
    }

    #[test]
    fn test_display_boolean() {
        assert_eq!(CellValue::Boolean(true).display(), "TRUE");
        assert_eq!(CellValue::Boolean(false).display(), "FALSE");
    }

    #[test]
    fn test_push_row_tracks_width_and_normalize_pads() {
        let mut sheet = Sheet::new("Data");
        sheet.push_row(vec![CellValue::Text("a".into())]);
        sheet.push_row(vec![
            CellValue::Text("b".into()),
            CellValue::Number(1.0),
            CellValue::Number(2.0),
        ]);
        sheet.normalize();

        assert_eq!(sheet.dimensions(), (2, 3));
        assert_eq!(sheet.rows[0].len(), 3);
        assert!(sheet.rows[0][2].is_empty());
    }

    #[test]
    fn test_data_rows_start_at_two() {
        let mut sheet = Sheet::new("Data");
        sheet.push_row(vec![CellValue::Text("header".into())]);
        sheet.push_row(vec![CellValue::Text("first".into())]);
        sheet.normalize();

        let rows: Vec<_> = sheet.data_rows().collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].0, 2);
    }

    #[test]
    fn test_row_is_empty() {
        assert!(row_is_empty(&[CellValue::Empty, CellValue::Empty]));
        assert!(!row_is_empty(&[CellValue::Empty, CellValue::Number(0.0)]));
    }
}
