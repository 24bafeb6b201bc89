//! Output formatters for workbook dumps

use anyhow::Result;
use colored::*;
use sheetdump_core::{CellValue, DumpConfig, ReadMode, Sheet, Workbook, row_is_empty};

/// Render a workbook dump in human-readable form with colors.
pub fn render_human(workbook: &Workbook, config: &DumpConfig) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{}\n",
        format!("Workbook: {}", workbook.path.display()).bold()
    ));
    out.push_str(&format!("Sheets: {}\n", workbook.sheets.len()));

    for sheet in &workbook.sheets {
        if !config.includes_sheet(&sheet.name) {
            continue;
        }
        out.push('\n');
        render_sheet_human(&mut out, sheet, workbook.mode, config);
    }

    out
}

fn render_sheet_human(out: &mut String, sheet: &Sheet, mode: ReadMode, config: &DumpConfig) {
    let (rows, cols) = sheet.dimensions();

    out.push_str(&format!(
        "{} {}\n",
        "Sheet:".bold(),
        sheet.name.cyan().bold()
    ));
    out.push_str(&format!("  Dimensions: {} rows x {} columns\n", rows, cols));

    let Some(header) = sheet.header() else {
        out.push_str("  (empty sheet)\n");
        return;
    };

    let header_cells: Vec<String> = header
        .iter()
        .enumerate()
        .map(|(i, cell)| format!("[{}] {}", i + 1, cell.display()))
        .collect();
    out.push_str(&format!("  Header: {}\n", header_cells.join("  ")));

    let mut shown = 0usize;
    let mut truncated = 0usize;
    for (row_num, row) in sheet.data_rows() {
        // The capability-limited reader cannot tell a deliberately blank
        // row from formatting artifacts, so blank rows are dropped there.
        if mode == ReadMode::Minimal && row_is_empty(row) {
            continue;
        }
        if let Some(max) = config.max_rows {
            if shown >= max {
                truncated += 1;
                continue;
            }
        }
        out.push_str(&format!("  [{}] {}\n", row_num, render_row(row)));
        shown += 1;
    }

    if truncated > 0 {
        out.push_str(&format!(
            "  {}\n",
            format!("... ({} more rows not shown)", truncated).bright_black()
        ));
    }
}

fn render_row(row: &[CellValue]) -> String {
    row.iter()
        .map(|c| c.display())
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Render a workbook dump as JSON.
pub fn render_json(workbook: &Workbook, config: &DumpConfig) -> Result<String> {
    let sheets: Vec<_> = workbook
        .sheets
        .iter()
        .filter(|s| config.includes_sheet(&s.name))
        .map(|sheet| {
            let (rows, cols) = sheet.dimensions();
            let header: Vec<String> = sheet
                .header()
                .map(|h| h.iter().map(|c| c.display()).collect())
                .unwrap_or_default();
            let data: Vec<Vec<String>> = sheet
                .data_rows()
                .filter(|(_, row)| {
                    workbook.mode != ReadMode::Minimal || !row_is_empty(row)
                })
                .take(config.max_rows.unwrap_or(usize::MAX))
                .map(|(_, row)| row.iter().map(|c| c.display()).collect())
                .collect();

            serde_json::json!({
                "name": sheet.name,
                "rows": rows,
                "columns": cols,
                "header": header,
                "data": data,
            })
        })
        .collect();

    let output = serde_json::json!({
        "file": workbook.path.display().to_string(),
        "mode": match workbook.mode {
            ReadMode::Full => "full",
            ReadMode::Minimal => "minimal",
        },
        "sheets": sheets,
    });

    Ok(serde_json::to_string_pretty(&output)?)
}
