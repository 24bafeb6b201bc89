//! Minimal XLSX reader used when the full reader is unavailable.
//!
//! Parses the OOXML parts directly with quick-xml over the zip archive:
//! workbook.xml for sheet order, the workbook rels for sheet targets,
//! sharedStrings.xml, then each worksheet part. Only rows that carry at
//! least one cell appear in the XML, so entirely-empty rows are absent
//! from the result.

use crate::error::DumpError;
use crate::reader::workbook::{CellValue, ReadMode, Sheet, Workbook};
use anyhow::{Context, Result, anyhow};
use quick_xml::Reader;
use quick_xml::events::Event;
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read as _};
use std::path::Path;
use zip::ZipArchive;

/// Read an XLSX workbook without calamine.
pub fn read_minimal(path: &Path) -> Result<Workbook, DumpError> {
    let ext = path.extension().and_then(|s| s.to_str()).unwrap_or("");
    if !matches!(ext, "xlsx" | "xlsm") {
        return Err(DumpError::UnsupportedFormat {
            path: path.to_path_buf(),
        });
    }

    let file = File::open(path).map_err(|e| DumpError::read(path, e))?;
    let mut archive =
        ZipArchive::new(BufReader::new(file)).map_err(|e| DumpError::read(path, e))?;

    let sheets = read_sheets(&mut archive).map_err(|e| DumpError::read(path, e))?;

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
        mode: ReadMode::Minimal,
    })
}

fn read_sheets(archive: &mut ZipArchive<BufReader<File>>) -> Result<Vec<Sheet>> {
    let rels = parse_rels(read_entry(archive, "xl/_rels/workbook.xml.rels")?)?;
    let sheet_list = parse_sheet_list(read_entry(archive, "xl/workbook.xml")?)?;
    let shared = match try_read_entry(archive, "xl/sharedStrings.xml")? {
        Some(xml) => parse_shared_strings(xml)?,
        None => Vec::new(),
    };

    let mut sheets = Vec::with_capacity(sheet_list.len());
    for (name, rid) in sheet_list {
        let target = rels
            .get(&rid)
            .ok_or_else(|| anyhow!("no relationship target for sheet '{}'", name))?;
        // Targets are relative to xl/ unless they start with '/'
        let part = match target.strip_prefix('/') {
            Some(abs) => abs.to_string(),
            None => format!("xl/{}", target),
        };
        let xml = read_entry(archive, &part)
            .with_context(|| format!("missing worksheet part for '{}'", name))?;
        sheets.push(parse_worksheet(&name, xml, &shared)?);
    }

    Ok(sheets)
}

fn read_entry(archive: &mut ZipArchive<BufReader<File>>, name: &str) -> Result<String> {
    let mut entry = archive
        .by_name(name)
        .with_context(|| format!("archive entry '{}' not found", name))?;
    let mut content = String::new();
    entry.read_to_string(&mut content)?;
    Ok(content)
}

fn try_read_entry(archive: &mut ZipArchive<BufReader<File>>, name: &str) -> Result<Option<String>> {
    match archive.by_name(name) {
        Ok(mut entry) => {
            let mut content = String::new();
            entry.read_to_string(&mut content)?;
            Ok(Some(content))
        }
        Err(zip::result::ZipError::FileNotFound) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Map rId -> target path from the workbook rels part
fn parse_rels(xml: String) -> Result<HashMap<String, String>> {
    let mut reader = Reader::from_str(&xml);
    let mut rels = HashMap::new();

    loop {
        match reader.read_event() {
            Ok(Event::Empty(e)) | Ok(Event::Start(e))
                if e.name().as_ref() == b"Relationship" =>
            {
                let mut id = String::new();
                let mut target = String::new();
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"Id" => id = attr.unescape_value()?.into_owned(),
                        b"Target" => target = attr.unescape_value()?.into_owned(),
                        _ => {}
                    }
                }
                if !id.is_empty() {
                    rels.insert(id, target);
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("rels parsing error: {}", e)),
            _ => {}
        }
    }

    Ok(rels)
}

/// Ordered (name, rId) pairs from workbook.xml
fn parse_sheet_list(xml: String) -> Result<Vec<(String, String)>> {
    let mut reader = Reader::from_str(&xml);
    let mut sheets = Vec::new();
    let mut in_sheets = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => match e.name().as_ref() {
                b"sheets" => in_sheets = true,
                b"sheet" if in_sheets => {
                    let mut name = String::new();
                    let mut rid = String::new();
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"name" => name = attr.unescape_value()?.into_owned(),
                            b"r:id" => rid = attr.unescape_value()?.into_owned(),
                            _ => {}
                        }
                    }
                    sheets.push((name, rid));
                }
                _ => {}
            },
            Ok(Event::End(e)) if e.name().as_ref() == b"sheets" => in_sheets = false,
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("workbook.xml parsing error: {}", e)),
            _ => {}
        }
    }

    Ok(sheets)
}

/// Shared string table, one entry per `<si>` (rich-text runs concatenated)
fn parse_shared_strings(xml: String) -> Result<Vec<String>> {
    let mut reader = Reader::from_str(&xml);
    let mut strings = Vec::new();
    let mut current = String::new();
    let mut in_t = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => match e.name().as_ref() {
                b"si" => current.clear(),
                b"t" => in_t = true,
                _ => {}
            },
            Ok(Event::Text(e)) if in_t => current.push_str(&e.unescape()?),
            Ok(Event::End(e)) => match e.name().as_ref() {
                b"t" => in_t = false,
                b"si" => strings.push(std::mem::take(&mut current)),
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("sharedStrings parsing error: {}", e)),
            _ => {}
        }
    }

    Ok(strings)
}

fn parse_worksheet(name: &str, xml: String, shared: &[String]) -> Result<Sheet> {
    let mut reader = Reader::from_str(&xml);

    // (row, col) are 0-based
    let mut cells: Vec<(u32, u32, CellValue)> = Vec::new();
    let mut cur_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut cell_col: u32 = 0;
    let mut cell_type = String::new();
    let mut raw_value: Option<String> = None;
    let mut inline_text: Option<String> = None;
    let mut in_v = false;
    let mut in_is_t = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"row" => {
                let mut r = None;
                for attr in e.attributes().flatten() {
                    if attr.key.as_ref() == b"r" {
                        r = attr.unescape_value()?.parse::<u32>().ok();
                    }
                }
                // r is 1-based when present
                if let Some(n) = r.and_then(|n: u32| n.checked_sub(1)) {
                    cur_row = n;
                }
                next_col = 0;
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"row" => {
                cur_row += 1;
            }
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) if e.name().as_ref() == b"c" => {
                cell_col = next_col;
                cell_type.clear();
                raw_value = None;
                inline_text = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"r" => {
                            if let Some((_, col)) = parse_cell_ref(&attr.unescape_value()?) {
                                cell_col = col;
                            }
                        }
                        b"t" => cell_type = attr.unescape_value()?.into_owned(),
                        _ => {}
                    }
                }
                next_col = cell_col + 1;
            }
            Ok(Event::End(e)) if e.name().as_ref() == b"c" => {
                let value = build_cell_value(
                    &cell_type,
                    raw_value.take(),
                    inline_text.take(),
                    shared,
                )?;
                if !value.is_empty() {
                    cells.push((cur_row, cell_col, value));
                }
            }
            Ok(Event::Start(e)) if e.name().as_ref() == b"v" => in_v = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"v" => in_v = false,
            Ok(Event::Start(e)) if e.name().as_ref() == b"t" => in_is_t = true,
            Ok(Event::End(e)) if e.name().as_ref() == b"t" => in_is_t = false,
            Ok(Event::Text(e)) if in_v => {
                raw_value = Some(e.unescape()?.into_owned());
            }
            Ok(Event::Text(e)) if in_is_t => {
                inline_text
                    .get_or_insert_with(String::new)
                    .push_str(&e.unescape()?);
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(anyhow!("worksheet parsing error in '{}': {}", name, e)),
            _ => {}
        }
    }

    Ok(build_sheet(name, cells))
}

fn build_cell_value(
    cell_type: &str,
    raw: Option<String>,
    inline: Option<String>,
    shared: &[String],
) -> Result<CellValue> {
    if cell_type == "inlineStr" {
        return Ok(inline.map(CellValue::Text).unwrap_or(CellValue::Empty));
    }

    let Some(raw) = raw else {
        return Ok(CellValue::Empty);
    };

    let value = match cell_type {
        "s" => {
            let idx: usize = raw
                .parse()
                .map_err(|_| anyhow!("invalid shared string index '{}'", raw))?;
            let text = shared
                .get(idx)
                .ok_or_else(|| anyhow!("shared string index {} out of range", idx))?;
            CellValue::Text(text.clone())
        }
        "str" => CellValue::Text(raw),
        "b" => CellValue::Boolean(raw.trim() == "1"),
        "e" => CellValue::Error(raw),
        "d" => CellValue::DateTime(raw),
        // "n" or untyped
        _ => match raw.parse::<f64>() {
            Ok(n) => CellValue::Number(n),
            Err(_) => CellValue::Text(raw),
        },
    };

    Ok(value)
}

/// Assemble sparse cells into the dense sheet model. Gaps between
/// occupied rows become empty rows so row numbers stay aligned.
fn build_sheet(name: &str, cells: Vec<(u32, u32, CellValue)>) -> Sheet {
    let mut sheet = Sheet::new(name);
    let Some(max_row) = cells.iter().map(|(r, _, _)| *r).max() else {
        return sheet;
    };
    let max_col = cells.iter().map(|(_, c, _)| *c).max().unwrap_or(0);

    let mut grid =
        vec![vec![CellValue::Empty; max_col as usize + 1]; max_row as usize + 1];
    for (r, c, v) in cells {
        grid[r as usize][c as usize] = v;
    }
    for row in grid {
        sheet.push_row(row);
    }
    sheet.normalize();
    sheet
}

/// Parse an A1-style cell reference into 0-based (row, col)
fn parse_cell_ref(cell_ref: &str) -> Option<(u32, u32)> {
    let split = cell_ref.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell_ref.split_at(split);

    let mut col: u32 = 0;
    for ch in letters.chars() {
        let d = (ch.to_ascii_uppercase() as u32).checked_sub('A' as u32)?;
        if d > 25 {
            return None;
        }
        col = col * 26 + d + 1;
    }
    let row: u32 = digits.parse().ok()?;
    if col == 0 || row == 0 {
        return None;
    }

    Some((row - 1, col - 1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_cell_ref() {
        assert_eq!(parse_cell_ref("A1"), Some((0, 0)));
        assert_eq!(parse_cell_ref("B3"), Some((2, 1)));
        assert_eq!(parse_cell_ref("Z10"), Some((9, 25)));
        assert_eq!(parse_cell_ref("AA1"), Some((0, 26)));
        assert_eq!(parse_cell_ref("AB12"), Some((11, 27)));
    }

    #[test]
    fn test_parse_cell_ref_rejects_garbage() {
        assert_eq!(parse_cell_ref(""), None);
        assert_eq!(parse_cell_ref("123"), None);
        assert_eq!(parse_cell_ref("ABC"), None);
    }

    #[test]
    fn test_parse_shared_strings_concatenates_runs() {
        let xml = r#"<sst><si><t>plain</t></si><si><r><t>rich </t></r><r><t>text</t></r></si></sst>"#;
        let strings = parse_shared_strings(xml.to_string()).unwrap();
        assert_eq!(strings, vec!["plain".to_string(), "rich text".to_string()]);
    }

    #[test]
    fn test_parse_sheet_list_preserves_order() {
        let xml = r#"<workbook xmlns:r="x"><sheets>
            <sheet name="Second" sheetId="2" r:id="rId2"/>
            <sheet name="First" sheetId="1" r:id="rId1"/>
        </sheets></workbook>"#;
        let sheets = parse_sheet_list(xml.to_string()).unwrap();
        assert_eq!(sheets[0].0, "Second");
        assert_eq!(sheets[1].0, "First");
    }

    #[test]
    fn test_worksheet_skips_rows_missing_from_xml() {
        let xml = r#"<worksheet><sheetData>
            <row r="1"><c r="A1"><v>1</v></c></row>
            <row r="4"><c r="B4"><v>2</v></c></row>
        </sheetData></worksheet>"#;
        let sheet = parse_worksheet("Gaps", xml.to_string(), &[]).unwrap();
        assert_eq!(sheet.dimensions(), (4, 2));
        assert_eq!(sheet.rows[0][0], CellValue::Number(1.0));
        assert!(sheet.rows[1].iter().all(|c| c.is_empty()));
        assert_eq!(sheet.rows[3][1], CellValue::Number(2.0));
    }

    #[test]
    fn test_worksheet_boolean_and_inline_string() {
        let xml = r#"<worksheet><sheetData>
            <row r="1">
                <c r="A1" t="b"><v>1</v></c>
                <c r="B1" t="inlineStr"><is><t>inline</t></is></c>
            </row>
        </sheetData></worksheet>"#;
        let sheet = parse_worksheet("Mixed", xml.to_string(), &[]).unwrap();
        assert_eq!(sheet.rows[0][0], CellValue::Boolean(true));
        assert_eq!(sheet.rows[0][1], CellValue::Text("inline".to_string()));
    }
}
