//! sheetdump-core: workbook reading for the `dump_workbook` tool
//!
//! Provides the workbook data model and two reading capabilities: a full
//! calamine-backed reader and a minimal XLSX-only XML fallback, selected
//! through cargo features.

pub mod config;
pub mod error;
pub mod reader;

pub use config::DumpConfig;
pub use error::DumpError;
pub use reader::{CellValue, ReadMode, Sheet, Workbook, read_workbook, row_is_empty};
