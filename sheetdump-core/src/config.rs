//! Dump configuration

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Options controlling what gets dumped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DumpConfig {
    /// Cap on data rows printed per sheet; `None` prints everything
    #[serde(default)]
    pub max_rows: Option<usize>,

    /// Dump only these sheets (file order is kept); empty means all
    #[serde(default)]
    pub sheets: Vec<String>,
}

impl DumpConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: DumpConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Whether a sheet should be included in the dump
    pub fn includes_sheet(&self, name: &str) -> bool {
        self.sheets.is_empty() || self.sheets.iter().any(|s| s == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_config_defaults() {
        let config: DumpConfig = toml::from_str("").unwrap();
        assert_eq!(config.max_rows, None);
        assert!(config.sheets.is_empty());
        assert!(config.includes_sheet("Anything"));
    }

    #[test]
    fn test_parse_full_config() {
        let config: DumpConfig = toml::from_str(
            r#"
            max_rows = 100
            sheets = ["Data", "Summary"]
            "#,
        )
        .unwrap();
        assert_eq!(config.max_rows, Some(100));
        assert!(config.includes_sheet("Data"));
        assert!(!config.includes_sheet("Scratch"));
    }
}
