//! Error types for workbook reading

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DumpError {
    /// No spreadsheet-reading capability was compiled in, or the file
    /// format is outside what the active reader understands.
    #[error("no available reader supports '{path}'")]
    UnsupportedFormat { path: PathBuf },

    /// The file could not be opened or parsed.
    #[error("failed to read workbook '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },
}

impl DumpError {
    pub(crate) fn read(path: &std::path::Path, source: impl Into<anyhow::Error>) -> Self {
        DumpError::Read {
            path: path.to_path_buf(),
            source: source.into(),
        }
    }
}
