use std::path::PathBuf;

use thiserror::Error;

use crate::data::DataFile;

#[derive(Debug, Error)]
pub enum DashboardError {
    #[error("data snippet '{file}' is missing (expected at {})", .path.display())]
    MissingDataFile { file: DataFile, path: PathBuf },

    #[error("data snippet '{file}' is malformed at line {line}: {reason}")]
    MalformedDataFile {
        file: DataFile,
        line: u64,
        reason: String,
    },

    #[error("no colour configured for category '{0}'")]
    UnmappedCategory(String),

    #[error("failure breakdown has no positive counts")]
    EmptyBreakdown,

    #[error("highlight category '{0}' does not appear in the failure breakdown")]
    UnknownHighlight(String),

    #[error("failed to encode figure '{id}': {source}")]
    FigureEncoding {
        id: String,
        #[source]
        source: serde_json::Error,
    },
}

impl DashboardError {
    /// True for the failures an operator fixes by re-running data preparation.
    pub fn is_data_problem(&self) -> bool {
        matches!(
            self,
            DashboardError::MissingDataFile { .. } | DashboardError::MalformedDataFile { .. }
        )
    }
}
