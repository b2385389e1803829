//! Export error types.

use thiserror::Error;

use evap_results_core::ResultsError;

/// Errors that end an export request.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Not found or permission denied, as for results pages.
    #[error(transparent)]
    Results(#[from] ResultsError),

    /// Writing CSV records failed.
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The spreadsheet exporter failed.
    #[error("spreadsheet export failed: {0:#}")]
    Exporter(anyhow::Error),
}

impl ExportError {
    pub fn is_permission_denied(&self) -> bool {
        matches!(self, ExportError::Results(ResultsError::PermissionDenied(_)))
    }
}
