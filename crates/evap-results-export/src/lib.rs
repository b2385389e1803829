//! evap-results-export: Tabular exports of semester results.
//!
//! Staff-only raw CSV export of every course in a semester, and the
//! spreadsheet export driven by a per-sheet course-type selection.

pub mod error;
pub mod file;
pub mod raw;
pub mod spreadsheet;

pub use error::ExportError;
pub use file::ExportFile;
