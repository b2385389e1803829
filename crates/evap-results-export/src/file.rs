//! Export file descriptor.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// A finished export, ready to be streamed or written to disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub content_type: &'static str,
    pub body: Vec<u8>,
}

impl ExportFile {
    /// Value for the `Content-Disposition` header.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    /// Write the file into `dir` under its own filename.
    ///
    /// Path separators in the filename (semester names like `WS 23/24`)
    /// are replaced by `-`.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;
        let path = dir.join(self.filename.replace(['/', '\\'], "-"));
        std::fs::write(&path, &self.body)
            .with_context(|| format!("failed to write export to {}", path.display()))?;
        tracing::info!("wrote {} ({} bytes)", path.display(), self.body.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disposition_and_write() {
        let file = ExportFile {
            filename: "Evaluation-WS 23/24-en_raw.csv".into(),
            content_type: "text/csv",
            body: b"Name\n".to_vec(),
        };
        assert_eq!(
            file.content_disposition(),
            "attachment; filename=\"Evaluation-WS 23/24-en_raw.csv\""
        );

        let dir = tempfile::tempdir().unwrap();
        let path = file.write_to(&dir.path().join("out")).unwrap();
        assert!(path.ends_with("Evaluation-WS 23-24-en_raw.csv"));
        assert_eq!(std::fs::read(path).unwrap(), b"Name\n");
    }
}
