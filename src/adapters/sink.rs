use crate::core::{ConfigProvider, ListingSink};
use crate::utils::error::{ExportError, Result};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Writes the upload file into a dedicated output directory.
///
/// The document is staged in a temporary file next to the target and renamed
/// into place, so a failed write never leaves a truncated upload file behind.
#[derive(Debug, Clone)]
pub struct CsvDirectorySink {
    dir: PathBuf,
    file_name: String,
    clean_stale: bool,
}

impl CsvDirectorySink {
    pub fn new(dir: impl Into<PathBuf>, file_name: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            file_name: file_name.into(),
            clean_stale: true,
        }
    }

    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        Self::new(config.output_dir(), config.output_file_name())
            .with_clean_stale(config.clean_stale_outputs())
    }

    /// When enabled, other `.csv` files in the output directory are removed
    /// once the new file is in place.
    pub fn with_clean_stale(mut self, clean_stale: bool) -> Self {
        self.clean_stale = clean_stale;
        self
    }

    pub fn target_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    fn remove_stale_outputs(&self, keep: &Path) -> Result<usize> {
        let mut removed = 0;

        let entries =
            fs::read_dir(&self.dir).map_err(|e| ExportError::write_failure(&self.dir, e))?;
        for entry in entries {
            let path = entry
                .map_err(|e| ExportError::write_failure(&self.dir, e))?
                .path();
            let is_csv = path
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
            if !is_csv || !path.is_file() || path == keep {
                continue;
            }

            match fs::remove_file(&path) {
                Ok(()) => {
                    tracing::debug!("Removed stale output {}", path.display());
                    removed += 1;
                }
                Err(e) => {
                    tracing::warn!("Could not remove stale output {}: {}", path.display(), e)
                }
            }
        }

        Ok(removed)
    }
}

impl ListingSink for CsvDirectorySink {
    fn write_document(&self, document: &[u8]) -> Result<String> {
        let target = self.target_path();

        fs::create_dir_all(&self.dir).map_err(|e| ExportError::write_failure(&self.dir, e))?;

        let mut staged = tempfile::Builder::new()
            .prefix(".draft-export-")
            .suffix(".tmp")
            .tempfile_in(&self.dir)
            .map_err(|e| ExportError::write_failure(&target, e))?;

        staged
            .write_all(document)
            .and_then(|()| staged.as_file().sync_all())
            .map_err(|e| ExportError::write_failure(&target, e))?;

        staged
            .persist(&target)
            .map_err(|e| ExportError::write_failure(&target, e.error))?;

        if self.clean_stale {
            match self.remove_stale_outputs(&target) {
                Ok(0) => {}
                Ok(removed) => tracing::info!("Removed {} stale output files", removed),
                Err(e) => tracing::warn!("Stale output cleanup skipped: {}", e),
            }
        }

        Ok(target.display().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_writes_document_and_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let out_dir = temp_dir.path().join("nested").join("output");
        let sink = CsvDirectorySink::new(&out_dir, "drafts.csv");

        let location = sink.write_document(b"a,b\r\n").unwrap();

        assert_eq!(location, out_dir.join("drafts.csv").display().to_string());
        assert_eq!(fs::read(out_dir.join("drafts.csv")).unwrap(), b"a,b\r\n");
        assert_eq!(file_names(&out_dir), vec!["drafts.csv"]);
    }

    #[test]
    fn test_overwrites_previous_output() {
        let temp_dir = TempDir::new().unwrap();
        let sink = CsvDirectorySink::new(temp_dir.path(), "drafts.csv");

        sink.write_document(b"first run with more bytes").unwrap();
        sink.write_document(b"second").unwrap();

        assert_eq!(
            fs::read(temp_dir.path().join("drafts.csv")).unwrap(),
            b"second"
        );
    }

    #[test]
    fn test_removes_stale_csv_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("old_export.csv"), "old").unwrap();
        fs::write(temp_dir.path().join("notes.txt"), "keep").unwrap();
        let sink = CsvDirectorySink::new(temp_dir.path(), "drafts.csv");

        sink.write_document(b"new").unwrap();

        assert_eq!(file_names(temp_dir.path()), vec!["drafts.csv", "notes.txt"]);
    }

    #[test]
    fn test_keeps_stale_files_when_disabled() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("old_export.csv"), "old").unwrap();
        let sink = CsvDirectorySink::new(temp_dir.path(), "drafts.csv").with_clean_stale(false);

        sink.write_document(b"new").unwrap();

        assert_eq!(
            file_names(temp_dir.path()),
            vec!["drafts.csv", "old_export.csv"]
        );
    }

    #[test]
    fn test_failed_rename_keeps_stale_files() {
        let temp_dir = TempDir::new().unwrap();
        fs::write(temp_dir.path().join("last_week.csv"), "previous upload").unwrap();
        let occupied = temp_dir.path().join("drafts.csv");
        fs::create_dir(&occupied).unwrap();
        fs::write(occupied.join("inside.txt"), "x").unwrap();
        let sink = CsvDirectorySink::new(temp_dir.path(), "drafts.csv");

        let result = sink.write_document(b"new");

        assert!(matches!(result, Err(ExportError::WriteFailure { .. })));
        assert_eq!(
            fs::read_to_string(temp_dir.path().join("last_week.csv")).unwrap(),
            "previous upload"
        );
        assert_eq!(
            file_names(temp_dir.path()),
            vec!["drafts.csv", "last_week.csv"]
        );
    }

    #[test]
    fn test_unreadable_output_directory_is_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        let sink = CsvDirectorySink::new(temp_dir.path().join("removed"), "drafts.csv");

        let result = sink.remove_stale_outputs(&sink.target_path());

        assert!(matches!(result, Err(ExportError::WriteFailure { .. })));
    }

    #[test]
    fn test_unwritable_directory_is_write_failure() {
        let temp_dir = TempDir::new().unwrap();
        let blocker = temp_dir.path().join("blocker");
        fs::write(&blocker, "a file where a directory should be").unwrap();
        let sink = CsvDirectorySink::new(blocker.join("output"), "drafts.csv");

        let result = sink.write_document(b"data");

        assert!(matches!(result, Err(ExportError::WriteFailure { .. })));
        assert!(!blocker.join("output").join("drafts.csv").exists());
    }
}
