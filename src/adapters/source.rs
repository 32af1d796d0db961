use crate::core::{ConfigProvider, InputRecord, RecordSource};
use crate::utils::error::Result;
use chrono::{DateTime, Local};
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

const BYTE_ORDER_MARK: char = '\u{feff}';

/// Parses a header-first CSV export into records.
///
/// Short rows are accepted; the missing trailing columns are absent from the
/// resulting record.
pub fn read_csv_records<R: io::Read>(reader: R) -> Result<Vec<InputRecord>> {
    let mut csv_reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches(BYTE_ORDER_MARK).to_string())
        .collect();

    let mut records: Vec<InputRecord> = Vec::new();
    for row in csv_reader.records() {
        let row = row?;
        records.push(headers.iter().map(String::as_str).zip(row.iter()).collect());
    }

    Ok(records)
}

fn is_csv(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"))
}

/// Reads one named CSV file.
#[derive(Debug, Clone)]
pub struct CsvFileSource {
    path: PathBuf,
}

impl CsvFileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl RecordSource for CsvFileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    fn read_records(&self) -> Result<Vec<InputRecord>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!(
                    "Input file {} not found, continuing with no items",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(e) => return Err(e.into()),
        };

        read_csv_records(io::BufReader::new(file))
    }
}

/// Reads the most recently modified `.csv` file in a directory.
#[derive(Debug, Clone)]
pub struct NewestCsvSource {
    dir: PathBuf,
}

impl NewestCsvSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Ties on modification time go to the lexically greatest path.
    pub fn newest_csv(&self) -> Result<Option<PathBuf>> {
        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::warn!("Input directory {} not found", self.dir.display());
                return Ok(None);
            }
            Err(e) => return Err(e.into()),
        };

        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for entry in entries {
            let path = entry?.path();
            // Follows symlinks; dangling links are skipped.
            let metadata = match fs::metadata(&path) {
                Ok(metadata) => metadata,
                Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
                Err(e) => return Err(e.into()),
            };
            if !metadata.is_file() || !is_csv(&path) {
                continue;
            }

            let modified = metadata.modified()?;
            let candidate = (modified, path);
            let is_newer = match &newest {
                Some(current) => candidate > *current,
                None => true,
            };
            if is_newer {
                newest = Some(candidate);
            }
        }

        if let Some((modified, path)) = &newest {
            let modified: DateTime<Local> = (*modified).into();
            tracing::info!(
                "Using newest input file {} (modified {})",
                path.display(),
                modified.format("%Y-%m-%d %H:%M:%S")
            );
        }

        Ok(newest.map(|(_, path)| path))
    }
}

impl RecordSource for NewestCsvSource {
    fn describe(&self) -> String {
        format!("newest CSV in {}", self.dir.display())
    }

    fn read_records(&self) -> Result<Vec<InputRecord>> {
        match self.newest_csv()? {
            Some(path) => CsvFileSource::new(path).read_records(),
            None => {
                tracing::warn!(
                    "No CSV files found in {}, continuing with no items",
                    self.dir.display()
                );
                Ok(Vec::new())
            }
        }
    }
}

/// The input source picked by configuration: an explicit file wins over the
/// directory scan.
#[derive(Debug, Clone)]
pub enum InputSource {
    File(CsvFileSource),
    NewestInDir(NewestCsvSource),
}

impl InputSource {
    pub fn from_config<C: ConfigProvider>(config: &C) -> Self {
        match config.input_file() {
            Some(path) => Self::File(CsvFileSource::new(path)),
            None => Self::NewestInDir(NewestCsvSource::new(config.input_dir())),
        }
    }
}

impl RecordSource for InputSource {
    fn describe(&self) -> String {
        match self {
            Self::File(source) => source.describe(),
            Self::NewestInDir(source) => source.describe(),
        }
    }

    fn read_records(&self) -> Result<Vec<InputRecord>> {
        match self {
            Self::File(source) => source.read_records(),
            Self::NewestInDir(source) => source.read_records(),
        }
    }
}
