//! Loaders that produce the listing snapshot a dashboard session works from.

mod parser;

use crate::workflows::jobs::JobRecord;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Failure to obtain a listing snapshot.
#[derive(Debug, thiserror::Error)]
pub enum JobSourceError {
    #[error("failed to read job data: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid job CSV data: {0}")]
    Csv(#[from] csv::Error),
    #[error("invalid job JSON data: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported job data format for {0}; expected .csv or .json")]
    UnsupportedFormat(String),
    #[error("job data unavailable: {0}")]
    Unavailable(String),
}

/// Backend holding the `jobs` table. Constructed once at startup and handed to
/// whichever service needs it.
pub trait JobSource: Send + Sync {
    fn describe(&self) -> String;
    fn fetch_all(&self) -> Result<Vec<JobRecord>, JobSourceError>;
}

impl<T: JobSource + ?Sized> JobSource for Arc<T> {
    fn describe(&self) -> String {
        (**self).describe()
    }

    fn fetch_all(&self) -> Result<Vec<JobRecord>, JobSourceError> {
        (**self).fetch_all()
    }
}

#[derive(Debug, Clone)]
pub struct CsvJobSource {
    path: PathBuf,
}

impl CsvJobSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<JobRecord>, JobSourceError> {
        Ok(parser::parse_csv(reader)?)
    }
}

impl JobSource for CsvJobSource {
    fn describe(&self) -> String {
        format!("csv:{}", self.path.display())
    }

    fn fetch_all(&self) -> Result<Vec<JobRecord>, JobSourceError> {
        let file = std::fs::File::open(&self.path)?;
        Self::from_reader(file)
    }
}

#[derive(Debug, Clone)]
pub struct JsonJobSource {
    path: PathBuf,
}

impl JsonJobSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Vec<JobRecord>, JobSourceError> {
        Ok(serde_json::from_reader(reader)?)
    }
}

impl JobSource for JsonJobSource {
    fn describe(&self) -> String {
        format!("json:{}", self.path.display())
    }

    fn fetch_all(&self) -> Result<Vec<JobRecord>, JobSourceError> {
        let file = std::fs::File::open(&self.path)?;
        Self::from_reader(std::io::BufReader::new(file))
    }
}

/// Dataset file whose format is picked from its extension.
#[derive(Debug, Clone)]
pub enum FileJobSource {
    Csv(CsvJobSource),
    Json(JsonJobSource),
}

impl FileJobSource {
    pub fn for_path(path: impl AsRef<Path>) -> Result<Self, JobSourceError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);

        match extension.as_deref() {
            Some("csv") => Ok(Self::Csv(CsvJobSource::new(path))),
            Some("json") => Ok(Self::Json(JsonJobSource::new(path))),
            _ => Err(JobSourceError::UnsupportedFormat(path.display().to_string())),
        }
    }
}

impl JobSource for FileJobSource {
    fn describe(&self) -> String {
        match self {
            Self::Csv(source) => source.describe(),
            Self::Json(source) => source.describe(),
        }
    }

    fn fetch_all(&self) -> Result<Vec<JobRecord>, JobSourceError> {
        match self {
            Self::Csv(source) => source.fetch_all(),
            Self::Json(source) => source.fetch_all(),
        }
    }
}

/// Fixed in-memory snapshot.
#[derive(Debug, Clone, Default)]
pub struct StaticJobSource {
    records: Vec<JobRecord>,
}

impl StaticJobSource {
    pub fn new(records: Vec<JobRecord>) -> Self {
        Self { records }
    }
}

impl JobSource for StaticJobSource {
    fn describe(&self) -> String {
        format!("static:{} records", self.records.len())
    }

    fn fetch_all(&self) -> Result<Vec<JobRecord>, JobSourceError> {
        Ok(self.records.clone())
    }
}
