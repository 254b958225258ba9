//! CSV Data Loader Module
//! Reads or downloads a CSV source with Polars and materializes it as rows.

use super::{ColumnMap, Row};
use polars::prelude::*;
use std::fmt;
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Failure to obtain the dataset. The extractor never runs when this occurs.
#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Data source not found: {}", .0.display())]
    NotFound(PathBuf),
    #[error("Failed to download {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

/// Where the CSV comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
}

impl DataSource {
    /// `http://` and `https://` locations are downloaded, anything else is a path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let lower = trimmed.to_ascii_lowercase();
        if lower.starts_with("http://") || lower.starts_with("https://") {
            DataSource::Url(trimmed.to_string())
        } else {
            DataSource::File(PathBuf::from(trimmed))
        }
    }

    /// Short name for status lines.
    pub fn display_name(&self) -> String {
        match self {
            DataSource::File(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_else(|| path.display().to_string()),
            DataSource::Url(url) => url
                .trim_end_matches('/')
                .rsplit('/')
                .next()
                .filter(|s| !s.is_empty())
                .unwrap_or(url.as_str())
                .to_string(),
        }
    }
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::File(path) => write!(f, "{}", path.display()),
            DataSource::Url(url) => f.write_str(url),
        }
    }
}

/// Fully materialized CSV contents.
#[derive(Debug, Clone, Default)]
pub struct LoadedTable {
    /// Header names in file order.
    pub columns: Vec<String>,
    pub rows: Vec<Row>,
}

impl LoadedTable {
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Configured columns the header does not contain.
    pub fn missing_columns<'a>(&self, columns: &'a ColumnMap) -> Vec<&'a str> {
        columns
            .names()
            .into_iter()
            .filter(|name| !self.columns.iter().any(|c| c == name))
            .collect()
    }
}

/// Handles CSV acquisition with Polars.
pub struct DataLoader {
    timeout: Duration,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl DataLoader {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }

    /// Load the source and turn every record into a [`Row`].
    pub fn load(&self, source: &DataSource) -> Result<LoadedTable, LoaderError> {
        let df = match source {
            DataSource::File(path) => Self::read_file(path)?,
            DataSource::Url(url) => {
                let bytes = self.fetch(url)?;
                Self::read_bytes(bytes)?
            }
        };

        let table = LoadedTable {
            columns: df
                .get_column_names()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            rows: rows_from_dataframe(&df)?,
        };
        info!(
            source = %source,
            rows = table.row_count(),
            columns = table.columns.len(),
            "loaded CSV"
        );
        Ok(table)
    }

    /// Load and warn about configured columns the file lacks.
    pub fn load_for(
        &self,
        source: &DataSource,
        columns: &ColumnMap,
    ) -> Result<LoadedTable, LoaderError> {
        let table = self.load(source)?;
        for missing in table.missing_columns(columns) {
            warn!(column = missing, source = %source, "configured column not in CSV header");
        }
        Ok(table)
    }

    /// Every column is read as text; number parsing belongs to the extractor.
    fn read_file(path: &Path) -> Result<DataFrame, LoaderError> {
        if !path.exists() {
            return Err(LoaderError::NotFound(path.to_path_buf()));
        }

        let df = LazyCsvReader::new(path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .finish()?
            .collect()?;
        Ok(df)
    }

    fn read_bytes(bytes: Vec<u8>) -> Result<DataFrame, LoaderError> {
        let df = CsvReadOptions::default()
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .into_reader_with_file_handle(Cursor::new(bytes))
            .finish()?;
        Ok(df)
    }

    fn fetch(&self, url: &str) -> Result<Vec<u8>, LoaderError> {
        let fetch_error = |source: reqwest::Error| LoaderError::Fetch {
            url: url.to_string(),
            source,
        };

        info!(url, timeout = ?self.timeout, "downloading CSV");
        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(fetch_error)?;
        let bytes = client
            .get(url)
            .send()
            .and_then(|resp| resp.error_for_status())
            .and_then(|resp| resp.bytes())
            .map_err(fetch_error)?;
        Ok(bytes.to_vec())
    }
}

/// Convert a DataFrame into rows; null cells are left out of each row.
pub fn rows_from_dataframe(df: &DataFrame) -> Result<Vec<Row>, LoaderError> {
    let mut rows = vec![Row::new(); df.height()];

    for column in df.get_columns() {
        let name = column.name().to_string();
        let text = column.cast(&DataType::String)?;
        let values = text.str()?;

        for (row, value) in rows.iter_mut().zip(values.into_iter()) {
            if let Some(value) = value {
                row.insert(name.clone(), value);
            }
        }
    }

    Ok(rows)
}
