use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Archive is missing or its container is corrupt
    #[error("Failed to open archive {}: {message}", .path.display())]
    ArchiveOpen { path: PathBuf, message: String },
    /// A document entry inside an archive could not be parsed
    #[error("Failed to parse entry '{entry}' in {}: {message}", .archive.display())]
    EntryParse {
        archive: PathBuf,
        entry: String,
        message: String,
    },
    /// Writing to one of the output sinks failed
    #[error("Failed to write {sink} output after {rows_written} row(s): {message}")]
    SinkWrite {
        sink: &'static str,
        rows_written: u64,
        message: String,
    },
    /// The worker pool could not be created
    #[error("Failed to build worker pool: {0}")]
    PoolConstruction(String),
    /// Failed to parse XML content
    #[error("Parse error: {0}")]
    ParseError(String),
    /// Invalid input format
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// IO operation failed
    #[error("IO error: {0}")]
    IoError(String),
}

impl AppError {
    /// Fatal errors stop the whole run; the rest are recovered per archive.
    pub fn is_fatal(&self) -> bool {
        !matches!(
            self,
            AppError::ArchiveOpen { .. } | AppError::EntryParse { .. }
        )
    }
}

// Conversion implementations for common errors
impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<quick_xml::Error> for AppError {
    fn from(err: quick_xml::Error) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<quick_xml::events::attributes::AttrError> for AppError {
    fn from(err: quick_xml::events::attributes::AttrError) -> Self {
        AppError::ParseError(err.to_string())
    }
}

impl From<zip::result::ZipError> for AppError {
    fn from(err: zip::result::ZipError) -> Self {
        AppError::IoError(err.to_string())
    }
}

impl From<rayon::ThreadPoolBuildError> for AppError {
    fn from(err: rayon::ThreadPoolBuildError) -> Self {
        AppError::PoolConstruction(err.to_string())
    }
}

// Custom type alias for Results in this application
pub type AppResult<T> = Result<T, AppError>;
