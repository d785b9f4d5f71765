use crate::constants::{DEFAULT_ARCHIVE_EXTENSION, DEFAULT_CHANNEL_CAPACITY, DEFAULT_ENTRY_SUFFIX};
use crate::errors::{AppError, AppResult};
use crate::models::{Concurrency, EntryPolicy};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Resolved configuration with all values filled in (no Options).
///
/// This struct represents the pipeline defaults and can be deserialized by the TOML
/// loader. All fields have concrete values, making it safe to access directly without unwrapping.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolvedConfig {
    /// Extension (without the dot) of archive files picked up from the source directory
    pub archive_extension: String,
    /// Suffix an archive entry name must end with to be parsed as a document
    pub entry_suffix: String,
    /// Number of extraction workers.
    /// When set to 0 (default), automatically uses available_parallelism().
    /// 1 processes archives sequentially in listing order.
    pub workers: usize,
    /// Maximum number of completed archive batches waiting for the writer.
    pub channel_capacity: usize,
    /// Whether to write the `id,level` and `id,name` header rows.
    pub write_headers: bool,
    /// Behaviour when one entry of an archive fails to parse
    pub entry_policy: EntryPolicy,
    /// Whether to display a progress bar while archives complete
    pub progress: bool,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            archive_extension: DEFAULT_ARCHIVE_EXTENSION.to_string(),
            entry_suffix: DEFAULT_ENTRY_SUFFIX.to_string(),
            workers: 0, // 0 means auto-detect via available_parallelism()
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            write_headers: true,
            entry_policy: EntryPolicy::FailFast,
            progress: true,
        }
    }
}

impl ResolvedConfig {
    pub fn concurrency(&self) -> Concurrency {
        Concurrency::from_workers(self.workers)
    }

    /// Rejects values the pipeline cannot run with.
    pub fn validate(&self) -> AppResult<()> {
        if self.channel_capacity == 0 {
            return Err(AppError::InvalidInput(
                "Channel capacity must be greater than 0".into(),
            ));
        }
        if self.entry_suffix.is_empty() {
            return Err(AppError::InvalidInput(
                "Entry suffix must not be empty".into(),
            ));
        }
        if self.archive_extension.trim_start_matches('.').is_empty() {
            return Err(AppError::InvalidInput(
                "Archive extension must not be empty".into(),
            ));
        }
        Ok(())
    }
}

/// Run description that can be loaded from a TOML file.
///
/// Deserializes required fields (source_dir, documents_path, objects_path) and optional
/// pipeline configuration. The parser rejects unknown keys to catch typos.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ResolvedConfigFile {
    /// Directory holding the archives
    pub source_dir: PathBuf,
    /// Destination of the `id,level` rows
    pub documents_path: PathBuf,
    /// Destination of the `id,name` rows
    pub objects_path: PathBuf,
    /// Flattened resolved configuration with pipeline defaults
    #[serde(flatten)]
    pub resolved: ResolvedConfig,
}

impl ResolvedConfigFile {
    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the TOML is malformed, required fields are missing,
    /// unknown keys are present, or the pipeline settings fail validation.
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        let contents = fs::read_to_string(path)?;
        let config: ResolvedConfigFile = toml::from_str(&contents)
            .map_err(|e| AppError::InvalidInput(format!("Failed to parse config: {e}")))?;

        config.resolved.validate()?;

        Ok(config)
    }
}
