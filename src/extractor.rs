use crate::constants::DEFAULT_ENTRY_SUFFIX;
use crate::errors::{AppError, AppResult};
use crate::models::{Document, EntryPolicy};
use crate::parser::{parse_document, ParserConfig};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, warn};
use zip::ZipArchive;

/// Settings the extractor is constructed with for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractorConfig {
    /// Entry names must end with this suffix to be parsed (e.g. `.xml`)
    pub entry_suffix: String,
    /// What to do with an entry that fails to parse
    pub policy: EntryPolicy,
    /// Document layout handed to the parser
    pub parser: ParserConfig,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            entry_suffix: DEFAULT_ENTRY_SUFFIX.to_string(),
            policy: EntryPolicy::default(),
            parser: ParserConfig::default(),
        }
    }
}

/// Documents extracted from one archive, in the archive's entry order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ArchiveBatch {
    pub documents: Vec<Document>,
    /// Entries dropped under [`EntryPolicy::SkipEntry`]
    pub skipped_entries: usize,
}

/// Opens archives and turns their document entries into [`Document`]s.
///
/// Holds no state between calls, so a single instance is shared by every worker.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    pub fn new(config: ExtractorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Extracts every document entry of the archive at `archive_path`.
    ///
    /// Entries are visited in the archive's native order; directories and entries whose
    /// name does not end with the configured suffix are ignored. The archive handle is
    /// closed before this function returns.
    ///
    /// # Errors
    ///
    /// - `ArchiveOpen` if the file is missing or is not a readable archive
    /// - `EntryParse` for the first bad entry when the policy is [`EntryPolicy::FailFast`]
    pub fn extract(&self, archive_path: &Path) -> AppResult<ArchiveBatch> {
        let file = File::open(archive_path).map_err(|e| AppError::ArchiveOpen {
            path: archive_path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut archive = ZipArchive::new(file).map_err(|e| AppError::ArchiveOpen {
            path: archive_path.to_path_buf(),
            message: e.to_string(),
        })?;

        let mut batch = ArchiveBatch::default();

        for i in 0..archive.len() {
            let mut entry = archive.by_index(i).map_err(|e| AppError::ArchiveOpen {
                path: archive_path.to_path_buf(),
                message: format!("Failed to read entry {i}: {e}"),
            })?;

            if entry.is_dir() || !entry.name().ends_with(&self.config.entry_suffix) {
                continue;
            }

            let entry_name = entry.name().to_string();
            let parsed = read_entry_text(&mut entry)
                .and_then(|text| parse_document(&text, &self.config.parser));

            match parsed {
                Ok(document) => batch.documents.push(document),
                Err(e) => match self.config.policy {
                    EntryPolicy::FailFast => {
                        return Err(AppError::EntryParse {
                            archive: archive_path.to_path_buf(),
                            entry: entry_name,
                            message: e.to_string(),
                        });
                    }
                    EntryPolicy::SkipEntry => {
                        warn!(
                            archive = %archive_path.display(),
                            entry = %entry_name,
                            error = %e,
                            "Skipping unparseable entry"
                        );
                        batch.skipped_entries += 1;
                    }
                },
            }
        }

        debug!(
            archive = %archive_path.display(),
            documents = batch.documents.len(),
            skipped = batch.skipped_entries,
            "Archive extracted"
        );

        Ok(batch)
    }
}

/// Reads one entry and decodes it as UTF-8.
fn read_entry_text(entry: &mut impl Read) -> AppResult<String> {
    let mut bytes = Vec::new();
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| AppError::IoError(format!("Failed to read entry: {e}")))?;
    String::from_utf8(bytes)
        .map_err(|e| AppError::ParseError(format!("Entry is not valid UTF-8: {e}")))
}
