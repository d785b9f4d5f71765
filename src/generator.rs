use crate::errors::{AppError, AppResult};
use crate::models::{Document, DocumentObject};
use crate::parser::{render_document, ParserConfig};
use crate::utils::clear_directory;
use rand::Rng;
use rayon::prelude::*;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use uuid::Uuid;
use zip::write::FileOptions;
use zip::ZipWriter;

/// Bounds for randomly generated documents.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub min_level: u32,
    pub max_level: u32,
    pub min_objects: usize,
    pub max_objects: usize,
    pub parser: ParserConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_level: 1,
            max_level: 100,
            min_objects: 1,
            max_objects: 10,
            parser: ParserConfig::default(),
        }
    }
}

impl GeneratorConfig {
    fn validate(&self) -> AppResult<()> {
        if self.min_level > self.max_level {
            return Err(AppError::InvalidInput(format!(
                "min_level {} is greater than max_level {}",
                self.min_level, self.max_level
            )));
        }
        if self.min_objects > self.max_objects {
            return Err(AppError::InvalidInput(format!(
                "min_objects {} is greater than max_objects {}",
                self.min_objects, self.max_objects
            )));
        }
        Ok(())
    }
}

/// Builds a document with a random UUID id, a random level and randomly named objects.
pub fn generate_random_document(config: &GeneratorConfig) -> Document {
    let mut rng = rand::thread_rng();
    let level = rng.gen_range(config.min_level..=config.max_level);
    let objects = rng.gen_range(config.min_objects..=config.max_objects);

    Document {
        id: Uuid::new_v4().to_string(),
        level: Some(level.to_string()),
        objects: (0..objects)
            .map(|_| DocumentObject::new(Uuid::new_v4().to_string()))
            .collect(),
    }
}

/// Writes `documents` into a ZIP archive as entries `0.xml`, `1.xml`, ...
pub fn write_archive(path: &Path, documents: &[Document], parser: &ParserConfig) -> AppResult<()> {
    let file = File::create(path).map_err(|e| {
        AppError::IoError(format!("Failed to create archive {}: {e}", path.display()))
    })?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default();

    for (i, document) in documents.iter().enumerate() {
        let xml = render_document(document, parser)?;
        zip.start_file(format!("{i}.xml"), options)?;
        zip.write_all(xml.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

/// Fills `dir` with `archives` ZIP files of `documents_per_archive` random documents.
///
/// Existing contents of `dir` are removed first. Archives are named `0.zip`, `1.zip`, ...
/// and written in parallel.
pub fn generate_archives(
    dir: &Path,
    archives: usize,
    documents_per_archive: usize,
    config: &GeneratorConfig,
) -> AppResult<Vec<PathBuf>> {
    config.validate()?;

    if dir.exists() {
        clear_directory(dir)?;
    } else {
        fs::create_dir_all(dir)?;
    }

    let paths: Vec<PathBuf> = (0..archives)
        .map(|n| dir.join(format!("{n}.zip")))
        .collect();

    info!(
        dir = %dir.display(),
        archives = archives,
        documents_per_archive = documents_per_archive,
        "Generating archives"
    );

    paths.par_iter().try_for_each(|path| {
        let documents: Vec<Document> = (0..documents_per_archive)
            .map(|_| generate_random_document(config))
            .collect();
        write_archive(path, &documents, &config.parser)?;
        debug!(archive = %path.display(), "Archive created");
        Ok::<(), AppError>(())
    })?;

    Ok(paths)
}
