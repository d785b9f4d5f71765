//! Common test utilities for integration tests

use docs_collector::generator::{generate_random_document, write_archive, GeneratorConfig};
use docs_collector::models::Document;
use docs_collector::parser::ParserConfig;
use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

/// Helper function to create a test ZIP file with specified entries
#[allow(dead_code)]
pub fn create_test_zip(
    zip_path: &Path,
    files: &[(&str, &str)],
) -> Result<(), Box<dyn std::error::Error>> {
    use zip::write::FileOptions;
    use zip::ZipWriter;

    let file = fs::File::create(zip_path)?;
    let mut zip = ZipWriter::new(file);
    let options = FileOptions::default().compression_method(zip::CompressionMethod::Stored);

    for (name, content) in files {
        zip.start_file(*name, options)?;
        zip.write_all(content.as_bytes())?;
    }

    zip.finish()?;
    Ok(())
}

/// Writes an archive of `count` random documents and returns them
#[allow(dead_code)]
pub fn create_random_archive(zip_path: &Path, count: usize) -> Vec<Document> {
    let config = GeneratorConfig::default();
    let documents: Vec<Document> = (0..count)
        .map(|_| generate_random_document(&config))
        .collect();
    write_archive(zip_path, &documents, &ParserConfig::default()).unwrap();
    documents
}

/// Expected `id,level` lines for a set of documents
#[allow(dead_code)]
pub fn expected_document_rows(documents: &[Document]) -> HashSet<String> {
    documents
        .iter()
        .map(|d| format!("{},{}", d.id, d.level.as_deref().unwrap_or("")))
        .collect()
}

/// Expected `id,name` lines for a set of documents
#[allow(dead_code)]
pub fn expected_object_rows(documents: &[Document]) -> HashSet<String> {
    documents
        .iter()
        .flat_map(|d| d.objects.iter().map(move |o| format!("{},{}", d.id, o.name)))
        .collect()
}

/// Reads an output file as a set of lines
#[allow(dead_code)]
pub fn read_rows(path: &Path) -> HashSet<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

/// A document without a level, as raw XML
#[allow(dead_code)]
pub const LEVELLESS_DOCUMENT: &str = r#"<?xml version="1.0"?>
<root>
  <var name="id" value="no-level"/>
  <objects>
    <object name="only-object"/>
  </objects>
</root>"#;

/// A document missing its id
#[allow(dead_code)]
pub const MISSING_ID_DOCUMENT: &str = r#"<?xml version="1.0"?>
<root>
  <var name="level" value="3"/>
</root>"#;
