//! Integration tests for extractor module

#[path = "common/mod.rs"]
mod common;

use common::*;
use docs_collector::errors::AppError;
use docs_collector::extractor::{Extractor, ExtractorConfig};
use docs_collector::models::EntryPolicy;
use tempfile::TempDir;

#[test]
fn test_extract_returns_every_generated_document() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("0.zip");
    let documents = create_random_archive(&zip_path, 25);

    let batch = Extractor::default().extract(&zip_path).unwrap();

    assert_eq!(batch.documents.len(), 25);
    assert_eq!(batch.documents, documents);
    assert!(batch.documents.iter().all(|d| !d.id.is_empty()));
}

#[test]
fn test_extract_levelless_document() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("0.zip");
    create_test_zip(&zip_path, &[("doc.xml", LEVELLESS_DOCUMENT)]).unwrap();

    let batch = Extractor::default().extract(&zip_path).unwrap();

    assert_eq!(batch.documents.len(), 1);
    assert_eq!(batch.documents[0].id, "no-level");
    assert_eq!(batch.documents[0].level, None);
}

#[test]
fn test_extract_error_on_invalid() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("0.zip");
    std::fs::write(&zip_path, "invalid").unwrap();

    match Extractor::default().extract(&zip_path).unwrap_err() {
        AppError::ArchiveOpen { path, .. } => assert_eq!(path, zip_path),
        other => panic!("Expected ArchiveOpen, got {other:?}"),
    }
}

#[test]
fn test_extract_policies_on_missing_id() {
    let temp_dir = TempDir::new().unwrap();
    let zip_path = temp_dir.path().join("0.zip");
    create_test_zip(
        &zip_path,
        &[("0.xml", MISSING_ID_DOCUMENT), ("1.xml", LEVELLESS_DOCUMENT)],
    )
    .unwrap();

    let err = Extractor::default().extract(&zip_path).unwrap_err();
    assert!(matches!(err, AppError::EntryParse { ref entry, .. } if entry == "0.xml"));

    let skipping = Extractor::new(ExtractorConfig {
        policy: EntryPolicy::SkipEntry,
        ..ExtractorConfig::default()
    });
    let batch = skipping.extract(&zip_path).unwrap();
    assert_eq!(batch.documents.len(), 1);
    assert_eq!(batch.skipped_entries, 1);
}
