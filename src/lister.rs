use crate::errors::{AppError, AppResult};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Lists the archive files directly inside `dir`.
///
/// Only files (or symlinks to files) whose name ends in `.{extension}` are returned; subdirectories
/// are neither returned nor descended into. Paths are sorted by file name so the
/// listing order is stable across runs.
///
/// # Arguments
///
/// * `dir` - Directory holding the archives
/// * `extension` - Archive extension, with or without the leading dot (e.g. `zip`)
///
/// # Errors
///
/// Returns an error if `dir` does not exist, is not a directory, or cannot be read.
pub fn list_archives(dir: &Path, extension: &str) -> AppResult<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(AppError::IoError(format!(
            "Source directory does not exist: {}",
            dir.display()
        )));
    }

    let suffix = format!(".{}", extension.trim_start_matches('.'));
    let walker = WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name();

    let mut out = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|e| {
            AppError::IoError(format!("Failed to read {}: {e}", dir.display()))
        })?;
        // Follows symlinks, so a link to an archive counts as one.
        if !entry.path().is_file() {
            continue;
        }
        let matches = entry
            .file_name()
            .to_str()
            .is_some_and(|name| name.ends_with(&suffix));
        if matches {
            out.push(entry.into_path());
        }
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_empty_file(dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        fs::File::create(&path).unwrap();
        assert!(path.exists());
        path
    }

    #[test]
    fn test_list_archives_filters_by_extension() {
        let temp_dir = TempDir::new().unwrap();
        create_empty_file(temp_dir.path(), "temp.zip");
        create_empty_file(temp_dir.path(), "temp.txt");
        create_empty_file(temp_dir.path(), "temp");
        fs::create_dir_all(temp_dir.path().join("some_directory")).unwrap();

        let files = list_archives(temp_dir.path(), "zip").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("temp.zip"));
    }

    #[test]
    fn test_list_archives_accepts_dotted_extension() {
        let temp_dir = TempDir::new().unwrap();
        create_empty_file(temp_dir.path(), "a.zip");

        let files = list_archives(temp_dir.path(), ".zip").unwrap();
        assert_eq!(files.len(), 1);
    }

    #[test]
    fn test_list_archives_is_not_recursive() {
        let temp_dir = TempDir::new().unwrap();
        let nested = temp_dir.path().join("nested");
        fs::create_dir_all(&nested).unwrap();
        create_empty_file(&nested, "inner.zip");
        create_empty_file(temp_dir.path(), "outer.zip");

        let files = list_archives(temp_dir.path(), "zip").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("outer.zip"));
    }

    #[test]
    fn test_list_archives_skips_directories_named_like_archives() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("folder.zip")).unwrap();

        let files = list_archives(temp_dir.path(), "zip").unwrap();
        assert!(files.is_empty());
    }

    #[test]
    fn test_list_archives_sorted_by_name() {
        let temp_dir = TempDir::new().unwrap();
        create_empty_file(temp_dir.path(), "b.zip");
        create_empty_file(temp_dir.path(), "a.zip");
        create_empty_file(temp_dir.path(), "c.zip");

        let files = list_archives(temp_dir.path(), "zip").unwrap();
        let names: Vec<_> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a.zip", "b.zip", "c.zip"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_list_archives_follows_file_symlinks() {
        let temp_dir = TempDir::new().unwrap();
        let elsewhere = TempDir::new().unwrap();
        let target = create_empty_file(elsewhere.path(), "real.zip");
        std::os::unix::fs::symlink(&target, temp_dir.path().join("linked.zip")).unwrap();
        std::os::unix::fs::symlink(elsewhere.path(), temp_dir.path().join("dir.zip")).unwrap();

        let files = list_archives(temp_dir.path(), "zip").unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("linked.zip"));
    }

    #[test]
    fn test_list_archives_empty_directory() {
        let temp_dir = TempDir::new().unwrap();
        assert!(list_archives(temp_dir.path(), "zip").unwrap().is_empty());
    }

    #[test]
    fn test_list_archives_missing_directory_errors() {
        let temp_dir = TempDir::new().unwrap();
        let result = list_archives(&temp_dir.path().join("missing"), "zip");
        assert!(matches!(result, Err(AppError::IoError(_))));
    }
}
