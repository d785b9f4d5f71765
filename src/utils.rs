use crate::errors::{AppError, AppResult};
use std::path::Path;
use std::time::Duration;

pub fn format_duration(duration: Duration) -> String {
    let total_secs = duration.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Empties `dir` by removing and recreating it.
///
/// Does nothing if `dir` does not exist. Permissions of the original directory
/// are not preserved.
pub fn clear_directory(dir: &Path) -> AppResult<()> {
    if !dir.exists() {
        return Ok(());
    }
    std::fs::remove_dir_all(dir).map_err(|e| {
        AppError::IoError(format!("Failed to remove directory {}: {e}", dir.display()))
    })?;
    std::fs::create_dir_all(dir).map_err(|e| {
        AppError::IoError(format!("Failed to create directory {}: {e}", dir.display()))
    })
}
