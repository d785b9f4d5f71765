use crate::errors::{AppError, AppResult};
use indicatif::{ProgressBar, ProgressStyle};

/// Creates the progress bar that advances once per completed archive.
///
/// When `visible` is false a hidden bar is returned, so callers can update it
/// unconditionally.
///
/// # Example
///
/// ```no_run
/// use docs_collector::ui;
///
/// # fn main() -> Result<(), docs_collector::errors::AppError> {
/// let pb = ui::archive_progress_bar(100, true)?;
/// pb.inc(1);
/// pb.finish_with_message("Done");
/// # Ok(())
/// # }
/// ```
pub fn archive_progress_bar(total: u64, visible: bool) -> AppResult<ProgressBar> {
    if !visible {
        return Ok(ProgressBar::hidden());
    }

    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{wide_bar:.cyan/blue}] {pos}/{len} archives {msg}",
            )
            .map_err(|e| AppError::IoError(format!("Failed to create progress bar template: {e}")))?
            .progress_chars("#>-"),
    );
    Ok(pb)
}
