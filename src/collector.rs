use crate::config::ResolvedConfig;
use crate::distributor::Distributor;
use crate::errors::AppResult;
use crate::extractor::{Extractor, ExtractorConfig};
use crate::lister::list_archives;
use crate::parser::ParserConfig;
use crate::ui::archive_progress_bar;
use crate::utils::format_duration;
use crate::writer::write_documents;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// An archive that produced no rows, and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveFailure {
    pub path: PathBuf,
    pub message: String,
}

/// Outcome of a completed collection run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub archives_total: usize,
    pub archives_succeeded: usize,
    pub failures: Vec<ArchiveFailure>,
    pub documents_written: u64,
    pub objects_written: u64,
    pub entries_skipped: usize,
    pub elapsed: Duration,
}

impl RunSummary {
    /// True when every archive was extracted without failures or skipped entries.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty() && self.entries_skipped == 0
    }
}

/// Collects every document from the archives in `source_dir` into two CSV sinks.
///
/// # Workflow
///
/// 1. Lists archives directly inside `source_dir` with the configured extension
/// 2. Distributes one extraction job per archive (sequentially or across a worker pool)
/// 3. Streams the documents of each completed archive into the writer as they arrive
///
/// Archives that fail to open or parse are recorded in the returned summary; their
/// siblings are still written in full.
///
/// # Errors
///
/// Returns an error, ending the run, if the configuration is invalid, the source
/// directory cannot be listed, the worker pool cannot be built, or either sink
/// fails. Output already written is left as is.
pub fn collect<D, O>(
    source_dir: &Path,
    documents_sink: D,
    objects_sink: O,
    config: &ResolvedConfig,
) -> AppResult<RunSummary>
where
    D: Write,
    O: Write,
{
    config.validate()?;
    let start = Instant::now();

    let archives = list_archives(source_dir, &config.archive_extension)?;
    let archives_total = archives.len();

    let extractor = Extractor::new(ExtractorConfig {
        entry_suffix: config.entry_suffix.clone(),
        policy: config.entry_policy,
        parser: ParserConfig::default(),
    });
    let distributor = Distributor::new(config.concurrency(), config.channel_capacity);

    info!(
        source_dir = %source_dir.display(),
        archives = archives_total,
        workers = distributor.concurrency().workers(),
        entry_policy = config.entry_policy.display_name(),
        "Starting collection"
    );

    let pb = archive_progress_bar(archives_total as u64, config.progress)?;
    let mut failures = Vec::new();
    let mut entries_skipped = 0;

    let written = distributor.run(
        archives,
        |path| extractor.extract(path),
        |outcomes| {
            let documents = outcomes
                .filter_map(|outcome| {
                    pb.inc(1);
                    match outcome.result {
                        Ok(batch) => {
                            entries_skipped += batch.skipped_entries;
                            Some(batch.documents)
                        }
                        Err(e) => {
                            debug!(
                                archive = %outcome.path.display(),
                                error = %e,
                                "Failed to extract archive"
                            );
                            failures.push(ArchiveFailure {
                                path: outcome.path,
                                message: e.to_string(),
                            });
                            None
                        }
                    }
                })
                .flatten();
            write_documents(documents, documents_sink, objects_sink, config.write_headers)
        },
    );

    let stats = match written {
        Ok(stats) => stats,
        Err(e) => {
            pb.abandon_with_message("aborted");
            return Err(e);
        }
    };
    pb.finish_with_message("done");

    Ok(RunSummary {
        archives_total,
        archives_succeeded: archives_total - failures.len(),
        failures,
        documents_written: stats.documents,
        objects_written: stats.objects,
        entries_skipped,
        elapsed: start.elapsed(),
    })
}

/// Logs the run summary, one warning per failed archive.
pub fn log_summary(summary: &RunSummary) {
    for failure in &summary.failures {
        warn!(
            archive = %failure.path.display(),
            error = %failure.message,
            "Archive failed"
        );
    }

    info!(
        archives = summary.archives_total,
        succeeded = summary.archives_succeeded,
        failed = summary.failures.len(),
        documents = summary.documents_written,
        objects = summary.objects_written,
        skipped_entries = summary.entries_skipped,
        elapsed = format_duration(summary.elapsed),
        "Collection completed"
    );
}
