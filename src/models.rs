use crate::constants::*;
use crate::errors::AppError;
use serde::Deserialize;
use std::num::NonZeroUsize;
use std::str::FromStr;

/// A named sub-item owned by exactly one [`Document`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocumentObject {
    pub name: String,
}

impl DocumentObject {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Flattened record extracted from one archive entry.
///
/// `id` correlates the documents output with the objects output. It is not
/// unique across a run; duplicates simply produce duplicate rows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub id: String,
    pub level: Option<String>,
    pub objects: Vec<DocumentObject>,
}

/// What the extractor does when one entry of an archive fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EntryPolicy {
    /// Abort the whole archive on the first bad entry.
    #[default]
    FailFast,
    /// Skip the bad entry and keep the rest of the archive.
    SkipEntry,
}

impl EntryPolicy {
    /// Returns a human-readable name for the policy.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::FailFast => "fail-fast",
            Self::SkipEntry => "skip-entry",
        }
    }

    /// Every accepted spelling, fail-fast first.
    pub fn aliases() -> impl Iterator<Item = &'static str> {
        FAIL_FAST_ALIASES
            .iter()
            .chain(SKIP_ENTRY_ALIASES)
            .copied()
    }
}

impl FromStr for EntryPolicy {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let lower = value.trim().to_lowercase();

        if SKIP_ENTRY_ALIASES.contains(&lower.as_str()) {
            Ok(Self::SkipEntry)
        } else if FAIL_FAST_ALIASES.contains(&lower.as_str()) {
            Ok(Self::FailFast)
        } else {
            Err(AppError::InvalidInput(format!(
                "Unknown entry policy '{value}' (expected one of: {})",
                EntryPolicy::aliases().collect::<Vec<_>>().join(", ")
            )))
        }
    }
}

/// How archives are scheduled across workers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Concurrency {
    /// One archive at a time, in listing order.
    Sequential,
    /// Fixed-size worker pool, results in completion order.
    Parallel { workers: NonZeroUsize },
}

impl Concurrency {
    /// Maps a configured worker count to a scheduling mode.
    ///
    /// `0` means one worker per available execution unit and `1` is sequential.
    pub fn from_workers(workers: usize) -> Self {
        let workers = match workers {
            0 => std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            n => n,
        };
        match NonZeroUsize::new(workers) {
            Some(n) if n.get() > 1 => Self::Parallel { workers: n },
            _ => Self::Sequential,
        }
    }

    pub fn workers(&self) -> usize {
        match self {
            Self::Sequential => 1,
            Self::Parallel { workers } => workers.get(),
        }
    }
}
