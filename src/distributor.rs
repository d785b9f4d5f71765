use crate::constants::{DEFAULT_CHANNEL_CAPACITY, WORKER_THREAD_PREFIX};
use crate::errors::{AppError, AppResult};
use crate::models::Concurrency;
use crossbeam_channel::bounded;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::debug;

/// Result of processing one archive, tagged with the archive it came from.
#[derive(Debug)]
pub struct ArchiveOutcome<T> {
    pub path: PathBuf,
    pub result: AppResult<T>,
}

/// Schedules one job per archive and hands completed results to a single consumer.
///
/// # Modes
///
/// - **Sequential**: archives are processed on the calling thread, lazily, in the order
///   they were given. Results are deterministic.
/// - **Parallel**: a dedicated rayon pool runs one job per archive. Each job publishes its
///   outcome into a bounded channel that the consumer drains in *completion order*.
///
/// A failed archive is just a failed outcome; it never cancels sibling jobs.
#[derive(Debug, Clone, Copy)]
pub struct Distributor {
    concurrency: Concurrency,
    channel_capacity: usize,
}

impl Distributor {
    pub fn new(concurrency: Concurrency, channel_capacity: usize) -> Self {
        Self {
            concurrency,
            channel_capacity: channel_capacity.max(1),
        }
    }

    pub fn sequential() -> Self {
        Self::new(Concurrency::Sequential, DEFAULT_CHANNEL_CAPACITY)
    }

    pub fn concurrency(&self) -> Concurrency {
        self.concurrency
    }

    /// Runs `job` for every archive and feeds the outcomes to `consume`.
    ///
    /// `consume` receives a lazy iterator over outcomes and is called exactly once.
    /// Every job has finished, or has been abandoned before opening its archive,
    /// by the time `run` returns. If `consume` returns before draining the iterator
    /// (typically on a writer error), queued jobs are abandoned and in-flight jobs
    /// are allowed to finish with their results discarded.
    ///
    /// # Errors
    ///
    /// Returns `PoolConstruction` if the worker pool cannot be built, before any job
    /// runs. Otherwise returns whatever `consume` returns.
    pub fn run<T, F, C, R>(&self, archives: Vec<PathBuf>, job: F, consume: C) -> AppResult<R>
    where
        T: Send,
        F: Fn(&Path) -> AppResult<T> + Sync,
        C: FnOnce(&mut dyn Iterator<Item = ArchiveOutcome<T>>) -> AppResult<R>,
    {
        match self.concurrency {
            Concurrency::Sequential => {
                debug!(archives = archives.len(), "Processing archives sequentially");
                let mut outcomes = archives.into_iter().map(|path| {
                    let result = job(&path);
                    ArchiveOutcome { path, result }
                });
                consume(&mut outcomes)
            }
            Concurrency::Parallel { workers } => {
                self.run_parallel(workers.get(), archives, job, consume)
            }
        }
    }

    fn run_parallel<T, F, C, R>(
        &self,
        workers: usize,
        archives: Vec<PathBuf>,
        job: F,
        consume: C,
    ) -> AppResult<R>
    where
        T: Send,
        F: Fn(&Path) -> AppResult<T> + Sync,
        C: FnOnce(&mut dyn Iterator<Item = ArchiveOutcome<T>>) -> AppResult<R>,
    {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("{WORKER_THREAD_PREFIX}-{i}"))
            .build()
            .map_err(AppError::from)?;

        debug!(
            archives = archives.len(),
            workers = workers,
            capacity = self.channel_capacity,
            "Processing archives in parallel"
        );

        let cancelled = AtomicBool::new(false);
        let (tx, rx) = bounded::<ArchiveOutcome<T>>(self.channel_capacity);

        // The scope joins every spawned job before returning.
        pool.in_place_scope(|scope| {
            let job = &job;
            let cancelled = &cancelled;

            for path in archives {
                let tx = tx.clone();
                scope.spawn(move |_| {
                    if cancelled.load(Ordering::Acquire) {
                        return;
                    }
                    let result = job(&path);
                    // Send only fails once the consumer is gone
                    let _ = tx.send(ArchiveOutcome { path, result });
                });
            }
            drop(tx);

            let outcome = {
                let mut outcomes = rx.iter();
                consume(&mut outcomes)
            };

            // Unblock senders and skip queued work if the consumer stopped early
            cancelled.store(true, Ordering::Release);
            drop(rx);

            outcome
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::num::NonZeroUsize;
    use std::sync::atomic::AtomicUsize;
    use std::thread;
    use std::time::Duration;

    fn parallel(workers: usize, capacity: usize) -> Distributor {
        Distributor::new(
            Concurrency::Parallel {
                workers: NonZeroUsize::new(workers).unwrap(),
            },
            capacity,
        )
    }

    fn paths(names: &[&str]) -> Vec<PathBuf> {
        names.iter().map(PathBuf::from).collect()
    }

    fn name_of(path: &Path) -> AppResult<String> {
        Ok(path.to_string_lossy().into_owned())
    }

    #[test]
    fn test_sequential_preserves_listing_order() {
        let order = Distributor::sequential()
            .run(paths(&["c", "a", "b"]), name_of, |outcomes| {
                Ok(outcomes
                    .map(|o| o.result.unwrap())
                    .collect::<Vec<_>>())
            })
            .unwrap();
        assert_eq!(order, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_sequential_is_lazy() {
        let calls = AtomicUsize::new(0);
        let first = Distributor::sequential()
            .run(
                paths(&["a", "b", "c"]),
                |p| {
                    calls.fetch_add(1, Ordering::SeqCst);
                    name_of(p)
                },
                |outcomes| Ok(outcomes.next().map(|o| o.path)),
            )
            .unwrap();
        assert_eq!(first, Some(PathBuf::from("a")));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_parallel_yields_every_archive_once() {
        let names: Vec<String> = (0..50).map(|i| format!("{i}.zip")).collect();
        let archives: Vec<PathBuf> = names.iter().map(PathBuf::from).collect();

        let mut seen = parallel(4, 2)
            .run(archives, name_of, |outcomes| {
                Ok(outcomes.map(|o| o.result.unwrap()).collect::<Vec<_>>())
            })
            .unwrap();
        seen.sort();

        let mut expected = names.clone();
        expected.sort();
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_parallel_yields_in_completion_order() {
        let order = parallel(2, 4)
            .run(
                paths(&["slow", "fast"]),
                |p| {
                    if p == Path::new("slow") {
                        thread::sleep(Duration::from_millis(300));
                    }
                    name_of(p)
                },
                |outcomes| Ok(outcomes.map(|o| o.result.unwrap()).collect::<Vec<_>>()),
            )
            .unwrap();
        assert_eq!(order, vec!["fast", "slow"]);
    }

    #[test]
    fn test_failed_archive_does_not_cancel_siblings() {
        let results = parallel(3, 4)
            .run(
                paths(&["ok-1", "bad", "ok-2"]),
                |p| {
                    if p == Path::new("bad") {
                        Err(AppError::ArchiveOpen {
                            path: p.to_path_buf(),
                            message: "corrupt".to_string(),
                        })
                    } else {
                        name_of(p)
                    }
                },
                |outcomes| Ok(outcomes.collect::<Vec<_>>()),
            )
            .unwrap();

        assert_eq!(results.len(), 3);
        assert_eq!(results.iter().filter(|o| o.result.is_ok()).count(), 2);
        let failed: Vec<_> = results.iter().filter(|o| o.result.is_err()).collect();
        assert_eq!(failed[0].path, PathBuf::from("bad"));
    }

    #[test]
    fn test_consumer_error_drains_workers() {
        let started = AtomicUsize::new(0);
        let in_flight = AtomicUsize::new(0);
        let archives: Vec<PathBuf> = (0..200).map(|i| PathBuf::from(format!("{i}"))).collect();

        let result: AppResult<()> = parallel(2, 1).run(
            archives,
            |p| {
                started.fetch_add(1, Ordering::SeqCst);
                in_flight.fetch_add(1, Ordering::SeqCst);
                thread::sleep(Duration::from_millis(2));
                in_flight.fetch_sub(1, Ordering::SeqCst);
                name_of(p)
            },
            |outcomes| {
                outcomes.next();
                Err(AppError::SinkWrite {
                    sink: "documents",
                    rows_written: 1,
                    message: "disk full".to_string(),
                })
            },
        );

        assert!(matches!(result, Err(AppError::SinkWrite { .. })));
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
        assert!(started.load(Ordering::SeqCst) < 200);
    }

    #[test]
    fn test_parallel_with_no_archives() {
        let count = parallel(2, 1)
            .run(Vec::new(), name_of, |outcomes| Ok(outcomes.count()))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_zero_capacity_is_clamped() {
        let count = parallel(2, 0)
            .run(paths(&["a", "b"]), name_of, |outcomes| Ok(outcomes.count()))
            .unwrap();
        assert_eq!(count, 2);
    }
}
