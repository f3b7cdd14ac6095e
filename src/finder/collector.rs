//! Result assembly
//!
//! `ResultCollector` consumes walk outcomes, keeps the entries accepted by the
//! filter set, then sorts and truncates them. In count-only mode it keeps a
//! running count and never buffers entries.

use std::cmp::Ordering as CmpOrdering;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use rayon::ThreadPool;

use super::entry::FileEntry;
use super::filter::{FileFilter, FilterSet};
use super::options::{FindOptions, SortKey};
use super::walker::WalkOutcome;

/// Matches of a search: the ordered entries, or just their number
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Collected {
    Entries(Vec<FileEntry>),
    Count(usize),
}

impl Collected {
    /// Number of results that will be reported
    pub fn len(&self) -> usize {
        match self {
            Collected::Entries(entries) => entries.len(),
            Collected::Count(count) => *count,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Paths passed over during a walk
#[derive(Debug, Default)]
struct SkipCounters {
    errors: AtomicUsize,
    policy: AtomicUsize,
}

/// Bookkeeping of one collection run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollectStats {
    /// Files accepted by the filters, before the limit
    pub matched: usize,
    /// Paths skipped because of filesystem errors
    pub skipped_errors: usize,
    /// Paths skipped by the skip-directory, hidden or symlink policy
    pub skipped_policy: usize,
}

/// Filters, orders and limits walk results
pub struct ResultCollector {
    filters: FilterSet,
    sort: SortKey,
    limit: Option<usize>,
    count_only: bool,
}

impl ResultCollector {
    pub fn new(filters: FilterSet, sort: SortKey, limit: Option<usize>, count_only: bool) -> Self {
        Self {
            filters,
            sort,
            limit,
            count_only,
        }
    }

    pub fn from_options(options: &FindOptions) -> Self {
        Self::new(
            FilterSet::from_options(options),
            options.sort,
            options.limit,
            options.count_only,
        )
    }

    fn accept(&self, outcome: WalkOutcome, skips: &SkipCounters) -> Option<FileEntry> {
        match outcome {
            WalkOutcome::Entry(entry) => Some(entry).filter(|entry| self.filters.matches(entry)),
            WalkOutcome::Skipped { reason, .. } => {
                let counter = if reason.is_error() {
                    &skips.errors
                } else {
                    &skips.policy
                };
                counter.fetch_add(1, Ordering::Relaxed);
                None
            }
        }
    }

    /// Collect sequentially
    pub fn collect<I>(&self, outcomes: I) -> (Collected, CollectStats)
    where
        I: IntoIterator<Item = WalkOutcome>,
    {
        let skips = SkipCounters::default();
        let matches = outcomes
            .into_iter()
            .filter_map(|outcome| self.accept(outcome, &skips));

        if self.count_only {
            let matched = matches.count();
            self.finish_count(matched, &skips)
        } else {
            let entries: Vec<FileEntry> = matches.collect();
            self.finish_entries(entries, &skips)
        }
    }

    /// Collect with filtering spread over `pool`.
    ///
    /// The walk itself stays a single producer; the final order is the same
    /// as in [`ResultCollector::collect`].
    pub fn collect_parallel<I>(&self, outcomes: I, pool: &ThreadPool) -> (Collected, CollectStats)
    where
        I: Iterator<Item = WalkOutcome> + Send,
    {
        let skips = SkipCounters::default();

        pool.install(|| {
            let matches = outcomes
                .par_bridge()
                .filter_map(|outcome| self.accept(outcome, &skips));

            if self.count_only {
                let matched = matches.count();
                self.finish_count(matched, &skips)
            } else {
                let entries: Vec<FileEntry> = matches.collect();
                self.finish_entries(entries, &skips)
            }
        })
    }

    fn finish_count(&self, matched: usize, skips: &SkipCounters) -> (Collected, CollectStats) {
        let count = self.limit.map_or(matched, |limit| matched.min(limit));
        (Collected::Count(count), stats(matched, skips))
    }

    fn finish_entries(
        &self,
        mut entries: Vec<FileEntry>,
        skips: &SkipCounters,
    ) -> (Collected, CollectStats) {
        let matched = entries.len();
        sort_entries(&mut entries, self.sort);
        if let Some(limit) = self.limit {
            entries.truncate(limit);
        }
        (Collected::Entries(entries), stats(matched, skips))
    }
}

fn stats(matched: usize, skips: &SkipCounters) -> CollectStats {
    CollectStats {
        matched,
        skipped_errors: skips.errors.load(Ordering::Relaxed),
        skipped_policy: skips.policy.load(Ordering::Relaxed),
    }
}

fn by_path(a: &FileEntry, b: &FileEntry) -> CmpOrdering {
    a.path().as_os_str().cmp(b.path().as_os_str())
}

/// Order entries by `key`; size and mtime are descending with path as the
/// tie-break, so the result is fully deterministic.
pub fn sort_entries(entries: &mut [FileEntry], key: SortKey) {
    match key {
        SortKey::Path => entries.sort_by(by_path),
        SortKey::Size => {
            entries.sort_by(|a, b| b.size().cmp(&a.size()).then_with(|| by_path(a, b)))
        }
        SortKey::Mtime => entries.sort_by(|a, b| {
            b.modified()
                .cmp(&a.modified())
                .then_with(|| by_path(a, b))
        }),
    }
}
