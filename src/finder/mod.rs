//! File finding
//!
//! `Finder` ties the pieces together: it resolves the root with a
//! [`FileWalker`], feeds the lazy walk into a [`ResultCollector`] (optionally
//! on a rayon pool) and reports what was found.

pub mod collector;
pub mod entry;
pub mod filter;
pub mod options;
pub mod size;
mod thread_pool;
pub mod walker;

use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info};

pub use self::collector::{CollectStats, Collected, ResultCollector};
pub use self::entry::FileEntry;
pub use self::filter::{FileFilter, FilterSet};
pub use self::options::{FindOptions, SkipDirs, SortKey, DEFAULT_SKIP_DIRS};
pub use self::walker::{FileWalker, SkipReason, WalkOutcome};
pub use thread_pool::ThreadPoolConfig;

use crate::errors::FindResult;

/// Outcome of one search
#[derive(Debug, Clone)]
pub struct SearchReport {
    /// Canonical search root
    pub root: PathBuf,
    /// Matches after sorting and limiting
    pub collected: Collected,
    /// Match and skip counters
    pub stats: CollectStats,
}

/// File finder
///
/// Runs one bounded scan per call to [`Finder::find`]; nothing is cached
/// between calls.
#[derive(Debug)]
pub struct Finder {
    options: FindOptions,
}

impl Finder {
    pub fn new(options: FindOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &FindOptions {
        &self.options
    }

    /// Walk the root and collect the matching files.
    ///
    /// Only configuration errors and an unusable root are returned as
    /// errors; per-entry problems are counted in the report's stats.
    pub fn find(&self) -> FindResult<SearchReport> {
        self.options.validate()?;
        let walker = FileWalker::new(&self.options)?;
        let collector = ResultCollector::from_options(&self.options);

        info!("Starting search in {}", walker.root().display());
        debug!(
            "Filters: {}",
            FilterSet::from_options(&self.options).description()
        );
        let start_time = Instant::now();

        let (collected, stats) = if self.options.parallel {
            let pool = ThreadPoolConfig::default()
                .with_requested(self.options.threads)
                .build()?;
            collector.collect_parallel(walker.walk(), &pool)
        } else {
            collector.collect(walker.walk())
        };

        info!(
            "Search finished in {:.2?}: {} match(es), {} path(s) skipped due to errors",
            start_time.elapsed(),
            stats.matched,
            stats.skipped_errors
        );

        Ok(SearchReport {
            root: walker.root().to_path_buf(),
            collected,
            stats,
        })
    }
}
