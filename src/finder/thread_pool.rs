//! Worker pool for parallel filtering
//!
//! Sizes a rayon thread pool from the requested worker count and the
//! machine's CPUs.

use log::{debug, info};
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::errors::{FindError, FindResult};

/// Thread pool configuration
#[derive(Debug, Clone)]
pub struct ThreadPoolConfig {
    /// Minimum number of workers
    pub min_threads: usize,
    /// Maximum number of workers
    pub max_threads: usize,
    /// Explicitly requested worker count
    pub requested: Option<usize>,
}

impl Default for ThreadPoolConfig {
    fn default() -> Self {
        Self {
            min_threads: 1,
            max_threads: num_cpus::get(),
            requested: None,
        }
    }
}

impl ThreadPoolConfig {
    pub fn with_requested(mut self, requested: Option<usize>) -> Self {
        self.requested = requested;
        self
    }

    /// Worker count: the requested value, or one per CPU, kept within
    /// `[min_threads, max(max_threads, min_threads)]`.
    pub fn thread_count(&self) -> usize {
        let upper = self.max_threads.max(self.min_threads);
        let count = self
            .requested
            .unwrap_or_else(num_cpus::get)
            .clamp(self.min_threads, upper);
        debug!(
            "Thread count - requested: {:?}, min: {}, max: {}, chosen: {}",
            self.requested, self.min_threads, self.max_threads, count
        );
        count
    }

    /// Build the rayon pool
    pub fn build(&self) -> FindResult<ThreadPool> {
        let threads = self.thread_count();
        info!("Using {} threads for filtering", threads);
        ThreadPoolBuilder::new()
            .num_threads(threads)
            .build()
            .map_err(|err| FindError::ThreadPool(err.to_string()))
    }
}
