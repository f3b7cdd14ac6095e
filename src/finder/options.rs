//! Options for file finding
//!
//! `FindOptions` is the resolved, immutable configuration of one search.
//! It parameterises both the walker and the filter set.

use std::collections::BTreeSet;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::errors::{FindError, FindResult};

/// Directory names excluded from descent unless `--no-skip` is given.
pub const DEFAULT_SKIP_DIRS: &[&str] = &[
    ".git",
    "node_modules",
    ".venv",
    "venv",
    "__pycache__",
    ".pytest_cache",
    ".mypy_cache",
    ".ruff_cache",
    "dist",
    "build",
    ".tox",
];

/// Set of directory basenames the walker never descends into.
///
/// Matching is an exact comparison against the directory's own name, not a
/// substring of its path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkipDirs(BTreeSet<String>);

impl SkipDirs {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// A set that skips nothing.
    pub fn empty() -> Self {
        Self(BTreeSet::new())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains(name)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for SkipDirs {
    fn default() -> Self {
        Self::new(DEFAULT_SKIP_DIRS.iter().copied())
    }
}

/// Ordering applied to the matches before limiting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortKey {
    /// Full path, ascending
    #[default]
    Path,
    /// Largest first, ties by path
    Size,
    /// Most recently modified first, ties by path
    Mtime,
}

impl FromStr for SortKey {
    type Err = FindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "path" => Ok(SortKey::Path),
            "size" => Ok(SortKey::Size),
            "mtime" => Ok(SortKey::Mtime),
            _ => Err(FindError::InvalidSortKey(s.to_string())),
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SortKey::Path => "path",
            SortKey::Size => "size",
            SortKey::Mtime => "mtime",
        };
        f.write_str(name)
    }
}

/// Options for configuring the file finding process
#[derive(Debug, Clone)]
pub struct FindOptions {
    /// Directory to search
    pub root: PathBuf,

    /// Case-insensitive substring of the file name
    pub substring: Option<String>,

    /// Extension to match, lowercase, without a leading dot
    pub extension: Option<String>,

    /// Inclusive lower size bound in bytes
    pub min_size: Option<u64>,

    /// Inclusive upper size bound in bytes
    pub max_size: Option<u64>,

    /// Directories never descended into
    pub skip_dirs: SkipDirs,

    /// Whether dot-files and dot-directories are visited
    pub include_hidden: bool,

    /// Whether symbolic links are followed
    pub follow_links: bool,

    /// Ordering of the results
    pub sort: SortKey,

    /// Keep at most this many results after sorting
    pub limit: Option<usize>,

    /// Only count matches
    pub count_only: bool,

    /// Filter on a rayon pool
    pub parallel: bool,

    /// Worker count for parallel mode (None: one per CPU)
    pub threads: Option<usize>,
}

impl FindOptions {
    /// Create a new FindOptions with default values
    pub fn new() -> Self {
        Self {
            root: PathBuf::from("."),
            substring: None,
            extension: None,
            min_size: None,
            max_size: None,
            skip_dirs: SkipDirs::default(),
            include_hidden: false,
            follow_links: false,
            sort: SortKey::default(),
            limit: None,
            count_only: false,
            parallel: false,
            threads: None,
        }
    }

    pub fn with_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = root.into();
        self
    }

    /// Set the name substring; stored lowercase
    pub fn with_substring(mut self, substring: Option<&str>) -> Self {
        self.substring = substring
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);
        self
    }

    /// Set the extension; a leading dot is stripped and case folded
    pub fn with_extension(mut self, extension: Option<&str>) -> Self {
        self.extension = extension
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .filter(|ext| !ext.is_empty());
        self
    }

    pub fn with_size_range(mut self, min_size: Option<u64>, max_size: Option<u64>) -> Self {
        self.min_size = min_size;
        self.max_size = max_size;
        self
    }

    pub fn with_skip_dirs(mut self, skip_dirs: SkipDirs) -> Self {
        self.skip_dirs = skip_dirs;
        self
    }

    /// Disable directory skipping entirely
    pub fn with_no_skip(mut self, no_skip: bool) -> Self {
        if no_skip {
            self.skip_dirs = SkipDirs::empty();
        }
        self
    }

    pub fn with_include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = include_hidden;
        self
    }

    /// Set whether to follow symbolic links
    pub fn with_follow_links(mut self, follow_links: bool) -> Self {
        self.follow_links = follow_links;
        self
    }

    pub fn with_sort(mut self, sort: SortKey) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: Option<usize>) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_count_only(mut self, count_only: bool) -> Self {
        self.count_only = count_only;
        self
    }

    pub fn with_parallel(mut self, parallel: bool, threads: Option<usize>) -> Self {
        self.parallel = parallel;
        self.threads = threads;
        self
    }

    /// Reject settings no search can run with.
    ///
    /// An inverted size range is accepted; it simply matches nothing.
    pub fn validate(&self) -> FindResult<()> {
        if self.limit == Some(0) {
            return Err(FindError::InvalidLimit(0));
        }
        Ok(())
    }
}

impl Default for FindOptions {
    fn default() -> Self {
        Self::new()
    }
}
