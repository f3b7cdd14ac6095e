//! File filtering functionality
//!
//! This module provides filters for matching files based on various criteria,
//! and `FilterSet`, which combines the active ones with AND semantics.

use super::entry::FileEntry;
use super::options::FindOptions;

/// Trait for file filters
pub trait FileFilter {
    /// Check if the entry matches the filter
    fn matches(&self, entry: &FileEntry) -> bool;

    /// Get the filter description
    fn description(&self) -> String;
}

/// Case-insensitive substring of the file name (never the full path)
pub struct SubstringFilter {
    needle: String,
}

impl SubstringFilter {
    pub fn new(needle: &str) -> Self {
        Self {
            needle: needle.to_lowercase(),
        }
    }
}

impl FileFilter for SubstringFilter {
    fn matches(&self, entry: &FileEntry) -> bool {
        entry.file_name().to_lowercase().contains(&self.needle)
    }

    fn description(&self) -> String {
        format!("name contains '{}'", self.needle)
    }
}

/// Exact, case-insensitive extension match
pub struct ExtensionFilter {
    extension: String,
}

impl ExtensionFilter {
    /// A leading dot in `extension` is ignored
    pub fn new(extension: &str) -> Self {
        Self {
            extension: extension.trim_start_matches('.').to_lowercase(),
        }
    }
}

impl FileFilter for ExtensionFilter {
    fn matches(&self, entry: &FileEntry) -> bool {
        entry.extension() == self.extension
    }

    fn description(&self) -> String {
        format!("extension is '{}'", self.extension)
    }
}

/// Inclusive size bounds; a missing bound is open
pub struct SizeFilter {
    min: Option<u64>,
    max: Option<u64>,
}

impl SizeFilter {
    pub fn new(min: Option<u64>, max: Option<u64>) -> Self {
        Self { min, max }
    }
}

impl FileFilter for SizeFilter {
    fn matches(&self, entry: &FileEntry) -> bool {
        let size = entry.size();
        self.min.map_or(true, |min| size >= min) && self.max.map_or(true, |max| size <= max)
    }

    fn description(&self) -> String {
        match (self.min, self.max) {
            (Some(min), Some(max)) => format!("size in [{min}, {max}] bytes"),
            (Some(min), None) => format!("size >= {min} bytes"),
            (None, Some(max)) => format!("size <= {max} bytes"),
            (None, None) => "any size".to_string(),
        }
    }
}

/// Rejects entries with a dot-segment below the root.
///
/// The walker already refuses to descend into hidden directories; this
/// filter keeps the predicate correct for entries produced elsewhere.
pub struct HiddenFilter;

impl FileFilter for HiddenFilter {
    fn matches(&self, entry: &FileEntry) -> bool {
        !entry.is_hidden()
    }

    fn description(&self) -> String {
        "not hidden".to_string()
    }
}

/// All active filters of one search, combined with logical AND.
///
/// With no filter configured every entry matches.
#[derive(Default)]
pub struct FilterSet {
    filters: Vec<Box<dyn FileFilter + Send + Sync>>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the filter set described by `options`
    pub fn from_options(options: &FindOptions) -> Self {
        let mut set = Self::new();

        if let Some(substring) = options.substring.as_deref() {
            set = set.with_filter(SubstringFilter::new(substring));
        }
        if let Some(extension) = options.extension.as_deref() {
            set = set.with_filter(ExtensionFilter::new(extension));
        }
        if options.min_size.is_some() || options.max_size.is_some() {
            set = set.with_filter(SizeFilter::new(options.min_size, options.max_size));
        }
        if !options.include_hidden {
            set = set.with_filter(HiddenFilter);
        }

        set
    }

    /// Add a filter
    pub fn with_filter<F>(mut self, filter: F) -> Self
    where
        F: FileFilter + Send + Sync + 'static,
    {
        self.filters.push(Box::new(filter));
        self
    }

    pub fn len(&self) -> usize {
        self.filters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filters.is_empty()
    }
}

impl FileFilter for FilterSet {
    fn matches(&self, entry: &FileEntry) -> bool {
        self.filters.iter().all(|filter| filter.matches(entry))
    }

    fn description(&self) -> String {
        if self.filters.is_empty() {
            return "all files".to_string();
        }
        self.filters
            .iter()
            .map(|filter| filter.description())
            .collect::<Vec<_>>()
            .join(" and ")
    }
}
