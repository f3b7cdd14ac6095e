//! Command-line interface
//!
//! Parses arguments and resolves them into [`FindOptions`] and an output
//! [`Formatter`]. Every configuration error is raised here, before any
//! traversal begins.

use std::path::PathBuf;

use clap::Parser;

use crate::errors::{FindError, FindResult};
use crate::finder::options::{FindOptions, SortKey};
use crate::finder::size::parse_size;
use crate::output::{Formatter, OutputFormat, PathStyle};

/// Recursively search for files by extension and/or filename substring
#[derive(Parser, Debug)]
#[command(name = "sq", author, version, about, long_about = None)]
pub struct Cli {
    /// Root directory to search (default: current directory)
    pub root: Option<String>,

    /// Substring in the file name (case-insensitive)
    #[arg(short = 's', long)]
    pub substring: Option<String>,

    /// File extension, with or without the dot (e.g. xlsx)
    #[arg(short = 'e', long)]
    pub ext: Option<String>,

    /// Minimum file size (e.g. 10MB, 5g)
    #[arg(long, value_name = "SIZE", allow_hyphen_values = true)]
    pub min_size: Option<String>,

    /// Maximum file size (e.g. 500MB)
    #[arg(long, value_name = "SIZE", allow_hyphen_values = true)]
    pub max_size: Option<String>,

    /// Do not skip heavy directories like .git or node_modules
    #[arg(long)]
    pub no_skip: bool,

    /// Include hidden files and directories
    #[arg(long)]
    pub include_hidden: bool,

    /// Follow symbolic links
    #[arg(short = 'L', long)]
    pub follow_symlinks: bool,

    /// Render output as a table
    #[arg(long)]
    pub table: bool,

    /// Output CSV
    #[arg(long)]
    pub csv: bool,

    /// Output JSON
    #[arg(long)]
    pub json: bool,

    /// Sort by: path, size, mtime
    #[arg(long, default_value = "path")]
    pub sort: String,

    /// Print at most NUM matches
    #[arg(short = 'n', long, value_name = "NUM", allow_negative_numbers = true)]
    pub limit: Option<i64>,

    /// Only print the number of matches
    #[arg(short = 'c', long)]
    pub count_only: bool,

    /// Print absolute paths
    #[arg(long)]
    pub absolute: bool,

    /// Print paths relative to the root (default)
    #[arg(long, conflicts_with = "absolute")]
    pub relative: bool,

    /// Filter on several threads
    #[arg(short = 'p', long)]
    pub parallel: bool,

    /// Number of threads for --parallel (default: one per CPU)
    #[arg(long, value_name = "NUM", requires = "parallel")]
    pub threads: Option<usize>,

    /// Enable debug logging
    #[arg(short, long)]
    pub debug: bool,
}

impl Cli {
    /// Build the search options, validating every argument
    pub fn build_options(&self) -> FindResult<FindOptions> {
        self.validate()?;

        let min_size = self.min_size.as_deref().map(parse_size).transpose()?;
        let max_size = self.max_size.as_deref().map(parse_size).transpose()?;
        let sort: SortKey = self.sort.parse()?;
        let limit = self.limit()?;

        Ok(FindOptions::new()
            .with_root(self.root_path())
            .with_substring(self.substring.as_deref())
            .with_extension(self.ext.as_deref())
            .with_size_range(min_size, max_size)
            .with_no_skip(self.no_skip)
            .with_include_hidden(self.include_hidden)
            .with_follow_links(self.follow_symlinks)
            .with_sort(sort)
            .with_limit(limit)
            .with_count_only(self.count_only)
            .with_parallel(self.parallel, self.threads))
    }

    /// Validate arguments that do not map onto a single option
    pub fn validate(&self) -> FindResult<()> {
        let modes = [self.table, self.csv, self.json]
            .iter()
            .filter(|flag| **flag)
            .count();
        if modes > 1 {
            return Err(FindError::ConflictingOutput);
        }
        self.limit().map(|_| ())
    }

    fn limit(&self) -> FindResult<Option<usize>> {
        match self.limit {
            None => Ok(None),
            Some(n) if n > 0 => usize::try_from(n)
                .map(Some)
                .map_err(|_| FindError::InvalidLimit(n)),
            Some(n) => Err(FindError::InvalidLimit(n)),
        }
    }

    /// Root path with a leading `~` expanded
    pub fn root_path(&self) -> PathBuf {
        match self.root.as_deref() {
            None => PathBuf::from("."),
            Some(root) => expand_tilde(root),
        }
    }

    pub fn output_format(&self) -> OutputFormat {
        if self.table {
            OutputFormat::Table
        } else if self.csv {
            OutputFormat::Csv
        } else if self.json {
            OutputFormat::Json
        } else {
            OutputFormat::Lines
        }
    }

    pub fn path_style(&self) -> PathStyle {
        if self.absolute {
            PathStyle::Absolute
        } else {
            PathStyle::Relative
        }
    }

    pub fn formatter(&self) -> Formatter {
        Formatter::new(self.output_format(), self.path_style())
    }
}

fn expand_tilde(path: &str) -> PathBuf {
    let home = std::env::var_os("HOME").map(PathBuf::from);
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}
