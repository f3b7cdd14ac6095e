//! Fast recursive file search
//!
//! This library walks a directory tree and returns the files matching a set
//! of filters:
//! - case-insensitive file name substring
//! - extension
//! - inclusive size range (`500MB`, `5g`, ...)
//! - hidden-path and skip-directory policy (`.git`, `node_modules`, ...)
//! - optional symlink following with loop detection
//!
//! Unreadable directories, broken links and files vanishing mid-walk are
//! skipped without aborting the search. Results are sorted by path, size or
//! modification time and can be limited.
//!
//! # Example
//!
//! ```no_run
//! use superquick::finder::{Collected, Finder, FindOptions, SortKey};
//!
//! let options = FindOptions::new()
//!     .with_root("/home/me/Documents")
//!     .with_extension(Some("xlsx"))
//!     .with_sort(SortKey::Size)
//!     .with_limit(Some(10));
//!
//! let report = Finder::new(options).find().unwrap();
//! if let Collected::Entries(entries) = report.collected {
//!     for entry in entries {
//!         println!("{} ({} bytes)", entry.path().display(), entry.size());
//!     }
//! }
//! ```

pub mod cli;
pub mod errors;
pub mod finder;
pub mod output;

// Re-export main types for convenience
pub use errors::{FindError, FindResult};
pub use finder::Finder;
