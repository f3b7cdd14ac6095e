//! File system traversal
//!
//! `FileWalker` turns a root directory into a lazy sequence of
//! [`WalkOutcome`]s: either a [`FileEntry`] whose metadata was read, or the
//! reason a path was passed over. Nothing in here aborts the walk once the
//! root has been accepted; unreadable directories, broken links and link
//! cycles are reported as skips and traversal continues with the siblings.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use walkdir::{DirEntry, WalkDir};

use super::entry::FileEntry;
use super::options::FindOptions;
use crate::errors::{FindError, FindResult};

/// Why a path produced no entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// Directory name is in the skip set
    SkipDirectory,
    /// Name starts with a dot and hidden paths are excluded
    Hidden,
    /// Symbolic link while links are not followed
    Symlink,
    /// Link points back to a directory already on the descent chain
    SymlinkLoop,
    /// Directory could not be listed
    Unreadable(io::ErrorKind),
    /// Metadata could not be read (broken link, deleted mid-walk, ...)
    Metadata(io::ErrorKind),
}

impl SkipReason {
    /// Whether the skip was caused by a filesystem error rather than policy
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            SkipReason::SymlinkLoop | SkipReason::Unreadable(_) | SkipReason::Metadata(_)
        )
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::SkipDirectory => f.write_str("skipped directory"),
            SkipReason::Hidden => f.write_str("hidden"),
            SkipReason::Symlink => f.write_str("symlink not followed"),
            SkipReason::SymlinkLoop => f.write_str("symlink loop"),
            SkipReason::Unreadable(kind) => write!(f, "unreadable: {kind}"),
            SkipReason::Metadata(kind) => write!(f, "metadata unavailable: {kind}"),
        }
    }
}

/// Result of visiting one path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalkOutcome {
    /// A file with its metadata
    Entry(FileEntry),
    /// A path that produced nothing
    Skipped { path: PathBuf, reason: SkipReason },
}

impl WalkOutcome {
    pub fn into_entry(self) -> Option<FileEntry> {
        match self {
            WalkOutcome::Entry(entry) => Some(entry),
            WalkOutcome::Skipped { .. } => None,
        }
    }
}

/// Walks one root according to a set of options
pub struct FileWalker<'a> {
    options: &'a FindOptions,
    root: PathBuf,
}

impl<'a> FileWalker<'a> {
    /// Resolve the configured root.
    ///
    /// Fails when the root does not exist or is not a directory; this is the
    /// only fatal condition of a walk.
    pub fn new(options: &'a FindOptions) -> FindResult<Self> {
        let root = resolve_root(&options.root)?;
        Ok(Self { options, root })
    }

    /// Absolute, canonical search root
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Start a fresh scan of the disk
    pub fn walk(&self) -> FileWalkerIterator<'a> {
        FileWalkerIterator::new(self.root.clone(), self.options)
    }

    /// Start a fresh scan, keeping only the entries
    pub fn entries(&self) -> impl Iterator<Item = FileEntry> + 'a {
        self.walk().filter_map(WalkOutcome::into_entry)
    }
}

fn resolve_root(root: &Path) -> FindResult<PathBuf> {
    let canonical = root.canonicalize().map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => FindError::RootNotFound(root.to_path_buf()),
        _ => FindError::Io {
            path: root.to_path_buf(),
            source: err,
        },
    })?;
    if !canonical.is_dir() {
        return Err(FindError::NotADirectory(root.to_path_buf()));
    }
    Ok(canonical)
}

/// Iterator over the outcomes of a walk
pub struct FileWalkerIterator<'a> {
    inner: walkdir::IntoIter,
    options: &'a FindOptions,
    root: PathBuf,
}

impl<'a> FileWalkerIterator<'a> {
    fn new(root: PathBuf, options: &'a FindOptions) -> Self {
        let inner = WalkDir::new(&root)
            .follow_links(options.follow_links)
            .into_iter();

        Self {
            inner,
            options,
            root,
        }
    }

    /// Classify a successfully listed entry. `None` means "nothing to report".
    fn process_entry(&mut self, entry: DirEntry) -> Option<WalkOutcome> {
        if entry.depth() == 0 {
            return None;
        }

        let hidden = entry.file_name().to_string_lossy().starts_with('.');
        let file_type = entry.file_type();

        if entry.path_is_symlink() && !self.options.follow_links {
            return Some(skipped(entry.into_path(), SkipReason::Symlink));
        }

        if file_type.is_dir() {
            let reason = if self
                .options
                .skip_dirs
                .contains(&entry.file_name().to_string_lossy())
            {
                SkipReason::SkipDirectory
            } else if hidden && !self.options.include_hidden {
                SkipReason::Hidden
            } else {
                return None;
            };
            self.inner.skip_current_dir();
            return Some(skipped(entry.into_path(), reason));
        }

        if !file_type.is_file() {
            return None;
        }

        if hidden && !self.options.include_hidden {
            return Some(skipped(entry.into_path(), SkipReason::Hidden));
        }

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => {
                let kind = err.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
                return Some(skipped(entry.into_path(), SkipReason::Metadata(kind)));
            }
        };

        let path = entry.into_path();
        match FileEntry::from_metadata(path.clone(), &self.root, &metadata) {
            Ok(file) => Some(WalkOutcome::Entry(file)),
            Err(err) => Some(skipped(path, SkipReason::Metadata(err.kind()))),
        }
    }

    /// Turn a traversal error into a skip
    fn handle_error(&self, err: walkdir::Error) -> WalkOutcome {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.clone());

        let reason = if err.loop_ancestor().is_some() {
            SkipReason::SymlinkLoop
        } else {
            let kind = err.io_error().map_or(io::ErrorKind::Other, io::Error::kind);
            if err.depth() > 0 && path.is_symlink() {
                SkipReason::Metadata(kind)
            } else {
                SkipReason::Unreadable(kind)
            }
        };

        skipped(path, reason)
    }
}

fn skipped(path: PathBuf, reason: SkipReason) -> WalkOutcome {
    debug!("Skipping {} ({})", path.display(), reason);
    WalkOutcome::Skipped { path, reason }
}

impl<'a> Iterator for FileWalkerIterator<'a> {
    type Item = WalkOutcome;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            match self.inner.next()? {
                Ok(entry) => {
                    if let Some(outcome) = self.process_entry(entry) {
                        return Some(outcome);
                    }
                }
                Err(err) => return Some(self.handle_error(err)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::finder::options::SkipDirs;
    use std::fs::{self, File};
    use std::io::Write;
    use tempfile::TempDir;

    fn create_test_structure() -> io::Result<TempDir> {
        let temp_dir = TempDir::new()?;
        let root = temp_dir.path();

        File::create(root.join("file1.txt"))?.write_all(b"test")?;
        fs::create_dir(root.join("dir1"))?;
        File::create(root.join("dir1").join("file2.txt"))?.write_all(b"test")?;
        fs::create_dir_all(root.join(".cache"))?;
        File::create(root.join(".cache").join("x.txt"))?.write_all(b"cached")?;
        File::create(root.join(".env"))?.write_all(b"SECRET=1")?;
        fs::create_dir_all(root.join("node_modules").join("pkg"))?;
        File::create(root.join("node_modules").join("pkg").join("index.js"))?.write_all(b"//")?;

        Ok(temp_dir)
    }

    fn names(options: &FindOptions) -> Vec<String> {
        let walker = FileWalker::new(options).unwrap();
        let root = walker.root().to_path_buf();
        let mut names: Vec<String> = walker
            .entries()
            .map(|entry| entry.relative_to(&root).to_string_lossy().replace('\\', "/"))
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_default_policy() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let options = FindOptions::new().with_root(temp_dir.path());

        assert_eq!(names(&options), vec!["dir1/file2.txt", "file1.txt"]);
        Ok(())
    }

    #[test]
    fn test_include_hidden_is_independent_of_skip() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let options = FindOptions::new()
            .with_root(temp_dir.path())
            .with_include_hidden(true);

        assert_eq!(
            names(&options),
            vec![".cache/x.txt", ".env", "dir1/file2.txt", "file1.txt"]
        );
        Ok(())
    }

    #[test]
    fn test_no_skip_descends_into_skip_dirs() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let options = FindOptions::new()
            .with_root(temp_dir.path())
            .with_no_skip(true);

        assert_eq!(
            names(&options),
            vec!["dir1/file2.txt", "file1.txt", "node_modules/pkg/index.js"]
        );
        Ok(())
    }

    #[test]
    fn test_custom_skip_set() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let options = FindOptions::new()
            .with_root(temp_dir.path())
            .with_skip_dirs(SkipDirs::new(["dir1"]));

        assert_eq!(
            names(&options),
            vec!["file1.txt", "node_modules/pkg/index.js"]
        );
        Ok(())
    }

    #[test]
    fn test_skip_outcomes_are_reported() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let options = FindOptions::new().with_root(temp_dir.path());
        let walker = FileWalker::new(&options)?;

        let reasons: Vec<SkipReason> = walker
            .walk()
            .filter_map(|outcome| match outcome {
                WalkOutcome::Skipped { reason, .. } => Some(reason),
                WalkOutcome::Entry(_) => None,
            })
            .collect();

        assert!(reasons.contains(&SkipReason::SkipDirectory));
        assert!(reasons.contains(&SkipReason::Hidden));
        assert!(reasons.iter().all(|reason| !reason.is_error()));
        Ok(())
    }

    #[test]
    fn test_entries_carry_metadata() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let options = FindOptions::new().with_root(temp_dir.path());
        let walker = FileWalker::new(&options)?;

        for entry in walker.entries() {
            assert!(entry.path().is_absolute());
            assert_eq!(entry.size(), 4);
            assert_eq!(entry.extension(), "txt");
        }
        Ok(())
    }

    #[test]
    fn test_missing_root() {
        let options = FindOptions::new().with_root("definitely/not/here");
        match FileWalker::new(&options) {
            Err(FindError::RootNotFound(_)) => {}
            other => panic!("expected RootNotFound, got {:?}", other.err()),
        }
    }

    #[test]
    fn test_root_is_file() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let options = FindOptions::new().with_root(temp_dir.path().join("file1.txt"));
        assert!(matches!(
            FileWalker::new(&options),
            Err(FindError::NotADirectory(_))
        ));
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_not_followed_by_default() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let root = temp_dir.path();
        std::os::unix::fs::symlink(root.join("file1.txt"), root.join("link.txt"))?;
        std::os::unix::fs::symlink(root.join("dir1"), root.join("linkdir"))?;

        let options = FindOptions::new().with_root(root);
        assert_eq!(names(&options), vec!["dir1/file2.txt", "file1.txt"]);

        let options = FindOptions::new().with_root(root).with_follow_links(true);
        assert_eq!(
            names(&options),
            vec!["dir1/file2.txt", "file1.txt", "link.txt", "linkdir/file2.txt"]
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_cycle_terminates() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let root = temp_dir.path();
        std::os::unix::fs::symlink(root, root.join("dir1").join("back"))?;

        let options = FindOptions::new().with_root(root).with_follow_links(true);
        let walker = FileWalker::new(&options)?;
        let outcomes: Vec<WalkOutcome> = walker.walk().collect();

        assert!(outcomes.iter().any(|outcome| matches!(
            outcome,
            WalkOutcome::Skipped {
                reason: SkipReason::SymlinkLoop,
                ..
            }
        )));
        assert_eq!(
            outcomes
                .iter()
                .filter(|outcome| matches!(outcome, WalkOutcome::Entry(_)))
                .count(),
            2
        );
        Ok(())
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_skipped() -> Result<(), Box<dyn std::error::Error>> {
        let temp_dir = create_test_structure()?;
        let root = temp_dir.path();
        std::os::unix::fs::symlink(root.join("missing.txt"), root.join("broken.txt"))?;

        let options = FindOptions::new().with_root(root).with_follow_links(true);
        assert_eq!(names(&options), vec!["dir1/file2.txt", "file1.txt"]);
        Ok(())
    }
}
