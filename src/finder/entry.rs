//! A discovered file and the metadata the filters need.

use std::fs::Metadata;
use std::io;
use std::path::{Component, Path, PathBuf};
use std::time::SystemTime;

/// One file found by the walker.
///
/// Built once the metadata read succeeded; immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntry {
    path: PathBuf,
    size: u64,
    modified: SystemTime,
    hidden: bool,
    extension: String,
}

impl FileEntry {
    /// Create an entry from explicit values.
    ///
    /// `root` is the search root; only path segments below it count when
    /// deciding whether the entry is hidden.
    pub fn new(path: PathBuf, root: &Path, size: u64, modified: SystemTime) -> Self {
        let hidden = is_hidden_below(&path, root);
        let extension = path
            .extension()
            .map(|ext| ext.to_string_lossy().to_lowercase())
            .unwrap_or_default();

        Self {
            path,
            size,
            modified,
            hidden,
            extension,
        }
    }

    /// Create an entry from filesystem metadata.
    pub fn from_metadata(path: PathBuf, root: &Path, metadata: &Metadata) -> io::Result<Self> {
        let modified = metadata.modified()?;
        Ok(Self::new(path, root, metadata.len(), modified))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Final path component, lossily converted.
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn size(&self) -> u64 {
        self.size
    }

    pub fn modified(&self) -> SystemTime {
        self.modified
    }

    pub fn is_hidden(&self) -> bool {
        self.hidden
    }

    /// Lowercase extension without the leading dot, empty when there is none.
    pub fn extension(&self) -> &str {
        &self.extension
    }

    /// Path relative to `root`, or the full path if it lies elsewhere.
    pub fn relative_to(&self, root: &Path) -> PathBuf {
        self.path
            .strip_prefix(root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| self.path.clone())
    }
}

/// Whether any segment of `path` below `root` starts with a dot.
pub(crate) fn is_hidden_below(path: &Path, root: &Path) -> bool {
    let rest = path.strip_prefix(root).unwrap_or(path);
    rest.components().any(|component| match component {
        Component::Normal(name) => name.to_string_lossy().starts_with('.'),
        _ => false,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derived_fields() {
        let root = Path::new("/data");
        let entry = FileEntry::new(
            PathBuf::from("/data/reports/Q1.XLSX"),
            root,
            10,
            SystemTime::UNIX_EPOCH,
        );
        assert_eq!(entry.file_name(), "Q1.XLSX");
        assert_eq!(entry.extension(), "xlsx");
        assert!(!entry.is_hidden());
        assert_eq!(entry.relative_to(root), PathBuf::from("reports/Q1.XLSX"));
    }

    #[test]
    fn test_hidden_segments() {
        let root = Path::new("/home/user/.config");
        let visible = FileEntry::new(root.join("app/settings.toml"), root, 0, SystemTime::UNIX_EPOCH);
        assert!(!visible.is_hidden(), "a hidden root does not hide its contents");

        let in_hidden_dir = FileEntry::new(root.join(".cache/x.txt"), root, 0, SystemTime::UNIX_EPOCH);
        assert!(in_hidden_dir.is_hidden());

        let dotfile = FileEntry::new(root.join("app/.env"), root, 0, SystemTime::UNIX_EPOCH);
        assert!(dotfile.is_hidden());
        assert_eq!(dotfile.extension(), "");
    }
}
