//! Directory enumeration used by the scanner.

use crate::constants::VIDEO_EXTENSIONS;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirEntry {
    pub name: String,
    pub is_dir: bool,
}

/// Read-only view of a directory tree.
///
/// Implementations skip entries they cannot read instead of failing; a
/// directory that cannot be opened simply lists as empty.
pub trait DirectorySource: Send + Sync {
    /// Immediate children of `path`, sorted by name.
    fn entries(&self, path: &Path) -> Vec<DirEntry>;

    fn is_file(&self, path: &Path) -> bool;

    fn is_dir(&self, path: &Path) -> bool;

    /// The form of `path` used as a key for shows and roots. Paths that
    /// cannot be resolved are returned unchanged.
    fn resolve(&self, path: &Path) -> PathBuf {
        path.to_path_buf()
    }
}

/// [`DirectorySource`] backed by the real filesystem. Symlinks are followed.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsDirectorySource;

impl DirectorySource for FsDirectorySource {
    fn entries(&self, path: &Path) -> Vec<DirEntry> {
        WalkDir::new(path)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|entry| match entry {
                Ok(entry) => Some(entry),
                Err(e) => {
                    debug!(path = %path.display(), error = %e, "Skipping unreadable entry");
                    None
                }
            })
            .filter_map(|entry| {
                let Some(name) = entry.file_name().to_str() else {
                    debug!(path = %entry.path().display(), "Skipping non UTF-8 file name");
                    return None;
                };
                Some(DirEntry {
                    name: name.to_string(),
                    is_dir: entry.file_type().is_dir(),
                })
            })
            .collect()
    }

    fn is_file(&self, path: &Path) -> bool {
        path.is_file()
    }

    fn is_dir(&self, path: &Path) -> bool {
        path.is_dir()
    }

    /// Absolute path with symlinks and `..` resolved.
    fn resolve(&self, path: &Path) -> PathBuf {
        std::fs::canonicalize(path).unwrap_or_else(|e| {
            debug!(path = %path.display(), error = %e, "Could not resolve path");
            path.to_path_buf()
        })
    }
}

/// Keeps only files with a configured media extension.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaFilter {
    extensions: Vec<String>,
}

impl MediaFilter {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            extensions: extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    #[must_use]
    pub fn matches(&self, file_name: &str) -> bool {
        Path::new(file_name)
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_lowercase)
            .is_some_and(|ext| self.extensions.contains(&ext))
    }

    /// Media file names among the entries of one directory listing.
    pub(crate) fn select(&self, entries: Vec<DirEntry>) -> Vec<String> {
        entries
            .into_iter()
            .filter(|e| !e.is_dir && self.matches(&e.name))
            .map(|e| e.name)
            .collect()
    }
}

impl Default for MediaFilter {
    fn default() -> Self {
        Self::new(VIDEO_EXTENSIONS)
    }
}

#[cfg(test)]
pub(crate) mod memory {
    use super::{DirEntry, DirectorySource};
    use crate::cancel::CancellationToken;
    use std::collections::BTreeSet;
    use std::path::{Path, PathBuf};
    use std::sync::Mutex;

    /// In-memory tree built from a list of file paths.
    #[derive(Debug, Default)]
    pub struct MemoryDirectory {
        files: BTreeSet<PathBuf>,
        dirs: BTreeSet<PathBuf>,
        trip: Mutex<Option<(usize, CancellationToken)>>,
    }

    impl MemoryDirectory {
        pub fn new<I, P>(files: I) -> Self
        where
            I: IntoIterator<Item = P>,
            P: Into<PathBuf>,
        {
            let mut dir = Self::default();
            for file in files {
                let file = file.into();
                for ancestor in file.ancestors().skip(1) {
                    dir.dirs.insert(ancestor.to_path_buf());
                }
                dir.files.insert(file);
            }
            dir
        }

        /// Cancels `token` once `listings` directories have been listed.
        pub fn cancel_after(self, listings: usize, token: CancellationToken) -> Self {
            *self.trip.lock().unwrap() = Some((listings, token));
            self
        }
    }

    impl DirectorySource for MemoryDirectory {
        fn entries(&self, path: &Path) -> Vec<DirEntry> {
            if let Some((remaining, token)) = self.trip.lock().unwrap().as_mut() {
                *remaining = remaining.saturating_sub(1);
                if *remaining == 0 {
                    token.cancel();
                }
            }

            let child_name = |p: &PathBuf| {
                (p.parent() == Some(path))
                    .then(|| p.file_name()?.to_str().map(str::to_string))
                    .flatten()
            };

            let mut entries: Vec<DirEntry> = self
                .dirs
                .iter()
                .filter_map(|d| {
                    child_name(d).map(|name| DirEntry { name, is_dir: true })
                })
                .chain(self.files.iter().filter_map(|f| {
                    child_name(f).map(|name| DirEntry {
                        name,
                        is_dir: false,
                    })
                }))
                .collect();
            entries.sort_by(|a, b| a.name.cmp(&b.name));
            entries
        }

        fn is_file(&self, path: &Path) -> bool {
            self.files.contains(path)
        }

        fn is_dir(&self, path: &Path) -> bool {
            self.dirs.contains(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_media_filter_extensions() {
        let filter = MediaFilter::new([".MKV", "avi"]);
        assert!(filter.matches("Show.S01E01.mkv"));
        assert!(filter.matches("Show.S01E01.AVI"));
        assert!(!filter.matches("Show.S01E01.nfo"));
        assert!(!filter.matches("mkv"));
    }

    #[test]
    fn test_media_filter_skips_directories() {
        let filter = MediaFilter::default();
        let files = filter.select(vec![
            DirEntry {
                name: "Season.mkv".to_string(),
                is_dir: true,
            },
            DirEntry {
                name: "a.mkv".to_string(),
                is_dir: false,
            },
            DirEntry {
                name: "a.srt".to_string(),
                is_dir: false,
            },
        ]);
        assert_eq!(files, vec!["a.mkv".to_string()]);
    }

    #[test]
    fn test_fs_source_lists_sorted_entries() {
        let root = std::env::temp_dir().join(format!("showarr-fs-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(root.join("b_dir")).unwrap();
        std::fs::write(root.join("c.mkv"), b"").unwrap();
        std::fs::write(root.join("a.mkv"), b"").unwrap();

        let entries = FsDirectorySource.entries(&root);
        let names: Vec<_> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["a.mkv", "b_dir", "c.mkv"]);
        assert!(entries[1].is_dir);
        assert!(FsDirectorySource.is_file(&root.join("a.mkv")));
        assert!(FsDirectorySource.is_dir(&root.join("b_dir")));

        assert!(FsDirectorySource.entries(&root.join("missing")).is_empty());

        let dotted = root.join("b_dir").join("..").join("a.mkv");
        assert_eq!(
            FsDirectorySource.resolve(&dotted),
            std::fs::canonicalize(root.join("a.mkv")).unwrap()
        );
        let missing = root.join("missing");
        assert_eq!(FsDirectorySource.resolve(&missing), missing);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
