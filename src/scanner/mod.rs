//! Show directory scanning.
//!
//! Walks a show's directory tree and turns it into [`FileGroup`]s, one per
//! episode. Disc rips collapse into their index file, multi-part releases
//! (`part1`/`part2`, `cd1`/`cd2`) collapse into one group, and extras,
//! trailers and samples are left out.

pub mod disc;
pub mod fs;

pub use disc::{DiscKind, DiscStructure};
pub use fs::{DirEntry, DirectorySource, FsDirectorySource, MediaFilter};

use crate::cancel::CancellationToken;
use crate::constants::scan::{EXCLUDED_DIRS, EXCLUDED_FILE_MARKERS};
use crate::parser::get_regex;
use crate::progress::ProgressReporter;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, OnceLock};
use tracing::debug;

/// Files that together make up one episode. Never empty; the first file is
/// the primary one used for number inference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FileGroup(Vec<PathBuf>);

impl FileGroup {
    #[must_use]
    pub fn new(primary: PathBuf) -> Self {
        Self(vec![primary])
    }

    pub fn push(&mut self, part: PathBuf) {
        self.0.push(part);
    }

    #[must_use]
    pub fn primary(&self) -> &Path {
        &self.0[0]
    }

    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.0
    }

    #[must_use]
    pub fn into_files(self) -> Vec<PathBuf> {
        self.0
    }
}

/// Scan results of one root, keyed by show directory.
pub type RootContents = BTreeMap<PathBuf, Vec<FileGroup>>;

#[derive(Clone)]
pub struct DirectoryScanner {
    source: Arc<dyn DirectorySource>,
    filter: MediaFilter,
    reporter: ProgressReporter,
}

impl DirectoryScanner {
    pub fn new(
        source: Arc<dyn DirectorySource>,
        filter: MediaFilter,
        reporter: ProgressReporter,
    ) -> Self {
        Self {
            source,
            filter,
            reporter,
        }
    }

    #[must_use]
    pub fn source(&self) -> &dyn DirectorySource {
        self.source.as_ref()
    }

    /// Scans every show directory directly below `root`.
    pub fn scan_root(&self, root: &Path, cancel: &CancellationToken) -> RootContents {
        let mut contents = RootContents::new();

        for entry in self.source.entries(root) {
            if cancel.is_cancelled() {
                break;
            }
            if !entry.is_dir {
                continue;
            }

            let show_dir = root.join(&entry.name);
            let groups = self.scan(root, &show_dir, cancel);
            contents.insert(show_dir, groups);
        }

        contents
    }

    /// Collects the file groups below `path`. `start` is only used to report
    /// progress relative to the root being scanned.
    pub fn scan(&self, start: &Path, path: &Path, cancel: &CancellationToken) -> Vec<FileGroup> {
        let mut contents = Vec::new();
        self.scan_into(start, path, cancel, &mut contents);
        contents
    }

    fn scan_into(
        &self,
        start: &Path,
        path: &Path,
        cancel: &CancellationToken,
        contents: &mut Vec<FileGroup>,
    ) {
        if cancel.is_cancelled() {
            return;
        }

        self.reporter.current_dir(relative_display(start, path));

        let entries = self.source.entries(path);

        for entry in entries.iter().filter(|e| e.is_dir) {
            if cancel.is_cancelled() {
                return;
            }

            if is_excluded_dir(&entry.name) {
                continue;
            }

            let dir = path.join(&entry.name);
            if let Some(disc) = disc::detect(self.source.as_ref(), &dir) {
                debug!(path = %disc.index_path.display(), kind = ?disc.kind, "Found disc structure");
                contents.push(FileGroup::new(disc.index_path));
                continue;
            }

            self.scan_into(start, &dir, cancel, contents);
        }

        let mut files: Vec<String> = self
            .filter
            .select(entries)
            .into_iter()
            .filter(|name| !is_excluded_file(name))
            .collect();
        files.sort();

        let mut remaining: Vec<Option<&str>> = files.iter().map(|f| Some(f.as_str())).collect();

        for i in 0..remaining.len() {
            if cancel.is_cancelled() {
                return;
            }

            let Some(file) = remaining[i].take() else {
                continue;
            };

            let mut group = FileGroup::new(path.join(file));

            if let Some((left, right)) = split_part_marker(file) {
                for slot in &mut remaining {
                    if let Some(other) = *slot
                        && other != file
                        && other.starts_with(left)
                        && other.ends_with(right)
                    {
                        group.push(path.join(other));
                        *slot = None;
                    }
                }
            }

            contents.push(group);
        }
    }
}

fn relative_display(start: &Path, path: &Path) -> String {
    path.strip_prefix(start)
        .unwrap_or(path)
        .to_string_lossy()
        .into_owned()
}

fn is_excluded_dir(name: &str) -> bool {
    EXCLUDED_DIRS.iter().any(|d| d.eq_ignore_ascii_case(name))
}

fn is_excluded_file(name: &str) -> bool {
    let lower = name.to_lowercase();
    EXCLUDED_FILE_MARKERS.iter().any(|m| lower.contains(m))
}

/// Splits `Show.part2.mkv` into the text up to and including the marker
/// (`Show.part`) and the text after its number (`.mkv`).
fn split_part_marker(file: &str) -> Option<(&str, &str)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = get_regex(&RE, r"(?i)((?:part|cd)[\s_]*)(\d+)");

    let caps = re.captures(file)?;
    let marker = caps.get(1)?;
    let number = caps.get(2)?;
    Some((&file[..marker.end()], &file[number.end()..]))
}
