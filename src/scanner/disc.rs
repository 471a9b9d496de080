//! DVD and Blu-ray folder detection.
//!
//! A disc rip is a whole directory tree that stands for a single episode. It
//! is collapsed into the path of its index file, and the name used for number
//! inference is taken from the directory that holds the disc layout.

use crate::constants::disc::{BLURAY_DIR, BLURAY_INDEX, DVD_DIR, DVD_INDEX};
use crate::scanner::fs::DirectorySource;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscKind {
    /// `<dir>/VIDEO_TS/VIDEO_TS.IFO`
    Dvd,
    /// `<dir>/VIDEO_TS.IFO`
    DvdFlat,
    /// `<dir>/BDMV/index.bdmv`
    BluRay,
}

impl DiscKind {
    /// Classifies a representative index path produced by [`detect`].
    #[must_use]
    pub fn from_index_path(path: &Path) -> Option<Self> {
        let file_name = path.file_name()?.to_str()?;

        if file_name.eq_ignore_ascii_case(DVD_INDEX) {
            let in_video_ts = path
                .parent()
                .and_then(Path::file_name)
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.eq_ignore_ascii_case(DVD_DIR));
            return Some(if in_video_ts { Self::Dvd } else { Self::DvdFlat });
        }

        if file_name.eq_ignore_ascii_case(BLURAY_INDEX) {
            return Some(Self::BluRay);
        }

        None
    }

    /// How many trailing path components the index path adds below the
    /// directory that names the episode.
    const fn depth(self) -> usize {
        match self {
            Self::Dvd | Self::BluRay => 3,
            Self::DvdFlat => 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscStructure {
    pub kind: DiscKind,
    pub index_path: PathBuf,
}

/// Checks whether `dir` holds a disc layout, DVD before Blu-ray.
pub fn detect<S>(source: &S, dir: &Path) -> Option<DiscStructure>
where
    S: DirectorySource + ?Sized,
{
    let candidates = [
        (DiscKind::Dvd, dir.join(DVD_DIR).join(DVD_INDEX)),
        (DiscKind::DvdFlat, dir.join(DVD_INDEX)),
        (DiscKind::BluRay, dir.join(BLURAY_DIR).join(BLURAY_INDEX)),
    ];

    candidates
        .into_iter()
        .find(|(_, path)| source.is_file(path))
        .map(|(kind, index_path)| DiscStructure { kind, index_path })
}

/// Name used for season/episode inference.
///
/// Plain files use their own file name; disc index files use the name of the
/// directory the disc layout lives in.
#[must_use]
pub fn naming_base(path: &Path) -> String {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    let Some(kind) = DiscKind::from_index_path(path) else {
        return file_name;
    };

    let parts: Vec<_> = path
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part),
            _ => None,
        })
        .collect();

    parts
        .len()
        .checked_sub(kind.depth())
        .and_then(|i| parts.get(i))
        .map_or(file_name, |part| part.to_string_lossy().into_owned())
}
