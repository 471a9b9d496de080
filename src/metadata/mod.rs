//! Local metadata for shows and episodes.
//!
//! Metadata is read from Kodi style `.nfo` files next to the media: a
//! `tvshow.nfo` in the show directory and one `.nfo` per episode, named after
//! the episode's primary file. Only titles and plots are used.

use crate::constants::nfo::{EXTENSION, SHOW_NFO};
use crate::models::{Episode, Show};
use crate::scanner::disc::{DiscKind, naming_base};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MetadataError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid NFO file {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

/// How loaded values combine with what an item already carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadMode {
    /// Replace metadata with whatever the local files say.
    Reload,
    /// Only fill fields that are still empty.
    KeepExisting,
}

/// Populates show and episode metadata.
///
/// A missing metadata file is not an error: the item simply keeps what it
/// has (or, on [`LoadMode::Reload`], ends up empty).
#[async_trait::async_trait]
pub trait MetadataLoader: Send + Sync {
    /// # Errors
    ///
    /// Returns [`MetadataError`] when a metadata file exists but cannot be
    /// read or parsed.
    async fn load_show(&self, show: &mut Show, mode: LoadMode) -> Result<(), MetadataError>;

    /// # Errors
    ///
    /// Returns [`MetadataError`] when a metadata file exists but cannot be
    /// read or parsed.
    async fn load_episode(&self, episode: &mut Episode, mode: LoadMode)
    -> Result<(), MetadataError>;
}

#[derive(Debug, Default, Deserialize)]
struct NfoDocument {
    title: Option<String>,
    plot: Option<String>,
}

impl NfoDocument {
    fn title(&self) -> Option<String> {
        non_empty(self.title.as_deref())
    }

    fn plot(&self) -> Option<String> {
        non_empty(self.plot.as_deref())
    }
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn merge(field: &mut Option<String>, value: Option<String>, mode: LoadMode) {
    match mode {
        LoadMode::Reload => *field = value,
        LoadMode::KeepExisting => {
            if field.is_none() {
                *field = value;
            }
        }
    }
}

/// [`MetadataLoader`] reading `.nfo` files from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct NfoMetadataLoader;

impl NfoMetadataLoader {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    async fn read(path: &Path) -> Result<Option<NfoDocument>, MetadataError> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(MetadataError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        quick_xml::de::from_str(&content)
            .map(Some)
            .map_err(|e| MetadataError::Parse {
                path: path.to_path_buf(),
                message: e.to_string(),
            })
    }
}

/// Location of the episode NFO: the primary file with an `.nfo` extension.
/// Disc rips keep theirs next to the disc directory instead.
#[must_use]
pub fn episode_nfo_path(episode: &Episode) -> Option<PathBuf> {
    let primary = episode.primary_file()?;

    if DiscKind::from_index_path(primary).is_some() {
        let name = naming_base(primary);
        if let Some(dir) = primary
            .ancestors()
            .find(|a| a.file_name().is_some_and(|n| n.to_string_lossy() == name))
        {
            return Some(dir.with_file_name(format!("{name}.{EXTENSION}")));
        }
    }

    Some(primary.with_extension(EXTENSION))
}

#[async_trait::async_trait]
impl MetadataLoader for NfoMetadataLoader {
    async fn load_show(&self, show: &mut Show, mode: LoadMode) -> Result<(), MetadataError> {
        let doc = Self::read(&show.dir.join(SHOW_NFO)).await?.unwrap_or_default();
        merge(&mut show.name, doc.title(), mode);
        merge(&mut show.plot, doc.plot(), mode);
        Ok(())
    }

    async fn load_episode(
        &self,
        episode: &mut Episode,
        mode: LoadMode,
    ) -> Result<(), MetadataError> {
        let Some(path) = episode_nfo_path(episode) else {
            return Ok(());
        };
        let doc = Self::read(&path).await?.unwrap_or_default();
        merge(&mut episode.title, doc.title(), mode);
        merge(&mut episode.plot, doc.plot(), mode);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EpisodeNumber, SeasonNumber};

    fn scratch_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("showarr-nfo-test-{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn episode_for(file: PathBuf) -> Episode {
        let dir = file.parent().unwrap().to_path_buf();
        Episode::new(
            dir,
            vec![file],
            SeasonNumber::new(1),
            EpisodeNumber::new(1),
        )
    }

    #[test]
    fn test_episode_nfo_path() {
        let ep = episode_for(PathBuf::from("/tv/Show/Show.S01E01.mkv"));
        assert_eq!(
            episode_nfo_path(&ep),
            Some(PathBuf::from("/tv/Show/Show.S01E01.nfo"))
        );

        let disc = episode_for(PathBuf::from("/tv/Show/S01E02/VIDEO_TS/VIDEO_TS.IFO"));
        assert_eq!(
            episode_nfo_path(&disc),
            Some(PathBuf::from("/tv/Show/S01E02.nfo"))
        );

        let missing = Episode::missing("/tv/Show", SeasonNumber::new(1), EpisodeNumber::new(3));
        assert_eq!(episode_nfo_path(&missing), None);
    }

    #[tokio::test]
    async fn test_load_show_nfo() {
        let dir = scratch_dir();
        std::fs::write(
            dir.join(SHOW_NFO),
            "<?xml version=\"1.0\"?>\n<tvshow><title>The Show</title><plot> A plot. </plot><actor><name>X</name></actor></tvshow>",
        )
        .unwrap();

        let mut show = Show::new(&dir, std::env::temp_dir());
        NfoMetadataLoader.load_show(&mut show, LoadMode::Reload).await.unwrap();
        assert_eq!(show.name.as_deref(), Some("The Show"));
        assert_eq!(show.plot.as_deref(), Some("A plot."));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_keep_existing_only_fills_gaps() {
        let dir = scratch_dir();
        let file = dir.join("Show.S01E01.mkv");
        std::fs::write(
            dir.join("Show.S01E01.nfo"),
            "<episodedetails><title>Pilot</title><plot>Start.</plot></episodedetails>",
        )
        .unwrap();

        let mut ep = episode_for(file);
        ep.title = Some("Cached title".to_string());
        NfoMetadataLoader
            .load_episode(&mut ep, LoadMode::KeepExisting)
            .await
            .unwrap();
        assert_eq!(ep.title.as_deref(), Some("Cached title"));
        assert_eq!(ep.plot.as_deref(), Some("Start."));

        NfoMetadataLoader
            .load_episode(&mut ep, LoadMode::Reload)
            .await
            .unwrap();
        assert_eq!(ep.title.as_deref(), Some("Pilot"));

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_nfo_is_not_an_error() {
        let dir = scratch_dir();
        let mut ep = episode_for(dir.join("Show.S01E01.mkv"));
        ep.title = Some("Old".to_string());

        NfoMetadataLoader
            .load_episode(&mut ep, LoadMode::KeepExisting)
            .await
            .unwrap();
        assert_eq!(ep.title.as_deref(), Some("Old"));

        NfoMetadataLoader
            .load_episode(&mut ep, LoadMode::Reload)
            .await
            .unwrap();
        assert_eq!(ep.title, None);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[tokio::test]
    async fn test_broken_nfo_is_reported() {
        let dir = scratch_dir();
        std::fs::write(dir.join(SHOW_NFO), "<tvshow><title>Broken").unwrap();

        let mut show = Show::new(&dir, std::env::temp_dir());
        let err = NfoMetadataLoader
            .load_show(&mut show, LoadMode::Reload)
            .await
            .unwrap_err();
        assert!(matches!(err, MetadataError::Parse { .. }));

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
