use crate::domain::{EpisodeId, EpisodeNumber, SeasonNumber};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Episode {
    pub id: Option<EpisodeId>,
    pub show_dir: PathBuf,
    pub files: Vec<PathBuf>,
    pub season: SeasonNumber,
    pub episode: EpisodeNumber,
    pub title: Option<String>,
    pub plot: Option<String>,
    /// Stands in for an episode that has no files on disk.
    pub placeholder: bool,
}

impl Episode {
    #[must_use]
    pub fn new(
        show_dir: impl Into<PathBuf>,
        files: Vec<PathBuf>,
        season: SeasonNumber,
        episode: EpisodeNumber,
    ) -> Self {
        Self {
            id: None,
            show_dir: show_dir.into(),
            files,
            season,
            episode,
            title: None,
            plot: None,
            placeholder: false,
        }
    }

    #[must_use]
    pub fn missing(show_dir: impl Into<PathBuf>, season: SeasonNumber, episode: EpisodeNumber) -> Self {
        Self {
            placeholder: true,
            ..Self::new(show_dir, Vec::new(), season, episode)
        }
    }

    #[must_use]
    pub fn primary_file(&self) -> Option<&Path> {
        self.files.first().map(PathBuf::as_path)
    }

    /// `S01E05` style label, used in listings and logs.
    #[must_use]
    pub fn label(&self) -> String {
        if self.season.is_unknown() {
            return format!("E{:02}", self.episode.value());
        }
        format!("S{:02}E{:02}", self.season.value(), self.episode.value())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_label() {
        let ep = Episode::new(
            "/tv/Show",
            vec![PathBuf::from("/tv/Show/a.mkv")],
            SeasonNumber::new(1),
            EpisodeNumber::new(5),
        );
        assert_eq!(ep.label(), "S01E05");
        assert_eq!(ep.primary_file(), Some(Path::new("/tv/Show/a.mkv")));

        let unknown = Episode::new("/tv/Show", Vec::new(), SeasonNumber::NO_SEASON, EpisodeNumber::new(3));
        assert_eq!(unknown.label(), "E03");
    }

    #[test]
    fn test_missing_episode_has_no_files() {
        let ep = Episode::missing("/tv/Show", SeasonNumber::new(2), EpisodeNumber::new(4));
        assert!(ep.placeholder);
        assert!(ep.files.is_empty());
        assert!(ep.primary_file().is_none());
    }
}
