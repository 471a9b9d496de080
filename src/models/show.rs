use crate::domain::{EpisodeNumber, SeasonNumber, ShowId};
use crate::models::episode::Episode;
use serde::Serialize;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Season {
    pub number: SeasonNumber,
    pub episodes: Vec<Episode>,
}

impl Season {
    #[must_use]
    pub const fn new(number: SeasonNumber) -> Self {
        Self {
            number,
            episodes: Vec::new(),
        }
    }
}

/// A show and its season/episode tree.
///
/// Seasons are created the first time an episode of that season is added
/// and keep that order; episodes stay in the order they were added.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Show {
    pub id: Option<ShowId>,
    pub dir: PathBuf,
    /// Configured root the show directory lives under.
    pub root: PathBuf,
    pub name: Option<String>,
    pub plot: Option<String>,
    pub show_missing_episodes: bool,
    seasons: Vec<Season>,
}

impl Show {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>, root: impl Into<PathBuf>) -> Self {
        Self {
            id: None,
            dir: dir.into(),
            root: root.into(),
            name: None,
            plot: None,
            show_missing_episodes: false,
            seasons: Vec::new(),
        }
    }

    /// Name from metadata, or the directory name when none was loaded.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.name.clone().unwrap_or_else(|| dir_name(&self.dir))
    }

    pub fn add_episode(&mut self, episode: Episode) {
        let number = episode.season;
        let index = match self.seasons.iter().position(|s| s.number == number) {
            Some(index) => index,
            None => {
                self.seasons.push(Season::new(number));
                self.seasons.len() - 1
            }
        };
        self.seasons[index].episodes.push(episode);
    }

    #[must_use]
    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    #[must_use]
    pub fn season(&self, number: SeasonNumber) -> Option<&Season> {
        self.seasons.iter().find(|s| s.number == number)
    }

    pub fn episodes(&self) -> impl Iterator<Item = &Episode> {
        self.seasons.iter().flat_map(|s| s.episodes.iter())
    }

    /// Episodes with files on disk; placeholders are not counted.
    #[must_use]
    pub fn episode_count(&self) -> usize {
        self.episodes().filter(|e| !e.placeholder).count()
    }

    /// Adds placeholder episodes for numbering gaps in every regular season.
    ///
    /// A season whose highest episode is 8 gets placeholders for whichever of
    /// 1 to 8 have no file. Specials are left alone. Running it again first
    /// drops the placeholders from the previous run.
    pub fn fill_missing_episodes(&mut self) {
        let dir = self.dir.clone();

        for season in &mut self.seasons {
            season.episodes.retain(|e| !e.placeholder);

            if season.number.is_unknown() || season.number.is_specials() {
                continue;
            }

            let present: BTreeSet<u32> = season.episodes.iter().map(|e| e.episode.value()).collect();
            let Some(&highest) = present.last() else {
                continue;
            };

            for number in (1..=highest).filter(|n| !present.contains(n)) {
                season.episodes.push(Episode::missing(
                    &dir,
                    season.number,
                    EpisodeNumber::new(number),
                ));
            }
        }
    }
}

fn dir_name(dir: &Path) -> String {
    dir.file_name()
        .map_or_else(|| dir.to_string_lossy().into_owned(), |n| n.to_string_lossy().into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn episode(season: i32, number: u32) -> Episode {
        Episode::new(
            "/tv/Show",
            vec![PathBuf::from(format!("/tv/Show/S{season:02}E{number:02}.mkv"))],
            SeasonNumber::new(season),
            EpisodeNumber::new(number),
        )
    }

    #[test]
    fn test_seasons_created_on_first_use() {
        let mut show = Show::new("/tv/Show", "/tv");
        show.add_episode(episode(2, 1));
        show.add_episode(episode(1, 1));
        show.add_episode(episode(2, 2));

        let numbers: Vec<_> = show.seasons().iter().map(|s| s.number.value()).collect();
        assert_eq!(numbers, vec![2, 1]);
        assert_eq!(show.season(SeasonNumber::new(2)).unwrap().episodes.len(), 2);
        assert_eq!(show.episode_count(), 3);
    }

    #[test]
    fn test_display_name_falls_back_to_directory() {
        let mut show = Show::new("/tv/Some Show", "/tv");
        assert_eq!(show.display_name(), "Some Show");
        show.name = Some("Some Show (2010)".to_string());
        assert_eq!(show.display_name(), "Some Show (2010)");
    }

    #[test]
    fn test_fill_missing_episodes() {
        let mut show = Show::new("/tv/Show", "/tv");
        show.add_episode(episode(1, 2));
        show.add_episode(episode(1, 5));
        show.add_episode(episode(0, 9));

        show.fill_missing_episodes();

        let season = show.season(SeasonNumber::new(1)).unwrap();
        let mut missing: Vec<_> = season
            .episodes
            .iter()
            .filter(|e| e.placeholder)
            .map(|e| e.episode.value())
            .collect();
        missing.sort_unstable();
        assert_eq!(missing, vec![1, 3, 4]);
        assert_eq!(show.season(SeasonNumber::SPECIALS).unwrap().episodes.len(), 1);
        assert_eq!(show.episode_count(), 3);
    }

    #[test]
    fn test_fill_missing_episodes_is_repeatable() {
        let mut show = Show::new("/tv/Show", "/tv");
        show.add_episode(episode(1, 3));
        show.fill_missing_episodes();
        let first = show.clone();
        show.fill_missing_episodes();
        assert_eq!(show, first);
    }
}
