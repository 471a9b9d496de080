pub use super::tv_episodes::Entity as TvEpisodes;
pub use super::tv_shows::Entity as TvShows;
