use crate::domain::{EpisodeId, ShowId};
use crate::models::{Episode, Show};
use anyhow::{Context, Result};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::path::Path;
use std::time::Duration;
use tracing::info;

pub mod migrator;
pub mod repositories;

/// Persistence of discovered shows and episodes.
///
/// Shows are keyed by their directory and remember the configured root they
/// were found under, so one root can be cleared without touching the others.
#[async_trait::async_trait]
pub trait LibraryStore: Send + Sync {
    async fn clear_all(&self) -> Result<()>;

    async fn clear_root(&self, root: &Path) -> Result<()>;

    /// Removes one show and its episodes. Returns whether anything was stored.
    async fn clear_show(&self, dir: &Path) -> Result<bool>;

    /// Stores a show together with its episodes. Either everything is written
    /// or nothing is.
    async fn save_show(
        &self,
        show: &Show,
        root: &Path,
        episodes: &[Episode],
    ) -> Result<(ShowId, Vec<EpisodeId>)>;

    async fn shows(&self, root: &Path) -> Result<Vec<Show>>;

    async fn episodes(&self, show_id: ShowId) -> Result<Vec<Episode>>;

    async fn episode_count(&self) -> Result<u64>;
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        if !db_url.contains(":memory:") {
            let path_str = db_url.trim_start_matches("sqlite:").trim_start_matches("//");
            let path_str = path_str.split('?').next().unwrap_or(path_str);
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.with_context(|| {
                    format!("Failed to create database directory: {}", parent.display())
                })?;
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)
                    .with_context(|| format!("Failed to create database file: {path_str}"))?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    fn show_repo(&self) -> repositories::show::ShowRepository {
        repositories::show::ShowRepository::new(self.conn.clone())
    }

    fn episode_repo(&self) -> repositories::episode::EpisodeRepository {
        repositories::episode::EpisodeRepository::new(self.conn.clone())
    }

    pub async fn count_episodes_for_show(&self, show_id: ShowId) -> Result<u64> {
        self.episode_repo().count_for_show(show_id).await
    }
}

#[async_trait::async_trait]
impl LibraryStore for Store {
    async fn clear_all(&self) -> Result<()> {
        self.show_repo().clear_all().await
    }

    async fn clear_root(&self, root: &Path) -> Result<()> {
        self.show_repo().clear_root(root).await
    }

    async fn clear_show(&self, dir: &Path) -> Result<bool> {
        self.show_repo().clear_show(dir).await
    }

    async fn save_show(
        &self,
        show: &Show,
        root: &Path,
        episodes: &[Episode],
    ) -> Result<(ShowId, Vec<EpisodeId>)> {
        self.show_repo().save(show, root, episodes).await
    }

    async fn shows(&self, root: &Path) -> Result<Vec<Show>> {
        self.show_repo().list_by_root(root).await
    }

    async fn episodes(&self, show_id: ShowId) -> Result<Vec<Episode>> {
        self.episode_repo().list_for_show(show_id).await
    }

    async fn episode_count(&self) -> Result<u64> {
        self.episode_repo().count().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{EpisodeNumber, SeasonNumber};
    use std::path::PathBuf;

    async fn scratch_store() -> (Store, PathBuf) {
        let path = std::env::temp_dir().join(format!("showarr-db-test-{}.db", uuid::Uuid::new_v4()));
        let store = Store::new(&format!("sqlite:{}", path.display())).await.unwrap();
        (store, path)
    }

    fn episode(dir: &str, season: i32, number: u32) -> Episode {
        let mut ep = Episode::new(
            dir,
            vec![PathBuf::from(format!("{dir}/S{season:02}E{number:02}.mkv"))],
            SeasonNumber::new(season),
            EpisodeNumber::new(number),
        );
        ep.title = Some(format!("Episode {number}"));
        ep
    }

    #[tokio::test]
    async fn test_save_and_load_show() {
        let (store, path) = scratch_store().await;

        let mut show = Show::new("/tv/Show", "/tv");
        show.name = Some("Show".to_string());
        show.show_missing_episodes = true;
        let episodes = vec![episode("/tv/Show", 1, 2), episode("/tv/Show", 1, 1)];

        let (show_id, ids) = store
            .save_show(&show, Path::new("/tv"), &episodes)
            .await
            .unwrap();
        assert_eq!(ids.len(), 2);

        let shows = store.shows(Path::new("/tv")).await.unwrap();
        assert_eq!(shows.len(), 1);
        assert_eq!(shows[0].id, Some(show_id));
        assert_eq!(shows[0].name.as_deref(), Some("Show"));
        assert!(shows[0].show_missing_episodes);

        let loaded = store.episodes(show_id).await.unwrap();
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded[0].episode, EpisodeNumber::new(2));
        assert_eq!(loaded[0].files, episodes[0].files);
        assert_eq!(loaded[0].show_dir, PathBuf::from("/tv/Show"));
        assert_eq!(loaded[1].title.as_deref(), Some("Episode 1"));
        assert_eq!(loaded[1].id, Some(ids[1]));

        assert_eq!(store.episode_count().await.unwrap(), 2);
        assert_eq!(store.count_episodes_for_show(show_id).await.unwrap(), 2);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_clear_scopes() {
        let (store, path) = scratch_store().await;

        for (dir, root) in [("/tv/A", "/tv"), ("/tv/B", "/tv"), ("/anime/C", "/anime")] {
            store
                .save_show(&Show::new(dir, root), Path::new(root), &[episode(dir, 1, 1)])
                .await
                .unwrap();
        }

        assert!(store.clear_show(Path::new("/tv/A")).await.unwrap());
        assert!(!store.clear_show(Path::new("/tv/A")).await.unwrap());
        assert_eq!(store.shows(Path::new("/tv")).await.unwrap().len(), 1);
        assert_eq!(store.episode_count().await.unwrap(), 2);

        store.clear_root(Path::new("/tv")).await.unwrap();
        assert!(store.shows(Path::new("/tv")).await.unwrap().is_empty());
        assert_eq!(store.shows(Path::new("/anime")).await.unwrap().len(), 1);
        assert_eq!(store.episode_count().await.unwrap(), 1);

        store.clear_all().await.unwrap();
        assert!(store.shows(Path::new("/anime")).await.unwrap().is_empty());
        assert_eq!(store.episode_count().await.unwrap(), 0);

        std::fs::remove_file(&path).ok();
    }

    #[tokio::test]
    async fn test_unusable_database_directory_is_reported() {
        let blocker = std::env::temp_dir().join(format!("showarr-db-blocker-{}", uuid::Uuid::new_v4()));
        std::fs::write(&blocker, b"").unwrap();

        let url = format!("sqlite:{}", blocker.join("data").join("showarr.db").display());
        let err = Store::new(&url).await.err().unwrap();
        assert!(format!("{err:#}").contains("Failed to create database directory"));

        std::fs::remove_file(&blocker).ok();
    }

    #[tokio::test]
    async fn test_duplicate_show_writes_nothing() {
        let (store, path) = scratch_store().await;
        let show = Show::new("/tv/A", "/tv");

        store
            .save_show(&show, Path::new("/tv"), &[episode("/tv/A", 1, 1)])
            .await
            .unwrap();
        assert!(
            store
                .save_show(&show, Path::new("/tv"), &[episode("/tv/A", 1, 2)])
                .await
                .is_err()
        );
        assert_eq!(store.episode_count().await.unwrap(), 1);

        std::fs::remove_file(&path).ok();
    }
}
