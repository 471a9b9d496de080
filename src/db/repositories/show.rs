use crate::domain::{EpisodeId, ShowId};
use crate::entities::{prelude::*, tv_episodes, tv_shows};
use crate::models::{Episode, Show};
use anyhow::Context;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use std::path::{Path, PathBuf};
use tracing::debug;

pub struct ShowRepository {
    conn: DatabaseConnection,
}

impl ShowRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_show(model: tv_shows::Model) -> Show {
        let mut show = Show::new(model.dir, model.root_path);
        show.id = Some(ShowId::new(model.id));
        show.name = model.name;
        show.plot = model.plot;
        show.show_missing_episodes = model.show_missing_episodes;
        show
    }

    pub async fn list_by_root(&self, root: &Path) -> anyhow::Result<Vec<Show>> {
        let rows = TvShows::find()
            .filter(tv_shows::Column::RootPath.eq(path_key(root)))
            .order_by_asc(tv_shows::Column::Dir)
            .all(&self.conn)
            .await?;

        Ok(rows.into_iter().map(Self::map_model_to_show).collect())
    }

    /// Writes the show row and all of its episode rows in one transaction.
    pub async fn save(
        &self,
        show: &Show,
        root: &Path,
        episodes: &[Episode],
    ) -> anyhow::Result<(ShowId, Vec<EpisodeId>)> {
        let txn = self.conn.begin().await?;

        let inserted = TvShows::insert(tv_shows::ActiveModel {
            dir: Set(path_key(&show.dir)),
            root_path: Set(path_key(root)),
            name: Set(show.name.clone()),
            plot: Set(show.plot.clone()),
            show_missing_episodes: Set(show.show_missing_episodes),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        })
        .exec(&txn)
        .await
        .with_context(|| format!("Failed to insert show {}", show.dir.display()))?;

        let show_id = inserted.last_insert_id;
        let mut episode_ids = Vec::with_capacity(episodes.len());

        for episode in episodes {
            let files: Vec<String> = episode.files.iter().map(|f| path_key(f)).collect();
            let number = i32::try_from(episode.episode.value())
                .context("Episode number out of range")?;

            let inserted = TvEpisodes::insert(tv_episodes::ActiveModel {
                show_id: Set(show_id),
                root_path: Set(path_key(root)),
                season: Set(episode.season.value()),
                episode: Set(number),
                files: Set(serde_json::to_string(&files)?),
                title: Set(episode.title.clone()),
                plot: Set(episode.plot.clone()),
                ..Default::default()
            })
            .exec(&txn)
            .await?;

            episode_ids.push(EpisodeId::new(inserted.last_insert_id));
        }

        txn.commit().await?;

        debug!(
            show = %show.dir.display(),
            episodes = episode_ids.len(),
            "Persisted show"
        );

        Ok((ShowId::new(show_id), episode_ids))
    }

    pub async fn clear_all(&self) -> anyhow::Result<()> {
        let txn = self.conn.begin().await?;
        TvEpisodes::delete_many().exec(&txn).await?;
        TvShows::delete_many().exec(&txn).await?;
        txn.commit().await?;
        Ok(())
    }

    pub async fn clear_root(&self, root: &Path) -> anyhow::Result<()> {
        let key = path_key(root);
        let txn = self.conn.begin().await?;

        TvEpisodes::delete_many()
            .filter(tv_episodes::Column::RootPath.eq(key.clone()))
            .exec(&txn)
            .await?;

        let result = TvShows::delete_many()
            .filter(tv_shows::Column::RootPath.eq(key))
            .exec(&txn)
            .await?;

        txn.commit().await?;

        debug!(root = %root.display(), removed = result.rows_affected, "Cleared root");
        Ok(())
    }

    pub async fn clear_show(&self, dir: &Path) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await?;

        let Some(model) = TvShows::find()
            .filter(tv_shows::Column::Dir.eq(path_key(dir)))
            .one(&txn)
            .await?
        else {
            txn.commit().await?;
            return Ok(false);
        };

        TvEpisodes::delete_many()
            .filter(tv_episodes::Column::ShowId.eq(model.id))
            .exec(&txn)
            .await?;

        TvShows::delete_by_id(model.id).exec(&txn).await?;

        txn.commit().await?;
        Ok(true)
    }
}

pub(crate) fn path_key(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub(crate) fn path_from_key(key: &str) -> PathBuf {
    PathBuf::from(key)
}
