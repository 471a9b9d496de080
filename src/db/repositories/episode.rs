use crate::db::repositories::show::path_from_key;
use crate::domain::{EpisodeId, EpisodeNumber, SeasonNumber, ShowId};
use crate::entities::{prelude::*, tv_episodes};
use crate::models::Episode;
use anyhow::Context;
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
};
use std::path::PathBuf;

pub struct EpisodeRepository {
    conn: DatabaseConnection,
}

impl EpisodeRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model_to_episode(model: tv_episodes::Model, show_dir: &str) -> anyhow::Result<Episode> {
        let files: Vec<String> = serde_json::from_str(&model.files)
            .with_context(|| format!("Invalid file list for episode {}", model.id))?;
        let number = u32::try_from(model.episode)
            .with_context(|| format!("Invalid episode number for episode {}", model.id))?;

        let mut episode = Episode::new(
            path_from_key(show_dir),
            files.iter().map(|f| path_from_key(f)).collect::<Vec<PathBuf>>(),
            SeasonNumber::new(model.season),
            EpisodeNumber::new(number),
        );
        episode.id = Some(EpisodeId::new(model.id));
        episode.title = model.title;
        episode.plot = model.plot;
        Ok(episode)
    }

    /// Episodes of one show in insertion order.
    pub async fn list_for_show(&self, show_id: ShowId) -> anyhow::Result<Vec<Episode>> {
        let Some(show) = TvShows::find_by_id(show_id.value()).one(&self.conn).await? else {
            return Ok(Vec::new());
        };

        let rows = TvEpisodes::find()
            .filter(tv_episodes::Column::ShowId.eq(show.id))
            .order_by_asc(tv_episodes::Column::Id)
            .all(&self.conn)
            .await?;

        rows.into_iter()
            .map(|row| Self::map_model_to_episode(row, &show.dir))
            .collect()
    }

    pub async fn count(&self) -> anyhow::Result<u64> {
        Ok(TvEpisodes::find().count(&self.conn).await?)
    }

    pub async fn count_for_show(&self, show_id: ShowId) -> anyhow::Result<u64> {
        Ok(TvEpisodes::find()
            .filter(tv_episodes::Column::ShowId.eq(show_id.value()))
            .count(&self.conn)
            .await?)
    }
}
