use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "tv_shows")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub dir: String,
    pub root_path: String,
    pub name: Option<String>,
    pub plot: Option<String>,
    pub show_missing_episodes: bool,
    pub created_at: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::tv_episodes::Entity")]
    TvEpisodes,
}

impl Related<super::tv_episodes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TvEpisodes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
