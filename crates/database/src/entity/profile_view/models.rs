use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// At most this many rows are kept per (viewer, viewed) pair
pub const VIEWS_KEPT_PER_PAIR: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile_view")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub viewer_id: Uuid,
    pub viewed_id: Uuid,
    pub timestamp: DateTimeUtc,
}

/// Someone who looked at a profile, with the time of their latest visit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Visitor {
    pub user: crate::user::Model,
    pub last_viewed_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::user::Entity",
        from = "Column::ViewerId",
        to = "crate::user::Column::Id",
        on_delete = "Cascade"
    )]
    Viewer,
    #[sea_orm(
        belongs_to = "crate::user::Entity",
        from = "Column::ViewedId",
        to = "crate::user::Column::Id",
        on_delete = "Cascade"
    )]
    Viewed,
}

impl ActiveModelBehavior for ActiveModel {}

pub type ProfileView = Entity;
