use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "education")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub university: Option<String>,
    pub institution: Option<String>,
    pub year_of_passing: Option<i32>,
    pub grade: Option<String>,
}

impl Model {
    pub fn is_complete(&self) -> bool {
        [
            &self.degree,
            &self.specialization,
            &self.university,
            &self.institution,
        ]
        .iter()
        .all(|field| field.as_deref().is_some_and(|v| !v.trim().is_empty()))
    }
}

#[derive(Debug, Clone, Default)]
pub struct EducationInput {
    pub degree: Option<String>,
    pub specialization: Option<String>,
    pub university: Option<String>,
    pub institution: Option<String>,
    pub year_of_passing: Option<i32>,
    pub grade: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "crate::user::Entity",
        from = "Column::UserId",
        to = "crate::user::Column::Id",
        on_delete = "Cascade"
    )]
    User,
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub type Education = Entity;
