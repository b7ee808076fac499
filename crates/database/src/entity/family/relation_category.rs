use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "relation_category")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
    pub description: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::relation_type::Entity")]
    RelationType,
}

impl Related<super::relation_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RelationType.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub type RelationCategory = Entity;
