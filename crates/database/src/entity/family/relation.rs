use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// (person_id, related_person_id, relation_type) is unique
#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "family_relation")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub person_id: Uuid,
    pub related_person_id: Uuid,
    pub relation_type: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::PersonId",
        to = "super::member::Column::Id",
        on_delete = "Cascade"
    )]
    Person,
    #[sea_orm(
        belongs_to = "super::member::Entity",
        from = "Column::RelatedPersonId",
        to = "super::member::Column::Id",
        on_delete = "Cascade"
    )]
    RelatedPerson,
}

impl ActiveModelBehavior for ActiveModel {}

pub type FamilyRelation = Entity;
