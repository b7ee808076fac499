use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "professional_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub occupation: Option<String>,
    pub company_name: Option<String>,
    pub designation: Option<String>,
    pub years_of_experience: Option<i32>,
    pub package: Option<String>,
    pub turn_over: Option<String>,
    pub location: Option<String>,
    // Full-time, Part-time, Contract, ...
    pub employment_type: Option<String>,
}

impl Model {
    pub fn has_occupation_and_company(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|v| !v.trim().is_empty());
        set(&self.occupation) && set(&self.company_name)
    }
}

// Blank values are ignored rather than clearing what is stored
#[derive(Debug, Clone, Default)]
pub struct UpdateModel {
    pub occupation: Option<String>,
    pub company_name: Option<String>,
    pub designation: Option<String>,
    pub years_of_experience: Option<i32>,
    pub package: Option<String>,
    pub turn_over: Option<String>,
    pub location: Option<String>,
    pub employment_type: Option<String>,
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

pub type Professional = Entity;
