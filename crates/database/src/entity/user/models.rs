use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// The main model used throughout the application
#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "user")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    // opaque credential, produced and checked by the auth layer
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

// This model is to be used for creating new database rows
pub struct NewModel {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub password_hash: String,
}

// This model is to be used for updating database rows,
// with all fields marked as optional to fit with PATCH queries
#[derive(Default)]
pub struct UpdateModel {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "crate::profile::Entity")]
    Profile,
    #[sea_orm(has_many = "crate::address::Entity")]
    Address,
    #[sea_orm(has_many = "crate::education::Entity")]
    Education,
    #[sea_orm(has_many = "crate::professional::Entity")]
    Professional,
}

impl ActiveModelBehavior for ActiveModel {}

pub type User = Entity;
