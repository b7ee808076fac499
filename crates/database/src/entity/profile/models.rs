use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::parse_legacy_date;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "profile")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub user_id: Uuid,
    pub gender: Option<String>,
    pub looking_for: Option<String>,
    pub date_of_birth: Option<Date>,
    // free-text value written by older releases, see `resolved_date_of_birth`
    pub legacy_date_of_birth: Option<String>,
    pub birth_time: Option<String>,
    pub birth_village: Option<String>,
    pub birth_city: Option<String>,
    pub birth_state: Option<String>,
    pub birth_country: Option<String>,
    pub height: Option<i32>,
    #[sea_orm(column_type = "Text", nullable)]
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub linkedin_url: Option<String>,
    pub no_brother: bool,
    pub no_sister: bool,
}

impl Model {
    /// The typed date when present, otherwise the legacy string parsed defensively.
    pub fn resolved_date_of_birth(&self) -> Option<Date> {
        self.date_of_birth.or_else(|| {
            self.legacy_date_of_birth
                .as_deref()
                .and_then(parse_legacy_date)
        })
    }
}

// Partial update of the independently editable profile fields.
// Absent fields keep whatever is stored.
#[derive(Default, Clone)]
pub struct UpdateModel {
    pub gender: Option<String>,
    pub looking_for: Option<String>,
    pub height: Option<i32>,
    pub bio: Option<String>,
    pub profile_picture: Option<String>,
    pub linkedin_url: Option<String>,
}

/// Birth details as submitted by a member: month by name, day and year as typed.
#[derive(Default, Clone)]
pub struct BirthDetails {
    pub month: String,
    pub day: String,
    pub year: String,
    pub birth_time: Option<String>,
    pub birth_village: Option<String>,
    pub birth_city: Option<String>,
    pub birth_state: Option<String>,
    pub birth_country: Option<String>,
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

pub type Profile = Entity;
