use std::str::FromStr;

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::DatabaseError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(50))")]
pub enum AddressTag {
    #[sea_orm(string_value = "Permanent")]
    Permanent,
    #[sea_orm(string_value = "Current")]
    Current,
    #[sea_orm(string_value = "Work")]
    Work,
    #[sea_orm(string_value = "family_member")]
    #[serde(rename = "family_member")]
    FamilyMember,
}

impl AddressTag {
    /// Tags a member may hold at most one address for.
    pub const PERSONAL: [AddressTag; 3] = [Self::Permanent, Self::Current, Self::Work];

    pub fn is_personal(self) -> bool {
        self != Self::FamilyMember
    }
}

// "permanent", "PERMANENT" and "Permanent" all name the same tag
impl FromStr for AddressTag {
    type Err = DatabaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "permanent" => Ok(Self::Permanent),
            "current" => Ok(Self::Current),
            "work" => Ok(Self::Work),
            "family_member" => Ok(Self::FamilyMember),
            _ => Err(DatabaseError::validation(format!("invalid address tag {s:?}"))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "address")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub address1: String,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city_id: i32,
    pub state_id: i32,
    pub country_id: i32,
    pub zipcode: String,
    pub tag: AddressTag,
}

impl Model {
    pub fn is_complete(&self) -> bool {
        !self.address1.trim().is_empty() && !self.zipcode.trim().is_empty()
    }
}

/// Submitted address fields. Geo ids must name existing rows.
#[derive(Debug, Clone, Default)]
pub struct AddressInput {
    pub address1: String,
    pub address2: Option<String>,
    pub address3: Option<String>,
    pub city_id: i32,
    pub state_id: i32,
    pub country_id: i32,
    pub zipcode: String,
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
    #[sea_orm(
        belongs_to = "crate::geo::city::Entity",
        from = "Column::CityId",
        to = "crate::geo::city::Column::Id"
    )]
    City,
    #[sea_orm(
        belongs_to = "crate::geo::state::Entity",
        from = "Column::StateId",
        to = "crate::geo::state::Column::Id"
    )]
    State,
    #[sea_orm(
        belongs_to = "crate::geo::country::Entity",
        from = "Column::CountryId",
        to = "crate::geo::country::Column::Id"
    )]
    Country,
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<crate::geo::city::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::City.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub type Address = Entity;
