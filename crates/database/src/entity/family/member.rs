use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "family_details")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub occupation: Option<String>,
    pub contact_number: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub marital_status: Option<String>,
    pub address_id: Option<Uuid>,
    // the owner's own node, source of every outgoing relation
    pub is_self: bool,
}

#[derive(Debug, Clone, Default)]
pub struct MemberInput {
    pub first_name: String,
    pub last_name: String,
    pub occupation: Option<String>,
    pub contact_number: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub marital_status: Option<String>,
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
        belongs_to = "crate::address::Entity",
        from = "Column::AddressId",
        to = "crate::address::Column::Id",
        on_delete = "SetNull"
    )]
    Address,
}

impl Related<crate::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub type FamilyMember = Entity;
