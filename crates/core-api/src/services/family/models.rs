use jodidar_database::family::member::MemberInput;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::services::profile::AddressBody;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MemberBody {
    pub first_name: String,
    pub last_name: String,
    pub occupation: Option<String>,
    pub contact_number: Option<String>,
    pub age: Option<i32>,
    pub email: Option<String>,
    pub marital_status: Option<String>,
    /// Name of a relation type, e.g. "Father". Ignored when editing.
    pub relation_type: String,
    pub address: AddressBody,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RelationBody {
    pub person_id: Uuid,
    pub related_person_id: Uuid,
    pub relation_type: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct RelationCategoryOut {
    pub name: String,
    pub description: Option<String>,
    pub relation_types: Vec<String>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct SiblingsCleared {
    pub removed_relations: u64,
}

impl MemberBody {
    pub fn member_input(&self) -> MemberInput {
        MemberInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            occupation: self.occupation.clone(),
            contact_number: self.contact_number.clone(),
            age: self.age,
            email: self.email.clone(),
            marital_status: self.marital_status.clone(),
        }
    }
}
