use jodidar_database::geo::{city, country, state};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Serialize, Deserialize, ToSchema)]
pub struct NewPlace {
    pub name: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct Place {
    pub id: i32,
    pub name: String,
}

impl From<country::Model> for Place {
    fn from(val: country::Model) -> Self {
        Self {
            id: val.id,
            name: val.name,
        }
    }
}

impl From<state::Model> for Place {
    fn from(val: state::Model) -> Self {
        Self {
            id: val.id,
            name: val.name,
        }
    }
}

impl From<city::Model> for Place {
    fn from(val: city::Model) -> Self {
        Self {
            id: val.id,
            name: val.name,
        }
    }
}
