mod aggregate;
mod database;
mod entity;
mod errors;
#[cfg(feature = "migrations")]
mod migrations;
pub mod scoring;
mod search;
pub mod storage;
pub use aggregate::*;
pub use database::*;
pub use entity::*;
pub use errors::*;
#[cfg(feature = "migrations")]
pub use migrations::*;
pub use search::*;

#[cfg(test)]
pub(crate) mod test_support {
    use crate::address::AddressInput;
    use crate::geo::{city, country, state};
    use crate::{Database, user};

    pub fn new_user(username: &str) -> user::NewModel {
        user::NewModel {
            username: username.to_string(),
            email: format!("{username}@example.com"),
            first_name: username.to_string(),
            last_name: "Patil".to_string(),
            phone: Some("9800000000".to_string()),
            password_hash: "hashed".to_string(),
        }
    }

    pub struct Geo {
        pub country: country::Model,
        pub state: state::Model,
        pub city: city::Model,
    }

    impl Geo {
        pub async fn seed(db: &Database) -> Self {
            Self::seed_city(db, "Pune").await
        }

        pub async fn seed_city(db: &Database, city: &str) -> Self {
            let country = db.create_country("India").await.unwrap();
            let state = db.create_state(country.id, "Maharashtra").await.unwrap();
            let city = db.create_city(state.id, city).await.unwrap();
            Self { country, state, city }
        }
    }

    pub fn address_in(geo: &Geo, line: &str) -> AddressInput {
        AddressInput {
            address1: line.to_string(),
            city_id: geo.city.id,
            state_id: geo.state.id,
            country_id: geo.country.id,
            zipcode: "411001".to_string(),
            ..Default::default()
        }
    }
}
