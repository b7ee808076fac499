use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::{Database, DatabaseError, DatabaseResult};

use super::{city, country, state};

impl Database {
    pub async fn create_country(&self, name: &str) -> DatabaseResult<country::Model> {
        country::ActiveModel {
            name: Set(name.trim().to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(Into::into)
    }

    pub async fn create_state(&self, country_id: i32, name: &str) -> DatabaseResult<state::Model> {
        country::Country::find_by_id(country_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| DatabaseError::validation(format!("unknown country {country_id}")))?;

        state::ActiveModel {
            name: Set(name.trim().to_string()),
            country_id: Set(country_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(Into::into)
    }

    pub async fn create_city(&self, state_id: i32, name: &str) -> DatabaseResult<city::Model> {
        let state = state::State::find_by_id(state_id)
            .one(&self.conn)
            .await?
            .ok_or_else(|| DatabaseError::validation(format!("unknown state {state_id}")))?;

        city::ActiveModel {
            name: Set(name.trim().to_string()),
            state_id: Set(state.id),
            country_id: Set(state.country_id),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .map_err(Into::into)
    }

    pub async fn list_countries(&self) -> DatabaseResult<Vec<country::Model>> {
        country::Country::find()
            .order_by_asc(country::Column::Name)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn list_states(&self, country_id: i32) -> DatabaseResult<Vec<state::Model>> {
        state::State::find()
            .filter(state::Column::CountryId.eq(country_id))
            .order_by_asc(state::Column::Name)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn list_cities(&self, state_id: i32) -> DatabaseResult<Vec<city::Model>> {
        city::City::find()
            .filter(city::Column::StateId.eq(state_id))
            .order_by_asc(city::Column::Name)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Fails with a validation error unless all three ids name existing rows.
    pub(crate) async fn check_geo_refs<C: ConnectionTrait>(
        conn: &C,
        city_id: i32,
        state_id: i32,
        country_id: i32,
    ) -> DatabaseResult<()> {
        if city::City::find_by_id(city_id).one(conn).await?.is_none() {
            return Err(DatabaseError::validation(format!("unknown city {city_id}")));
        }
        if state::State::find_by_id(state_id).one(conn).await?.is_none() {
            return Err(DatabaseError::validation(format!("unknown state {state_id}")));
        }
        if country::Country::find_by_id(country_id).one(conn).await?.is_none() {
            return Err(DatabaseError::validation(format!("unknown country {country_id}")));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_db;

    #[tokio::test]
    async fn cities_carry_their_country() {
        let db = setup_test_db().await.unwrap();
        let india = db.create_country("India").await.unwrap();
        let maharashtra = db.create_state(india.id, "Maharashtra").await.unwrap();
        let pune = db.create_city(maharashtra.id, "Pune").await.unwrap();

        assert_eq!(pune.country_id, india.id);
        assert_eq!(db.list_cities(maharashtra.id).await.unwrap(), vec![pune]);
        assert_eq!(db.list_states(india.id).await.unwrap(), vec![maharashtra]);
    }

    #[tokio::test]
    async fn states_need_an_existing_country() {
        let db = setup_test_db().await.unwrap();
        let result = db.create_state(42, "Nowhere").await;
        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }
}
