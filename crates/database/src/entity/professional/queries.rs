use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use crate::entity::{Upsert, non_blank};
use crate::{Database, DatabaseError, DatabaseResult};

use super::{ActiveModel, Column, Model, Professional, UpdateModel};

impl Database {
    pub async fn list_professional_details(&self, user_id: Uuid) -> DatabaseResult<Vec<Model>> {
        Professional::find()
            .filter(Column::UserId.eq(user_id))
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn upsert_professional(
        &self,
        user_id: Uuid,
        input: UpdateModel,
    ) -> DatabaseResult<Model> {
        if matches!(input.years_of_experience, Some(y) if y < 0) {
            return Err(DatabaseError::validation("years of experience cannot be negative"));
        }
        Self::require_user(&self.conn, user_id).await?;

        let found = Professional::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.conn)
            .await?;
        let mut row = Upsert::from_lookup(found, || ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            ..Default::default()
        });
        let job = row.active();

        if let Some(v) = non_blank(input.occupation) {
            job.occupation = Set(Some(v));
        }
        if let Some(v) = non_blank(input.company_name) {
            job.company_name = Set(Some(v));
        }
        if let Some(v) = non_blank(input.designation) {
            job.designation = Set(Some(v));
        }
        if let Some(v) = input.years_of_experience {
            job.years_of_experience = Set(Some(v));
        }
        if let Some(v) = non_blank(input.package) {
            job.package = Set(Some(v));
        }
        if let Some(v) = non_blank(input.turn_over) {
            job.turn_over = Set(Some(v));
        }
        if let Some(v) = non_blank(input.location) {
            job.location = Set(Some(v));
        }
        if let Some(v) = non_blank(input.employment_type) {
            job.employment_type = Set(Some(v));
        }

        row.persist(&self.conn).await
    }
}
