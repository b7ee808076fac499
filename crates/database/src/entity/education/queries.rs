use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use uuid::Uuid;

use crate::entity::{Upsert, non_blank};
use crate::{Database, DatabaseError, DatabaseResult};

use super::{ActiveModel, Column, Education, EducationInput, Model};

impl ActiveModel {
    // absent or blank fields keep what is stored
    fn apply(&mut self, input: EducationInput) {
        if let Some(v) = non_blank(input.degree) {
            self.degree = Set(Some(v));
        }
        if let Some(v) = non_blank(input.specialization) {
            self.specialization = Set(Some(v));
        }
        if let Some(v) = non_blank(input.university) {
            self.university = Set(Some(v));
        }
        if let Some(v) = non_blank(input.institution) {
            self.institution = Set(Some(v));
        }
        if let Some(v) = input.year_of_passing {
            self.year_of_passing = Set(Some(v));
        }
        if let Some(v) = non_blank(input.grade) {
            self.grade = Set(Some(v));
        }
    }

    fn fresh(user_id: Uuid) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            ..Default::default()
        }
    }
}

impl Database {
    pub async fn list_educations(&self, user_id: Uuid) -> DatabaseResult<Vec<Model>> {
        Education::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_desc(Column::YearOfPassing)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    async fn first_education(&self, user_id: Uuid) -> DatabaseResult<Upsert<ActiveModel>> {
        let found = Education::find()
            .filter(Column::UserId.eq(user_id))
            .one(&self.conn)
            .await?;

        Ok(Upsert::from_lookup(found, || ActiveModel::fresh(user_id)))
    }

    /// Edits the member's main education entry, creating it on first save.
    pub async fn upsert_education(
        &self,
        user_id: Uuid,
        input: EducationInput,
    ) -> DatabaseResult<Model> {
        Self::require_user(&self.conn, user_id).await?;

        let mut row = self.first_education(user_id).await?;
        row.active().apply(input);
        row.persist(&self.conn).await
    }

    /// Sets only the university of the main education entry.
    pub async fn update_university(&self, user_id: Uuid, university: &str) -> DatabaseResult<Model> {
        let university = university.trim();
        if university.is_empty() {
            return Err(DatabaseError::validation("university cannot be empty"));
        }
        Self::require_user(&self.conn, user_id).await?;

        let mut row = self.first_education(user_id).await?;
        row.active().university = Set(Some(university.to_string()));
        row.persist(&self.conn).await
    }

    pub async fn add_education(&self, user_id: Uuid, input: EducationInput) -> DatabaseResult<Model> {
        Self::require_user(&self.conn, user_id).await?;

        let mut education = ActiveModel::fresh(user_id);
        education.apply(input);
        education.insert(&self.conn).await.map_err(Into::into)
    }

    pub async fn delete_education(&self, user_id: Uuid, education_id: Uuid) -> DatabaseResult<()> {
        let education = Education::find_by_id(education_id)
            .one(&self.conn)
            .await?
            .ok_or(DatabaseError::NotFound)?;
        if education.user_id != user_id {
            return Err(DatabaseError::Forbidden);
        }

        Education::delete_by_id(education_id).exec(&self.conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_db;
    use crate::test_support::new_user;

    fn btech() -> EducationInput {
        EducationInput {
            degree: Some("B.Tech".into()),
            specialization: Some("Computer Science".into()),
            university: Some("SPPU".into()),
            institution: Some("COEP".into()),
            year_of_passing: Some(2016),
            grade: Some("A".into()),
        }
    }

    #[tokio::test]
    async fn main_entry_is_created_once_then_edited_partially() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("isha")).await.unwrap();

        db.upsert_education(user.id, btech()).await.unwrap();
        let updated = db
            .upsert_education(
                user.id,
                EducationInput {
                    degree: Some("M.Tech".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.degree.as_deref(), Some("M.Tech"));
        assert_eq!(updated.institution.as_deref(), Some("COEP"));
        assert_eq!(updated.year_of_passing, Some(2016));
        assert_eq!(db.list_educations(user.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn university_update_is_partial() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("vik")).await.unwrap();
        db.upsert_education(user.id, btech()).await.unwrap();

        let updated = db.update_university(user.id, "Mumbai University").await.unwrap();

        assert_eq!(updated.university.as_deref(), Some("Mumbai University"));
        assert_eq!(updated.degree.as_deref(), Some("B.Tech"));
    }

    #[tokio::test]
    async fn entries_of_other_members_cannot_be_deleted() {
        let db = setup_test_db().await.unwrap();
        let owner = db.create_user(new_user("owner")).await.unwrap();
        let other = db.create_user(new_user("other")).await.unwrap();
        let entry = db.add_education(owner.id, btech()).await.unwrap();

        let result = db.delete_education(other.id, entry.id).await;

        assert!(matches!(result, Err(DatabaseError::Forbidden)));
        assert_eq!(db.list_educations(owner.id).await.unwrap().len(), 1);
    }
}
