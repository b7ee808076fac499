use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::entity::non_blank;
use crate::{Database, DatabaseError, DatabaseResult};

use super::{ActiveModel, Column, Language, LanguageInput, Model};

fn checked_name(input: &LanguageInput) -> DatabaseResult<String> {
    let name = input.name.trim();
    if name.is_empty() {
        return Err(DatabaseError::validation("language name is required"));
    }
    Ok(name.to_string())
}

impl Database {
    pub async fn list_languages(&self, user_id: Uuid) -> DatabaseResult<Vec<Model>> {
        Language::find()
            .filter(Column::UserId.eq(user_id))
            .order_by_asc(Column::Name)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    async fn owned_language(&self, user_id: Uuid, language_id: Uuid) -> DatabaseResult<Model> {
        let language = Language::find_by_id(language_id)
            .one(&self.conn)
            .await?
            .ok_or(DatabaseError::NotFound)?;
        if language.user_id != user_id {
            return Err(DatabaseError::Forbidden);
        }
        Ok(language)
    }

    pub async fn add_language(&self, user_id: Uuid, input: LanguageInput) -> DatabaseResult<Model> {
        let name = checked_name(&input)?;
        Self::require_user(&self.conn, user_id).await?;

        ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            name: Set(name),
            proficiency: Set(non_blank(input.proficiency)),
            certification: Set(non_blank(input.certification)),
            notes: Set(non_blank(input.notes)),
        }
        .insert(&self.conn)
        .await
        .map_err(Into::into)
    }

    pub async fn update_language(
        &self,
        user_id: Uuid,
        language_id: Uuid,
        input: LanguageInput,
    ) -> DatabaseResult<Model> {
        let name = checked_name(&input)?;
        let mut language = self
            .owned_language(user_id, language_id)
            .await?
            .into_active_model();

        language.name = Set(name);
        language.proficiency = Set(non_blank(input.proficiency));
        language.certification = Set(non_blank(input.certification));
        language.notes = Set(non_blank(input.notes));

        language.update(&self.conn).await.map_err(Into::into)
    }

    pub async fn delete_language(&self, user_id: Uuid, language_id: Uuid) -> DatabaseResult<()> {
        self.owned_language(user_id, language_id).await?;
        Language::delete_by_id(language_id).exec(&self.conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_db;
    use crate::test_support::new_user;

    fn marathi() -> LanguageInput {
        LanguageInput {
            name: "Marathi".into(),
            proficiency: Some("Native".into()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn languages_can_be_added_edited_and_removed() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("anu")).await.unwrap();

        let added = db.add_language(user.id, marathi()).await.unwrap();
        let edited = db
            .update_language(
                user.id,
                added.id,
                LanguageInput {
                    name: "Marathi".into(),
                    proficiency: Some("Fluent".into()),
                    certification: Some(" ".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.proficiency.as_deref(), Some("Fluent"));
        assert_eq!(edited.certification, None);

        db.delete_language(user.id, added.id).await.unwrap();
        assert!(db.list_languages(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn name_is_required_and_ownership_enforced() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("sid")).await.unwrap();
        let stranger = db.create_user(new_user("stranger")).await.unwrap();

        let blank = db.add_language(user.id, LanguageInput::default()).await;
        assert!(matches!(blank, Err(DatabaseError::Validation(_))));

        let added = db.add_language(user.id, marathi()).await.unwrap();
        let result = db.delete_language(stranger.id, added.id).await;
        assert!(matches!(result, Err(DatabaseError::Forbidden)));

        let missing = db.delete_language(user.id, Uuid::new_v4()).await;
        assert!(matches!(missing, Err(DatabaseError::NotFound)));
    }
}
