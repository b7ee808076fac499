use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, NotSet, QueryFilter, QueryOrder,
    Set, TransactionTrait,
};
use uuid::Uuid;

use crate::{
    Database, DatabaseError, DatabaseResult, address, education, family, language,
    phone_alternate, professional, profile, profile_image, profile_view,
};

use super::{ActiveModel, Column, Model, NewModel, UpdateModel, User};

impl Database {
    pub async fn get_user_by_id(&self, id: Uuid) -> DatabaseResult<Option<Model>> {
        User::find_by_id(id)
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_user_by_email(&self, email: String) -> DatabaseResult<Option<Model>> {
        User::find()
            .filter(Column::Email.eq(email))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_user_by_username(&self, username: &str) -> DatabaseResult<Option<Model>> {
        User::find()
            .filter(Column::Username.eq(username))
            .one(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn list_users(&self) -> DatabaseResult<Vec<Model>> {
        User::find()
            .order_by_asc(Column::Username)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub(crate) async fn require_user<C: ConnectionTrait>(conn: &C, id: Uuid) -> DatabaseResult<Model> {
        User::find_by_id(id)
            .one(conn)
            .await?
            .ok_or(DatabaseError::NotFound)
    }

    pub async fn create_user(&self, new_user: NewModel) -> DatabaseResult<Model> {
        let username = new_user.username.trim().to_string();
        let email = new_user.email.trim().to_string();

        if username.is_empty() || email.is_empty() {
            return Err(DatabaseError::validation("username and email are required"));
        }
        if self.get_user_by_username(&username).await?.is_some() {
            return Err(DatabaseError::validation("username already exists"));
        }
        if self.get_user_by_email(email.clone()).await?.is_some() {
            return Err(DatabaseError::validation("email already registered"));
        }

        let now = Utc::now();
        let user = ActiveModel {
            id: Set(Uuid::new_v4()),
            username: Set(username),
            email: Set(email),
            first_name: Set(new_user.first_name),
            last_name: Set(new_user.last_name),
            phone: Set(new_user.phone),
            password_hash: Set(new_user.password_hash),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let user = User::insert(user).exec_with_returning(&self.conn).await?;
        tracing::info!(user_id = %user.id, "registered user");

        Ok(user)
    }

    pub async fn update_user(&self, id: Uuid, input_user: UpdateModel) -> DatabaseResult<Model> {
        if let Some(ref email) = input_user.email {
            if email.trim().is_empty() {
                return Err(DatabaseError::validation("email cannot be empty"));
            }
            if let Some(existing) = self.get_user_by_email(email.clone()).await? {
                if existing.id != id {
                    return Err(DatabaseError::validation(
                        "email already registered with another account",
                    ));
                }
            }
        }

        let mut user: ActiveModel = self
            .get_user_by_id(id)
            .await?
            .ok_or(DatabaseError::NotFound)?
            .into();

        user.email = input_user.email.map(Set).unwrap_or(NotSet);
        user.first_name = input_user.first_name.map(Set).unwrap_or(NotSet);
        user.last_name = input_user.last_name.map(Set).unwrap_or(NotSet);
        user.phone = input_user.phone.map(|v| Set(Some(v))).unwrap_or(NotSet);
        user.updated_at = Set(Utc::now());

        let user = user.update(&self.conn).await?;

        Ok(user)
    }

    /// Removes the user and everything the user owns in one transaction.
    /// Children go first so no foreign key is ever left dangling.
    pub async fn delete_user(&self, id: Uuid) -> DatabaseResult<()> {
        let txn = self.conn.begin().await?;
        Self::require_user(&txn, id).await?;

        profile_view::ProfileView::delete_many()
            .filter(
                profile_view::Column::ViewerId
                    .eq(id)
                    .or(profile_view::Column::ViewedId.eq(id)),
            )
            .exec(&txn)
            .await?;

        let member_ids: Vec<Uuid> = family::member::FamilyMember::find()
            .filter(family::member::Column::UserId.eq(id))
            .all(&txn)
            .await?
            .into_iter()
            .map(|m| m.id)
            .collect();

        family::relation::FamilyRelation::delete_many()
            .filter(
                family::relation::Column::PersonId
                    .is_in(member_ids.clone())
                    .or(family::relation::Column::RelatedPersonId.is_in(member_ids)),
            )
            .exec(&txn)
            .await?;
        family::member::FamilyMember::delete_many()
            .filter(family::member::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        address::Address::delete_many()
            .filter(address::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        education::Education::delete_many()
            .filter(education::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        professional::Professional::delete_many()
            .filter(professional::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        phone_alternate::PhoneAlternate::delete_many()
            .filter(phone_alternate::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        language::Language::delete_many()
            .filter(language::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        profile_image::ProfileImage::delete_many()
            .filter(profile_image::Column::UserId.eq(id))
            .exec(&txn)
            .await?;
        profile::Profile::delete_many()
            .filter(profile::Column::UserId.eq(id))
            .exec(&txn)
            .await?;

        User::delete_by_id(id).exec(&txn).await?;
        txn.commit().await?;

        tracing::info!(user_id = %id, "deleted user and owned records");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{EntityTrait, PaginatorTrait};

    use super::*;
    use crate::setup_test_db;
    use crate::test_support::new_user;

    #[tokio::test]
    async fn usernames_and_emails_are_unique() {
        let db = setup_test_db().await.unwrap();
        db.create_user(new_user("asha")).await.unwrap();

        let dup_name = db.create_user(new_user("asha")).await;
        assert!(matches!(dup_name, Err(DatabaseError::Validation(_))));

        let mut dup_email = new_user("asha2");
        dup_email.email = "asha@example.com".into();
        let dup_email = db.create_user(dup_email).await;
        assert!(matches!(dup_email, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn update_keeps_absent_fields() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("ravi")).await.unwrap();

        let updated = db
            .update_user(
                user.id,
                UpdateModel {
                    first_name: Some("Ravindra".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.first_name, "Ravindra");
        assert_eq!(updated.last_name, "Patil");
        assert_eq!(updated.email, user.email);
    }

    #[tokio::test]
    async fn update_rejects_email_of_another_account() {
        let db = setup_test_db().await.unwrap();
        db.create_user(new_user("meera")).await.unwrap();
        let other = db.create_user(new_user("kiran")).await.unwrap();

        let result = db
            .update_user(
                other.id,
                UpdateModel {
                    email: Some("meera@example.com".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn delete_of_unknown_user_is_not_found() {
        let db = setup_test_db().await.unwrap();
        let result = db.delete_user(Uuid::new_v4()).await;
        assert!(matches!(result, Err(DatabaseError::NotFound)));
        assert_eq!(User::find().count(&db.conn).await.unwrap(), 0);
    }
}
