use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, IntoActiveModel, QueryFilter, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{Database, DatabaseError, DatabaseResult};

use super::{ActiveModel, Column, Model, PhoneAlternate};

pub const MAX_ALTERNATE_PHONES: usize = 2;

impl Database {
    pub async fn list_alternate_phones(&self, user_id: Uuid) -> DatabaseResult<Vec<Model>> {
        PhoneAlternate::find()
            .filter(Column::UserId.eq(user_id))
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    /// Replaces the alternate phone set of a member, optionally updating the primary
    /// phone too. Blank entries are dropped before the limit is checked.
    pub async fn replace_phones(
        &self,
        user_id: Uuid,
        primary: Option<String>,
        alternates: Vec<String>,
    ) -> DatabaseResult<Vec<Model>> {
        let alternates: Vec<String> = alternates
            .into_iter()
            .map(|p| p.trim().to_string())
            .filter(|p| !p.is_empty())
            .collect();
        if alternates.len() > MAX_ALTERNATE_PHONES {
            return Err(DatabaseError::capacity(format!(
                "at most {MAX_ALTERNATE_PHONES} alternate phone numbers"
            )));
        }

        let txn = self.conn.begin().await?;
        let user = Self::require_user(&txn, user_id).await?;

        if let Some(primary) = primary.map(|p| p.trim().to_string()).filter(|p| !p.is_empty()) {
            let mut user = user.into_active_model();
            user.phone = Set(Some(primary));
            user.updated_at = Set(Utc::now());
            user.update(&txn).await?;
        }

        PhoneAlternate::delete_many()
            .filter(Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;

        let mut saved = Vec::with_capacity(alternates.len());
        for phone in alternates {
            let row = ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user_id),
                phone: Set(phone),
            }
            .insert(&txn)
            .await?;
            saved.push(row);
        }

        txn.commit().await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::setup_test_db;
    use crate::test_support::new_user;

    #[tokio::test]
    async fn alternates_are_replaced_as_a_set() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("leela")).await.unwrap();

        db.replace_phones(user.id, None, vec!["111".into(), "222".into()])
            .await
            .unwrap();
        let saved = db
            .replace_phones(user.id, Some("999".into()), vec!["333".into(), "  ".into()])
            .await
            .unwrap();

        assert_eq!(saved.len(), 1);
        assert_eq!(db.list_alternate_phones(user.id).await.unwrap()[0].phone, "333");
        let user = db.get_user_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(user.phone.as_deref(), Some("999"));
    }

    #[tokio::test]
    async fn third_alternate_is_a_capacity_error() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("gopal")).await.unwrap();
        db.replace_phones(user.id, None, vec!["111".into()]).await.unwrap();

        let result = db
            .replace_phones(user.id, None, vec!["1".into(), "2".into(), "3".into()])
            .await;

        assert!(matches!(result, Err(DatabaseError::Capacity(_))));
        assert_eq!(db.list_alternate_phones(user.id).await.unwrap().len(), 1);
    }
}
