use sea_orm::{
    ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entity::{Upsert, non_blank};
use crate::{Database, DatabaseError, DatabaseResult};

use super::{ActiveModel, Address, AddressInput, AddressTag, Column, Model};

impl ActiveModel {
    pub(crate) fn apply(&mut self, input: AddressInput) {
        self.address1 = Set(input.address1.trim().to_string());
        self.address2 = Set(non_blank(input.address2));
        self.address3 = Set(non_blank(input.address3));
        self.city_id = Set(input.city_id);
        self.state_id = Set(input.state_id);
        self.country_id = Set(input.country_id);
        self.zipcode = Set(input.zipcode.trim().to_string());
    }

    pub(crate) fn fresh(user_id: Uuid, tag: AddressTag) -> Self {
        Self {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            tag: Set(tag),
            ..Default::default()
        }
    }
}

impl Database {
    pub async fn list_addresses(&self, user_id: Uuid) -> DatabaseResult<Vec<Model>> {
        Address::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Tag.is_in(AddressTag::PERSONAL))
            .order_by_asc(Column::Tag)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }

    pub async fn get_address(&self, user_id: Uuid, tag: &str) -> DatabaseResult<Option<Model>> {
        let tag: AddressTag = tag.parse()?;
        Self::find_address(&self.conn, user_id, tag).await
    }

    async fn find_address<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
        tag: AddressTag,
    ) -> DatabaseResult<Option<Model>> {
        Address::find()
            .filter(Column::UserId.eq(user_id))
            .filter(Column::Tag.eq(tag))
            .one(conn)
            .await
            .map_err(Into::into)
    }

    /// Saves the one address a member keeps under `tag`, creating it on first save.
    /// The tag is matched case-insensitively and stored in its canonical casing.
    pub async fn upsert_address(
        &self,
        user_id: Uuid,
        tag: &str,
        input: AddressInput,
    ) -> DatabaseResult<Model> {
        let tag: AddressTag = tag.parse()?;
        if !tag.is_personal() {
            return Err(DatabaseError::validation(
                "family member addresses are edited through the family member",
            ));
        }
        if input.address1.trim().is_empty() || input.zipcode.trim().is_empty() {
            return Err(DatabaseError::validation("address line and zipcode are required"));
        }

        let txn = self.conn.begin().await?;
        Self::require_user(&txn, user_id).await?;
        Self::check_geo_refs(&txn, input.city_id, input.state_id, input.country_id).await?;

        let found = Self::find_address(&txn, user_id, tag).await?;
        let mut row = Upsert::from_lookup(found, || ActiveModel::fresh(user_id, tag));
        row.active().apply(input);
        let saved = row.persist(&txn).await?;

        txn.commit().await?;
        Ok(saved)
    }
}

#[cfg(test)]
mod tests {
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait};

    use super::*;
    use crate::setup_test_db;
    use crate::test_support::{Geo, address_in, new_user};

    #[tokio::test]
    async fn one_address_per_tag_whatever_the_casing() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let user = db.create_user(new_user("sana")).await.unwrap();

        db.upsert_address(user.id, "permanent", address_in(&geo, "12 MG Road"))
            .await
            .unwrap();
        let second = db
            .upsert_address(user.id, "PERMANENT", address_in(&geo, "14 MG Road"))
            .await
            .unwrap();

        assert_eq!(second.tag, AddressTag::Permanent);
        assert_eq!(second.address1, "14 MG Road");
        assert_eq!(Address::find().count(&db.conn).await.unwrap(), 1);

        db.upsert_address(user.id, "Work", address_in(&geo, "Tech Park"))
            .await
            .unwrap();
        assert_eq!(db.list_addresses(user.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn unknown_geo_ids_are_rejected() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let user = db.create_user(new_user("amit")).await.unwrap();

        let mut input = address_in(&geo, "1 Station Road");
        input.city_id = 9999;
        let result = db.upsert_address(user.id, "Current", input).await;

        assert!(matches!(result, Err(DatabaseError::Validation(_))));
        assert!(db.get_address(user.id, "current").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn unknown_and_family_tags_are_rejected() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let user = db.create_user(new_user("zoya")).await.unwrap();

        for tag in ["holiday", "family_member"] {
            let result = db
                .upsert_address(user.id, tag, address_in(&geo, "Somewhere"))
                .await;
            assert!(matches!(result, Err(DatabaseError::Validation(_))));
        }
    }

    #[tokio::test]
    async fn the_schema_allows_one_row_per_personal_tag() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let user = db.create_user(new_user("neha")).await.unwrap();
        db.upsert_address(user.id, "Permanent", address_in(&geo, "12 MG Road"))
            .await
            .unwrap();

        let row = |tag: AddressTag, line: &str| {
            let mut row = ActiveModel::fresh(user.id, tag);
            row.apply(address_in(&geo, line));
            row
        };

        let duplicate = row(AddressTag::Permanent, "14 MG Road").insert(&db.conn).await;
        assert!(duplicate.is_err());

        // relatives' addresses all carry the family_member tag
        row(AddressTag::FamilyMember, "Wada").insert(&db.conn).await.unwrap();
        row(AddressTag::FamilyMember, "Peth").insert(&db.conn).await.unwrap();

        assert_eq!(Address::find().count(&db.conn).await.unwrap(), 3);
        let kept = db.get_address(user.id, "permanent").await.unwrap().unwrap();
        assert_eq!(kept.address1, "12 MG Road");
    }
}
