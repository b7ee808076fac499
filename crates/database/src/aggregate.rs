use chrono::NaiveDate;
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use serde::Serialize;
use uuid::Uuid;

use crate::profile_view::Visitor;
use crate::{
    Database, DatabaseError, DatabaseResult, address, education, family, language,
    phone_alternate, professional, profile, profile_image, scoring, user,
};

/// Everything a member has filled in, loaded with one query per child table.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileAggregate {
    pub user: user::Model,
    pub profile: Option<profile::Model>,
    /// Typed birth date, falling back to a readable legacy value.
    pub date_of_birth: Option<NaiveDate>,
    pub addresses: Vec<address::Model>,
    pub educations: Vec<education::Model>,
    pub professional_details: Vec<professional::Model>,
    pub family_members: Vec<family::member::Model>,
    pub alternate_phones: Vec<phone_alternate::Model>,
    pub images: Vec<profile_image::Model>,
    pub primary_image: Option<profile_image::Model>,
    pub languages: Vec<language::Model>,
}

/// A profile as shown to a visitor.
#[derive(Debug, Clone, Serialize)]
pub struct ProfilePage {
    pub aggregate: ProfileAggregate,
    pub score: u8,
    /// The viewer's own recent visitors, not the viewed member's.
    pub recent_visitors: Vec<Visitor>,
}

pub const RECENT_VISITORS_SHOWN: usize = 3;

impl Database {
    pub async fn get_profile_aggregate(&self, user_id: Uuid) -> DatabaseResult<ProfileAggregate> {
        let user = self
            .get_user_by_id(user_id)
            .await?
            .ok_or(DatabaseError::NotFound)?;
        self.load_aggregate(user).await
    }

    async fn load_aggregate(&self, user: user::Model) -> DatabaseResult<ProfileAggregate> {
        let profile = self.get_profile(user.id).await?;
        let images = self.list_images(user.id).await?;
        let primary_image = images.iter().find(|i| i.is_primary).cloned();

        Ok(ProfileAggregate {
            date_of_birth: profile.as_ref().and_then(profile::Model::resolved_date_of_birth),
            profile,
            addresses: self.list_addresses(user.id).await?,
            educations: self.list_educations(user.id).await?,
            professional_details: self.list_professional_details(user.id).await?,
            family_members: self.list_family_members(user.id).await?,
            alternate_phones: self.list_alternate_phones(user.id).await?,
            primary_image,
            images,
            languages: self.list_languages(user.id).await?,
            user,
        })
    }

    /// Opens `username`'s profile for `viewer_id`, recording the visit unless members
    /// look at themselves.
    pub async fn view_profile(&self, viewer_id: Uuid, username: &str) -> DatabaseResult<ProfilePage> {
        let owner = self
            .get_user_by_username(username)
            .await?
            .ok_or(DatabaseError::NotFound)?;

        self.record_view(viewer_id, owner.id).await?;

        let aggregate = self.load_aggregate(owner).await?;
        let score = scoring::score(&aggregate);
        let recent_visitors = self.recent_visitors(viewer_id, RECENT_VISITORS_SHOWN).await?;

        Ok(ProfilePage {
            aggregate,
            score,
            recent_visitors,
        })
    }

    /// Members of a different gender living in the city of the caller's first
    /// personal address. Empty when either is unknown.
    pub async fn suggested_matches(&self, user_id: Uuid) -> DatabaseResult<Vec<user::Model>> {
        let Some(gender) = self.get_profile(user_id).await?.and_then(|p| p.gender) else {
            return Ok(Vec::new());
        };
        let Some(city_id) = self
            .list_addresses(user_id)
            .await?
            .first()
            .map(|a| a.city_id)
        else {
            return Ok(Vec::new());
        };

        let candidates: Vec<Uuid> = address::Address::find()
            .filter(address::Column::CityId.eq(city_id))
            .filter(address::Column::Tag.is_in(address::AddressTag::PERSONAL))
            .filter(address::Column::UserId.ne(user_id))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|a| a.user_id)
            .collect();

        let other_gender: Vec<Uuid> = profile::Profile::find()
            .filter(profile::Column::UserId.is_in(candidates))
            .filter(profile::Column::Gender.is_not_null())
            .filter(profile::Column::Gender.ne(gender))
            .all(&self.conn)
            .await?
            .into_iter()
            .map(|p| p.user_id)
            .collect();

        user::User::find()
            .filter(user::Column::Id.is_in(other_gender))
            .order_by_asc(user::Column::Username)
            .all(&self.conn)
            .await
            .map_err(Into::into)
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use sea_orm::{EntityTrait, PaginatorTrait};

    use super::*;
    use crate::family::member::MemberInput;
    use crate::phone_alternate::PhoneAlternate;
    use crate::profile_image::NewImage;
    use crate::setup_test_db;
    use crate::storage::testing::MemoryBlobStore;
    use crate::test_support::{Geo, address_in, new_user};

    async fn with_gender(db: &Database, username: &str, gender: &str) -> user::Model {
        let user = db.create_user(new_user(username)).await.unwrap();
        db.upsert_profile(
            user.id,
            profile::UpdateModel {
                gender: Some(gender.into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        user
    }

    #[tokio::test]
    async fn unknown_member_is_not_found() {
        let db = setup_test_db().await.unwrap();
        let viewer = db.create_user(new_user("viewer")).await.unwrap();

        let result = db.view_profile(viewer.id, "nobody").await;

        assert!(matches!(result, Err(DatabaseError::NotFound)));
        assert!(matches!(
            db.get_profile_aggregate(Uuid::new_v4()).await,
            Err(DatabaseError::NotFound)
        ));
    }

    #[tokio::test]
    async fn viewing_records_the_visit_and_scores_the_owner() {
        let db = setup_test_db().await.unwrap();
        let owner = with_gender(&db, "priya", "Female").await;
        let viewer = db.create_user(new_user("arjun")).await.unwrap();

        let page = db.view_profile(viewer.id, "priya").await.unwrap();

        assert_eq!(page.aggregate.user.id, owner.id);
        assert_eq!(page.score, scoring::score(&page.aggregate));
        assert!(page.recent_visitors.is_empty());
        assert_eq!(db.views_between(viewer.id, owner.id).await.unwrap().len(), 1);

        // the owner now sees the viewer among their own visitors
        let own = db.view_profile(owner.id, "priya").await.unwrap();
        assert_eq!(own.recent_visitors.len(), 1);
        assert_eq!(own.recent_visitors[0].user.id, viewer.id);
        assert!(db.views_between(owner.id, owner.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn matches_live_in_the_same_city_and_differ_in_gender() {
        let db = setup_test_db().await.unwrap();
        let pune = Geo::seed(&db).await;
        let nagpur = db.create_city(pune.state.id, "Nagpur").await.unwrap();

        let me = with_gender(&db, "me", "Male").await;
        let near = with_gender(&db, "near", "Female").await;
        let same = with_gender(&db, "same", "Male").await;
        let far = with_gender(&db, "far", "Female").await;

        assert!(db.suggested_matches(me.id).await.unwrap().is_empty());

        for user in [&me, &near, &same] {
            db.upsert_address(user.id, "Current", address_in(&pune, "Somewhere"))
                .await
                .unwrap();
        }
        let mut elsewhere = address_in(&pune, "Far away");
        elsewhere.city_id = nagpur.id;
        db.upsert_address(far.id, "Current", elsewhere).await.unwrap();

        let matches = db.suggested_matches(me.id).await.unwrap();
        assert_eq!(matches.iter().map(|u| u.id).collect::<Vec<_>>(), vec![near.id]);
    }

    #[tokio::test]
    async fn deleting_a_user_leaves_no_owned_rows() {
        let db = setup_test_db().await.unwrap();
        let geo = Geo::seed(&db).await;
        let store = MemoryBlobStore::new();
        let owner = with_gender(&db, "full", "Female").await;
        let other = db.create_user(new_user("other")).await.unwrap();

        db.upsert_address(owner.id, "Permanent", address_in(&geo, "1 Main Road"))
            .await
            .unwrap();
        db.add_education(owner.id, Default::default()).await.unwrap();
        db.upsert_professional(
            owner.id,
            professional::UpdateModel {
                occupation: Some("Doctor".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        db.replace_phones(owner.id, None, vec!["9833333333".into()])
            .await
            .unwrap();
        db.add_language(
            owner.id,
            language::LanguageInput {
                name: "Marathi".into(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        db.upload_image(
            owner.id,
            NewImage {
                file_name: "me.png".into(),
                content_type: "image/png".into(),
                bytes: Bytes::from_static(b"png"),
                is_primary: false,
            },
            &store,
        )
        .await
        .unwrap();
        db.add_or_update_member(
            owner.id,
            None,
            MemberInput {
                first_name: "Ramesh".into(),
                last_name: "Patil".into(),
                ..Default::default()
            },
            "Father",
            address_in(&geo, "Family home"),
        )
        .await
        .unwrap();
        db.record_view(owner.id, other.id).await.unwrap();
        db.record_view(other.id, owner.id).await.unwrap();

        let aggregate = db.get_profile_aggregate(owner.id).await.unwrap();
        assert_eq!(aggregate.family_members.len(), 1);
        assert!(aggregate.primary_image.is_some());

        db.delete_user(owner.id).await.unwrap();

        assert_eq!(user::User::find().count(&db.conn).await.unwrap(), 1);
        assert_eq!(profile::Profile::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(address::Address::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(education::Education::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(professional::Professional::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(PhoneAlternate::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(language::Language::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(profile_image::ProfileImage::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(family::member::FamilyMember::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(family::relation::FamilyRelation::find().count(&db.conn).await.unwrap(), 0);
        assert_eq!(crate::profile_view::ProfileView::find().count(&db.conn).await.unwrap(), 0);
    }
}
