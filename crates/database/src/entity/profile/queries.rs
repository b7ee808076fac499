use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use crate::entity::{Upsert, non_blank};
use crate::{Database, DatabaseError, DatabaseResult};

use super::{ActiveModel, BirthDetails, Column, Model, Profile, UpdateModel, parse_birth_date};

impl Database {
    pub async fn get_profile(&self, user_id: Uuid) -> DatabaseResult<Option<Model>> {
        Self::find_profile(&self.conn, user_id).await
    }

    pub(crate) async fn find_profile<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> DatabaseResult<Option<Model>> {
        Profile::find()
            .filter(Column::UserId.eq(user_id))
            .one(conn)
            .await
            .map_err(Into::into)
    }

    /// The profile row of `user_id`, or an unsaved one bound to it.
    pub(crate) async fn upsert_profile_row<C: ConnectionTrait>(
        conn: &C,
        user_id: Uuid,
    ) -> DatabaseResult<Upsert<ActiveModel>> {
        let found = Self::find_profile(conn, user_id).await?;

        Ok(Upsert::from_lookup(found, || ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            no_brother: Set(false),
            no_sister: Set(false),
            ..Default::default()
        }))
    }

    pub async fn upsert_profile(&self, user_id: Uuid, input: UpdateModel) -> DatabaseResult<Model> {
        if matches!(input.gender.as_deref(), Some(g) if g.trim().is_empty()) {
            return Err(DatabaseError::validation("gender cannot be empty"));
        }
        if matches!(input.height, Some(h) if h <= 0) {
            return Err(DatabaseError::validation("height must be positive"));
        }
        Self::require_user(&self.conn, user_id).await?;

        let mut row = Self::upsert_profile_row(&self.conn, user_id).await?;
        let profile = row.active();

        if let Some(gender) = input.gender {
            profile.gender = Set(Some(gender.trim().to_string()));
        }
        if let Some(looking_for) = input.looking_for {
            profile.looking_for = Set(Some(looking_for.trim().to_string()));
        }
        if let Some(height) = input.height {
            profile.height = Set(Some(height));
        }
        if let Some(bio) = input.bio {
            profile.bio = Set(Some(bio));
        }
        if let Some(picture) = input.profile_picture {
            profile.profile_picture = Set(Some(picture));
        }
        if let Some(linkedin) = input.linkedin_url {
            profile.linkedin_url = Set(Some(linkedin));
        }

        row.persist(&self.conn).await
    }

    /// Validates the submitted date before anything is read or written, so an
    /// impossible date never touches the profile row. Birth time and place fields
    /// left out (or blank) keep their stored value.
    pub async fn upsert_birth_details(
        &self,
        user_id: Uuid,
        details: BirthDetails,
    ) -> DatabaseResult<Model> {
        if details.month.trim().is_empty()
            || details.day.trim().is_empty()
            || details.year.trim().is_empty()
        {
            return Err(DatabaseError::validation("date of birth fields are required"));
        }
        let date_of_birth = parse_birth_date(&details.month, &details.day, &details.year)?;
        Self::require_user(&self.conn, user_id).await?;

        let mut row = Self::upsert_profile_row(&self.conn, user_id).await?;
        let profile = row.active();

        profile.date_of_birth = Set(Some(date_of_birth));
        profile.legacy_date_of_birth = Set(None);
        if let Some(v) = non_blank(details.birth_time) {
            profile.birth_time = Set(Some(v));
        }
        if let Some(v) = non_blank(details.birth_village) {
            profile.birth_village = Set(Some(v));
        }
        if let Some(v) = non_blank(details.birth_city) {
            profile.birth_city = Set(Some(v));
        }
        if let Some(v) = non_blank(details.birth_state) {
            profile.birth_state = Set(Some(v));
        }
        if let Some(v) = non_blank(details.birth_country) {
            profile.birth_country = Set(Some(v));
        }

        row.persist(&self.conn).await
    }

    /// Moves every readable legacy birth date into the typed column. Returns how many
    /// rows were converted; unreadable values are left in place.
    pub async fn backfill_legacy_birth_dates(&self) -> DatabaseResult<u64> {
        let pending = Profile::find()
            .filter(Column::DateOfBirth.is_null())
            .filter(Column::LegacyDateOfBirth.is_not_null())
            .all(&self.conn)
            .await?;

        let mut converted = 0;
        for profile in pending {
            let Some(date) = profile.resolved_date_of_birth() else {
                tracing::warn!(profile_id = %profile.id, "unreadable legacy date of birth");
                continue;
            };

            let mut active: ActiveModel = profile.into();
            active.date_of_birth = Set(Some(date));
            active.legacy_date_of_birth = Set(None);
            active.update(&self.conn).await?;
            converted += 1;
        }

        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use sea_orm::{EntityTrait, PaginatorTrait};

    use super::*;
    use crate::setup_test_db;
    use crate::test_support::new_user;

    #[tokio::test]
    async fn first_edit_creates_the_profile_and_later_edits_are_partial() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("nisha")).await.unwrap();
        assert!(db.get_profile(user.id).await.unwrap().is_none());

        db.upsert_profile(
            user.id,
            UpdateModel {
                gender: Some("Female".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let profile = db
            .upsert_profile(
                user.id,
                UpdateModel {
                    looking_for: Some("Male".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.gender.as_deref(), Some("Female"));
        assert_eq!(profile.looking_for.as_deref(), Some("Male"));
        assert_eq!(Profile::find().count(&db.conn).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn blank_gender_is_rejected() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("om")).await.unwrap();

        let result = db
            .upsert_profile(
                user.id,
                UpdateModel {
                    gender: Some("  ".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DatabaseError::Validation(_))));
    }

    #[tokio::test]
    async fn impossible_birth_date_leaves_profile_untouched() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("tara")).await.unwrap();

        let result = db
            .upsert_birth_details(
                user.id,
                BirthDetails {
                    month: "February".into(),
                    day: "30".into(),
                    year: "2001".into(),
                    birth_city: Some("Pune".into()),
                    ..Default::default()
                },
            )
            .await;

        assert!(matches!(result, Err(DatabaseError::Validation(_))));
        assert!(db.get_profile(user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn birth_details_are_stored_as_a_date() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("dev")).await.unwrap();

        let profile = db
            .upsert_birth_details(
                user.id,
                BirthDetails {
                    month: "August".into(),
                    day: "15".into(),
                    year: "1994".into(),
                    birth_time: Some("14:45".into()),
                    birth_village: Some("  ".into()),
                    birth_city: Some("Nashik".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.date_of_birth, NaiveDate::from_ymd_opt(1994, 8, 15));
        assert_eq!(profile.birth_time.as_deref(), Some("14:45"));
        assert_eq!(profile.birth_village, None);
        assert_eq!(profile.birth_city.as_deref(), Some("Nashik"));
    }

    #[tokio::test]
    async fn birth_place_survives_a_date_only_edit() {
        let db = setup_test_db().await.unwrap();
        let user = db.create_user(new_user("mohan")).await.unwrap();

        db.upsert_birth_details(
            user.id,
            BirthDetails {
                month: "June".into(),
                day: "1".into(),
                year: "1992".into(),
                birth_time: Some("10:00".into()),
                birth_city: Some("Pune".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        let profile = db
            .upsert_birth_details(
                user.id,
                BirthDetails {
                    month: "June".into(),
                    day: "2".into(),
                    year: "1992".into(),
                    birth_state: Some("Maharashtra".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(profile.date_of_birth, NaiveDate::from_ymd_opt(1992, 6, 2));
        assert_eq!(profile.birth_city.as_deref(), Some("Pune"));
        assert_eq!(profile.birth_time.as_deref(), Some("10:00"));
        assert_eq!(profile.birth_state.as_deref(), Some("Maharashtra"));
    }

    #[tokio::test]
    async fn legacy_dates_are_read_and_backfilled() {
        let db = setup_test_db().await.unwrap();
        let readable = db.create_user(new_user("old1")).await.unwrap();
        let broken = db.create_user(new_user("old2")).await.unwrap();

        for (user, raw) in [(&readable, "1988-01-20 00:00:00.000"), (&broken, "20/01/1988")] {
            ActiveModel {
                id: Set(Uuid::new_v4()),
                user_id: Set(user.id),
                legacy_date_of_birth: Set(Some(raw.into())),
                no_brother: Set(false),
                no_sister: Set(false),
                ..Default::default()
            }
            .insert(&db.conn)
            .await
            .unwrap();
        }

        let before = db.get_profile(readable.id).await.unwrap().unwrap();
        assert_eq!(before.date_of_birth, None);
        assert_eq!(before.resolved_date_of_birth(), NaiveDate::from_ymd_opt(1988, 1, 20));

        assert_eq!(db.backfill_legacy_birth_dates().await.unwrap(), 1);

        let after = db.get_profile(readable.id).await.unwrap().unwrap();
        assert_eq!(after.date_of_birth, NaiveDate::from_ymd_opt(1988, 1, 20));
        let untouched = db.get_profile(broken.id).await.unwrap().unwrap();
        assert_eq!(untouched.resolved_date_of_birth(), None);
        assert_eq!(untouched.legacy_date_of_birth.as_deref(), Some("20/01/1988"));
    }
}
