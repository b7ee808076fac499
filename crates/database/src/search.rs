use chrono::{Datelike, NaiveDate, Utc};
use sea_orm::sea_query::{Expr, Func, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, JoinType, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::geo::city;
use crate::{Database, DatabaseError, DatabaseResult, address, education, professional, profile, user};

/// Search criteria. Every field is optional and the set fields must all match; the
/// keyword matches when any of its target fields contains it.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SearchFilters {
    pub keyword: Option<String>,
    pub gender: Option<String>,
    pub min_age: Option<u32>,
    pub max_age: Option<u32>,
    // caste, religion and marital status live in the free-text bio
    pub caste: Option<String>,
    pub religion: Option<String>,
    pub marital_status: Option<String>,
    pub same_caste_only: bool,
    pub education: Option<String>,
    pub city: Option<String>,
}

fn term(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Case-insensitive "contains" on a column of a joined table.
fn contains<E, C>(entity: E, column: C, needle: &str) -> SimpleExpr
where
    E: EntityTrait,
    C: ColumnTrait,
{
    let escaped: String = needle
        .to_lowercase()
        .chars()
        .flat_map(|c| match c {
            '%' | '_' | '\\' => vec!['\\', c],
            c => vec![c],
        })
        .collect();

    Expr::expr(Func::lower(Expr::col((entity, column))))
        .like(LikeExpr::new(format!("%{escaped}%")).escape('\\'))
}

/// Oldest age a search may ask for.
pub const MAX_SEARCH_AGE: u32 = 150;

fn birth_year(year: i32, age: u32) -> DatabaseResult<i32> {
    if age > MAX_SEARCH_AGE {
        return Err(DatabaseError::validation(format!(
            "age {age} is above {MAX_SEARCH_AGE}"
        )));
    }
    i32::try_from(age)
        .ok()
        .and_then(|age| year.checked_sub(age))
        .ok_or_else(|| DatabaseError::validation(format!("unsupported age {age}")))
}

/// Latest birth date of someone turning `age` this calendar year.
fn born_by(year: i32, age: u32) -> DatabaseResult<NaiveDate> {
    NaiveDate::from_ymd_opt(birth_year(year, age)?, 12, 31)
        .ok_or_else(|| DatabaseError::validation(format!("unsupported age {age}")))
}

/// Earliest birth date of someone turning `age` this calendar year.
fn born_from(year: i32, age: u32) -> DatabaseResult<NaiveDate> {
    NaiveDate::from_ymd_opt(birth_year(year, age)?, 1, 1)
        .ok_or_else(|| DatabaseError::validation(format!("unsupported age {age}")))
}

impl Database {
    /// Members matching `filters`, never including the caller, ordered by username.
    pub async fn search_profiles(
        &self,
        caller_id: Uuid,
        filters: &SearchFilters,
    ) -> DatabaseResult<Vec<user::Model>> {
        self.search_profiles_in_year(caller_id, filters, Utc::now().year())
            .await
    }

    /// Ages are turned into birth-year bounds against `year`, not exact birthdays.
    pub async fn search_profiles_in_year(
        &self,
        caller_id: Uuid,
        filters: &SearchFilters,
        year: i32,
    ) -> DatabaseResult<Vec<user::Model>> {
        let mut condition = Condition::all().add(user::Column::Id.ne(caller_id));

        if let Some(keyword) = term(&filters.keyword) {
            condition = condition.add(
                Condition::any()
                    .add(contains(user::Entity, user::Column::FirstName, keyword))
                    .add(contains(user::Entity, user::Column::LastName, keyword))
                    .add(contains(city::Entity, city::Column::Name, keyword))
                    .add(contains(professional::Entity, professional::Column::CompanyName, keyword))
                    .add(contains(professional::Entity, professional::Column::Occupation, keyword))
                    .add(contains(profile::Entity, profile::Column::BirthCity, keyword)),
            );
        }

        if let Some(gender) = term(&filters.gender) {
            condition = condition.add(profile::Column::Gender.eq(gender));
        }
        if let Some(age) = filters.min_age {
            condition = condition.add(profile::Column::DateOfBirth.lte(born_by(year, age)?));
        }
        if let Some(age) = filters.max_age {
            condition = condition.add(profile::Column::DateOfBirth.gte(born_from(year, age)?));
        }

        for bio_term in [&filters.caste, &filters.religion, &filters.marital_status]
            .into_iter()
            .filter_map(term)
        {
            condition = condition.add(contains(profile::Entity, profile::Column::Bio, bio_term));
        }

        if filters.same_caste_only {
            let own_bio = self.get_profile(caller_id).await?.and_then(|p| p.bio);
            if let Some(bio) = term(&own_bio) {
                condition = condition.add(contains(profile::Entity, profile::Column::Bio, bio));
            }
        }

        if let Some(education) = term(&filters.education) {
            condition = condition.add(
                Condition::any()
                    .add(contains(education::Entity, education::Column::Degree, education))
                    .add(contains(education::Entity, education::Column::Institution, education))
                    .add(contains(education::Entity, education::Column::Specialization, education)),
            );
        }

        if let Some(city_name) = term(&filters.city) {
            condition = condition.add(contains(city::Entity, city::Column::Name, city_name));
        }

        // only personal addresses say where a member lives
        let personal_address = user::Relation::Address
            .def()
            .on_condition(|_user, address_table| {
                Condition::all().add(
                    Expr::col((address_table, address::Column::Tag))
                        .is_in(address::AddressTag::PERSONAL),
                )
            });

        let found = user::User::find()
            .join(JoinType::InnerJoin, user::Relation::Profile.def())
            .join(JoinType::LeftJoin, personal_address)
            .join(JoinType::LeftJoin, address::Relation::City.def())
            .join(JoinType::LeftJoin, user::Relation::Professional.def())
            .join(JoinType::LeftJoin, user::Relation::Education.def())
            .filter(condition)
            .distinct()
            .order_by_asc(user::Column::Username)
            .all(&self.conn)
            .await?;

        tracing::debug!(caller_id = %caller_id, results = found.len(), "profile search");

        Ok(found)
    }
}
