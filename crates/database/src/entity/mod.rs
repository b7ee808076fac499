pub mod address;
pub mod education;
pub mod family;
pub mod geo;
pub mod language;
pub mod phone_alternate;
pub mod professional;
pub mod profile;
pub mod profile_image;
pub mod profile_view;
pub mod user;

use sea_orm::{
    ActiveModelBehavior, ActiveModelTrait, ConnectionTrait, EntityTrait, IntoActiveModel,
    TryIntoModel,
};

use crate::DatabaseResult;

/// A child row that was either found for its owner or freshly built for it.
/// Every "get or create" edit goes through this so that the insert/update decision
/// is made in exactly one place.
pub(crate) enum Upsert<A> {
    Existing(A),
    New(A),
}

impl<A> Upsert<A>
where
    A: ActiveModelTrait + ActiveModelBehavior + Send,
    <A::Entity as EntityTrait>::Model: IntoActiveModel<A>,
{
    pub fn from_lookup(
        found: Option<<A::Entity as EntityTrait>::Model>,
        fresh: impl FnOnce() -> A,
    ) -> Self {
        match found {
            Some(model) => Self::Existing(model.into_active_model()),
            None => Self::New(fresh()),
        }
    }

    pub fn active(&mut self) -> &mut A {
        match self {
            Self::Existing(active) | Self::New(active) => active,
        }
    }

    pub async fn persist<C>(self, conn: &C) -> DatabaseResult<<A::Entity as EntityTrait>::Model>
    where
        C: ConnectionTrait,
        A: TryIntoModel<<A::Entity as EntityTrait>::Model>,
    {
        match self {
            // nothing to write, hand back what was read
            Self::Existing(active) if !active.is_changed() => Ok(active.try_into_model()?),
            Self::Existing(active) => Ok(active.update(conn).await?),
            Self::New(active) => Ok(active.insert(conn).await?),
        }
    }
}

/// Trims a submitted value, treating blank input as absent.
pub(crate) fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
