use axum::{
    Json,
    extract::{Query, State},
};
use jodidar_database::{RECENT_VISITORS_SHOWN, profile_view::Visitor};
use utoipa::path as route;
use utoipa_axum::{router::OpenApiRouter, routes};

#[cfg(feature = "metrics")]
use crate::metrics::*;
use crate::middleware::Caller;
use crate::services::user::User;
use crate::{ApiError, ApiState, Database};

use super::{SearchQuery, VisitorsQuery};

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(search_profiles))
        .routes(routes!(suggested_matches))
        .routes(routes!(recent_visitors))
}

/// Members matching every given filter, never the caller
#[route(get, path = "/search", params(SearchQuery), responses((status = OK, body = Vec<User>), (status = BAD_REQUEST)))]
async fn search_profiles(
    Caller(caller): Caller,
    State(db): State<Database>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<User>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Search]);

    let found = db.search_profiles(caller, &query.into()).await?;

    Ok(Json(found.into_iter().map(User::from).collect()))
}

/// Members of another gender in the caller's city
#[route(get, path = "/matches", responses((status = OK, body = Vec<User>)))]
async fn suggested_matches(
    Caller(caller): Caller,
    State(db): State<Database>,
) -> Result<Json<Vec<User>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Search]);

    let found = db.suggested_matches(caller).await?;

    Ok(Json(found.into_iter().map(User::from).collect()))
}

/// Who looked at the caller's profile most recently
#[route(get, path = "/visitors", params(VisitorsQuery), responses((status = OK)))]
async fn recent_visitors(
    Caller(caller): Caller,
    State(db): State<Database>,
    Query(query): Query<VisitorsQuery>,
) -> Result<Json<Vec<Visitor>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Search]);

    let limit = query.limit.unwrap_or(RECENT_VISITORS_SHOWN);

    Ok(Json(db.recent_visitors(caller, limit).await?))
}
