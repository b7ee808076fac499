use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa::path as route;
use utoipa_axum::{router::OpenApiRouter, routes};

#[cfg(feature = "metrics")]
use crate::metrics::*;
use crate::{ApiError, ApiState, Database};

use super::{NewPlace, Place};

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_countries, create_country))
        .routes(routes!(list_states, create_state))
        .routes(routes!(list_cities, create_city))
}

fn places<T: Into<Place>>(rows: Vec<T>) -> Json<Vec<Place>> {
    Json(rows.into_iter().map(Into::into).collect())
}

#[route(get, path = "/geo/country", responses((status = OK, body = Vec<Place>)))]
async fn list_countries(State(db): State<Database>) -> Result<Json<Vec<Place>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Geo]);

    Ok(places(db.list_countries().await?))
}

#[route(post, path = "/geo/country", request_body = NewPlace, responses((status = CREATED, body = Place)))]
async fn create_country(
    State(db): State<Database>,
    Json(body): Json<NewPlace>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::Geo]);

    let country = db.create_country(&body.name).await?;

    Ok((StatusCode::CREATED, Json(country.into())))
}

#[route(get, path = "/geo/country/{id}/state", responses((status = OK, body = Vec<Place>)))]
async fn list_states(
    Path(id): Path<i32>,
    State(db): State<Database>,
) -> Result<Json<Vec<Place>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Geo]);

    Ok(places(db.list_states(id).await?))
}

#[route(post, path = "/geo/country/{id}/state", request_body = NewPlace, responses((status = CREATED, body = Place), (status = BAD_REQUEST)))]
async fn create_state(
    Path(id): Path<i32>,
    State(db): State<Database>,
    Json(body): Json<NewPlace>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::Geo]);

    let state = db.create_state(id, &body.name).await?;

    Ok((StatusCode::CREATED, Json(state.into())))
}

#[route(get, path = "/geo/state/{id}/city", responses((status = OK, body = Vec<Place>)))]
async fn list_cities(
    Path(id): Path<i32>,
    State(db): State<Database>,
) -> Result<Json<Vec<Place>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Geo]);

    Ok(places(db.list_cities(id).await?))
}

#[route(post, path = "/geo/state/{id}/city", request_body = NewPlace, responses((status = CREATED, body = Place), (status = BAD_REQUEST)))]
async fn create_city(
    Path(id): Path<i32>,
    State(db): State<Database>,
    Json(body): Json<NewPlace>,
) -> Result<(StatusCode, Json<Place>), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::Geo]);

    let city = db.create_city(id, &body.name).await?;

    Ok((StatusCode::CREATED, Json(city.into())))
}
