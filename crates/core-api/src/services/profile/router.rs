use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use jodidar_database::{
    ProfilePage, address, education, language, phone_alternate, professional, profile,
};
use utoipa::path as route;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

#[cfg(feature = "metrics")]
use crate::metrics::*;
use crate::middleware::Caller;
use crate::{ApiError, ApiState, Database};

use super::{
    AddressBody, BirthDetailsInput, EducationBody, LanguageBody, PhonesInput, ProfessionalUpdate,
    ProfileUpdate, UniversityInput,
};

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(view_profile))
        .routes(routes!(update_profile))
        .routes(routes!(update_birth_details))
        .routes(routes!(list_addresses))
        .routes(routes!(get_address, upsert_address))
        .routes(routes!(replace_phones))
        .routes(routes!(upsert_education, add_education))
        .routes(routes!(update_university))
        .routes(routes!(delete_education))
        .routes(routes!(update_professional))
        .routes(routes!(add_language))
        .routes(routes!(update_language, delete_language))
}

/// Opens a member's profile page, recording the caller's visit
#[route(get, path = "/profile/{username}", responses((status = OK, description = "aggregate, completeness score and the caller's recent visitors"), (status = NOT_FOUND)))]
async fn view_profile(
    Caller(viewer): Caller,
    Path(username): Path<String>,
    State(db): State<Database>,
) -> Result<Json<ProfilePage>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Profile]);

    Ok(Json(db.view_profile(viewer, &username).await?))
}

/// Updates the caller's demographic fields, keeping absent ones
#[route(patch, path = "/profile", request_body = ProfileUpdate, responses((status = OK), (status = BAD_REQUEST)))]
async fn update_profile(
    Caller(user_id): Caller,
    State(db): State<Database>,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<profile::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Patch, Object::Profile]);

    Ok(Json(db.upsert_profile(user_id, update.into()).await?))
}

/// Sets the caller's date, time and place of birth
#[route(put, path = "/profile/birth-details", request_body = BirthDetailsInput, responses((status = OK), (status = BAD_REQUEST)))]
async fn update_birth_details(
    Caller(user_id): Caller,
    State(db): State<Database>,
    Json(details): Json<BirthDetailsInput>,
) -> Result<Json<profile::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Put, Object::Profile]);

    Ok(Json(db.upsert_birth_details(user_id, details.into()).await?))
}

/// Lists the caller's permanent, current and work addresses
#[route(get, path = "/profile/address", responses((status = OK)))]
async fn list_addresses(
    Caller(user_id): Caller,
    State(db): State<Database>,
) -> Result<Json<Vec<address::Model>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Address]);

    Ok(Json(db.list_addresses(user_id).await?))
}

/// The caller's address for one tag, if saved
#[route(get, path = "/profile/address/{tag}", responses((status = OK), (status = BAD_REQUEST), (status = NOT_FOUND)))]
async fn get_address(
    Caller(user_id): Caller,
    Path(tag): Path<String>,
    State(db): State<Database>,
) -> Result<Json<address::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Address]);

    let found = db.get_address(user_id, &tag).await?.ok_or(ApiError::NotFound)?;

    Ok(Json(found))
}

/// Saves the caller's address for a tag
#[route(put, path = "/profile/address/{tag}", request_body = AddressBody, responses((status = OK), (status = BAD_REQUEST)))]
async fn upsert_address(
    Caller(user_id): Caller,
    Path(tag): Path<String>,
    State(db): State<Database>,
    Json(body): Json<AddressBody>,
) -> Result<Json<address::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Put, Object::Address]);

    Ok(Json(db.upsert_address(user_id, &tag, body.into()).await?))
}

/// Replaces the caller's alternate phones
#[route(put, path = "/profile/phones", request_body = PhonesInput, responses((status = OK), (status = CONFLICT)))]
async fn replace_phones(
    Caller(user_id): Caller,
    State(db): State<Database>,
    Json(phones): Json<PhonesInput>,
) -> Result<Json<Vec<phone_alternate::Model>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Put, Object::Profile]);

    let saved = db
        .replace_phones(user_id, phones.primary, phones.alternates)
        .await?;

    Ok(Json(saved))
}

/// Overwrites the caller's main education entry
#[route(put, path = "/profile/education", request_body = EducationBody, responses((status = OK)))]
async fn upsert_education(
    Caller(user_id): Caller,
    State(db): State<Database>,
    Json(body): Json<EducationBody>,
) -> Result<Json<education::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Put, Object::Education]);

    Ok(Json(db.upsert_education(user_id, body.into()).await?))
}

/// Adds another education entry
#[route(post, path = "/profile/education", request_body = EducationBody, responses((status = CREATED)))]
async fn add_education(
    Caller(user_id): Caller,
    State(db): State<Database>,
    Json(body): Json<EducationBody>,
) -> Result<(StatusCode, Json<education::Model>), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::Education]);

    let saved = db.add_education(user_id, body.into()).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Sets only the university of the main education entry
#[route(patch, path = "/profile/education/university", request_body = UniversityInput, responses((status = OK)))]
async fn update_university(
    Caller(user_id): Caller,
    State(db): State<Database>,
    Json(body): Json<UniversityInput>,
) -> Result<Json<education::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Patch, Object::Education]);

    Ok(Json(db.update_university(user_id, &body.university).await?))
}

#[route(delete, path = "/profile/education/{id}", responses((status = NO_CONTENT), (status = FORBIDDEN), (status = NOT_FOUND)))]
async fn delete_education(
    Caller(user_id): Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
) -> Result<StatusCode, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Delete, Object::Education]);

    db.delete_education(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Updates the caller's professional details, ignoring blank values
#[route(patch, path = "/profile/professional", request_body = ProfessionalUpdate, responses((status = OK), (status = BAD_REQUEST)))]
async fn update_professional(
    Caller(user_id): Caller,
    State(db): State<Database>,
    Json(update): Json<ProfessionalUpdate>,
) -> Result<Json<professional::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Patch, Object::Professional]);

    Ok(Json(db.upsert_professional(user_id, update.into()).await?))
}

#[route(post, path = "/profile/language", request_body = LanguageBody, responses((status = CREATED), (status = BAD_REQUEST)))]
async fn add_language(
    Caller(user_id): Caller,
    State(db): State<Database>,
    Json(body): Json<LanguageBody>,
) -> Result<(StatusCode, Json<language::Model>), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::Language]);

    let saved = db.add_language(user_id, body.into()).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

#[route(put, path = "/profile/language/{id}", request_body = LanguageBody, responses((status = OK), (status = FORBIDDEN), (status = NOT_FOUND)))]
async fn update_language(
    Caller(user_id): Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
    Json(body): Json<LanguageBody>,
) -> Result<Json<language::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Put, Object::Language]);

    Ok(Json(db.update_language(user_id, id, body.into()).await?))
}

#[route(delete, path = "/profile/language/{id}", responses((status = NO_CONTENT), (status = FORBIDDEN), (status = NOT_FOUND)))]
async fn delete_language(
    Caller(user_id): Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
) -> Result<StatusCode, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Delete, Object::Language]);

    db.delete_language(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
