use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa::path as route;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

#[cfg(feature = "metrics")]
use crate::metrics::*;
use crate::middleware::Caller;
use crate::{ApiError, ApiState, Database};

use super::{NewUser, UpdateUser, User};

// the routes!() macro only supports one route per METHOD,
// merge another routes!() for a second route of the same method
pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_users, create_user))
        .routes(routes!(get_user, update_user, delete_user))
}

fn require_self(caller: Caller, id: Uuid) -> Result<(), ApiError> {
    if caller.0 == id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}

/// Lists every registered member
#[route(get, path = "/user", responses((status = OK, body = Vec<User>)))]
async fn list_users(State(db): State<Database>) -> Result<Json<Vec<User>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::User]);

    let users = db.list_users().await?;

    Ok(Json(users.into_iter().map(User::from).collect()))
}

/// Gets a user by ID
#[route(get, path = "/user/{id}", responses((status = OK, body = User), (status = NOT_FOUND)))]
async fn get_user(Path(id): Path<Uuid>, State(db): State<Database>) -> Result<User, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::User]);

    let user = db.get_user_by_id(id).await?.ok_or(ApiError::NotFound)?;

    Ok(user.into())
}

/// Registers a user
#[route(post, path = "/user", responses((status = CREATED, body = User), (status = BAD_REQUEST)))]
async fn create_user(
    State(db): State<Database>,
    Json(new_user): Json<NewUser>,
) -> Result<(StatusCode, User), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::User]);

    let user = db.create_user(new_user.into()).await?;

    Ok((StatusCode::CREATED, user.into()))
}

/// Updates the caller's own account
#[route(patch, path = "/user/{id}", responses((status = OK, body = User), (status = BAD_REQUEST), (status = FORBIDDEN), (status = NOT_FOUND)))]
async fn update_user(
    caller: Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
    Json(update_user): Json<UpdateUser>,
) -> Result<User, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Patch, Object::User]);

    require_self(caller, id)?;
    let user = db.update_user(id, update_user.into()).await?;

    Ok(user.into())
}

/// Deletes the caller's own account and everything it owns
#[route(delete, path = "/user/{id}", responses((status = NO_CONTENT), (status = NOT_FOUND), (status = FORBIDDEN)))]
async fn delete_user(
    caller: Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
) -> Result<StatusCode, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Delete, Object::User]);

    require_self(caller, id)?;
    db.delete_user(id).await?;

    Ok(StatusCode::NO_CONTENT)
}
