use chrono::{DateTime, Utc};
use jodidar_database::user;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

// Mirrors of the database models. They are kept separate so the API shape can
// change independently of the schema.

#[derive(Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    /// Credential hash produced by the auth layer, stored as is.
    pub password_hash: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UpdateUser {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
}

impl From<user::Model> for User {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            phone: user.phone,
            created_at: user.created_at,
        }
    }
}

impl From<NewUser> for user::NewModel {
    fn from(val: NewUser) -> Self {
        Self {
            username: val.username,
            email: val.email,
            first_name: val.first_name,
            last_name: val.last_name,
            phone: val.phone,
            password_hash: val.password_hash,
        }
    }
}

impl From<UpdateUser> for user::UpdateModel {
    fn from(val: UpdateUser) -> Self {
        Self {
            email: val.email,
            first_name: val.first_name,
            last_name: val.last_name,
            phone: val.phone,
        }
    }
}

impl axum::response::IntoResponse for User {
    fn into_response(self) -> axum::response::Response {
        axum::response::Json(self).into_response()
    }
}
