use axum::{
    Json,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, Query, State},
    http::{HeaderMap, StatusCode, header::CONTENT_TYPE},
};
use jodidar_database::profile_image::{self, MAX_IMAGE_BYTES, NewImage};
use utoipa::path as route;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

#[cfg(feature = "metrics")]
use crate::metrics::*;
use crate::middleware::Caller;
use crate::{ApiError, ApiState, Blobs, Database};

use super::{ImageDeleted, UploadParams};

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_images, upload_image))
        .routes(routes!(set_primary_image))
        .routes(routes!(delete_image))
        // let oversized uploads through so they are rejected with a reason
        .layer(DefaultBodyLimit::max(MAX_IMAGE_BYTES * 2))
}

#[route(get, path = "/images", responses((status = OK)))]
async fn list_images(
    Caller(user_id): Caller,
    State(db): State<Database>,
) -> Result<Json<Vec<profile_image::Model>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Image]);

    Ok(Json(db.list_images(user_id).await?))
}

/// Uploads a jpg or png of at most 2 MiB as the raw request body
#[route(
    post,
    path = "/images",
    params(UploadParams),
    request_body(content = String, content_type = "application/octet-stream", description = "image bytes"),
    responses((status = CREATED), (status = BAD_REQUEST), (status = CONFLICT), (status = BAD_GATEWAY))
)]
async fn upload_image(
    Caller(user_id): Caller,
    State(db): State<Database>,
    State(blobs): State<Blobs>,
    Query(params): Query<UploadParams>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<profile_image::Model>), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::Image]);

    let content_type = headers
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("application/octet-stream")
        .to_string();
    let image = NewImage {
        file_name: params.file_name,
        content_type,
        bytes: body,
        is_primary: params.is_primary,
    };

    let saved = db.upload_image(user_id, image, blobs.as_ref()).await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

#[route(put, path = "/images/{id}/primary", responses((status = OK), (status = FORBIDDEN), (status = NOT_FOUND)))]
async fn set_primary_image(
    Caller(user_id): Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
) -> Result<Json<profile_image::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Put, Object::Image]);

    Ok(Json(db.set_primary_image(user_id, id).await?))
}

#[route(delete, path = "/images/{id}", responses((status = OK, body = ImageDeleted), (status = FORBIDDEN), (status = NOT_FOUND)))]
async fn delete_image(
    Caller(user_id): Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
    State(blobs): State<Blobs>,
) -> Result<Json<ImageDeleted>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Delete, Object::Image]);

    let blob_removed = db.delete_image(user_id, id, blobs.as_ref()).await?;

    Ok(Json(ImageDeleted { blob_removed }))
}
