use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use jodidar_database::family::{FamilyTree, Sibling, member, relation};
use utoipa::path as route;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

#[cfg(feature = "metrics")]
use crate::metrics::*;
use crate::middleware::Caller;
use crate::{ApiError, ApiState, Database};

use super::{MemberBody, RelationBody, RelationCategoryOut, SiblingsCleared};

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .routes(routes!(list_relations))
        .routes(routes!(list_relation_types))
        .routes(routes!(list_members, add_member))
        .routes(routes!(update_member, delete_member))
        .routes(routes!(add_relation))
        .routes(routes!(set_no_sibling))
}

/// The caller's family, one slot per relation type grouped by category
#[route(get, path = "/family", responses((status = OK, description = "category -> relation type -> member or null")))]
async fn list_relations(
    Caller(owner): Caller,
    State(db): State<Database>,
) -> Result<Json<FamilyTree>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Family]);

    Ok(Json(db.list_relations(owner).await?))
}

#[route(get, path = "/family/relation-types", responses((status = OK, body = Vec<RelationCategoryOut>)))]
async fn list_relation_types(
    State(db): State<Database>,
) -> Result<Json<Vec<RelationCategoryOut>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Family]);

    let taxonomy = db
        .list_relation_types()
        .await?
        .into_iter()
        .map(|(category, types)| RelationCategoryOut {
            name: category.name,
            description: category.description,
            relation_types: types.into_iter().map(|t| t.name).collect(),
        })
        .collect();

    Ok(Json(taxonomy))
}

#[route(get, path = "/family/member", responses((status = OK)))]
async fn list_members(
    Caller(owner): Caller,
    State(db): State<Database>,
) -> Result<Json<Vec<member::Model>>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Get, Object::Family]);

    Ok(Json(db.list_family_members(owner).await?))
}

/// Adds a family member with its address, linked from the caller
#[route(post, path = "/family/member", request_body = MemberBody, responses((status = CREATED), (status = BAD_REQUEST)))]
async fn add_member(
    Caller(owner): Caller,
    State(db): State<Database>,
    Json(body): Json<MemberBody>,
) -> Result<(StatusCode, Json<member::Model>), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::Family]);

    let input = body.member_input();
    let saved = db
        .add_or_update_member(owner, None, input, &body.relation_type, body.address.into())
        .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Edits a family member and its address in place
#[route(put, path = "/family/member/{id}", request_body = MemberBody, responses((status = OK), (status = BAD_REQUEST), (status = FORBIDDEN), (status = NOT_FOUND)))]
async fn update_member(
    Caller(owner): Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
    Json(body): Json<MemberBody>,
) -> Result<Json<member::Model>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Put, Object::Family]);

    let input = body.member_input();
    let saved = db
        .add_or_update_member(owner, Some(id), input, &body.relation_type, body.address.into())
        .await?;

    Ok(Json(saved))
}

/// Removes a family member and every relation touching it
#[route(delete, path = "/family/member/{id}", responses((status = NO_CONTENT), (status = FORBIDDEN), (status = NOT_FOUND)))]
async fn delete_member(
    Caller(owner): Caller,
    Path(id): Path<Uuid>,
    State(db): State<Database>,
) -> Result<StatusCode, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Delete, Object::Family]);

    db.delete_member(id, owner).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// Links two of the caller's family members
#[route(post, path = "/family/relation", request_body = RelationBody, responses((status = CREATED), (status = BAD_REQUEST), (status = FORBIDDEN)))]
async fn add_relation(
    Caller(owner): Caller,
    State(db): State<Database>,
    Json(body): Json<RelationBody>,
) -> Result<(StatusCode, Json<relation::Model>), ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Post, Object::Family]);

    let saved = db
        .add_relation(owner, body.person_id, body.related_person_id, &body.relation_type)
        .await?;

    Ok((StatusCode::CREATED, Json(saved)))
}

/// Declares the caller has no brother or no sister, dropping those relations
#[route(put, path = "/family/no-sibling/{which}", params(("which" = String, Path, description = "brother or sister")), responses((status = OK, body = SiblingsCleared), (status = BAD_REQUEST)))]
async fn set_no_sibling(
    Caller(owner): Caller,
    Path(which): Path<String>,
    State(db): State<Database>,
) -> Result<Json<SiblingsCleared>, ApiError> {
    #[cfg(feature = "metrics")]
    inc!(REQUEST_COUNT for [Method::Put, Object::Family]);

    let sibling = match which.to_ascii_lowercase().as_str() {
        "brother" => Sibling::Brother,
        "sister" => Sibling::Sister,
        _ => return Err(ApiError::BadRequest(format!("expected brother or sister, got {which:?}"))),
    };
    let removed_relations = db.set_no_sibling(owner, sibling).await?;

    Ok(Json(SiblingsCleared { removed_relations }))
}
