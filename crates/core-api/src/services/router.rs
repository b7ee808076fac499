use utoipa_axum::router::OpenApiRouter;

use crate::ApiState;

use super::{family, geo, image, profile, search, user};

pub fn router() -> OpenApiRouter<ApiState> {
    OpenApiRouter::new()
        .merge(user::router())
        .merge(profile::router())
        .merge(family::router())
        .merge(image::router())
        .merge(search::router())
        .merge(geo::router())
}
