use std::str::FromStr;

use axum::extract::FromRequestParts;
use axum::http::{Request, request::Parts};
use uuid::Uuid;

use crate::ApiError;

pub const CALLER_HEADER: &str = "x-user-id";

pub fn create_correlation_id<T>(req: &Request<T>) -> Uuid {
    match req.headers().get("x-correlation-id") {
        Some(header_value) => {
            Uuid::from_str(header_value.to_str().unwrap_or_default()).unwrap_or_default()
        }
        None => Uuid::new_v4(),
    }
}

/// The member on whose behalf a request is made. Authentication happens in front
/// of this service, which forwards the resolved user id in `x-user-id`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Uuid);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .headers
            .get(CALLER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::from_str(value.trim()).ok())
            .map(Caller)
            .ok_or(ApiError::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use axum::{Router, body::Body, http::StatusCode, routing::get};
    use tower::ServiceExt;

    use super::*;

    async fn whoami(Caller(id): Caller) -> String {
        id.to_string()
    }

    fn app() -> Router {
        Router::new().route("/whoami", get(whoami))
    }

    #[tokio::test]
    async fn caller_is_read_from_the_header() {
        let id = Uuid::new_v4();
        let request = Request::get("/whoami")
            .header(CALLER_HEADER, id.to_string())
            .body(Body::empty())
            .unwrap();

        let response = app().oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn requests_without_a_valid_caller_are_unauthorized() {
        for header in [None, Some("not-a-uuid")] {
            let mut request = Request::get("/whoami");
            if let Some(value) = header {
                request = request.header(CALLER_HEADER, value);
            }

            let response = app()
                .oneshot(request.body(Body::empty()).unwrap())
                .await
                .unwrap();

            assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        }
    }

    #[test]
    fn correlation_id_is_taken_from_the_request() {
        let id = Uuid::new_v4();
        let request = Request::get("/")
            .header("x-correlation-id", id.to_string())
            .body(())
            .unwrap();

        assert_eq!(create_correlation_id(&request), id);
    }
}
