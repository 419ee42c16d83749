//! Path parameter extractor that reports malformed ids as JSON errors.

use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

/// Typed path parameters, usually one or more `Uuid`s.
///
/// Behaves like [`Path`] but rejects with [`AppError::PathRejection`], so a
/// malformed id yields a 400 JSON body instead of axum's plain-text one.
///
/// # Example
/// ```ignore
/// async fn show(IdsPath(id): IdsPath<Uuid>) -> String { id.to_string() }
///
/// async fn show_answer(IdsPath((id, answer_id)): IdsPath<(Uuid, Uuid)>) -> String {
///     format!("{id}/{answer_id}")
/// }
///
/// Router::new()
///     .route("/questions/{id}", get(show))
///     .route("/questions/{id}/answers/{answer_id}", get(show_answer));
/// ```
pub struct IdsPath<T>(pub T);

impl<T, S> FromRequestParts<S> for IdsPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(value) = Path::<T>::from_request_parts(parts, state).await?;
        Ok(IdsPath(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, body::Body, http::Request, http::StatusCode, routing::get};
    use tower::ServiceExt;
    use uuid::Uuid;

    async fn show_pair(IdsPath((a, b)): IdsPath<(Uuid, Uuid)>) -> String {
        format!("{a}|{b}")
    }

    fn app() -> Router {
        Router::new().route("/q/{id}/a/{answer_id}", get(show_pair))
    }

    #[tokio::test]
    async fn test_ids_path_parses_tuple() {
        let (a, b) = (Uuid::now_v7(), Uuid::now_v7());
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(format!("/q/{a}/a/{b}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_ids_path_rejects_malformed_uuid_as_json() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri(format!("/q/not-a-uuid/a/{}", Uuid::now_v7()))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "application/json"
        );
    }
}
