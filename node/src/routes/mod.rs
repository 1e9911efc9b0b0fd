pub mod conversations;
pub mod health;
pub mod notifications;
pub mod participants;

use crate::state::AppState;
use crate::store::StoreError;
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use http::StatusCode;
use serde::Serialize;
use std::sync::Arc;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(conversations::routes())
        .merge(notifications::routes())
        .merge(participants::routes())
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

/// Maps store failures onto HTTP responses.
#[derive(Debug)]
pub struct ApiError(pub StoreError);

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        Self(err)
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match &self.0 {
            StoreError::Messaging(err) if err.is_not_found() => StatusCode::NOT_FOUND,
            StoreError::Messaging(_) => StatusCode::UNPROCESSABLE_ENTITY,
            StoreError::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
            StoreError::Cancelled => StatusCode::REQUEST_TIMEOUT,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;


#[cfg(test)]
mod tests {
    use super::test_support::{app_with_state, call};
    use super::*;
    use chamberconnect_messaging::MessagingError;
    use http::Method;

    #[test]
    fn test_store_errors_map_to_statuses() {
        let cases = [
            (
                StoreError::Messaging(MessagingError::ConversationNotFound("x".into())),
                StatusCode::NOT_FOUND,
            ),
            (
                StoreError::Messaging(MessagingError::InvalidInput("empty".into())),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (StoreError::Unavailable, StatusCode::SERVICE_UNAVAILABLE),
            (StoreError::Cancelled, StatusCode::REQUEST_TIMEOUT),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError(err).into_response().status(), expected);
        }
    }

    #[tokio::test]
    async fn test_stopped_store_reports_unavailable() {
        let (app, state) = app_with_state();
        state.store().shutdown().await.unwrap();

        let (status, body) = call(&app, Method::GET, "/summary", None).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert!(body["error"].is_string());
    }
}
