use super::ApiResult;
use crate::state::AppState;
use crate::store::NotificationsSnapshot;
use axum::{
    extract::{Path, State},
    routing::{delete, get, post},
    Json, Router,
};
use chamberconnect_messaging::{Mutation, MutationOutcome, NewNotification, NotificationId};
use http::StatusCode;
use std::sync::Arc;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/notifications", get(list).post(add).delete(clear))
        .route("/notifications/read-all", post(mark_all_read))
        .route("/notifications/:id", delete(remove))
        .route("/notifications/:id/read", post(mark_read))
}

async fn list(State(state): State<Arc<AppState>>) -> ApiResult<Json<NotificationsSnapshot>> {
    Ok(Json(state.store().notifications().await?))
}

async fn add(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<NewNotification>,
) -> ApiResult<(StatusCode, Json<MutationOutcome>)> {
    let outcome = state.submit(Mutation::AddNotification(payload)).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationOutcome>> {
    let outcome = state
        .submit(Mutation::MarkNotificationRead {
            notification_id: NotificationId::from(id),
        })
        .await?;
    Ok(Json(outcome))
}

async fn mark_all_read(State(state): State<Arc<AppState>>) -> ApiResult<Json<MutationOutcome>> {
    Ok(Json(state.submit(Mutation::MarkAllNotificationsRead).await?))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationOutcome>> {
    let outcome = state
        .submit(Mutation::RemoveNotification {
            notification_id: NotificationId::from(id),
        })
        .await?;
    Ok(Json(outcome))
}

async fn clear(State(state): State<Arc<AppState>>) -> ApiResult<Json<MutationOutcome>> {
    Ok(Json(state.submit(Mutation::ClearNotifications).await?))
}
