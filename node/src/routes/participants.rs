use super::ApiResult;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{post, put},
    Json, Router,
};
use chamberconnect_messaging::{Mutation, MutationOutcome, Participant, PresenceStatus, UserId};
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct StatusPayload {
    pub status: PresenceStatus,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/participants", post(register))
        .route("/participants/:id/status", put(update_status))
}

async fn register(
    State(state): State<Arc<AppState>>,
    Json(participant): Json<Participant>,
) -> ApiResult<(StatusCode, Json<MutationOutcome>)> {
    let outcome = state.submit(Mutation::RegisterParticipant(participant)).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn update_status(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<StatusPayload>,
) -> ApiResult<Json<MutationOutcome>> {
    let outcome = state
        .submit(Mutation::UpdateParticipantStatus {
            user_id: UserId::from(id),
            status: payload.status,
        })
        .await?;
    Ok(Json(outcome))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, call};
    use http::{Method, StatusCode};
    use serde_json::json;

    #[tokio::test]
    async fn test_status_change_shows_in_conversation_list() {
        let app = app();
        let (status, _) = call(
            &app,
            Method::PUT,
            "/participants/user-2/status",
            Some(json!({ "status": "online" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);

        let (_, list) = call(&app, Method::GET, "/conversations", None).await;
        let chen = list
            .as_array()
            .unwrap()
            .iter()
            .flat_map(|c| c["participants"].as_array().unwrap().iter())
            .find(|p| p["id"] == "user-2")
            .unwrap();
        assert_eq!(chen["status"], "online");
    }

    #[tokio::test]
    async fn test_register_then_start_conversation() {
        let app = app();
        let (status, _) = call(
            &app,
            Method::POST,
            "/participants",
            Some(json!({
                "id": "user-9",
                "name": "Priya Patel",
                "affiliation": "Patel Dental",
                "status": "away"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(
            &app,
            Method::POST,
            "/conversations",
            Some(json!({ "participantIds": ["current-user", "user-9"] })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, _) = call(
            &app,
            Method::PUT,
            "/participants/ghost/status",
            Some(json!({ "status": "offline" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
