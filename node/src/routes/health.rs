use crate::state::AppState;
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    status: &'static str,
    build_id: String,
    local_user: String,
    simulated_latency_ms: u64,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health_check))
}

async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        build_id: state.build_id().to_string(),
        local_user: state.store().local_user().to_string(),
        simulated_latency_ms: state.config().simulated_latency.as_millis() as u64,
    })
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{app, call};
    use http::{Method, StatusCode};

    #[tokio::test]
    async fn test_health_reports_identity() {
        let app = app();
        let (status, body) = call(&app, Method::GET, "/health", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["localUser"], "current-user");
    }
}
