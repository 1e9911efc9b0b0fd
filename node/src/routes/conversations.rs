use super::ApiResult;
use crate::state::AppState;
use crate::store::{ConversationSnapshot, InboxSummary};
use axum::{
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
    Json, Router,
};
use chamberconnect_messaging::{ConversationId, Message, MessageContent, Mutation, MutationOutcome, UserId};
use http::StatusCode;
use serde::Deserialize;
use std::sync::Arc;
use tracing::debug;

#[derive(Debug, Default, Deserialize)]
pub struct ListParams {
    pub q: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartConversationPayload {
    pub participant_ids: Vec<UserId>,
}

/// Plain strings are text messages; objects carry a typed payload.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum ContentPayload {
    Text(String),
    Typed(MessageContent),
}

impl From<ContentPayload> for MessageContent {
    fn from(payload: ContentPayload) -> Self {
        match payload {
            ContentPayload::Text(text) => MessageContent::text(text),
            ContentPayload::Typed(content) => content,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMessagePayload {
    pub content: ContentPayload,
    /// Defaults to the local user.
    pub sender_id: Option<UserId>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypingPayload {
    pub is_typing: bool,
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/conversations", get(list).post(start))
        .route("/conversations/:id", delete(remove))
        .route("/conversations/:id/messages", get(messages).post(send))
        .route("/conversations/:id/read", post(mark_read))
        .route("/conversations/:id/typing", put(typing))
        .route("/summary", get(summary))
}

async fn list(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> ApiResult<Json<Vec<ConversationSnapshot>>> {
    let conversations = match params.q {
        Some(query) => state.store().search_conversations(query).await?,
        None => state.store().conversations().await?,
    };
    Ok(Json(conversations))
}

async fn start(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<StartConversationPayload>,
) -> ApiResult<(StatusCode, Json<MutationOutcome>)> {
    let outcome = state
        .submit(Mutation::StartConversation {
            participant_ids: payload.participant_ids,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn remove(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    state
        .submit(Mutation::RemoveConversation {
            conversation_id: ConversationId::from(id),
        })
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn messages(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<Message>>> {
    Ok(Json(state.store().messages(ConversationId::from(id)).await?))
}

async fn send(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<SendMessagePayload>,
) -> ApiResult<(StatusCode, Json<MutationOutcome>)> {
    let sender_id = payload
        .sender_id
        .unwrap_or_else(|| state.store().local_user().clone());
    debug!(conversation_id = %id, %sender_id, "send message request");
    let outcome = state
        .submit(Mutation::SendMessage {
            conversation_id: ConversationId::from(id),
            content: payload.content.into(),
            sender_id,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

async fn mark_read(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<MutationOutcome>> {
    let outcome = state
        .submit(Mutation::MarkConversationRead {
            conversation_id: ConversationId::from(id),
        })
        .await?;
    Ok(Json(outcome))
}

async fn typing(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(payload): Json<TypingPayload>,
) -> ApiResult<StatusCode> {
    // typing is ephemeral UI state; skip the simulated round-trip
    state
        .store()
        .set_typing(ConversationId::from(id), payload.is_typing)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn summary(State(state): State<Arc<AppState>>) -> ApiResult<Json<InboxSummary>> {
    Ok(Json(state.store().summary().await?))
}
