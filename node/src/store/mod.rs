//! Store runtime: one task owns the entity store and serves commands in call order.

mod pending;
mod runtime;

pub use pending::{PendingOperation, PendingOutcome};
pub use runtime::StoreHandle;

use chamberconnect_messaging::{Conversation, MessagingError, MutationOutcome, Participant};
use serde::Serialize;

/// Errors that can occur when talking to the store runtime.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error(transparent)]
    Messaging(#[from] MessagingError),
    #[error("store runtime is not running")]
    Unavailable,
    #[error("operation cancelled")]
    Cancelled,
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Broadcast after every successfully applied mutation. `sequence` increases by one
/// per mutation, in application order.
#[derive(Debug, Clone, Serialize)]
pub struct StoreEvent {
    pub sequence: u64,
    pub outcome: MutationOutcome,
}

/// Conversation with its participants resolved, as handed to list screens.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSnapshot {
    #[serde(flatten)]
    pub conversation: Conversation,
    pub participants: Vec<Participant>,
    pub is_typing: bool,
    pub last_activity: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationsSnapshot {
    pub unread_count: u32,
    pub notifications: Vec<chamberconnect_messaging::Notification>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InboxSummary {
    pub unread_messages: u32,
    pub unread_notifications: u32,
    pub conversations: usize,
}
