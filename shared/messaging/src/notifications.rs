//! Notification models.

use serde::{Deserialize, Serialize};

use crate::{now_ms, MessagingError, NotificationId, Result, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationType {
    Message,
    Event,
    Member,
    System,
}

/// The member whose action produced a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationActor {
    pub id: UserId,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: NotificationId,
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    pub timestamp_ms: i64,
    pub read: bool,
    /// Opaque deep link. Carries no lifecycle coupling to the entity it names.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub actor: Option<NotificationActor>,
}

/// Payload for creating a notification. Id, timestamp and read state are assigned
/// by the store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewNotification {
    #[serde(rename = "type")]
    pub kind: NotificationType,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub action_url: Option<String>,
    #[serde(default)]
    pub actor: Option<NotificationActor>,
}

impl NewNotification {
    pub fn new(kind: NotificationType, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            message: message.into(),
            action_url: None,
            actor: None,
        }
    }

    pub fn with_action_url(mut self, url: impl Into<String>) -> Self {
        self.action_url = Some(url.into());
        self
    }

    pub fn with_actor(mut self, actor: NotificationActor) -> Self {
        self.actor = Some(actor);
        self
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(MessagingError::InvalidInput(
                "notification title must not be empty".into(),
            ));
        }
        Ok(())
    }

    pub(crate) fn into_notification(self) -> Notification {
        Notification {
            id: NotificationId::new(),
            kind: self.kind,
            title: self.title,
            message: self.message,
            timestamp_ms: now_ms(),
            read: false,
            action_url: self.action_url,
            actor: self.actor,
        }
    }
}
