//! Read-only projections of store state for display.

use crate::conversation::Conversation;
use crate::notifications::{Notification, NotificationType};
use crate::store::EntityStore;
use crate::ConversationId;

/// Conversations, most recently updated first. Ties keep insertion order.
pub fn conversations_by_recent(store: &EntityStore) -> Vec<&Conversation> {
    let mut conversations: Vec<&Conversation> = store.conversations().iter().collect();
    conversations.sort_by(|a, b| b.updated_at_ms.cmp(&a.updated_at_ms));
    conversations
}

/// Unread messages across every conversation.
pub fn total_unread_messages(store: &EntityStore) -> u32 {
    store.conversations().iter().map(|c| c.unread_count).sum()
}

pub fn unread_conversations(store: &EntityStore) -> Vec<&Conversation> {
    store
        .conversations()
        .iter()
        .filter(|c| c.unread_count > 0)
        .collect()
}

pub fn unread_notifications(store: &EntityStore) -> Vec<&Notification> {
    store.notifications().iter().filter(|n| !n.read).collect()
}

pub fn notifications_of_type(store: &EntityStore, kind: NotificationType) -> Vec<&Notification> {
    store
        .notifications()
        .iter()
        .filter(|n| n.kind == kind)
        .collect()
}

/// Case-insensitive match on participant name or affiliation, or on the text of the
/// last message. An empty query matches everything.
pub fn search_conversations<'a>(store: &'a EntityStore, query: &str) -> Vec<&'a Conversation> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return conversations_by_recent(store);
    }

    conversations_by_recent(store)
        .into_iter()
        .filter(|c| {
            let participant_hit = store
                .participants_of(&c.id)
                .map(|participants| {
                    participants.iter().any(|p| {
                        p.name.to_lowercase().contains(&needle)
                            || p.affiliation.to_lowercase().contains(&needle)
                    })
                })
                .unwrap_or(false);
            let message_hit = c
                .last_message
                .as_ref()
                .map(|m| m.content.preview().to_lowercase().contains(&needle))
                .unwrap_or(false);
            participant_hit || message_hit
        })
        .collect()
}

/// Conversations currently flagged as typing, sorted by id.
pub fn typing_conversations(store: &EntityStore) -> Vec<&ConversationId> {
    let mut ids: Vec<&ConversationId> = store.typing().collect();
    ids.sort();
    ids
}
