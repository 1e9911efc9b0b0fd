//! Entity store: the single owner of conversation, message, notification and
//! participant state.
//!
//! All changes go through the mutation methods (or [`EntityStore::apply`]). Unread
//! counters are re-derived from read flags after every mutation, so the stored
//! values always match a recomputation.

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::conversation::{Conversation, Message, MessageContent, Participant, PresenceStatus};
use crate::notifications::{NewNotification, Notification};
use crate::seed::Seed;
use crate::{ConversationId, MessagingError, NotificationId, Result, UserId};

/// A state transition, in reducer form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Mutation {
    #[serde(rename_all = "camelCase")]
    SendMessage {
        conversation_id: ConversationId,
        content: MessageContent,
        sender_id: UserId,
    },
    #[serde(rename_all = "camelCase")]
    StartConversation { participant_ids: Vec<UserId> },
    #[serde(rename_all = "camelCase")]
    RemoveConversation { conversation_id: ConversationId },
    #[serde(rename_all = "camelCase")]
    MarkConversationRead { conversation_id: ConversationId },
    AddNotification(NewNotification),
    #[serde(rename_all = "camelCase")]
    MarkNotificationRead { notification_id: NotificationId },
    MarkAllNotificationsRead,
    #[serde(rename_all = "camelCase")]
    RemoveNotification { notification_id: NotificationId },
    ClearNotifications,
    #[serde(rename_all = "camelCase")]
    SetTyping {
        conversation_id: ConversationId,
        is_typing: bool,
    },
    RegisterParticipant(Participant),
    #[serde(rename_all = "camelCase")]
    UpdateParticipantStatus {
        user_id: UserId,
        status: PresenceStatus,
    },
}

/// Result of a successfully applied [`Mutation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum MutationOutcome {
    MessageSent(Message),
    ConversationStarted(Conversation),
    #[serde(rename_all = "camelCase")]
    ConversationRemoved { conversation_id: ConversationId },
    #[serde(rename_all = "camelCase")]
    ConversationRead {
        conversation_id: ConversationId,
        marked: usize,
    },
    NotificationAdded(Notification),
    #[serde(rename_all = "camelCase")]
    NotificationRead { notification_id: NotificationId },
    AllNotificationsRead { marked: usize },
    NotificationRemoved(Notification),
    NotificationsCleared { removed: usize },
    #[serde(rename_all = "camelCase")]
    TypingChanged {
        conversation_id: ConversationId,
        is_typing: bool,
    },
    ParticipantRegistered(Participant),
    #[serde(rename_all = "camelCase")]
    ParticipantStatusChanged {
        user_id: UserId,
        status: PresenceStatus,
    },
}

#[derive(Debug, Clone)]
pub struct EntityStore {
    local_user: UserId,
    /// Insertion order.
    conversations: Vec<Conversation>,
    /// Send order within each conversation.
    messages: HashMap<ConversationId, Vec<Message>>,
    /// Most recent first.
    notifications: Vec<Notification>,
    participants: HashMap<UserId, Participant>,
    typing: HashSet<ConversationId>,
    unread_count: u32,
}

impl EntityStore {
    /// Creates an empty store viewed from `local_user`'s perspective.
    pub fn new(local_user: impl Into<UserId>) -> Self {
        Self {
            local_user: local_user.into(),
            conversations: Vec::new(),
            messages: HashMap::new(),
            notifications: Vec::new(),
            participants: HashMap::new(),
            typing: HashSet::new(),
            unread_count: 0,
        }
    }

    /// Creates a store and loads `seed` into it.
    pub fn with_seed(local_user: impl Into<UserId>, seed: Seed) -> Result<Self> {
        let mut store = Self::new(local_user);
        store.initialize(seed)?;
        Ok(store)
    }

    /// Populates an empty store with an initial snapshot. This is a start-up step,
    /// not a reset: a store that already holds state rejects it.
    pub fn initialize(&mut self, seed: Seed) -> Result<()> {
        if !self.is_empty() {
            return Err(MessagingError::InvalidInput(
                "store is already initialized".into(),
            ));
        }

        let known: HashSet<&UserId> = seed.participants.iter().map(|p| &p.id).collect();
        let mut seen = HashSet::new();
        for entry in &seed.conversations {
            if let Some(unknown) = entry
                .conversation
                .participant_ids
                .iter()
                .find(|id| !known.contains(id))
            {
                return Err(MessagingError::InvalidInput(format!(
                    "conversation {} references unknown participant {}",
                    entry.conversation.id, unknown
                )));
            }
            if !seen.insert(entry.conversation.id.clone()) {
                return Err(MessagingError::InvalidInput(format!(
                    "duplicate conversation id in seed: {}",
                    entry.conversation.id
                )));
            }
            if let Some(stray) = entry
                .messages
                .iter()
                .find(|m| m.conversation_id != entry.conversation.id)
            {
                return Err(MessagingError::InvalidInput(format!(
                    "message {} does not belong to conversation {}",
                    stray.id, entry.conversation.id
                )));
            }
        }

        self.participants = seed
            .participants
            .into_iter()
            .map(|p| (p.id.clone(), p))
            .collect();

        for entry in seed.conversations {
            let id = entry.conversation.id.clone();
            let mut messages = entry.messages;
            messages.sort_by_key(|m| m.timestamp_ms);
            self.messages.insert(id.clone(), messages);
            self.conversations.push(entry.conversation);
            self.refresh_conversation(&id);
        }

        self.notifications = seed.notifications;
        self.notifications
            .sort_by(|a, b| b.timestamp_ms.cmp(&a.timestamp_ms));
        self.refresh_unread_count();

        debug!(
            conversations = self.conversations.len(),
            notifications = self.notifications.len(),
            participants = self.participants.len(),
            "entity store initialized"
        );
        Ok(())
    }

    pub fn local_user(&self) -> &UserId {
        &self.local_user
    }

    pub fn is_empty(&self) -> bool {
        self.conversations.is_empty()
            && self.notifications.is_empty()
            && self.participants.is_empty()
    }

    // ---- queries ----

    /// Conversations in insertion order. See [`crate::views::conversations_by_recent`]
    /// for presentation order.
    pub fn conversations(&self) -> &[Conversation] {
        &self.conversations
    }

    pub fn conversation(&self, id: &ConversationId) -> Option<&Conversation> {
        self.conversations.iter().find(|c| &c.id == id)
    }

    /// Messages of a conversation in send order.
    pub fn messages(&self, conversation_id: &ConversationId) -> Result<&[Message]> {
        self.messages
            .get(conversation_id)
            .map(Vec::as_slice)
            .ok_or_else(|| MessagingError::ConversationNotFound(conversation_id.clone()))
    }

    /// Notifications, most recent first.
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn notification(&self, id: &NotificationId) -> Option<&Notification> {
        self.notifications.iter().find(|n| &n.id == id)
    }

    /// Number of unread notifications.
    pub fn unread_count(&self) -> u32 {
        self.unread_count
    }

    pub fn participant(&self, user_id: &UserId) -> Option<&Participant> {
        self.participants.get(user_id)
    }

    pub fn participants(&self) -> impl Iterator<Item = &Participant> {
        self.participants.values()
    }

    /// Resolved participants of a conversation, in the conversation's order.
    /// Ids missing from the registry are skipped.
    pub fn participants_of(&self, conversation_id: &ConversationId) -> Result<Vec<&Participant>> {
        let conversation = self
            .conversation(conversation_id)
            .ok_or_else(|| MessagingError::ConversationNotFound(conversation_id.clone()))?;
        Ok(conversation
            .participant_ids
            .iter()
            .filter_map(|id| self.participants.get(id))
            .collect())
    }

    pub fn is_typing(&self, conversation_id: &ConversationId) -> bool {
        self.typing.contains(conversation_id)
    }

    /// Conversations whose other side is currently typing.
    pub fn typing(&self) -> impl Iterator<Item = &ConversationId> {
        self.typing.iter()
    }

    /// Checks every stored counter against a recomputation from read flags.
    pub fn is_consistent(&self) -> bool {
        let conversations_ok = self.conversations.iter().all(|c| {
            let expected = self
                .messages
                .get(&c.id)
                .map(|msgs| count_unread(msgs, &self.local_user))
                .unwrap_or(0);
            c.unread_count == expected
        });
        let expected_notifications =
            self.notifications.iter().filter(|n| !n.read).count() as u32;
        conversations_ok && self.unread_count == expected_notifications
    }

    // ---- mutations ----

    /// Applies a mutation in reducer form.
    pub fn apply(&mut self, mutation: Mutation) -> Result<MutationOutcome> {
        let outcome = match mutation {
            Mutation::SendMessage {
                conversation_id,
                content,
                sender_id,
            } => MutationOutcome::MessageSent(self.send_message(
                &conversation_id,
                content,
                sender_id,
            )?),
            Mutation::StartConversation { participant_ids } => {
                MutationOutcome::ConversationStarted(self.start_conversation(participant_ids)?)
            }
            Mutation::RemoveConversation { conversation_id } => {
                self.remove_conversation(&conversation_id)?;
                MutationOutcome::ConversationRemoved { conversation_id }
            }
            Mutation::MarkConversationRead { conversation_id } => {
                let marked = self.mark_conversation_as_read(&conversation_id)?;
                MutationOutcome::ConversationRead {
                    conversation_id,
                    marked,
                }
            }
            Mutation::AddNotification(payload) => {
                MutationOutcome::NotificationAdded(self.add_notification(payload)?)
            }
            Mutation::MarkNotificationRead { notification_id } => {
                self.mark_as_read(&notification_id)?;
                MutationOutcome::NotificationRead { notification_id }
            }
            Mutation::MarkAllNotificationsRead => MutationOutcome::AllNotificationsRead {
                marked: self.mark_all_as_read(),
            },
            Mutation::RemoveNotification { notification_id } => {
                MutationOutcome::NotificationRemoved(self.remove_notification(&notification_id)?)
            }
            Mutation::ClearNotifications => MutationOutcome::NotificationsCleared {
                removed: self.clear_notifications(),
            },
            Mutation::SetTyping {
                conversation_id,
                is_typing,
            } => {
                self.set_typing(&conversation_id, is_typing)?;
                MutationOutcome::TypingChanged {
                    conversation_id,
                    is_typing,
                }
            }
            Mutation::RegisterParticipant(participant) => {
                self.register_participant(participant.clone());
                MutationOutcome::ParticipantRegistered(participant)
            }
            Mutation::UpdateParticipantStatus { user_id, status } => {
                self.update_participant_status(&user_id, status)?;
                MutationOutcome::ParticipantStatusChanged { user_id, status }
            }
        };
        Ok(outcome)
    }

    /// Appends a message to an existing conversation. Messages from the local user
    /// are born read; everyone else's count as unread until the conversation is read.
    pub fn send_message(
        &mut self,
        conversation_id: &ConversationId,
        content: impl Into<MessageContent>,
        sender_id: impl Into<UserId>,
    ) -> Result<Message> {
        let content = content.into();
        let sender_id = sender_id.into();
        content.validate()?;
        let messages = self
            .messages
            .get_mut(conversation_id)
            .ok_or_else(|| MessagingError::ConversationNotFound(conversation_id.clone()))?;

        let read = sender_id == self.local_user;
        let message = Message::new(conversation_id.clone(), sender_id, content, read);
        messages.push(message.clone());
        self.refresh_conversation(conversation_id);
        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| &c.id == conversation_id)
        {
            conversation.updated_at_ms = message.timestamp_ms;
        }

        debug!(
            conversation_id = %conversation_id,
            message_id = %message.id,
            sender_id = %message.sender_id,
            "message sent"
        );
        Ok(message)
    }

    /// Opens an empty conversation between registered participants.
    pub fn start_conversation(&mut self, participant_ids: Vec<UserId>) -> Result<Conversation> {
        if participant_ids.is_empty() {
            return Err(MessagingError::InvalidInput(
                "a conversation needs at least one participant".into(),
            ));
        }
        if let Some(unknown) = participant_ids
            .iter()
            .find(|id| !self.participants.contains_key(id))
        {
            return Err(MessagingError::ParticipantNotFound(unknown.clone()));
        }

        let mut unique = Vec::with_capacity(participant_ids.len());
        for id in participant_ids {
            if !unique.contains(&id) {
                unique.push(id);
            }
        }

        let conversation = Conversation::new(ConversationId::new(), unique);
        self.messages.insert(conversation.id.clone(), Vec::new());
        self.conversations.push(conversation.clone());
        debug!(conversation_id = %conversation.id, "conversation started");
        Ok(conversation)
    }

    /// Drops a conversation together with its messages and typing flag. Notifications
    /// pointing at it are left alone.
    pub fn remove_conversation(&mut self, conversation_id: &ConversationId) -> Result<Conversation> {
        let pos = self
            .conversations
            .iter()
            .position(|c| &c.id == conversation_id)
            .ok_or_else(|| MessagingError::ConversationNotFound(conversation_id.clone()))?;
        let removed = self.conversations.remove(pos);
        self.messages.remove(conversation_id);
        self.typing.remove(conversation_id);
        debug!(conversation_id = %conversation_id, "conversation removed");
        Ok(removed)
    }

    /// Marks every message in the conversation read. Returns how many flags flipped.
    pub fn mark_conversation_as_read(&mut self, conversation_id: &ConversationId) -> Result<usize> {
        let messages = self
            .messages
            .get_mut(conversation_id)
            .ok_or_else(|| MessagingError::ConversationNotFound(conversation_id.clone()))?;

        let mut marked = 0;
        for message in messages.iter_mut().filter(|m| !m.read) {
            message.read = true;
            marked += 1;
        }
        self.refresh_conversation(conversation_id);

        debug!(conversation_id = %conversation_id, marked, "conversation marked read");
        Ok(marked)
    }

    /// Prepends a new unread notification.
    pub fn add_notification(&mut self, payload: NewNotification) -> Result<Notification> {
        payload.validate()?;
        let notification = payload.into_notification();
        self.notifications.insert(0, notification.clone());
        self.refresh_unread_count();
        debug!(notification_id = %notification.id, kind = ?notification.kind, "notification added");
        Ok(notification)
    }

    /// Marks one notification read. Already-read notifications are left as they are.
    pub fn mark_as_read(&mut self, notification_id: &NotificationId) -> Result<()> {
        let notification = self
            .notifications
            .iter_mut()
            .find(|n| &n.id == notification_id)
            .ok_or_else(|| MessagingError::NotificationNotFound(notification_id.clone()))?;
        notification.read = true;
        self.refresh_unread_count();
        Ok(())
    }

    /// Marks every notification read. Returns how many flags flipped.
    pub fn mark_all_as_read(&mut self) -> usize {
        let mut marked = 0;
        for notification in self.notifications.iter_mut().filter(|n| !n.read) {
            notification.read = true;
            marked += 1;
        }
        self.refresh_unread_count();
        debug!(marked, "all notifications marked read");
        marked
    }

    pub fn remove_notification(&mut self, notification_id: &NotificationId) -> Result<Notification> {
        let pos = self
            .notifications
            .iter()
            .position(|n| &n.id == notification_id)
            .ok_or_else(|| MessagingError::NotificationNotFound(notification_id.clone()))?;
        let removed = self.notifications.remove(pos);
        self.refresh_unread_count();
        debug!(notification_id = %notification_id, "notification removed");
        Ok(removed)
    }

    /// Removes every notification. Returns how many were dropped.
    pub fn clear_notifications(&mut self) -> usize {
        let removed = self.notifications.len();
        self.notifications.clear();
        self.refresh_unread_count();
        debug!(removed, "notifications cleared");
        removed
    }

    /// Records whether the other side is typing. Overwritten on every call.
    pub fn set_typing(&mut self, conversation_id: &ConversationId, is_typing: bool) -> Result<()> {
        if self.conversation(conversation_id).is_none() {
            return Err(MessagingError::ConversationNotFound(conversation_id.clone()));
        }
        if is_typing {
            self.typing.insert(conversation_id.clone());
        } else {
            self.typing.remove(conversation_id);
        }
        Ok(())
    }

    /// Inserts or replaces a registry entry.
    pub fn register_participant(&mut self, participant: Participant) {
        debug!(user_id = %participant.id, "participant registered");
        self.participants.insert(participant.id.clone(), participant);
    }

    pub fn update_participant_status(&mut self, user_id: &UserId, status: PresenceStatus) -> Result<()> {
        let participant = self
            .participants
            .get_mut(user_id)
            .ok_or_else(|| MessagingError::ParticipantNotFound(user_id.clone()))?;
        participant.status = status;
        debug!(user_id = %user_id, ?status, "participant status updated");
        Ok(())
    }

    // ---- read-state tracking ----

    /// Re-derives the unread count, last-message pointer and updated-at of one
    /// conversation from its messages.
    fn refresh_conversation(&mut self, conversation_id: &ConversationId) {
        let Some(messages) = self.messages.get(conversation_id) else {
            return;
        };
        let unread = count_unread(messages, &self.local_user);
        let last = messages.last().cloned();

        if let Some(conversation) = self
            .conversations
            .iter_mut()
            .find(|c| &c.id == conversation_id)
        {
            conversation.unread_count = unread;
            if let Some(last) = last {
                conversation.updated_at_ms = conversation.updated_at_ms.max(last.timestamp_ms);
                conversation.last_message = Some(last);
            }
        }
    }

    fn refresh_unread_count(&mut self) {
        self.unread_count = self.notifications.iter().filter(|n| !n.read).count() as u32;
    }
}

fn count_unread(messages: &[Message], local_user: &UserId) -> u32 {
    messages.iter().filter(|m| m.is_unread_for(local_user)).count() as u32
}
