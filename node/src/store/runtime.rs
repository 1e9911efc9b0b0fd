use super::{
    ConversationSnapshot, InboxSummary, NotificationsSnapshot, StoreError, StoreEvent, StoreResult,
};
use chamberconnect_messaging::display::format_relative_time;
use chamberconnect_messaging::{
    now_ms, views, Conversation, ConversationId, EntityStore, Message, MessageContent,
    MessagingError, Mutation, MutationOutcome, NewNotification, Notification, NotificationId,
    Participant, PresenceStatus, UserId,
};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

type ReadFn = Box<dyn FnOnce(&EntityStore) + Send>;

/// Commands sent to the store runtime.
enum StoreCommand {
    Apply {
        mutation: Mutation,
        responder: oneshot::Sender<Result<MutationOutcome, MessagingError>>,
    },
    Read(ReadFn),
    Shutdown(oneshot::Sender<()>),
}

struct HandleState {
    command_tx: mpsc::Sender<StoreCommand>,
    event_tx: broadcast::Sender<StoreEvent>,
    local_user: UserId,
}

/// Cloneable handle to the task that owns the [`EntityStore`]. Reads return owned
/// snapshots; writes go through [`Mutation`]s applied one at a time.
#[derive(Clone)]
pub struct StoreHandle {
    inner: Arc<HandleState>,
}

impl StoreHandle {
    /// Moves `store` into a new runtime task.
    pub fn spawn(store: EntityStore, buffer: usize) -> (Self, JoinHandle<()>) {
        let (command_tx, command_rx) = mpsc::channel(buffer.max(1));
        let (event_tx, _rx) = broadcast::channel(128);
        let local_user = store.local_user().clone();

        let task = tokio::spawn(run(store, command_rx, event_tx.clone()));
        let handle = Self {
            inner: Arc::new(HandleState {
                command_tx,
                event_tx,
                local_user,
            }),
        };
        (handle, task)
    }

    pub fn local_user(&self) -> &UserId {
        &self.inner.local_user
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.event_tx.subscribe()
    }

    async fn send(&self, command: StoreCommand) -> StoreResult<()> {
        self.inner
            .command_tx
            .send(command)
            .await
            .map_err(|_| StoreError::Unavailable)
    }

    /// Runs `f` against the store inside the runtime task and returns its result.
    pub async fn read<T, F>(&self, f: F) -> StoreResult<T>
    where
        F: FnOnce(&EntityStore) -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = oneshot::channel();
        self.send(StoreCommand::Read(Box::new(move |store: &EntityStore| {
            let _ = tx.send(f(store));
        })))
        .await?;
        rx.await.map_err(|_| StoreError::Unavailable)
    }

    pub async fn apply(&self, mutation: Mutation) -> StoreResult<MutationOutcome> {
        let (responder, rx) = oneshot::channel();
        self.send(StoreCommand::Apply {
            mutation,
            responder,
        })
        .await?;
        let result = rx.await.map_err(|_| StoreError::Unavailable)?;
        Ok(result?)
    }

    /// Stops the runtime after the commands already queued have been served.
    pub async fn shutdown(&self) -> StoreResult<()> {
        let (tx, rx) = oneshot::channel();
        self.send(StoreCommand::Shutdown(tx)).await?;
        rx.await.map_err(|_| StoreError::Unavailable)
    }

    // ---- queries ----

    /// Conversations, most recently updated first.
    pub async fn conversations(&self) -> StoreResult<Vec<ConversationSnapshot>> {
        self.read(|store| {
            let now = now_ms();
            views::conversations_by_recent(store)
                .into_iter()
                .map(|c| snapshot_conversation(store, c, now))
                .collect::<Vec<_>>()
        })
        .await
    }

    /// Conversations matching `query` on participant or last message, most recent first.
    pub async fn search_conversations(&self, query: String) -> StoreResult<Vec<ConversationSnapshot>> {
        self.read(move |store| {
            let now = now_ms();
            views::search_conversations(store, &query)
                .into_iter()
                .map(|c| snapshot_conversation(store, c, now))
                .collect::<Vec<_>>()
        })
        .await
    }

    pub async fn messages(&self, conversation_id: ConversationId) -> StoreResult<Vec<Message>> {
        let result = self
            .read(move |store| store.messages(&conversation_id).map(<[Message]>::to_vec))
            .await?;
        Ok(result?)
    }

    pub async fn notifications(&self) -> StoreResult<NotificationsSnapshot> {
        self.read(|store| NotificationsSnapshot {
            unread_count: store.unread_count(),
            notifications: store.notifications().to_vec(),
        })
        .await
    }

    pub async fn unread_count(&self) -> StoreResult<u32> {
        self.read(EntityStore::unread_count).await
    }

    pub async fn summary(&self) -> StoreResult<InboxSummary> {
        self.read(|store| InboxSummary {
            unread_messages: views::total_unread_messages(store),
            unread_notifications: store.unread_count(),
            conversations: store.conversations().len(),
        })
        .await
    }

    // ---- mutations ----

    pub async fn send_message(
        &self,
        conversation_id: ConversationId,
        content: MessageContent,
        sender_id: UserId,
    ) -> StoreResult<Message> {
        match self
            .apply(Mutation::SendMessage {
                conversation_id,
                content,
                sender_id,
            })
            .await?
        {
            MutationOutcome::MessageSent(message) => Ok(message),
            other => unexpected_outcome(other),
        }
    }

    pub async fn start_conversation(&self, participant_ids: Vec<UserId>) -> StoreResult<Conversation> {
        match self
            .apply(Mutation::StartConversation { participant_ids })
            .await?
        {
            MutationOutcome::ConversationStarted(conversation) => Ok(conversation),
            other => unexpected_outcome(other),
        }
    }

    pub async fn remove_conversation(&self, conversation_id: ConversationId) -> StoreResult<()> {
        self.apply(Mutation::RemoveConversation { conversation_id })
            .await
            .map(drop)
    }

    /// Returns how many messages flipped to read.
    pub async fn mark_conversation_read(&self, conversation_id: ConversationId) -> StoreResult<usize> {
        match self
            .apply(Mutation::MarkConversationRead { conversation_id })
            .await?
        {
            MutationOutcome::ConversationRead { marked, .. } => Ok(marked),
            other => unexpected_outcome(other),
        }
    }

    pub async fn add_notification(&self, payload: NewNotification) -> StoreResult<Notification> {
        match self.apply(Mutation::AddNotification(payload)).await? {
            MutationOutcome::NotificationAdded(notification) => Ok(notification),
            other => unexpected_outcome(other),
        }
    }

    pub async fn mark_notification_read(&self, notification_id: NotificationId) -> StoreResult<()> {
        self.apply(Mutation::MarkNotificationRead { notification_id })
            .await
            .map(drop)
    }

    pub async fn mark_all_notifications_read(&self) -> StoreResult<usize> {
        match self.apply(Mutation::MarkAllNotificationsRead).await? {
            MutationOutcome::AllNotificationsRead { marked } => Ok(marked),
            other => unexpected_outcome(other),
        }
    }

    pub async fn remove_notification(&self, notification_id: NotificationId) -> StoreResult<Notification> {
        match self
            .apply(Mutation::RemoveNotification { notification_id })
            .await?
        {
            MutationOutcome::NotificationRemoved(notification) => Ok(notification),
            other => unexpected_outcome(other),
        }
    }

    pub async fn clear_notifications(&self) -> StoreResult<usize> {
        match self.apply(Mutation::ClearNotifications).await? {
            MutationOutcome::NotificationsCleared { removed } => Ok(removed),
            other => unexpected_outcome(other),
        }
    }

    pub async fn set_typing(&self, conversation_id: ConversationId, is_typing: bool) -> StoreResult<()> {
        self.apply(Mutation::SetTyping {
            conversation_id,
            is_typing,
        })
        .await
        .map(drop)
    }

    pub async fn register_participant(&self, participant: Participant) -> StoreResult<()> {
        self.apply(Mutation::RegisterParticipant(participant))
            .await
            .map(drop)
    }

    pub async fn update_participant_status(
        &self,
        user_id: UserId,
        status: PresenceStatus,
    ) -> StoreResult<()> {
        self.apply(Mutation::UpdateParticipantStatus { user_id, status })
            .await
            .map(drop)
    }
}

fn snapshot_conversation(
    store: &EntityStore,
    conversation: &Conversation,
    now: i64,
) -> ConversationSnapshot {
    ConversationSnapshot {
        conversation: conversation.clone(),
        participants: store
            .participants_of(&conversation.id)
            .map(|ps| ps.into_iter().cloned().collect())
            .unwrap_or_default(),
        is_typing: store.is_typing(&conversation.id),
        last_activity: format_relative_time(conversation.updated_at_ms, now),
    }
}

// apply() maps each mutation to its own outcome variant
fn unexpected_outcome<T>(outcome: MutationOutcome) -> StoreResult<T> {
    warn!(?outcome, "store replied with a mismatched outcome");
    Err(StoreError::Unavailable)
}

async fn run(
    mut store: EntityStore,
    mut command_rx: mpsc::Receiver<StoreCommand>,
    event_tx: broadcast::Sender<StoreEvent>,
) {
    let mut sequence = 0u64;
    while let Some(command) = command_rx.recv().await {
        match command {
            StoreCommand::Apply {
                mutation,
                responder,
            } => {
                let result = store.apply(mutation);
                match &result {
                    Ok(outcome) => {
                        sequence += 1;
                        debug!(sequence, ?outcome, "mutation applied");
                        let _ = event_tx.send(StoreEvent {
                            sequence,
                            outcome: outcome.clone(),
                        });
                    }
                    Err(err) => warn!(%err, "mutation rejected"),
                }
                let _ = responder.send(result);
            }
            StoreCommand::Read(f) => f(&store),
            StoreCommand::Shutdown(done) => {
                let _ = done.send(());
                break;
            }
        }
    }
    debug!(sequence, "store runtime stopped");
}
