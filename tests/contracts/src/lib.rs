//! Shared fixtures for the contract suites under `tests/`.

use chamberconnect_messaging::seed::{chamber_fixture, LOCAL_USER_ID};
use chamberconnect_messaging::{ConversationId, EntityStore, Message};
use chamberconnect_node::StoreHandle;

pub fn seeded_store() -> EntityStore {
    EntityStore::with_seed(LOCAL_USER_ID, chamber_fixture())
        .expect("demo fixture must load into an empty store")
}

/// Starts a store runtime on the current Tokio runtime.
pub fn seeded_handle() -> StoreHandle {
    StoreHandle::spawn(seeded_store(), 32).0
}

/// Unread count recomputed from message flags, independent of the stored counter.
pub fn recomputed_unread(store: &EntityStore, conversation_id: &ConversationId) -> u32 {
    store
        .messages(conversation_id)
        .map(|messages| {
            messages
                .iter()
                .filter(|m| unread_for_local(store, m))
                .count() as u32
        })
        .unwrap_or(0)
}

fn unread_for_local(store: &EntityStore, message: &Message) -> bool {
    !message.read && &message.sender_id != store.local_user()
}
