use chamberconnect_contracts::seeded_handle;
use chamberconnect_messaging::{MessageContent, Mutation, MutationOutcome, NewNotification, NotificationType};
use chamberconnect_node::store::{PendingOperation, PendingOutcome};
use chamberconnect_node::StoreError;
use std::time::Duration;

#[tokio::test]
async fn snapshots_do_not_alias_store_state() {
    let handle = seeded_handle();
    let mut snapshot = handle.messages("1".into()).await.unwrap();
    for message in &mut snapshot {
        message.read = true;
    }

    let conversations = handle.conversations().await.unwrap();
    let first = conversations
        .iter()
        .find(|c| c.conversation.id.as_str() == "1")
        .unwrap();
    assert_eq!(first.conversation.unread_count, 2);
}

#[tokio::test]
async fn summary_follows_mutations() {
    let handle = seeded_handle();
    let before = handle.summary().await.unwrap();

    handle
        .send_message("2".into(), MessageContent::text("Hello"), "user-42".into())
        .await
        .unwrap();
    handle
        .add_notification(NewNotification::new(NotificationType::Message, "New message", "Hello"))
        .await
        .unwrap();

    let after = handle.summary().await.unwrap();
    assert_eq!(after.unread_messages, before.unread_messages + 1);
    assert_eq!(after.unread_notifications, before.unread_notifications + 1);

    handle.mark_all_notifications_read().await.unwrap();
    handle.mark_conversation_read("2".into()).await.unwrap();
    let settled = handle.summary().await.unwrap();
    assert_eq!(settled.unread_notifications, 0);
    assert_eq!(settled.unread_messages, before.unread_messages);
}

#[tokio::test]
async fn cancelled_pending_send_never_lands() {
    let handle = seeded_handle();
    let before = handle.messages("2".into()).await.unwrap().len();

    let store = handle.clone();
    let mut op = PendingOperation::spawn(Duration::from_secs(30), move || async move {
        store
            .apply(Mutation::SendMessage {
                conversation_id: "2".into(),
                content: MessageContent::text("never sent"),
                sender_id: "current-user".into(),
            })
            .await
    });
    assert!(op.cancel());
    assert!(matches!(op.outcome().await, PendingOutcome::Cancelled));

    assert_eq!(handle.messages("2".into()).await.unwrap().len(), before);
}

#[tokio::test]
async fn pending_failure_carries_not_found() {
    let handle = seeded_handle();
    let store = handle.clone();
    let op = PendingOperation::spawn(Duration::from_millis(5), move || async move {
        store
            .apply(Mutation::MarkConversationRead {
                conversation_id: "nonexistent".into(),
            })
            .await
    });

    match op.outcome().await {
        PendingOutcome::Failed(StoreError::Messaging(err)) => assert!(err.is_not_found()),
        other => panic!("expected not-found failure, got {other:?}"),
    }
}

#[tokio::test]
async fn pending_success_reports_outcome() {
    let handle = seeded_handle();
    let store = handle.clone();
    let op = PendingOperation::spawn(Duration::from_millis(5), move || async move {
        store.apply(Mutation::MarkAllNotificationsRead).await
    });

    let outcome = op.outcome().await.into_result().unwrap();
    assert_eq!(outcome, MutationOutcome::AllNotificationsRead { marked: 2 });
    assert_eq!(handle.unread_count().await.unwrap(), 0);
}
