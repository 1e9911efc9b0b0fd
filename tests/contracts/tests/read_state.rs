use chamberconnect_contracts::{recomputed_unread, seeded_store};
use chamberconnect_messaging::seed::LOCAL_USER_ID;
use chamberconnect_messaging::{ConversationId, MessagingError};

#[test]
fn mark_read_clears_every_conversation() {
    let mut store = seeded_store();
    let ids: Vec<ConversationId> = store.conversations().iter().map(|c| c.id.clone()).collect();
    for id in &ids {
        store.mark_conversation_as_read(id).unwrap();
        let conversation = store.conversation(id).unwrap();
        assert_eq!(conversation.unread_count, 0);
        assert!(store.messages(id).unwrap().iter().all(|m| m.read));
    }
    assert!(store.is_consistent());
}

#[test]
fn scenario_a_conversation_one() {
    let mut store = seeded_store();
    let id = ConversationId::from("1");
    let previously_unread: Vec<_> = store
        .messages(&id)
        .unwrap()
        .iter()
        .filter(|m| !m.read)
        .map(|m| m.id.clone())
        .collect();
    assert_eq!(store.conversation(&id).unwrap().unread_count, 2);
    assert_eq!(previously_unread.len(), 2);

    store.mark_conversation_as_read(&id).unwrap();

    assert_eq!(store.conversation(&id).unwrap().unread_count, 0);
    for message in store.messages(&id).unwrap() {
        if previously_unread.contains(&message.id) {
            assert!(message.read);
        }
    }
}

#[test]
fn scenario_b_incoming_hello() {
    let mut store = seeded_store();
    let id = ConversationId::from("2");
    let before = store.conversation(&id).unwrap().clone();

    store.send_message(&id, "Hello", "user-42").unwrap();

    let after = store.conversation(&id).unwrap();
    assert_eq!(after.unread_count, before.unread_count + 1);
    let last = after.last_message.as_ref().unwrap();
    assert_eq!(last.content.as_text(), Some("Hello"));
    assert!(after.updated_at_ms >= before.updated_at_ms);
    assert!(after.updated_at_ms >= last.timestamp_ms);
}

#[test]
fn unread_tracks_recomputation_across_mixed_traffic() {
    let mut store = seeded_store();
    let id = ConversationId::from("3");
    let senders = ["user-3", LOCAL_USER_ID, "user-3", "user-8", LOCAL_USER_ID];
    let mut expected = store.conversation(&id).unwrap().unread_count;

    for (i, sender) in senders.iter().enumerate() {
        store.send_message(&id, format!("note {i}"), *sender).unwrap();
        if *sender != LOCAL_USER_ID {
            expected += 1;
        }
        assert_eq!(store.conversation(&id).unwrap().unread_count, expected);
        assert_eq!(recomputed_unread(&store, &id), expected);
        if i == 2 {
            store.mark_conversation_as_read(&id).unwrap();
            expected = 0;
        }
    }
    assert!(store.is_consistent());
}

#[test]
fn messages_stay_in_send_order() {
    let mut store = seeded_store();
    let id = ConversationId::from("1");
    for i in 0..10 {
        store.send_message(&id, format!("#{i}"), "user-1").unwrap();
    }
    let stamps: Vec<i64> = store.messages(&id).unwrap().iter().map(|m| m.timestamp_ms).collect();
    assert!(stamps.windows(2).all(|w| w[0] <= w[1]));
    let bodies: Vec<&str> = store
        .messages(&id)
        .unwrap()
        .iter()
        .filter_map(|m| m.content.as_text())
        .filter(|t| t.starts_with('#'))
        .collect();
    let expected: Vec<String> = (0..10).map(|i| format!("#{i}")).collect();
    assert_eq!(bodies, expected);
}

#[test]
fn unknown_conversation_is_reported_without_mutation() {
    let mut store = seeded_store();
    let before = store.conversations().to_vec();

    let err = store
        .mark_conversation_as_read(&"nonexistent".into())
        .unwrap_err();
    assert_eq!(err, MessagingError::ConversationNotFound("nonexistent".into()));
    assert_eq!(store.conversations(), before.as_slice());

    let err = store
        .send_message(&"nonexistent".into(), "Hello", "user-42")
        .unwrap_err();
    assert!(err.is_not_found());
    assert_eq!(store.conversations(), before.as_slice());
}
