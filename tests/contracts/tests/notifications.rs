use chamberconnect_contracts::seeded_store;
use chamberconnect_messaging::views;
use chamberconnect_messaging::{NewNotification, NotificationActor, NotificationType};

#[test]
fn scenario_c_event_reminder() {
    let mut store = seeded_store();
    let unread = store.unread_count();
    let others: Vec<_> = store.notifications().to_vec();

    let added = store
        .add_notification(NewNotification::new(
            NotificationType::Event,
            "Reminder",
            "Chamber luncheon on Friday",
        ))
        .unwrap();
    assert_eq!(store.notifications()[0].id, added.id);
    assert!(!store.notifications()[0].read);
    assert_eq!(store.unread_count(), unread + 1);

    store.mark_as_read(&added.id).unwrap();
    assert_eq!(store.unread_count(), unread);
    assert!(store.notification(&added.id).unwrap().read);
    assert_eq!(&store.notifications()[1..], others.as_slice());
}

#[test]
fn mark_all_twice_equals_once() {
    let mut once = seeded_store();
    once.mark_all_as_read();
    let mut twice = once.clone();
    twice.mark_all_as_read();

    assert_eq!(once.notifications(), twice.notifications());
    assert_eq!(twice.unread_count(), 0);
    assert!(twice.notifications().iter().all(|n| n.read));
}

#[test]
fn add_then_remove_restores_state() {
    let mut store = seeded_store();
    let before = store.notifications().to_vec();
    let unread = store.unread_count();

    let added = store
        .add_notification(
            NewNotification::new(NotificationType::Member, "New member", "Harbor Cafe joined")
                .with_action_url("/directory/harbor-cafe")
                .with_actor(NotificationActor {
                    id: "user-12".into(),
                    name: "Lena Ortiz".into(),
                    avatar_url: None,
                }),
        )
        .unwrap();
    let removed = store.remove_notification(&added.id).unwrap();

    assert_eq!(removed, added);
    assert_eq!(store.notifications(), before.as_slice());
    assert_eq!(store.unread_count(), unread);
}

#[test]
fn newest_notification_is_always_first() {
    let mut store = seeded_store();
    for title in ["first", "second", "third"] {
        store
            .add_notification(NewNotification::new(NotificationType::System, title, "body"))
            .unwrap();
    }
    let titles: Vec<&str> = store
        .notifications()
        .iter()
        .take(3)
        .map(|n| n.title.as_str())
        .collect();
    assert_eq!(titles, vec!["third", "second", "first"]);
    assert!(store
        .notifications()
        .windows(2)
        .all(|w| w[0].timestamp_ms >= w[1].timestamp_ms));
}

#[test]
fn removing_a_conversation_leaves_its_notifications() {
    let mut store = seeded_store();
    let linked = store
        .notifications()
        .iter()
        .filter(|n| n.action_url.as_deref() == Some("/messages/1"))
        .count();
    assert_eq!(linked, 1);

    store.remove_conversation(&"1".into()).unwrap();
    assert_eq!(
        views::notifications_of_type(&store, NotificationType::Message).len(),
        1
    );
    assert!(store.is_consistent());
}
