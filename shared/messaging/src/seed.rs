//! Initial snapshot used to populate a fresh store.

use serde::{Deserialize, Serialize};

use crate::conversation::{Conversation, Message, MessageContent, Participant, PresenceStatus};
use crate::notifications::{Notification, NotificationActor, NotificationType};
use crate::{now_ms, ConversationId, MessageId, NotificationId, UserId};

/// Default identity of the signed-in member.
pub const LOCAL_USER_ID: &str = "current-user";

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Seed {
    pub participants: Vec<Participant>,
    pub conversations: Vec<SeedConversation>,
    pub notifications: Vec<Notification>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeedConversation {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// The demo chamber: three member threads and a handful of notifications,
/// timestamped relative to now.
pub fn chamber_fixture() -> Seed {
    chamber_fixture_at(now_ms())
}

pub fn chamber_fixture_at(now: i64) -> Seed {
    let me = UserId::from(LOCAL_USER_ID);

    let participants = vec![
        Participant::new(me.clone(), "You", "Main Street Bakery", PresenceStatus::Online),
        Participant::new("user-1", "Sarah Johnson", "Johnson Realty", PresenceStatus::Online)
            .with_avatar("https://images.chamberconnect.app/avatars/sarah.jpg"),
        Participant::new("user-2", "Michael Chen", "Chen's Hardware", PresenceStatus::Away)
            .with_avatar("https://images.chamberconnect.app/avatars/michael.jpg"),
        Participant::new("user-3", "Emily Rodriguez", "Rodriguez Law Group", PresenceStatus::Offline),
    ];

    let conversations = vec![
        thread(
            "1",
            &[&me, &"user-1".into()],
            now,
            &[
                ("m1-1", LOCAL_USER_ID, "Thanks for the referral last week!", 3 * HOUR_MS, true),
                ("m1-2", "user-1", "Happy to help. Are you coming to the mixer?", 40 * MINUTE_MS, false),
                ("m1-3", "user-1", "I can introduce you to the new bank manager.", 5 * MINUTE_MS, false),
            ],
        ),
        thread(
            "2",
            &[&me, &"user-2".into()],
            now,
            &[
                ("m2-1", "user-2", "Do you still need shelving for the storefront?", 26 * HOUR_MS, true),
                ("m2-2", LOCAL_USER_ID, "Yes, could you send a quote?", 25 * HOUR_MS, true),
            ],
        ),
        thread(
            "3",
            &[&me, &"user-3".into()],
            now,
            &[(
                "m3-1",
                "user-3",
                "The lease review is done, see the attached notes.",
                3 * 24 * HOUR_MS,
                false,
            )],
        ),
    ];

    let notifications = vec![
        notification(
            "n1",
            NotificationType::Message,
            "New message",
            "Sarah Johnson sent you a message",
            now - 5 * MINUTE_MS,
            false,
            Some("/messages/1"),
            Some(NotificationActor {
                id: "user-1".into(),
                name: "Sarah Johnson".into(),
                avatar_url: Some("https://images.chamberconnect.app/avatars/sarah.jpg".into()),
            }),
        ),
        notification(
            "n2",
            NotificationType::Event,
            "Event reminder",
            "Business After Hours mixer starts tomorrow at 5:30 PM",
            now - 2 * HOUR_MS,
            false,
            Some("/events/after-hours"),
            None,
        ),
        notification(
            "n3",
            NotificationType::Member,
            "New member",
            "Rodriguez Law Group joined the chamber",
            now - 26 * HOUR_MS,
            true,
            Some("/directory/user-3"),
            Some(NotificationActor {
                id: "user-3".into(),
                name: "Emily Rodriguez".into(),
                avatar_url: None,
            }),
        ),
        notification(
            "n4",
            NotificationType::System,
            "Profile incomplete",
            "Add your business hours so members can find you",
            now - 3 * 24 * HOUR_MS,
            true,
            Some("/profile/edit"),
            None,
        ),
    ];

    Seed {
        participants,
        conversations,
        notifications,
    }
}

fn thread(
    id: &str,
    participants: &[&UserId],
    now: i64,
    messages: &[(&str, &str, &str, i64, bool)],
) -> SeedConversation {
    let conversation_id = ConversationId::from(id);
    let messages: Vec<Message> = messages
        .iter()
        .map(|&(message_id, sender, text, age_ms, read)| Message {
            id: MessageId::from(message_id),
            conversation_id: conversation_id.clone(),
            sender_id: UserId::from(sender),
            content: MessageContent::text(text),
            timestamp_ms: now - age_ms,
            read,
        })
        .collect();

    let mut conversation = Conversation::new(
        conversation_id,
        participants.iter().map(|&p| p.clone()).collect(),
    );
    conversation.updated_at_ms = messages.iter().map(|m| m.timestamp_ms).max().unwrap_or(now);

    SeedConversation {
        conversation,
        messages,
    }
}

#[allow(clippy::too_many_arguments)]
fn notification(
    id: &str,
    kind: NotificationType,
    title: &str,
    message: &str,
    timestamp_ms: i64,
    read: bool,
    action_url: Option<&str>,
    actor: Option<NotificationActor>,
) -> Notification {
    Notification {
        id: NotificationId::from(id),
        kind,
        title: title.to_string(),
        message: message.to_string(),
        timestamp_ms,
        read,
        action_url: action_url.map(str::to_string),
        actor,
    }
}
