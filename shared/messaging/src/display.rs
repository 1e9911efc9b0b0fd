//! Formatting helpers consumed by the display layer.

use chrono::{DateTime, Utc};

use crate::conversation::PresenceStatus;
use crate::notifications::NotificationType;

const MINUTE_MS: i64 = 60 * 1000;
const HOUR_MS: i64 = 60 * MINUTE_MS;
const DAY_MS: i64 = 24 * HOUR_MS;

/// "Just now", "5m ago", "2h ago", then a calendar date once a day has passed.
/// Timestamps in the future read as "Just now".
pub fn format_relative_time(timestamp_ms: i64, now_ms: i64) -> String {
    let elapsed = now_ms - timestamp_ms;
    if elapsed < MINUTE_MS {
        "Just now".to_string()
    } else if elapsed < HOUR_MS {
        format!("{}m ago", elapsed / MINUTE_MS)
    } else if elapsed < DAY_MS {
        format!("{}h ago", elapsed / HOUR_MS)
    } else {
        format_calendar_date(timestamp_ms)
    }
}

/// UTC calendar date such as "Mar 4, 2024".
pub fn format_calendar_date(timestamp_ms: i64) -> String {
    match DateTime::<Utc>::from_timestamp_millis(timestamp_ms) {
        Some(date) => date.format("%b %-d, %Y").to_string(),
        None => String::new(),
    }
}

impl PresenceStatus {
    /// Badge color for the presence dot.
    pub fn color(self) -> &'static str {
        match self {
            Self::Online => "#10B981",
            Self::Away => "#F59E0B",
            Self::Offline => "#9CA3AF",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Online => "Online",
            Self::Away => "Away",
            Self::Offline => "Offline",
        }
    }
}

impl NotificationType {
    /// Icon name in the app's icon set.
    pub fn icon(self) -> &'static str {
        match self {
            Self::Message => "message-circle",
            Self::Event => "calendar",
            Self::Member => "user-plus",
            Self::System => "bell",
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Self::Message => "#3B82F6",
            Self::Event => "#10B981",
            Self::Member => "#8B5CF6",
            Self::System => "#6B7280",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2024-03-04T12:00:00Z
    const NOW: i64 = 1_709_553_600_000;

    #[test]
    fn relative_time_buckets() {
        assert_eq!(format_relative_time(NOW, NOW), "Just now");
        assert_eq!(format_relative_time(NOW - 59_999, NOW), "Just now");
        assert_eq!(format_relative_time(NOW + 10_000, NOW), "Just now");
        assert_eq!(format_relative_time(NOW - MINUTE_MS, NOW), "1m ago");
        assert_eq!(format_relative_time(NOW - 5 * MINUTE_MS, NOW), "5m ago");
        assert_eq!(format_relative_time(NOW - HOUR_MS + 1, NOW), "59m ago");
        assert_eq!(format_relative_time(NOW - 2 * HOUR_MS, NOW), "2h ago");
        assert_eq!(format_relative_time(NOW - DAY_MS + 1, NOW), "23h ago");
    }

    #[test]
    fn older_than_a_day_falls_back_to_date() {
        assert_eq!(format_relative_time(NOW - DAY_MS, NOW), "Mar 3, 2024");
        assert_eq!(format_relative_time(NOW - 40 * DAY_MS, NOW), "Jan 24, 2024");
    }

    #[test]
    fn status_and_type_palettes() {
        assert_eq!(PresenceStatus::Online.color(), "#10B981");
        assert_eq!(PresenceStatus::Away.color(), "#F59E0B");
        assert_eq!(PresenceStatus::Offline.color(), "#9CA3AF");
        assert_eq!(NotificationType::Event.icon(), "calendar");
        assert_eq!(NotificationType::Member.color(), "#8B5CF6");
    }
}
