use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Events the dashboard emits for whatever is rendering it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum DashboardEvent {
    Notification(Notification),
    #[serde(rename_all = "camelCase")]
    CatalogRefreshed { generation: u64, count: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NotificationLevel {
    Success,
    Error,
}

/// A non-blocking, human-readable message about the outcome of an action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NotificationLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn refreshed_event_wire_shape() {
        let event = DashboardEvent::CatalogRefreshed {
            generation: 3,
            count: 12,
        };
        assert_eq!(
            serde_json::to_value(&event).unwrap(),
            json!({"type": "catalogRefreshed", "generation": 3, "count": 12})
        );
    }

    #[test]
    fn notification_event_is_tagged() {
        let event = DashboardEvent::Notification(Notification::error("conflict"));
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["type"], "notification");
        assert_eq!(value["level"], "error");
        assert_eq!(value["message"], "conflict");
    }
}
