use crate::shared::pagination::DEFAULT_PAGE_SIZE;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    InquiryAssigned,
    InquiryAnswered,
    InquiryClosed,
    InquiryReopened,
    FollowUpRequested,
    FollowUpAnswered,
    InquiryRated,
    MessagePosted,
}

impl NotificationKind {
    pub const ALL: [NotificationKind; 8] = [
        Self::InquiryAssigned,
        Self::InquiryAnswered,
        Self::InquiryClosed,
        Self::InquiryReopened,
        Self::FollowUpRequested,
        Self::FollowUpAnswered,
        Self::InquiryRated,
        Self::MessagePosted,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InquiryAssigned => "inquiry_assigned",
            Self::InquiryAnswered => "inquiry_answered",
            Self::InquiryClosed => "inquiry_closed",
            Self::InquiryReopened => "inquiry_reopened",
            Self::FollowUpRequested => "follow_up_requested",
            Self::FollowUpAnswered => "follow_up_answered",
            Self::InquiryRated => "inquiry_rated",
            Self::MessagePosted => "message_posted",
        }
    }

    /// Заголовок уведомления по умолчанию
    pub fn title(&self) -> &'static str {
        match self {
            Self::InquiryAssigned => "Вам назначено обращение",
            Self::InquiryAnswered => "Получен ответ на обращение",
            Self::InquiryClosed => "Обращение закрыто",
            Self::InquiryReopened => "Обращение переоткрыто",
            Self::FollowUpRequested => "Новый запрос в отдел",
            Self::FollowUpAnswered => "Отдел ответил на запрос",
            Self::InquiryRated => "Обращение оценено",
            Self::MessagePosted => "Новое сообщение",
        }
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == s)
            .ok_or_else(|| format!("Unknown notification kind: {}", s))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub user_id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub body: String,
    pub inquiry_id: Option<String>,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

impl Notification {
    pub fn new(
        user_id: impl Into<String>,
        kind: NotificationKind,
        body: impl Into<String>,
        inquiry_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            kind,
            title: kind.title().to_string(),
            body: body.into(),
            inquiry_id,
            is_read: false,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationListQuery {
    #[serde(default)]
    pub unread_only: bool,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for NotificationListQuery {
    fn default() -> Self {
        Self {
            unread_only: false,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

pub const DEFAULT_POLL_INTERVAL_SECS: u32 = 30;
const MIN_POLL_INTERVAL_SECS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnreadCount {
    pub count: u64,
    /// Через сколько секунд клиенту спросить снова
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u32,
}

fn default_poll_interval() -> u32 {
    DEFAULT_POLL_INTERVAL_SECS
}

impl Default for UnreadCount {
    fn default() -> Self {
        Self {
            count: 0,
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
        }
    }
}

impl UnreadCount {
    /// Пауза до следующего опроса, не чаще раза в 5 секунд
    pub fn poll_delay_ms(&self) -> u32 {
        self.poll_interval_secs
            .max(MIN_POLL_INTERVAL_SECS)
            .saturating_mul(1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_string_round_trip_for_all() {
        for kind in NotificationKind::ALL {
            assert_eq!(kind.as_str().parse::<NotificationKind>().unwrap(), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(json, format!("\"{}\"", kind.as_str()));
        }
    }

    #[test]
    fn test_poll_delay() {
        let old_server: UnreadCount = serde_json::from_str(r#"{"count":3}"#).unwrap();
        assert_eq!(old_server.poll_delay_ms(), 30_000);

        let fast = UnreadCount {
            count: 0,
            poll_interval_secs: 1,
        };
        assert_eq!(fast.poll_delay_ms(), 5_000);
    }

    #[test]
    fn test_new_notification_is_unread() {
        let n = Notification::new("u1", NotificationKind::InquiryClosed, "INQ-1", None);
        assert!(!n.is_read);
        assert_eq!(n.title, "Обращение закрыто");
    }
}
