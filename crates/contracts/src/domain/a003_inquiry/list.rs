use super::aggregate::Inquiry;
use super::message::InquiryMessage;
use super::status::{InquiryAction, InquiryStatus};
use crate::domain::a004_follow_up::aggregate::FollowUpView;
use crate::domain::a005_rating::aggregate::Rating;
use crate::shared::pagination::{PageResponse, DEFAULT_PAGE_SIZE};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Чьи обращения показывать
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InquiryListScope {
    /// Созданные текущим пользователем
    #[default]
    Mine,
    /// Назначенные текущему тренеру (плюс очередь без тренера)
    Assigned,
    /// С запросом в отдел ассистента
    Section,
    /// Все (только администратор)
    All,
}

impl InquiryListScope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Mine => "mine",
            Self::Assigned => "assigned",
            Self::Section => "section",
            Self::All => "all",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InquirySortField {
    Code,
    Title,
    Status,
    CreatedAt,
    #[default]
    LastActivityAt,
}

impl InquirySortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Title => "title",
            Self::Status => "status",
            Self::CreatedAt => "created_at",
            Self::LastActivityAt => "last_activity_at",
        }
    }
}

/// Запрос списка обращений (GET /api/inquiries)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryListQuery {
    #[serde(default)]
    pub scope: InquiryListScope,
    #[serde(default)]
    pub status: Option<InquiryStatus>,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub trainer_id: Option<String>,
    /// Для scope=assigned: включать обращения без тренера
    #[serde(default)]
    pub include_unassigned: bool,
    #[serde(default)]
    pub search: Option<String>,
    #[serde(default)]
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub sort_field: InquirySortField,
    #[serde(default)]
    pub sort_ascending: bool,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for InquiryListQuery {
    fn default() -> Self {
        Self {
            scope: InquiryListScope::Mine,
            status: None,
            category_id: None,
            trainer_id: None,
            include_unassigned: false,
            search: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: InquirySortField::default(),
            sort_ascending: false,
        }
    }
}

impl InquiryListQuery {
    pub fn with_scope(scope: InquiryListScope) -> Self {
        Self {
            scope,
            ..Default::default()
        }
    }

    /// Поисковая строка без пробелов по краям; пустая считается отсутствующей
    pub fn search_term(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// Счётчики для вкладок фильтра по статусу
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub opened: usize,
    pub pending: usize,
    pub closed: usize,
    pub reopened: usize,
}

impl StatusCounts {
    pub fn add(&mut self, status: InquiryStatus) {
        match status {
            InquiryStatus::Opened => self.opened += 1,
            InquiryStatus::Pending => self.pending += 1,
            InquiryStatus::Closed => self.closed += 1,
            InquiryStatus::Reopened => self.reopened += 1,
        }
    }

    pub fn get(&self, status: InquiryStatus) -> usize {
        match status {
            InquiryStatus::Opened => self.opened,
            InquiryStatus::Pending => self.pending,
            InquiryStatus::Closed => self.closed,
            InquiryStatus::Reopened => self.reopened,
        }
    }

    pub fn total(&self) -> usize {
        self.opened + self.pending + self.closed + self.reopened
    }

    pub fn from_statuses<I: IntoIterator<Item = InquiryStatus>>(statuses: I) -> Self {
        let mut counts = Self::default();
        for status in statuses {
            counts.add(status);
        }
        counts
    }
}

/// Строка таблицы обращений
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InquiryListItem {
    pub id: String,
    pub code: String,
    pub title: String,
    pub status: InquiryStatus,
    pub category_id: String,
    pub category_name: String,
    pub author_id: String,
    pub author_name: String,
    pub trainer_id: Option<String>,
    pub trainer_name: Option<String>,
    pub reopen_count: i32,
    pub created_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub closed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryListResponse {
    #[serde(flatten)]
    pub page: PageResponse<InquiryListItem>,
    pub status_counts: StatusCounts,
}

/// Карточка обращения со всем, что нужно экрану деталей
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryDetail {
    pub inquiry: Inquiry,
    pub category_name: String,
    pub author_name: String,
    pub trainer_name: Option<String>,
    pub follow_ups: Vec<FollowUpView>,
    pub messages: Vec<InquiryMessage>,
    pub rating: Option<Rating>,
    /// Действия, доступные запросившему пользователю
    pub allowed_actions: Vec<InquiryAction>,
    /// Может ли пользователь писать в переписку
    pub can_post_message: bool,
    /// Может ли пользователь поставить оценку
    pub can_rate: bool,
}

impl InquiryDetail {
    pub fn can(&self, action: InquiryAction) -> bool {
        self.allowed_actions.contains(&action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_counts() {
        let counts = StatusCounts::from_statuses([
            InquiryStatus::Opened,
            InquiryStatus::Opened,
            InquiryStatus::Closed,
            InquiryStatus::Reopened,
        ]);
        assert_eq!(counts.opened, 2);
        assert_eq!(counts.pending, 0);
        assert_eq!(counts.get(InquiryStatus::Closed), 1);
        assert_eq!(counts.total(), 4);
    }

    #[test]
    fn test_query_defaults_from_empty_json() {
        let query: InquiryListQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(query, InquiryListQuery::default());
        assert_eq!(query.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(query.sort_field, InquirySortField::LastActivityAt);
    }

    #[test]
    fn test_query_wire_names() {
        let query: InquiryListQuery =
            serde_json::from_str(r#"{"scope":"assigned","status":"reopened","sort_field":"created_at"}"#)
                .unwrap();
        assert_eq!(query.scope, InquiryListScope::Assigned);
        assert_eq!(query.status, Some(InquiryStatus::Reopened));
        assert_eq!(query.sort_field, InquirySortField::CreatedAt);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let mut query = InquiryListQuery::default();
        query.search = Some("   ".into());
        assert_eq!(query.search_term(), None);
        query.search = Some(" Login ".into());
        assert_eq!(query.search_term().as_deref(), Some("login"));
    }
}
