use super::status::{next_status, InquiryAction, InquiryStatus, TransitionError};
use crate::domain::a002_category::aggregate::CategoryId;
use crate::domain::common::{AggregateId, AggregateRoot, BaseAggregate, EntityMetadata};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

crate::aggregate_id!(
    /// Уникальный идентификатор обращения
    InquiryId
);

pub const TITLE_MAX_LEN: usize = 200;

/// Обращение пользователя. `base.description` хранит заголовок.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Inquiry {
    #[serde(flatten)]
    pub base: BaseAggregate<InquiryId>,

    pub body: String,
    pub author_id: String,
    pub category_id: CategoryId,
    pub trainer_id: Option<String>,
    pub status: InquiryStatus,
    pub answer: Option<String>,
    pub reopen_count: i32,
    pub closed_at: Option<DateTime<Utc>>,
    pub last_activity_at: DateTime<Utc>,
}

/// `INQ-YYYYMMDD-XXXX`: creation date plus the first four hex digits of the id
pub fn generate_code(id: &InquiryId, created_at: DateTime<Utc>) -> String {
    let hex = id.value().simple().to_string();
    format!(
        "INQ-{}-{}",
        created_at.format("%Y%m%d"),
        hex[..4].to_uppercase()
    )
}

impl Inquiry {
    pub fn new_for_insert(
        author_id: String,
        category_id: CategoryId,
        title: String,
        body: String,
    ) -> Self {
        let id = InquiryId::new_v4();
        let now = Utc::now();
        let code = generate_code(&id, now);
        let mut base = BaseAggregate::new(id, code, title.trim().to_string());
        base.metadata.created_at = now;
        base.metadata.updated_at = now;
        Self {
            base,
            body: body.trim().to_string(),
            author_id,
            category_id,
            trainer_id: None,
            status: InquiryStatus::Opened,
            answer: None,
            reopen_count: 0,
            closed_at: None,
            last_activity_at: now,
        }
    }

    pub fn title(&self) -> &str {
        &self.base.description
    }

    pub fn to_string_id(&self) -> String {
        self.base.id.as_string()
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.base.description.trim().is_empty() {
            return Err("Тема обращения не может быть пустой".into());
        }
        if self.base.description.chars().count() > TITLE_MAX_LEN {
            return Err(format!(
                "Тема обращения длиннее {} символов",
                TITLE_MAX_LEN
            ));
        }
        if self.body.trim().is_empty() {
            return Err("Текст обращения не может быть пустым".into());
        }
        if self.author_id.trim().is_empty() {
            return Err("Не указан автор обращения".into());
        }
        Ok(())
    }

    pub fn is_participant(&self, user_id: &str) -> bool {
        self.author_id == user_id || self.trainer_id.as_deref() == Some(user_id)
    }

    /// Применяет действие по таблице переходов и обновляет служебные поля.
    /// Права пользователя здесь не проверяются.
    pub fn apply_action(
        &mut self,
        action: InquiryAction,
        now: DateTime<Utc>,
    ) -> Result<InquiryStatus, TransitionError> {
        let to = next_status(self.status, action)?;
        match to {
            InquiryStatus::Closed => self.closed_at = Some(now),
            InquiryStatus::Reopened => {
                self.closed_at = None;
                self.reopen_count += 1;
            }
            _ => {}
        }
        self.status = to;
        self.last_activity_at = now;
        Ok(to)
    }

    pub fn assign_trainer(&mut self, trainer_id: Option<String>) {
        self.trainer_id = trainer_id;
    }

    pub fn set_answer(&mut self, answer: &str) -> Result<(), String> {
        let answer = answer.trim();
        if answer.is_empty() {
            return Err("Текст ответа не может быть пустым".into());
        }
        self.answer = Some(answer.to_string());
        Ok(())
    }

    /// Ограничения на переоткрытие: число раз и срок после закрытия
    pub fn check_reopen_limits(
        &self,
        now: DateTime<Utc>,
        max_reopens: i32,
        reopen_window_days: i64,
    ) -> Result<(), String> {
        if self.reopen_count >= max_reopens {
            return Err(format!(
                "Обращение уже переоткрывалось {} раз(а), лимит исчерпан",
                self.reopen_count
            ));
        }
        if let Some(closed_at) = self.closed_at {
            if now - closed_at > chrono::Duration::days(reopen_window_days) {
                return Err(format!(
                    "Обращение закрыто более {} дней назад",
                    reopen_window_days
                ));
            }
        }
        Ok(())
    }

    pub fn before_write(&mut self) {
        self.base.mark_changed();
    }
}

impl AggregateRoot for Inquiry {
    type Id = InquiryId;

    fn id(&self) -> Self::Id {
        self.base.id
    }

    fn code(&self) -> &str {
        &self.base.code
    }

    fn description(&self) -> &str {
        &self.base.description
    }

    fn metadata(&self) -> &EntityMetadata {
        &self.base.metadata
    }

    fn metadata_mut(&mut self) -> &mut EntityMetadata {
        &mut self.base.metadata
    }

    fn aggregate_index() -> &'static str {
        "a003"
    }

    fn collection_name() -> &'static str {
        "inquiry"
    }

    fn element_name() -> &'static str {
        "Обращение"
    }

    fn list_name() -> &'static str {
        "Обращения"
    }
}

// ============================================================================
// Forms / DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateInquiryDto {
    pub title: String,
    pub body: String,
    pub category_id: String,
}

/// Тело запроса POST /api/inquiries/:id/actions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InquiryActionRequest {
    pub action: InquiryAction,
    /// Обязателен для `answer`
    pub answer: Option<String>,
    /// Необязательный комментарий, попадает в переписку
    pub comment: Option<String>,
}

impl InquiryActionRequest {
    pub fn new(action: InquiryAction) -> Self {
        Self {
            action,
            answer: None,
            comment: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Inquiry {
        Inquiry::new_for_insert(
            "author-1".into(),
            CategoryId::new_v4(),
            " Cannot log in ".into(),
            "Password reset does not arrive".into(),
        )
    }

    #[test]
    fn test_code_format() {
        let id = InquiryId::new(uuid::Uuid::parse_str("1a2b3c4d-0000-4000-8000-000000000000").unwrap());
        let at = Utc.with_ymd_and_hms(2025, 3, 7, 10, 0, 0).unwrap();
        assert_eq!(generate_code(&id, at), "INQ-20250307-1A2B");
    }

    #[test]
    fn test_new_inquiry_is_opened_and_trimmed() {
        let inquiry = sample();
        assert_eq!(inquiry.status, InquiryStatus::Opened);
        assert_eq!(inquiry.title(), "Cannot log in");
        assert!(inquiry.base.code.starts_with("INQ-"));
        assert!(inquiry.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_long_title() {
        let mut inquiry = sample();
        inquiry.base.description = "x".repeat(TITLE_MAX_LEN + 1);
        assert!(inquiry.validate().is_err());
    }

    #[test]
    fn test_close_and_reopen_bookkeeping() {
        let mut inquiry = sample();
        let now = Utc::now();
        inquiry.apply_action(InquiryAction::Close, now).unwrap();
        assert_eq!(inquiry.closed_at, Some(now));

        inquiry.apply_action(InquiryAction::Reopen, now).unwrap();
        assert_eq!(inquiry.status, InquiryStatus::Reopened);
        assert_eq!(inquiry.closed_at, None);
        assert_eq!(inquiry.reopen_count, 1);
    }

    #[test]
    fn test_invalid_action_leaves_inquiry_untouched() {
        let mut inquiry = sample();
        let before = inquiry.last_activity_at;
        assert!(inquiry.apply_action(InquiryAction::Reopen, Utc::now()).is_err());
        assert_eq!(inquiry.status, InquiryStatus::Opened);
        assert_eq!(inquiry.last_activity_at, before);
    }

    #[test]
    fn test_reopen_limits() {
        let mut inquiry = sample();
        let closed = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        inquiry.apply_action(InquiryAction::Close, closed).unwrap();

        let soon = closed + chrono::Duration::days(3);
        assert!(inquiry.check_reopen_limits(soon, 3, 14).is_ok());

        let late = closed + chrono::Duration::days(15);
        assert!(inquiry.check_reopen_limits(late, 3, 14).is_err());

        inquiry.reopen_count = 3;
        assert!(inquiry.check_reopen_limits(soon, 3, 14).is_err());
    }

    #[test]
    fn test_answer_must_not_be_blank() {
        let mut inquiry = sample();
        assert!(inquiry.set_answer("   ").is_err());
        inquiry.set_answer(" Done ").unwrap();
        assert_eq!(inquiry.answer.as_deref(), Some("Done"));
    }

    #[test]
    fn test_participants() {
        let mut inquiry = sample();
        inquiry.assign_trainer(Some("trainer-1".into()));
        assert!(inquiry.is_participant("author-1"));
        assert!(inquiry.is_participant("trainer-1"));
        assert!(!inquiry.is_participant("someone"));
    }
}
