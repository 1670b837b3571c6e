use crate::domain::a001_section::aggregate::SectionId;
use crate::domain::a003_inquiry::aggregate::InquiryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpStatus {
    #[default]
    Pending,
    Answered,
}

impl FollowUpStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Answered => "answered",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Ожидает ответа",
            Self::Answered => "Отвечен",
        }
    }
}

impl std::str::FromStr for FollowUpStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "answered" => Ok(Self::Answered),
            other => Err(format!("Unknown follow-up status: {}", other)),
        }
    }
}

/// Запрос в отдел по обращению (маршрутизация)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: Uuid,
    pub inquiry_id: InquiryId,
    pub section_id: SectionId,
    pub author_id: String,
    pub body: String,
    pub status: FollowUpStatus,
    pub answer: Option<String>,
    pub answered_by: Option<String>,
    pub created_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
}

impl FollowUp {
    pub fn new(
        inquiry_id: InquiryId,
        section_id: SectionId,
        author_id: String,
        body: String,
    ) -> Result<Self, String> {
        let body = body.trim();
        if body.is_empty() {
            return Err("Текст запроса в отдел не может быть пустым".into());
        }
        Ok(Self {
            id: Uuid::new_v4(),
            inquiry_id,
            section_id,
            author_id,
            body: body.to_string(),
            status: FollowUpStatus::Pending,
            answer: None,
            answered_by: None,
            created_at: Utc::now(),
            answered_at: None,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.status == FollowUpStatus::Pending
    }

    /// Записывает ответ отдела. Повторный ответ запрещён.
    pub fn answer(
        &mut self,
        answered_by: &str,
        answer: &str,
        now: DateTime<Utc>,
    ) -> Result<(), String> {
        if !self.is_pending() {
            return Err("На запрос уже получен ответ".into());
        }
        let answer = answer.trim();
        if answer.is_empty() {
            return Err("Текст ответа не может быть пустым".into());
        }
        self.status = FollowUpStatus::Answered;
        self.answer = Some(answer.to_string());
        self.answered_by = Some(answered_by.to_string());
        self.answered_at = Some(now);
        Ok(())
    }

    /// Время ответа в часах
    pub fn answer_hours(&self) -> Option<f64> {
        self.answered_at
            .map(|at| (at - self.created_at).num_seconds() as f64 / 3600.0)
    }
}

// ============================================================================
// DTOs
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateFollowUpDto {
    pub section_id: String,
    pub body: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnswerFollowUpDto {
    pub answer: String,
}

/// Запрос в отдел с подставленными наименованиями
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUpView {
    #[serde(flatten)]
    pub follow_up: FollowUp,
    pub section_name: String,
    pub author_name: String,
    pub answered_by_name: Option<String>,
    /// Код и тема обращения (для входящих ассистента)
    pub inquiry_code: String,
    pub inquiry_title: String,
}

/// Входящие запросы отдела (GET /api/follow-ups/section)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FollowUpListQuery {
    /// Только для администратора; ассистент всегда видит свой отдел
    #[serde(default)]
    pub section_id: Option<String>,
    #[serde(default)]
    pub status: Option<FollowUpStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FollowUp {
        FollowUp::new(
            InquiryId::new_v4(),
            SectionId::new_v4(),
            "trainer-1".into(),
            "Please check the billing account".into(),
        )
        .unwrap()
    }

    #[test]
    fn test_blank_body_rejected() {
        let result = FollowUp::new(
            InquiryId::new_v4(),
            SectionId::new_v4(),
            "trainer-1".into(),
            "  ".into(),
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_answer_once() {
        let mut follow_up = sample();
        let now = follow_up.created_at + chrono::Duration::hours(2);
        follow_up.answer("assistant-1", " Fixed ", now).unwrap();
        assert_eq!(follow_up.status, FollowUpStatus::Answered);
        assert_eq!(follow_up.answer.as_deref(), Some("Fixed"));
        assert_eq!(follow_up.answer_hours(), Some(2.0));

        assert!(follow_up.answer("assistant-1", "Again", now).is_err());
    }

    #[test]
    fn test_blank_answer_keeps_pending() {
        let mut follow_up = sample();
        assert!(follow_up.answer("assistant-1", "", Utc::now()).is_err());
        assert!(follow_up.is_pending());
        assert_eq!(follow_up.answer_hours(), None);
    }
}
