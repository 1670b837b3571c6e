use crate::domain::a003_inquiry::aggregate::InquiryId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const MIN_SCORE: i32 = 1;
pub const MAX_SCORE: i32 = 5;

/// Оценка автора по закрытому обращению
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub id: Uuid,
    pub inquiry_id: InquiryId,
    pub user_id: String,
    pub score: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Rating {
    pub fn new(inquiry_id: InquiryId, user_id: String, dto: &RateInquiryDto) -> Result<Self, String> {
        dto.validate()?;
        Ok(Self {
            id: Uuid::new_v4(),
            inquiry_id,
            user_id,
            score: dto.score,
            comment: dto.normalized_comment(),
            created_at: Utc::now(),
        })
    }

    /// Повторная оценка заменяет предыдущую
    pub fn replace(&mut self, dto: &RateInquiryDto) -> Result<(), String> {
        dto.validate()?;
        self.score = dto.score;
        self.comment = dto.normalized_comment();
        self.created_at = Utc::now();
        Ok(())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RateInquiryDto {
    pub score: i32,
    pub comment: Option<String>,
}

impl RateInquiryDto {
    pub fn validate(&self) -> Result<(), String> {
        if !(MIN_SCORE..=MAX_SCORE).contains(&self.score) {
            return Err(format!(
                "Оценка должна быть от {} до {}",
                MIN_SCORE, MAX_SCORE
            ));
        }
        Ok(())
    }

    fn normalized_comment(&self) -> Option<String> {
        self.comment
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string)
    }
}

/// Среднее по набору оценок, `None` для пустого набора
pub fn average_score(scores: &[i32]) -> Option<f64> {
    if scores.is_empty() {
        return None;
    }
    Some(scores.iter().map(|s| *s as f64).sum::<f64>() / scores.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bounds() {
        for score in [0, 6, -1] {
            let dto = RateInquiryDto { score, comment: None };
            assert!(dto.validate().is_err(), "score {} must be rejected", score);
        }
        for score in MIN_SCORE..=MAX_SCORE {
            let dto = RateInquiryDto { score, comment: None };
            assert!(dto.validate().is_ok());
        }
    }

    #[test]
    fn test_replace_keeps_identity() {
        let inquiry_id = InquiryId::new_v4();
        let mut rating = Rating::new(
            inquiry_id,
            "author-1".into(),
            &RateInquiryDto {
                score: 2,
                comment: Some("  slow ".into()),
            },
        )
        .unwrap();
        assert_eq!(rating.comment.as_deref(), Some("slow"));

        let id = rating.id;
        rating
            .replace(&RateInquiryDto {
                score: 5,
                comment: Some(" ".into()),
            })
            .unwrap();
        assert_eq!(rating.id, id);
        assert_eq!(rating.score, 5);
        assert_eq!(rating.comment, None);
    }

    #[test]
    fn test_average_score() {
        assert_eq!(average_score(&[]), None);
        assert_eq!(average_score(&[4, 5]), Some(4.5));
    }
}
