use super::repository;
use contracts::domain::a003_inquiry::status::InquiryStatus;
use contracts::domain::a005_rating::aggregate::{RateInquiryDto, Rating};
use contracts::domain::a006_notification::aggregate::NotificationKind;
use contracts::system::auth::TokenClaims;
use uuid::Uuid;

use crate::domain::{a003_inquiry, a006_notification};
use crate::shared::error::{ServiceError, ServiceResult};

pub async fn get(inquiry_id: Uuid, claims: &TokenClaims) -> ServiceResult<Option<Rating>> {
    let (inquiry, _, _) = a003_inquiry::service::get_visible(inquiry_id, claims).await?;
    Ok(repository::get_by_inquiry(&inquiry.to_string_id()).await?)
}

/// Оценка автора. Повторная оценка заменяет предыдущую.
pub async fn rate(
    inquiry_id: Uuid,
    dto: RateInquiryDto,
    claims: &TokenClaims,
) -> ServiceResult<Rating> {
    let (inquiry, _, actor) = a003_inquiry::service::get_visible(inquiry_id, claims).await?;
    if !actor.is_author {
        return Err(ServiceError::Forbidden(
            "Оценить обращение может только его автор".into(),
        ));
    }
    if inquiry.status != InquiryStatus::Closed {
        return Err(ServiceError::Validation(
            "Оценить можно только закрытое обращение".into(),
        ));
    }

    let id = inquiry.to_string_id();
    let rating = match repository::get_by_inquiry(&id).await? {
        Some(mut existing) => {
            existing.replace(&dto).map_err(ServiceError::Validation)?;
            existing
        }
        None => Rating::new(inquiry.base.id, claims.sub.clone(), &dto)
            .map_err(ServiceError::Validation)?,
    };
    repository::upsert(&rating).await?;

    tracing::info!("Inquiry {} rated {} by {}", inquiry.base.code, rating.score, claims.username);

    if let Some(trainer_id) = &inquiry.trainer_id {
        a006_notification::service::notify(
            &[trainer_id.clone()],
            NotificationKind::InquiryRated,
            &format!(
                "{} (оценка {})",
                a003_inquiry::service::notification_body(&inquiry),
                rating.score
            ),
            Some(&id),
        )
        .await;
    }

    Ok(rating)
}
