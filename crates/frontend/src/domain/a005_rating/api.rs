use contracts::domain::a005_rating::aggregate::{RateInquiryDto, Rating};

use crate::shared::api_utils::{get_json, put_json, ApiResult};

pub async fn get_rating(inquiry_id: &str) -> ApiResult<Option<Rating>> {
    get_json(&format!("/api/inquiries/{}/rating", inquiry_id)).await
}

/// Повторная оценка заменяет предыдущую
pub async fn rate_inquiry(inquiry_id: &str, dto: &RateInquiryDto) -> ApiResult<Rating> {
    put_json(&format!("/api/inquiries/{}/rating", inquiry_id), dto).await
}
