use axum::extract::{Json, Path};
use contracts::domain::a005_rating::aggregate::{RateInquiryDto, Rating};

use crate::domain::a005_rating::service;
use crate::shared::error::{parse_uuid, ServiceResult};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/inquiries/:id/rating
pub async fn get(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<Option<Rating>>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(service::get(uuid, &claims).await?))
}

/// PUT /api/inquiries/:id/rating
pub async fn rate(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<RateInquiryDto>,
) -> ServiceResult<Json<Rating>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(service::rate(uuid, dto, &claims).await?))
}
