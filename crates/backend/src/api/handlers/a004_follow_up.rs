use axum::extract::{Json, Path, Query};
use contracts::domain::a004_follow_up::aggregate::{
    AnswerFollowUpDto, CreateFollowUpDto, FollowUpListQuery, FollowUpView,
};

use crate::domain::a004_follow_up::service;
use crate::shared::error::{parse_uuid, ServiceResult};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/inquiries/:id/follow-ups
pub async fn list_by_inquiry(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<Vec<FollowUpView>>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(service::list_by_inquiry(uuid, &claims).await?))
}

/// POST /api/inquiries/:id/follow-ups (маршрутизация в отдел)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<CreateFollowUpDto>,
) -> ServiceResult<Json<FollowUpView>> {
    let uuid = parse_uuid(&id)?;
    let view = service::create(uuid, dto, &claims).await.map_err(|e| {
        tracing::error!("Failed to route inquiry {}: {}", id, e);
        e
    })?;
    Ok(Json(view))
}

/// POST /api/follow-ups/:id/answer
pub async fn answer(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(dto): Json<AnswerFollowUpDto>,
) -> ServiceResult<Json<FollowUpView>> {
    let uuid = parse_uuid(&id)?;
    let view = service::answer(uuid, dto, &claims).await.map_err(|e| {
        tracing::error!("Failed to answer follow-up {}: {}", id, e);
        e
    })?;
    Ok(Json(view))
}

/// GET /api/follow-ups/section?status=pending
pub async fn list_for_section(
    CurrentUser(claims): CurrentUser,
    Query(query): Query<FollowUpListQuery>,
) -> ServiceResult<Json<Vec<FollowUpView>>> {
    Ok(Json(service::list_for_section(&query, &claims).await?))
}
