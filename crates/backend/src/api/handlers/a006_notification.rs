use axum::extract::{Json, Path, Query};
use axum::http::StatusCode;
use contracts::domain::a006_notification::aggregate::{
    Notification, NotificationListQuery, UnreadCount,
};
use contracts::shared::pagination::PageResponse;

use crate::domain::a006_notification::service;
use crate::shared::error::{parse_uuid, ServiceResult};
use crate::system::auth::extractor::CurrentUser;

/// GET /api/notifications?unread_only=true&page=0
pub async fn list(
    user: CurrentUser,
    Query(query): Query<NotificationListQuery>,
) -> ServiceResult<Json<PageResponse<Notification>>> {
    Ok(Json(service::list(user.id(), &query).await?))
}

/// GET /api/notifications/unread-count
pub async fn unread_count(user: CurrentUser) -> ServiceResult<Json<UnreadCount>> {
    Ok(Json(service::unread_count(user.id()).await?))
}

/// POST /api/notifications/:id/read
pub async fn mark_read(
    user: CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    let uuid = parse_uuid(&id)?;
    service::mark_read(user.id(), uuid).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /api/notifications/read-all
pub async fn mark_all_read(
    user: CurrentUser,
) -> ServiceResult<Json<serde_json::Value>> {
    let updated = service::mark_all_read(user.id()).await?;
    Ok(Json(serde_json::json!({ "updated": updated })))
}
