use contracts::domain::a006_notification::aggregate::{
    Notification, NotificationListQuery, UnreadCount,
};
use contracts::shared::pagination::PageResponse;

use crate::shared::api_utils::{get_json, post_empty, with_query, ApiResult};

pub async fn fetch_notifications(
    query: &NotificationListQuery,
) -> ApiResult<PageResponse<Notification>> {
    get_json(&with_query("/api/notifications", query)?).await
}

/// Счётчик для колокольчика в шапке
pub async fn fetch_unread_count() -> ApiResult<UnreadCount> {
    get_json("/api/notifications/unread-count").await
}

pub async fn mark_read(id: &str) -> ApiResult<()> {
    post_empty(&format!("/api/notifications/{}/read", id)).await
}

pub async fn mark_all_read() -> ApiResult<()> {
    post_empty("/api/notifications/read-all").await
}
