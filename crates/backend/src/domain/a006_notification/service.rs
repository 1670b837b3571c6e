use super::repository;
use chrono::Utc;
use contracts::domain::a006_notification::aggregate::{
    Notification, NotificationKind, NotificationListQuery, UnreadCount,
};
use contracts::shared::pagination::PageResponse;
use uuid::Uuid;

use crate::shared::config;
use crate::shared::error::{ServiceError, ServiceResult};

/// Получатели уведомления: без пустых, без повторов и без автора события
pub fn recipients<'a>(
    candidates: impl IntoIterator<Item = &'a str>,
    actor_id: &str,
) -> Vec<String> {
    let mut result: Vec<String> = Vec::new();
    for id in candidates {
        if id.is_empty() || id == actor_id || result.iter().any(|r| r == id) {
            continue;
        }
        result.push(id.to_string());
    }
    result
}

/// Создаёт уведомления. Ошибка записи не прерывает основную операцию.
pub async fn notify(
    user_ids: &[String],
    kind: NotificationKind,
    body: &str,
    inquiry_id: Option<&str>,
) {
    for user_id in user_ids {
        let notification = Notification::new(
            user_id.as_str(),
            kind,
            body,
            inquiry_id.map(str::to_string),
        );
        if let Err(e) = repository::insert(&notification).await {
            tracing::warn!(
                "Failed to store notification {} for {}: {}",
                kind.as_str(),
                user_id,
                e
            );
        }
    }
}

pub async fn list(
    user_id: &str,
    query: &NotificationListQuery,
) -> ServiceResult<PageResponse<Notification>> {
    let items = repository::list_for_user(user_id, query.unread_only).await?;
    Ok(PageResponse::paginate(items, query.page, query.page_size))
}

pub async fn unread_count(user_id: &str) -> ServiceResult<UnreadCount> {
    Ok(UnreadCount {
        count: repository::count_unread(user_id).await?,
        poll_interval_secs: config::get().notifications.poll_interval_secs,
    })
}

pub async fn mark_read(user_id: &str, id: Uuid) -> ServiceResult<()> {
    if repository::mark_read(user_id, id).await? {
        Ok(())
    } else {
        Err(ServiceError::not_found("Уведомление"))
    }
}

pub async fn mark_all_read(user_id: &str) -> ServiceResult<u64> {
    Ok(repository::mark_all_read(user_id).await?)
}

/// Удаляет прочитанные уведомления старше `retention_days`
pub async fn delete_old_read(retention_days: i64) -> anyhow::Result<u64> {
    let before = Utc::now() - chrono::Duration::days(retention_days.max(0));
    repository::delete_read_before(before).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recipients_skip_actor_and_duplicates() {
        let result = recipients(["t1", "a1", "t1", "", "a2"], "a1");
        assert_eq!(result, vec!["t1".to_string(), "a2".to_string()]);
    }

    #[test]
    fn test_recipients_empty_when_only_actor() {
        assert!(recipients(["a1"], "a1").is_empty());
    }
}
