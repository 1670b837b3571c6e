use contracts::domain::a002_category::aggregate::{Category, CategoryDto};
use serde::Serialize;

use crate::shared::api_utils::{delete, get_json, post_json, with_query, ApiResult, CreatedId};

#[derive(Serialize)]
struct CategoryListQuery {
    active_only: bool,
}

/// Категории; `active_only` для форм создания обращения
pub async fn fetch_categories(active_only: bool) -> ApiResult<Vec<Category>> {
    get_json(&with_query("/api/categories", &CategoryListQuery { active_only })?).await
}

pub async fn fetch_by_id(id: &str) -> ApiResult<Category> {
    get_json(&format!("/api/categories/{}", id)).await
}

pub async fn save_category(dto: &CategoryDto) -> ApiResult<String> {
    let saved: CreatedId = post_json("/api/categories", dto).await?;
    Ok(saved.id)
}

pub async fn delete_category(id: &str) -> ApiResult<()> {
    delete(&format!("/api/categories/{}", id)).await
}
