use contracts::domain::a001_section::aggregate::{Section, SectionDto};

use crate::shared::api_utils::{delete, get_json, post_json, ApiResult, CreatedId};

pub async fn fetch_sections() -> ApiResult<Vec<Section>> {
    get_json("/api/sections").await
}

pub async fn fetch_by_id(id: &str) -> ApiResult<Section> {
    get_json(&format!("/api/sections/{}", id)).await
}

/// Создание или обновление (по наличию `dto.id`), возвращает id отдела
pub async fn save_section(dto: &SectionDto) -> ApiResult<String> {
    let saved: CreatedId = post_json("/api/sections", dto).await?;
    Ok(saved.id)
}

pub async fn delete_section(id: &str) -> ApiResult<()> {
    delete(&format!("/api/sections/{}", id)).await
}
