use super::repository;
use contracts::domain::a001_section::aggregate::SectionId;
use contracts::domain::a002_category::aggregate::{Category, CategoryDto};
use serde::Deserialize;
use std::collections::HashMap;
use uuid::Uuid;

use crate::domain::a001_section;
use crate::shared::error::{parse_uuid, ServiceError, ServiceResult};

#[derive(Debug, Default, Deserialize)]
pub struct CategoryListQuery {
    #[serde(default)]
    pub active_only: bool,
}

async fn ensure_section(section_id: Option<SectionId>) -> ServiceResult<()> {
    if let Some(id) = section_id {
        a001_section::service::get_existing(id.value()).await?;
    }
    Ok(())
}

pub async fn create(dto: CategoryDto) -> ServiceResult<Uuid> {
    let section_id = dto.parse_section_id().map_err(ServiceError::Validation)?;
    let code = dto
        .code
        .as_deref()
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| format!("CAT-{}", &Uuid::new_v4().simple().to_string()[..8].to_uppercase()));

    let mut aggregate = Category::new_for_insert(
        code,
        dto.description.trim().to_string(),
        section_id,
        dto.comment.clone(),
        dto.is_active,
    );

    aggregate.validate().map_err(ServiceError::Validation)?;
    ensure_section(aggregate.section_id).await?;

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Category {} created", aggregate.base.description);
    Ok(id)
}

pub async fn update(dto: CategoryDto) -> ServiceResult<()> {
    let id = parse_uuid(dto.id.as_deref().unwrap_or_default())?;
    let mut aggregate = get_existing(id).await?;

    aggregate.update(&dto).map_err(ServiceError::Validation)?;
    aggregate.validate().map_err(ServiceError::Validation)?;
    ensure_section(aggregate.section_id).await?;

    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> ServiceResult<bool> {
    Ok(repository::soft_delete(id).await?)
}

pub async fn get_by_id(id: Uuid) -> ServiceResult<Option<Category>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|c| !c.base.metadata.is_deleted))
}

pub async fn get_existing(id: Uuid) -> ServiceResult<Category> {
    get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Категория"))
}

pub async fn list(query: &CategoryListQuery) -> ServiceResult<Vec<Category>> {
    Ok(repository::list_all(query.active_only).await?)
}

/// id -> наименование
pub async fn names() -> anyhow::Result<HashMap<String, String>> {
    Ok(repository::list_all(false)
        .await?
        .into_iter()
        .map(|c| (c.base.id.value().to_string(), c.base.description))
        .collect())
}
