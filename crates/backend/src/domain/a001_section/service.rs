use super::repository;
use contracts::domain::a001_section::aggregate::{Section, SectionDto};
use std::collections::HashMap;
use uuid::Uuid;

use crate::shared::error::{parse_uuid, ServiceError, ServiceResult};

/// Короткий код по умолчанию: SEC-XXXXXXXX
fn default_code(id: &Uuid) -> String {
    format!("SEC-{}", &id.simple().to_string()[..8].to_uppercase())
}

pub async fn create(dto: SectionDto) -> ServiceResult<Uuid> {
    let mut aggregate = Section::new_for_insert(
        String::new(),
        dto.description.trim().to_string(),
        dto.comment.clone(),
        dto.is_active,
    );
    aggregate.base.code = match dto.code.as_deref().map(str::trim).filter(|c| !c.is_empty()) {
        Some(code) => code.to_string(),
        None => default_code(&aggregate.base.id.value()),
    };

    aggregate.validate().map_err(ServiceError::Validation)?;
    if repository::get_by_code(&aggregate.base.code).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Отдел с кодом {} уже существует",
            aggregate.base.code
        )));
    }

    aggregate.before_write();
    let id = repository::insert(&aggregate).await?;
    tracing::info!("Section {} created", aggregate.base.code);
    Ok(id)
}

pub async fn update(dto: SectionDto) -> ServiceResult<()> {
    let id = parse_uuid(dto.id.as_deref().unwrap_or_default())?;
    let mut aggregate = get_existing(id).await?;

    aggregate.update(&dto);
    aggregate.validate().map_err(ServiceError::Validation)?;
    if let Some(other) = repository::get_by_code(&aggregate.base.code).await? {
        if other.base.id != aggregate.base.id {
            return Err(ServiceError::Conflict(format!(
                "Отдел с кодом {} уже существует",
                aggregate.base.code
            )));
        }
    }

    aggregate.before_write();
    repository::update(&aggregate).await?;
    Ok(())
}

pub async fn delete(id: Uuid) -> ServiceResult<bool> {
    Ok(repository::soft_delete(id).await?)
}

pub async fn get_by_id(id: Uuid) -> ServiceResult<Option<Section>> {
    Ok(repository::get_by_id(id)
        .await?
        .filter(|s| !s.base.metadata.is_deleted))
}

/// Отдел, который существует и не удалён
pub async fn get_existing(id: Uuid) -> ServiceResult<Section> {
    get_by_id(id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Отдел"))
}

pub async fn list_all() -> ServiceResult<Vec<Section>> {
    Ok(repository::list_all().await?)
}

/// id -> наименование (включая неактивные)
pub async fn names() -> anyhow::Result<HashMap<String, String>> {
    Ok(repository::list_all()
        .await?
        .into_iter()
        .map(|s| (s.base.id.value().to_string(), s.base.description))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_code() {
        let id = Uuid::parse_str("0f1e2d3c-4b5a-4968-8776-655443322110").unwrap();
        assert_eq!(default_code(&id), "SEC-0F1E2D3C");
    }
}
