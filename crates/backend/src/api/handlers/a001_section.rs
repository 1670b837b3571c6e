use axum::extract::{Json, Path};
use axum::http::StatusCode;
use contracts::domain::a001_section::aggregate::{Section, SectionDto};
use contracts::system::users::Role;
use serde_json::json;

use crate::domain::a001_section;
use crate::shared::error::{parse_uuid, ServiceError, ServiceResult};
use crate::system::auth::extractor::{ensure_role, CurrentUser};

/// GET /api/sections
pub async fn list_all(CurrentUser(_claims): CurrentUser) -> ServiceResult<Json<Vec<Section>>> {
    Ok(Json(a001_section::service::list_all().await?))
}

/// GET /api/sections/:id
pub async fn get_by_id(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<Section>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(a001_section::service::get_existing(uuid).await?))
}

/// POST /api/sections (создание без id, обновление с id)
pub async fn upsert(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<SectionDto>,
) -> ServiceResult<Json<serde_json::Value>> {
    ensure_role(&claims, &[Role::Admin])?;
    let id = match dto.id.clone() {
        Some(id) => {
            a001_section::service::update(dto).await.map_err(|e| {
                tracing::error!("Failed to update section {}: {}", id, e);
                e
            })?;
            id
        }
        None => a001_section::service::create(dto)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create section: {}", e);
                e
            })?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/sections/:id
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    ensure_role(&claims, &[Role::Admin])?;
    let uuid = parse_uuid(&id)?;
    if a001_section::service::delete(uuid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("Отдел"))
    }
}
