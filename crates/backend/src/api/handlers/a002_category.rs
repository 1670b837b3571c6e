use axum::extract::{Json, Path, Query};
use axum::http::StatusCode;
use contracts::domain::a002_category::aggregate::{Category, CategoryDto};
use contracts::system::users::Role;
use serde_json::json;

use crate::domain::a002_category::{self, service::CategoryListQuery};
use crate::shared::error::{parse_uuid, ServiceError, ServiceResult};
use crate::system::auth::extractor::{ensure_role, CurrentUser};

/// GET /api/categories?active_only=true
pub async fn list(
    CurrentUser(_claims): CurrentUser,
    Query(query): Query<CategoryListQuery>,
) -> ServiceResult<Json<Vec<Category>>> {
    Ok(Json(a002_category::service::list(&query).await?))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<Category>> {
    let uuid = parse_uuid(&id)?;
    Ok(Json(a002_category::service::get_existing(uuid).await?))
}

/// POST /api/categories (создание без id, обновление с id)
pub async fn upsert(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CategoryDto>,
) -> ServiceResult<Json<serde_json::Value>> {
    ensure_role(&claims, &[Role::Admin])?;
    let id = match dto.id.clone() {
        Some(id) => {
            a002_category::service::update(dto).await.map_err(|e| {
                tracing::error!("Failed to update category {}: {}", id, e);
                e
            })?;
            id
        }
        None => a002_category::service::create(dto)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create category: {}", e);
                e
            })?
            .to_string(),
    };
    Ok(Json(json!({ "id": id })))
}

/// DELETE /api/categories/:id
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    ensure_role(&claims, &[Role::Admin])?;
    let uuid = parse_uuid(&id)?;
    if a002_category::service::delete(uuid).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ServiceError::not_found("Категория"))
    }
}
