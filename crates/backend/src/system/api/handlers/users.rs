use axum::extract::{Json, Path};
use axum::http::StatusCode;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User, UserShort};

use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::auth::extractor::CurrentUser;
use crate::system::users::service;

/// GET /api/system/users (admin only)
pub async fn list(CurrentUser(_claims): CurrentUser) -> ServiceResult<Json<Vec<User>>> {
    Ok(Json(service::list_all().await?))
}

/// GET /api/system/users/trainers
pub async fn list_trainers(CurrentUser(_claims): CurrentUser) -> ServiceResult<Json<Vec<UserShort>>> {
    Ok(Json(service::list_trainers().await?))
}

/// GET /api/system/users/:id (admin only)
pub async fn get_by_id(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<Json<User>> {
    service::get_by_id(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ServiceError::not_found("Пользователь"))
}

/// POST /api/system/users (admin only)
pub async fn create(
    CurrentUser(claims): CurrentUser,
    Json(dto): Json<CreateUserDto>,
) -> ServiceResult<Json<serde_json::Value>> {
    let user_id = service::create(dto, Some(claims.sub)).await.map_err(|e| {
        tracing::error!("Failed to create user: {}", e);
        e
    })?;

    Ok(Json(serde_json::json!({"id": user_id})))
}

/// PUT /api/system/users/:id (admin only)
pub async fn update(
    CurrentUser(_claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<UpdateUserDto>,
) -> ServiceResult<StatusCode> {
    dto.id = id;
    service::update(dto).await.map_err(|e| {
        tracing::error!("Failed to update user: {}", e);
        e
    })?;
    Ok(StatusCode::OK)
}

/// DELETE /api/system/users/:id (admin only)
pub async fn delete(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
) -> ServiceResult<StatusCode> {
    if service::delete(&id, &claims.sub).await? {
        Ok(StatusCode::OK)
    } else {
        Err(ServiceError::not_found("Пользователь"))
    }
}

/// POST /api/system/users/:id/change-password
pub async fn change_password(
    CurrentUser(claims): CurrentUser,
    Path(id): Path<String>,
    Json(mut dto): Json<ChangePasswordDto>,
) -> ServiceResult<StatusCode> {
    dto.user_id = id;
    service::change_password(dto, &claims).await.map_err(|e| {
        tracing::error!("Failed to change password: {}", e);
        e
    })?;
    Ok(StatusCode::OK)
}
