use axum::{extract::Json, http::StatusCode};
use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use contracts::system::users::RegisterDto;

use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::auth::extractor::CurrentUser;
use crate::system::auth::jwt;
use crate::system::users::{repository as user_repository, service as user_service};

/// POST /api/system/auth/login
pub async fn login(Json(request): Json<LoginRequest>) -> Result<Json<LoginResponse>, StatusCode> {
    let user = user_service::verify_credentials(&request.username, &request.password)
        .await
        .map_err(|e| match e {
            ServiceError::Forbidden(_) => StatusCode::FORBIDDEN,
            other => {
                tracing::error!("Login failed: {}", other);
                StatusCode::INTERNAL_SERVER_ERROR
            }
        })?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.role)
        .await
        .map_err(|e| {
            tracing::error!("Failed to issue access token: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    let refresh_token = jwt::generate_refresh_token();
    user_repository::store_refresh_token(
        &user.id,
        &jwt::hash_token(&refresh_token),
        &jwt::calculate_refresh_token_expiration(),
    )
    .await
    .map_err(|e| {
        tracing::error!("Failed to store refresh token: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    tracing::info!("User {} logged in", user.username);

    Ok(Json(LoginResponse {
        access_token,
        refresh_token,
        user: UserInfo::from(&user),
    }))
}

/// POST /api/system/auth/refresh
pub async fn refresh(
    Json(request): Json<RefreshRequest>,
) -> Result<Json<RefreshResponse>, StatusCode> {
    let user_id = user_repository::find_refresh_token_owner(&jwt::hash_token(&request.refresh_token))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let user = user_repository::get_by_id(&user_id)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .filter(|u| u.is_active)
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let access_token = jwt::generate_access_token(&user.id, &user.username, user.role)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(Json(RefreshResponse { access_token }))
}

/// POST /api/system/auth/logout
pub async fn logout(Json(request): Json<RefreshRequest>) -> Result<StatusCode, StatusCode> {
    user_repository::revoke_refresh_token(&jwt::hash_token(&request.refresh_token))
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(StatusCode::OK)
}

/// POST /api/system/auth/register
pub async fn register(Json(dto): Json<RegisterDto>) -> ServiceResult<Json<serde_json::Value>> {
    let id = user_service::register(dto).await?;
    Ok(Json(serde_json::json!({ "id": id })))
}

/// GET /api/system/auth/me
pub async fn current_user(CurrentUser(claims): CurrentUser) -> ServiceResult<Json<UserInfo>> {
    let user = user_service::get_by_id(&claims.sub)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь"))?;

    Ok(Json(UserInfo::from(&user)))
}
