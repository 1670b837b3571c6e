//! Публичные эндпоинты авторизации.
//!
//! Они идут мимо `shared::api_utils`: там 401 означает выход из системы,
//! а здесь это обычный ответ «неверный логин или пароль».

use contracts::system::auth::{
    LoginRequest, LoginResponse, RefreshRequest, RefreshResponse, UserInfo,
};
use contracts::system::users::RegisterDto;
use gloo_net::http::Request;

use crate::shared::api_utils::{api_base, error_message, ApiError};

/// Login with username and password
pub async fn login(username: String, password: String) -> Result<LoginResponse, ApiError> {
    let request = LoginRequest { username, password };

    let response = Request::post(&format!("{}/api/system/auth/login", api_base()))
        .json(&request)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    match response.status() {
        401 => Err(ApiError::Http(401, "Неверный логин или пароль".into())),
        status if !response.ok() => Err(ApiError::Http(status, error_message(response).await)),
        _ => response
            .json::<LoginResponse>()
            .await
            .map_err(|e| ApiError::Parse(e.to_string())),
    }
}

/// Self-service registration; the server decides whether it is enabled
pub async fn register(dto: &RegisterDto) -> Result<(), ApiError> {
    let response = Request::post(&format!("{}/api/system/auth/register", api_base()))
        .json(dto)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        return Err(ApiError::Http(status, error_message(response).await));
    }
    Ok(())
}

/// Refresh access token using refresh token
pub async fn refresh_token(refresh_token: String) -> Result<RefreshResponse, ApiError> {
    let request = RefreshRequest { refresh_token };

    let response = Request::post(&format!("{}/api/system/auth/refresh", api_base()))
        .json(&request)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        return Err(ApiError::Unauthorized);
    }

    response
        .json::<RefreshResponse>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

/// Logout (revoke refresh token)
pub async fn logout(refresh_token: String) -> Result<(), ApiError> {
    let request = RefreshRequest { refresh_token };

    let response = Request::post(&format!("{}/api/system/auth/logout", api_base()))
        .json(&request)
        .map_err(|e| ApiError::Parse(e.to_string()))?
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        return Err(ApiError::Http(status, error_message(response).await));
    }

    Ok(())
}

/// Get current user info
pub async fn get_current_user(access_token: &str) -> Result<UserInfo, ApiError> {
    let response = Request::get(&format!("{}/api/system/auth/me", api_base()))
        .header("Authorization", &format!("Bearer {}", access_token))
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if response.status() == 401 {
        return Err(ApiError::Unauthorized);
    }
    if !response.ok() {
        let status = response.status();
        return Err(ApiError::Http(status, error_message(response).await));
    }

    response
        .json::<UserInfo>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}
