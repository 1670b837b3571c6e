use serde::{Deserialize, Serialize};

use super::users::{display_name, Role, User};

/// POST /api/system/auth/login
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: UserInfo,
}

/// Обмен refresh token на новый access token; тем же телом делается logout
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
}

/// Карточка вошедшего пользователя: ответ /me и часть ответа на вход
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    pub id: String,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
    pub role: Role,
    pub section_id: Option<String>,
}

impl UserInfo {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn display_name(&self) -> String {
        display_name(&self.username, self.full_name.as_deref())
    }
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            username: user.username.clone(),
            full_name: user.full_name.clone(),
            email: user.email.clone(),
            role: user.role,
            section_id: user.section_id.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenClaims {
    /// id пользователя
    pub sub: String,
    pub username: String,
    pub role: Role,
    /// unix-время истечения и выдачи
    pub exp: usize,
    pub iat: usize,
}

impl TokenClaims {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}
