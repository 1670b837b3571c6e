use contracts::system::users::{
    ChangePasswordDto, CreateUserDto, UpdateUserDto, User, UserShort,
};

use crate::shared::api_utils::{
    delete, get_json, post_json, post_unit, put_unit, ApiResult, CreatedId,
};

/// Список всех пользователей (только admin)
pub async fn fetch_users() -> ApiResult<Vec<User>> {
    get_json("/api/system/users").await
}

/// Активные тренеры для фильтров и доски распределения
pub async fn fetch_trainers() -> ApiResult<Vec<UserShort>> {
    get_json("/api/system/users/trainers").await
}

pub async fn create_user(dto: &CreateUserDto) -> ApiResult<String> {
    let created: CreatedId = post_json("/api/system/users", dto).await?;
    Ok(created.id)
}

pub async fn update_user(dto: &UpdateUserDto) -> ApiResult<()> {
    put_unit(&format!("/api/system/users/{}", dto.id), dto).await
}

pub async fn delete_user(id: &str) -> ApiResult<()> {
    delete(&format!("/api/system/users/{}", id)).await
}

/// Смена пароля. Для своего пароля нужен `old_password`,
/// администратор может сбросить чужой без него.
pub async fn change_password(dto: &ChangePasswordDto) -> ApiResult<()> {
    post_unit(
        &format!("/api/system/users/{}/change-password", dto.user_id),
        dto,
    )
    .await
}
