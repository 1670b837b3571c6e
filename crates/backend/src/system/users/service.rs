use chrono::Utc;
use contracts::system::auth::TokenClaims;
use contracts::system::users::{
    ChangePasswordDto, CreateUserDto, RegisterDto, Role, UpdateUserDto, User, UserShort,
};
use std::collections::HashMap;

use super::repository;
use crate::domain::a001_section;
use crate::shared::config;
use crate::shared::error::{parse_uuid, ServiceError, ServiceResult};
use crate::system::auth::password;

/// Проверки полей, не требующие базы
pub fn validate_profile(
    email: Option<&str>,
    role: Role,
    section_id: Option<&str>,
) -> Result<(), String> {
    if let Some(email) = email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err("Некорректный email".into());
        }
    }
    let has_section = section_id.map_or(false, |s| !s.trim().is_empty());
    if role.requires_section() && !has_section {
        return Err("Для ассистента необходимо указать отдел".into());
    }
    Ok(())
}

/// Отдел храним только у ролей, которым он нужен
fn normalize_section(role: Role, section_id: Option<String>) -> Option<String> {
    section_id
        .filter(|_| role.requires_section())
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

async fn ensure_section_exists(section_id: Option<&str>) -> ServiceResult<()> {
    if let Some(id) = section_id {
        let uuid = parse_uuid(id)?;
        let section = a001_section::repository::get_by_id(uuid).await?;
        if section.map_or(true, |s| s.base.metadata.is_deleted) {
            return Err(ServiceError::Validation(format!("Отдел {} не найден", id)));
        }
    }
    Ok(())
}

/// Create a new user
pub async fn create(dto: CreateUserDto, created_by: Option<String>) -> ServiceResult<String> {
    let username = dto.username.trim().to_string();
    if username.is_empty() {
        return Err(ServiceError::Validation("Логин не может быть пустым".into()));
    }
    if repository::get_by_username(&username).await?.is_some() {
        return Err(ServiceError::Conflict(format!(
            "Пользователь {} уже существует",
            username
        )));
    }

    let section_id = normalize_section(dto.role, dto.section_id);
    validate_profile(dto.email.as_deref(), dto.role, section_id.as_deref())
        .map_err(ServiceError::Validation)?;
    ensure_section_exists(section_id.as_deref()).await?;
    password::validate_password_strength(&dto.password).map_err(ServiceError::Validation)?;

    let password_hash = password::hash_password(&dto.password)?;

    let user_id = uuid::Uuid::new_v4().to_string();
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: user_id.clone(),
        username,
        email: dto.email,
        full_name: dto.full_name,
        role: dto.role,
        section_id,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(&user, &password_hash).await?;
    tracing::info!("User {} created with role {}", user.username, user.role);

    Ok(user_id)
}

/// Самостоятельная регистрация (только роль `user`)
pub async fn register(dto: RegisterDto) -> ServiceResult<String> {
    if !config::get().auth.allow_registration {
        return Err(ServiceError::Forbidden("Регистрация отключена".into()));
    }
    create(dto.into(), None).await
}

pub async fn update(dto: UpdateUserDto) -> ServiceResult<()> {
    let mut user = repository::get_by_id(&dto.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь"))?;

    let section_id = normalize_section(dto.role, dto.section_id);
    validate_profile(dto.email.as_deref(), dto.role, section_id.as_deref())
        .map_err(ServiceError::Validation)?;
    ensure_section_exists(section_id.as_deref()).await?;

    user.email = dto.email;
    user.full_name = dto.full_name;
    user.role = dto.role;
    user.section_id = section_id;
    user.is_active = dto.is_active;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(&user).await?;
    Ok(())
}

pub async fn delete(id: &str, requester_id: &str) -> ServiceResult<bool> {
    if id == requester_id {
        return Err(ServiceError::Validation(
            "Нельзя удалить собственную учётную запись".into(),
        ));
    }
    Ok(repository::delete(id).await?)
}

pub async fn get_by_id(id: &str) -> ServiceResult<Option<User>> {
    Ok(repository::get_by_id(id).await?)
}

pub async fn list_all() -> ServiceResult<Vec<User>> {
    Ok(repository::list_all().await?)
}

/// Активные тренеры для пикеров и доски
pub async fn list_trainers() -> ServiceResult<Vec<UserShort>> {
    let users = repository::list_by_role(Role::Trainer).await?;
    Ok(users.iter().map(UserShort::from).collect())
}

/// id -> отображаемое имя для всех пользователей
pub async fn display_names() -> anyhow::Result<HashMap<String, String>> {
    Ok(repository::list_all()
        .await?
        .into_iter()
        .map(|u| {
            let name = u.display_name();
            (u.id, name)
        })
        .collect())
}

/// Change user password
pub async fn change_password(dto: ChangePasswordDto, requester: &TokenClaims) -> ServiceResult<()> {
    repository::get_by_id(&dto.user_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пользователь"))?;

    if dto.user_id != requester.sub {
        // Чужой пароль меняет только администратор, без старого пароля
        if !requester.is_admin() {
            return Err(ServiceError::forbidden());
        }
    } else {
        let old_password = dto
            .old_password
            .as_deref()
            .ok_or_else(|| ServiceError::Validation("Укажите текущий пароль".into()))?;
        let current_hash = repository::get_password_hash(&dto.user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Пароль пользователя"))?;
        if !password::verify_password(old_password, &current_hash)? {
            return Err(ServiceError::Validation("Неверный текущий пароль".into()));
        }
    }

    password::validate_password_strength(&dto.new_password).map_err(ServiceError::Validation)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password(&dto.user_id, &new_hash).await?;

    Ok(())
}

/// Verify user credentials (for login)
pub async fn verify_credentials(username: &str, password: &str) -> ServiceResult<Option<User>> {
    let user = match repository::get_by_username(username.trim()).await? {
        Some(u) => u,
        None => return Ok(None),
    };

    if !user.is_active {
        return Err(ServiceError::Forbidden("Учётная запись отключена".into()));
    }

    let password_hash = repository::get_password_hash(&user.id)
        .await?
        .ok_or_else(|| ServiceError::not_found("Пароль пользователя"))?;

    if !password::verify_password(password, &password_hash)? {
        return Ok(None);
    }

    if let Err(e) = repository::update_last_login(&user.id).await {
        tracing::warn!("Failed to update last login for {}: {}", user.username, e);
    }

    Ok(Some(user))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assistant_requires_section() {
        assert!(validate_profile(None, Role::Assistant, None).is_err());
        assert!(validate_profile(None, Role::Assistant, Some("  ")).is_err());
        assert!(validate_profile(None, Role::Assistant, Some("sec-1")).is_ok());
        assert!(validate_profile(None, Role::Trainer, None).is_ok());
    }

    #[test]
    fn test_email_format() {
        assert!(validate_profile(Some("anna"), Role::User, None).is_err());
        assert!(validate_profile(Some("anna@example.com"), Role::User, None).is_ok());
        assert!(validate_profile(Some(""), Role::User, None).is_ok());
    }

    #[test]
    fn test_normalize_section() {
        assert_eq!(normalize_section(Role::Assistant, Some(" ".into())), None);
        assert_eq!(
            normalize_section(Role::Assistant, Some(" s1 ".into())),
            Some("s1".into())
        );
    }

    #[test]
    fn test_section_dropped_for_roles_without_it() {
        assert_eq!(normalize_section(Role::Trainer, Some("s1".into())), None);
        assert_eq!(normalize_section(Role::Admin, Some("s1".into())), None);
        assert_eq!(normalize_section(Role::User, Some("s1".into())), None);
    }
}
