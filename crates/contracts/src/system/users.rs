use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Роль пользователя в системе обращений
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Trainer,
    Assistant,
    #[default]
    User,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Trainer, Role::Assistant, Role::User];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Trainer => "trainer",
            Role::Assistant => "assistant",
            Role::User => "user",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Admin => "Администратор",
            Role::Trainer => "Тренер",
            Role::Assistant => "Ассистент",
            Role::User => "Пользователь",
        }
    }

    /// Роли, которые отвечают на обращения
    pub fn is_staff(&self) -> bool {
        matches!(self, Role::Admin | Role::Trainer | Role::Assistant)
    }

    /// Assistants always work inside a section.
    pub fn requires_section(&self) -> bool {
        matches!(self, Role::Assistant)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "trainer" => Ok(Role::Trainer),
            "assistant" => Ok(Role::Assistant),
            "user" => Ok(Role::User),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub section_id: Option<String>,
    pub is_active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub last_login_at: Option<String>,
    pub created_by: Option<String>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// ФИО, если задано, иначе логин
    pub fn display_name(&self) -> String {
        display_name(&self.username, self.full_name.as_deref())
    }
}

pub fn display_name(username: &str, full_name: Option<&str>) -> String {
    match full_name {
        Some(name) if !name.trim().is_empty() => name.trim().to_string(),
        _ => username.to_string(),
    }
}

/// Краткая карточка пользователя для пикеров и колонок доски
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserShort {
    pub id: String,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    pub section_id: Option<String>,
    pub is_active: bool,
}

impl From<&User> for UserShort {
    fn from(u: &User) -> Self {
        Self {
            id: u.id.clone(),
            username: u.username.clone(),
            display_name: u.display_name(),
            role: u.role,
            section_id: u.section_id.clone(),
            is_active: u.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateUserDto {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub section_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateUserDto {
    pub id: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub role: Role,
    pub section_id: Option<String>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangePasswordDto {
    pub user_id: String,
    pub old_password: Option<String>, // None if admin changing someone else's password
    pub new_password: String,
}

/// Self-service registration, always creates a plain user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterDto {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub full_name: Option<String>,
}

impl From<RegisterDto> for CreateUserDto {
    fn from(dto: RegisterDto) -> Self {
        Self {
            username: dto.username,
            password: dto.password,
            email: dto.email,
            full_name: dto.full_name,
            role: Role::User,
            section_id: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parse_and_display() {
        for role in Role::ALL {
            assert_eq!(role.as_str().parse::<Role>().unwrap(), role);
        }
        assert_eq!(" Trainer ".parse::<Role>().unwrap(), Role::Trainer);
        assert!("root".parse::<Role>().is_err());
    }

    #[test]
    fn test_role_serde_is_lowercase() {
        let json = serde_json::to_string(&Role::Assistant).unwrap();
        assert_eq!(json, "\"assistant\"");
    }

    #[test]
    fn test_display_name_falls_back_to_username() {
        assert_eq!(display_name("ivanov", None), "ivanov");
        assert_eq!(display_name("ivanov", Some("  ")), "ivanov");
        assert_eq!(display_name("ivanov", Some("Иван Иванов")), "Иван Иванов");
    }

    #[test]
    fn test_register_always_creates_plain_user() {
        let dto = RegisterDto {
            username: "u".into(),
            password: "pass".into(),
            email: None,
            full_name: None,
        };
        let create: CreateUserDto = dto.into();
        assert_eq!(create.role, Role::User);
        assert!(create.section_id.is_none());
    }
}
