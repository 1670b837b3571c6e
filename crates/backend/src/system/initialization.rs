use anyhow::Result;
use contracts::system::users::{CreateUserDto, Role};

use crate::domain::a006_notification;
use crate::shared::config::Config;
use crate::system::users::{repository, service};

const BOOTSTRAP_LOGIN: &str = "admin";

fn bootstrap_admin() -> CreateUserDto {
    CreateUserDto {
        username: BOOTSTRAP_LOGIN.to_string(),
        password: BOOTSTRAP_LOGIN.to_string(),
        email: None,
        full_name: Some("Администратор".to_string()),
        role: Role::Admin,
        section_id: None,
    }
}

/// На пустой базе заводит администратора admin/admin
pub async fn ensure_admin_user_exists() -> Result<()> {
    if repository::count_users().await? > 0 {
        return Ok(());
    }
    let id = service::create(bootstrap_admin(), None)
        .await
        .map_err(|e| anyhow::anyhow!("bootstrap admin not created: {}", e))?;
    tracing::warn!(
        user_id = %id,
        "Created bootstrap administrator '{}' with password '{}', change it after the first login",
        BOOTSTRAP_LOGIN,
        BOOTSTRAP_LOGIN
    );
    Ok(())
}

/// Служебные операции при старте сервера
pub async fn run_startup_tasks(config: &Config) -> Result<()> {
    ensure_admin_user_exists().await?;

    let removed =
        a006_notification::service::delete_old_read(config.notifications.retention_days).await?;
    if removed > 0 {
        tracing::info!(
            "Removed {} read notifications older than {} days",
            removed,
            config.notifications.retention_days
        );
    }
    Ok(())
}
