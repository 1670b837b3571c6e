//! sys_users и sys_refresh_tokens. Таблицы системные, без sea-orm сущностей:
//! запросы пишутся руками через `Statement`.
use anyhow::{Context, Result};
use chrono::Utc;
use contracts::system::users::{Role, User};
use sea_orm::{ConnectionTrait, DatabaseBackend, QueryResult, Statement, Value};

use crate::shared::data::db::get_connection;

const SELECT_USER: &str = "SELECT id, username, email, full_name, role, section_id, is_active, \
     created_at, updated_at, last_login_at, created_by FROM sys_users";

fn stmt(sql: &str, values: impl IntoIterator<Item = Value>) -> Statement {
    Statement::from_sql_and_values(DatabaseBackend::Sqlite, sql, values)
}

fn now() -> String {
    Utc::now().to_rfc3339()
}

/// Выполняет изменяющий запрос, возвращает число затронутых строк
async fn exec(sql: &str, values: Vec<Value>, what: &'static str) -> Result<u64> {
    let result = get_connection()
        .execute(stmt(sql, values))
        .await
        .context(what)?;
    Ok(result.rows_affected())
}

async fn first_row(sql: &str, values: Vec<Value>) -> Result<Option<QueryResult>> {
    Ok(get_connection().query_one(stmt(sql, values)).await?)
}

fn user_from_row(row: &QueryResult) -> Result<User> {
    let role: String = row.try_get("", "role")?;
    Ok(User {
        id: row.try_get("", "id")?,
        username: row.try_get("", "username")?,
        email: row.try_get("", "email")?,
        full_name: row.try_get("", "full_name")?,
        role: role.parse::<Role>().map_err(anyhow::Error::msg)?,
        section_id: row.try_get("", "section_id")?,
        // SQLite хранит bool как INTEGER
        is_active: row.try_get::<i32>("", "is_active")? != 0,
        created_at: row.try_get("", "created_at")?,
        updated_at: row.try_get("", "updated_at")?,
        last_login_at: row.try_get("", "last_login_at")?,
        created_by: row.try_get("", "created_by")?,
    })
}

async fn select_users(filter: &str, values: Vec<Value>) -> Result<Vec<User>> {
    let sql = format!("{} {}", SELECT_USER, filter);
    get_connection()
        .query_all(stmt(&sql, values))
        .await?
        .iter()
        .map(user_from_row)
        .collect()
}

async fn select_one(filter: &str, value: Value) -> Result<Option<User>> {
    Ok(select_users(filter, vec![value]).await?.into_iter().next())
}

pub async fn create_with_password(user: &User, password_hash: &str) -> Result<()> {
    exec(
        "INSERT INTO sys_users (id, username, email, password_hash, full_name, role, section_id, \
         is_active, created_at, updated_at, last_login_at, created_by) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        vec![
            user.id.clone().into(),
            user.username.clone().into(),
            user.email.clone().into(),
            password_hash.into(),
            user.full_name.clone().into(),
            user.role.as_str().into(),
            user.section_id.clone().into(),
            i32::from(user.is_active).into(),
            user.created_at.clone().into(),
            user.updated_at.clone().into(),
            user.last_login_at.clone().into(),
            user.created_by.clone().into(),
        ],
        "insert sys_users",
    )
    .await?;
    Ok(())
}

pub async fn get_by_id(id: &str) -> Result<Option<User>> {
    select_one("WHERE id = ?", id.into()).await
}

pub async fn get_by_username(username: &str) -> Result<Option<User>> {
    select_one("WHERE username = ?", username.into()).await
}

pub async fn get_password_hash(user_id: &str) -> Result<Option<String>> {
    let row = first_row(
        "SELECT password_hash FROM sys_users WHERE id = ?",
        vec![user_id.into()],
    )
    .await?;
    row.map(|r| r.try_get("", "password_hash"))
        .transpose()
        .map_err(Into::into)
}

/// Новые сверху
pub async fn list_all() -> Result<Vec<User>> {
    select_users("ORDER BY created_at DESC", Vec::new()).await
}

/// Активные пользователи с ролью
pub async fn list_by_role(role: Role) -> Result<Vec<User>> {
    select_users(
        "WHERE role = ? AND is_active = 1 ORDER BY username",
        vec![role.as_str().into()],
    )
    .await
}

/// Активные ассистенты отдела
pub async fn list_assistants_of_section(section_id: &str) -> Result<Vec<User>> {
    select_users(
        "WHERE role = ? AND section_id = ? AND is_active = 1",
        vec![Role::Assistant.as_str().into(), section_id.into()],
    )
    .await
}

/// Логин и пароль здесь не меняются, для пароля есть `update_password`
pub async fn update(user: &User) -> Result<()> {
    exec(
        "UPDATE sys_users SET email = ?, full_name = ?, role = ?, section_id = ?, \
         is_active = ?, updated_at = ? WHERE id = ?",
        vec![
            user.email.clone().into(),
            user.full_name.clone().into(),
            user.role.as_str().into(),
            user.section_id.clone().into(),
            i32::from(user.is_active).into(),
            user.updated_at.clone().into(),
            user.id.clone().into(),
        ],
        "update sys_users",
    )
    .await?;
    Ok(())
}

pub async fn delete(id: &str) -> Result<bool> {
    let affected = exec(
        "DELETE FROM sys_users WHERE id = ?",
        vec![id.into()],
        "delete sys_users",
    )
    .await?;
    Ok(affected > 0)
}

pub async fn update_last_login(id: &str) -> Result<()> {
    exec(
        "UPDATE sys_users SET last_login_at = ? WHERE id = ?",
        vec![now().into(), id.into()],
        "update last_login_at",
    )
    .await?;
    Ok(())
}

pub async fn update_password(id: &str, password_hash: &str) -> Result<()> {
    exec(
        "UPDATE sys_users SET password_hash = ?, updated_at = ? WHERE id = ?",
        vec![password_hash.into(), now().into(), id.into()],
        "update password_hash",
    )
    .await?;
    Ok(())
}

pub async fn count_users() -> Result<usize> {
    let row = first_row("SELECT COUNT(*) AS count FROM sys_users", Vec::new()).await?;
    let count: i64 = match row {
        Some(r) => r.try_get("", "count")?,
        None => 0,
    };
    Ok(count as usize)
}

// refresh tokens: в таблице лежит только хеш токена

pub async fn store_refresh_token(user_id: &str, token_hash: &str, expires_at: &str) -> Result<()> {
    exec(
        "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at) \
         VALUES (?, ?, ?, ?, ?)",
        vec![
            uuid::Uuid::new_v4().to_string().into(),
            user_id.into(),
            token_hash.into(),
            expires_at.into(),
            now().into(),
        ],
        "insert sys_refresh_tokens",
    )
    .await?;
    Ok(())
}

/// user_id действующего (не отозванного и не просроченного) токена
pub async fn find_refresh_token_owner(token_hash: &str) -> Result<Option<String>> {
    let row = first_row(
        "SELECT user_id FROM sys_refresh_tokens \
         WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
        vec![token_hash.into(), now().into()],
    )
    .await?;
    row.map(|r| r.try_get("", "user_id"))
        .transpose()
        .map_err(Into::into)
}

pub async fn revoke_refresh_token(token_hash: &str) -> Result<()> {
    exec(
        "UPDATE sys_refresh_tokens SET revoked_at = ? WHERE token_hash = ?",
        vec![now().into(), token_hash.into()],
        "revoke refresh token",
    )
    .await?;
    Ok(())
}
