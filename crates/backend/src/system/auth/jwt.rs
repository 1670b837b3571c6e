use anyhow::{Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::{Duration, Utc};
use contracts::system::auth::TokenClaims;
use contracts::system::users::Role;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use once_cell::sync::OnceCell;
use rand::RngCore;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};
use sha2::{Digest, Sha256};

use crate::shared::config;
use crate::shared::data::db::get_connection;

const SECRET_SETTING: &str = "jwt_secret";

/// Ключи HS256, построенные из секрета один раз на процесс
struct Keys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl Keys {
    fn from_secret(secret: &str) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

static KEYS: OnceCell<Keys> = OnceCell::new();

pub fn build_claims(user_id: &str, username: &str, role: Role, lifetime_hours: i64) -> TokenClaims {
    let issued = Utc::now();
    let expires = issued + Duration::hours(lifetime_hours);
    TokenClaims {
        sub: user_id.to_string(),
        username: username.to_string(),
        role,
        exp: expires.timestamp() as usize,
        iat: issued.timestamp() as usize,
    }
}

pub fn encode_token(claims: &TokenClaims, secret: &str) -> Result<String> {
    encode_with(claims, &Keys::from_secret(secret))
}

pub fn decode_token(token: &str, secret: &str) -> Result<TokenClaims> {
    decode_with(token, &Keys::from_secret(secret))
}

fn encode_with(claims: &TokenClaims, keys: &Keys) -> Result<String> {
    jsonwebtoken::encode(&Header::default(), claims, &keys.encoding).context("JWT encode failed")
}

/// Проверяет подпись и `exp`
fn decode_with(token: &str, keys: &Keys) -> Result<TokenClaims> {
    let data = jsonwebtoken::decode::<TokenClaims>(token, &keys.decoding, &Validation::default())
        .context("JWT rejected")?;
    Ok(data.claims)
}

/// Access token со сроком жизни из `[auth] access_token_hours`
pub async fn generate_access_token(user_id: &str, username: &str, role: Role) -> Result<String> {
    let claims = build_claims(user_id, username, role, config::get().auth.access_token_hours);
    encode_with(&claims, keys().await?)
}

pub async fn validate_token(token: &str) -> Result<TokenClaims> {
    decode_with(token, keys().await?)
}

pub fn generate_refresh_token() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// В базе refresh token хранится только как SHA-256 (hex)
pub fn hash_token(token: &str) -> String {
    format!("{:x}", Sha256::digest(token.as_bytes()))
}

pub fn calculate_refresh_token_expiration() -> String {
    let days = config::get().auth.refresh_token_days;
    (Utc::now() + Duration::days(days)).to_rfc3339()
}

async fn keys() -> Result<&'static Keys> {
    if let Some(keys) = KEYS.get() {
        return Ok(keys);
    }
    let secret = load_or_create_secret().await?;
    Ok(KEYS.get_or_init(|| Keys::from_secret(&secret)))
}

/// Секрет живёт в sys_settings, чтобы токены переживали рестарт.
/// На пустой базе генерируется 256 случайных бит.
async fn load_or_create_secret() -> Result<String> {
    let db = get_connection();
    let existing = db
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT value FROM sys_settings WHERE key = ?",
            [SECRET_SETTING.into()],
        ))
        .await?;
    if let Some(row) = existing {
        return Ok(row.try_get("", "value")?);
    }

    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    let secret = STANDARD.encode(bytes);
    let now = Utc::now().to_rfc3339();
    db.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT OR REPLACE INTO sys_settings (key, value, description, created_at, updated_at) \
         VALUES (?, ?, ?, ?, ?)",
        [
            SECRET_SETTING.into(),
            secret.clone().into(),
            "JWT signing secret".into(),
            now.clone().into(),
            now.into(),
        ],
    ))
    .await
    .context("Failed to persist JWT secret")?;
    tracing::info!("Generated new JWT secret");
    Ok(secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_carries_role_and_expiry() {
        let claims = build_claims("user-1", "anna", Role::Trainer, 1);
        let token = encode_token(&claims, "secret").unwrap();
        let decoded = decode_token(&token, "secret").unwrap();
        assert_eq!(decoded.sub, "user-1");
        assert_eq!(decoded.role, Role::Trainer);
        assert_eq!(decoded.exp - decoded.iat, 3600);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let claims = build_claims("user-1", "anna", Role::User, 1);
        let token = encode_token(&claims, "secret").unwrap();
        assert!(decode_token(&token, "other").is_err());
    }

    #[test]
    fn test_expired_token_rejected() {
        let claims = build_claims("user-1", "anna", Role::User, -2);
        let token = encode_token(&claims, "secret").unwrap();
        assert!(decode_token(&token, "secret").is_err());
    }

    #[test]
    fn test_hash_token_is_stable_hex() {
        let hash = hash_token("abc");
        assert_eq!(hash.len(), 64);
        assert_eq!(hash, hash_token("abc"));
        assert_ne!(hash, hash_token("abd"));
    }
}
