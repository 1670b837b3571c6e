use anyhow::Result;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

pub const MIN_PASSWORD_LENGTH: usize = 4;

/// argon2id с параметрами по умолчанию
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?;
    Ok(hash.to_string())
}

pub fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let parsed = PasswordHash::new(hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash: {}", e))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

pub fn validate_password_strength(password: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Пароль должен содержать не менее {} символов",
            MIN_PASSWORD_LENGTH
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("admin").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(verify_password("admin", &hash).unwrap());
        assert!(!verify_password("Admin", &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salt() {
        assert_ne!(hash_password("secret").unwrap(), hash_password("secret").unwrap());
    }

    #[test]
    fn test_garbage_hash_is_error() {
        assert!(verify_password("x", "not-a-hash").is_err());
    }

    #[test]
    fn test_strength() {
        assert!(validate_password_strength("abc").is_err());
        assert!(validate_password_strength("admin").is_ok());
    }
}
