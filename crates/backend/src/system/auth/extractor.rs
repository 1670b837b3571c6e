use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
};
use contracts::system::auth::TokenClaims;
use contracts::system::users::Role;

use crate::shared::error::{ServiceError, ServiceResult};

/// Claims вошедшего пользователя. Работает только за `require_auth`
/// (или `require_role`), которые кладут claims в extensions запроса.
pub struct CurrentUser(pub TokenClaims);

impl CurrentUser {
    pub fn id(&self) -> &str {
        &self.0.sub
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<TokenClaims>()
            .cloned()
            .map(CurrentUser)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

/// Проверка роли внутри обработчика, когда роутер пускает шире, чем нужно операции
pub fn ensure_role(claims: &TokenClaims, allowed: &[Role]) -> ServiceResult<()> {
    if allowed.contains(&claims.role) {
        Ok(())
    } else {
        Err(ServiceError::forbidden())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claims(role: Role) -> TokenClaims {
        TokenClaims {
            sub: "u1".into(),
            username: "u1".into(),
            role,
            exp: 0,
            iat: 0,
        }
    }

    #[test]
    fn test_ensure_role() {
        assert!(ensure_role(&claims(Role::Admin), &[Role::Admin]).is_ok());
        assert!(ensure_role(&claims(Role::Trainer), &[Role::Admin, Role::Trainer]).is_ok());
        assert!(matches!(
            ensure_role(&claims(Role::User), &[Role::Admin]),
            Err(ServiceError::Forbidden(_))
        ));
    }
}
