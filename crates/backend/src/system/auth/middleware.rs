use axum::{body::Body, extract::Request, http::StatusCode, middleware::Next, response::Response};
use contracts::system::auth::TokenClaims;
use contracts::system::users::Role;

fn bearer_token(req: &Request<Body>) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Достаёт и проверяет Bearer-токен
async fn authenticate(token: Option<String>) -> Result<TokenClaims, StatusCode> {
    let token = token.ok_or(StatusCode::UNAUTHORIZED)?;
    super::jwt::validate_token(&token)
        .await
        .map_err(|_| StatusCode::UNAUTHORIZED)
}

/// Общая часть require_*: 401 без токена, 403 при роли вне списка
pub async fn require_role(
    mut req: Request<Body>,
    next: Next,
    allowed: &[Role],
) -> Result<Response, StatusCode> {
    let token = bearer_token(&req);
    let claims = authenticate(token).await?;
    if !allowed.is_empty() && !allowed.contains(&claims.role) {
        return Err(StatusCode::FORBIDDEN);
    }
    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Middleware that requires valid JWT authentication
pub async fn require_auth(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    require_role(req, next, &[]).await
}

/// Middleware that requires admin privileges
pub async fn require_admin(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    require_role(req, next, &[Role::Admin]).await
}

/// Тренеры, ассистенты и администраторы
pub async fn require_staff(req: Request<Body>, next: Next) -> Result<Response, StatusCode> {
    require_role(req, next, &[Role::Admin, Role::Trainer, Role::Assistant]).await
}
