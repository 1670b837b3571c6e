use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use super::handlers::users;
use crate::system::auth::middleware::{require_admin, require_auth, require_staff};
use crate::system::handlers::auth;

/// Системные роуты: вход, сессия и управление пользователями.
/// Права навешиваются на группу целиком через `route_layer`.
pub fn configure_system_routes() -> Router {
    let public = Router::new()
        .route("/auth/login", post(auth::login))
        .route("/auth/refresh", post(auth::refresh))
        .route("/auth/logout", post(auth::logout))
        .route("/auth/register", post(auth::register));

    // смена пароля: свой пароль может сменить любой, чужой проверяет сервис
    let signed_in = Router::new()
        .route("/auth/me", get(auth::current_user))
        .route("/users/:id/change-password", post(users::change_password))
        .route_layer(from_fn(require_auth));

    let staff = Router::new()
        .route("/users/trainers", get(users::list_trainers))
        .route_layer(from_fn(require_staff));

    let admin = Router::new()
        .route("/users", get(users::list).post(users::create))
        .route(
            "/users/:id",
            get(users::get_by_id)
                .put(users::update)
                .delete(users::delete),
        )
        .route_layer(from_fn(require_admin));

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest(
            "/api/system",
            public.merge(signed_in).merge(staff).merge(admin),
        )
}
