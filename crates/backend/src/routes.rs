use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use crate::api::handlers;
use crate::system::{self, auth::middleware as auth_middleware};

/// Конфигурация всех роутов приложения
pub fn configure_routes() -> Router {
    Router::new()
        .merge(system::api::routes::configure_system_routes())
        .merge(business_routes())
        .merge(admin_routes())
}

/// Роуты для любого авторизованного пользователя.
/// Роли и участие в обращении проверяются в сервисах.
fn business_routes() -> Router {
    Router::new()
        // ========================================
        // A001 SECTIONS / A002 CATEGORIES
        // ========================================
        .route(
            "/api/sections",
            get(handlers::a001_section::list_all).post(handlers::a001_section::upsert),
        )
        .route(
            "/api/sections/:id",
            get(handlers::a001_section::get_by_id).delete(handlers::a001_section::delete),
        )
        .route(
            "/api/categories",
            get(handlers::a002_category::list).post(handlers::a002_category::upsert),
        )
        .route(
            "/api/categories/:id",
            get(handlers::a002_category::get_by_id).delete(handlers::a002_category::delete),
        )
        // ========================================
        // A003 INQUIRIES
        // ========================================
        .route(
            "/api/inquiries",
            get(handlers::a003_inquiry::list).post(handlers::a003_inquiry::create),
        )
        .route("/api/inquiries/:id", get(handlers::a003_inquiry::get_detail))
        .route(
            "/api/inquiries/:id/actions",
            post(handlers::a003_inquiry::apply_action),
        )
        .route(
            "/api/inquiries/:id/messages",
            get(handlers::a003_inquiry::list_messages).post(handlers::a003_inquiry::post_message),
        )
        // ========================================
        // A004 FOLLOW-UPS
        // ========================================
        .route(
            "/api/inquiries/:id/follow-ups",
            get(handlers::a004_follow_up::list_by_inquiry).post(handlers::a004_follow_up::create),
        )
        .route(
            "/api/follow-ups/section",
            get(handlers::a004_follow_up::list_for_section),
        )
        .route(
            "/api/follow-ups/:id/answer",
            post(handlers::a004_follow_up::answer),
        )
        // ========================================
        // A005 RATING
        // ========================================
        .route(
            "/api/inquiries/:id/rating",
            get(handlers::a005_rating::get).put(handlers::a005_rating::rate),
        )
        // ========================================
        // A006 NOTIFICATIONS
        // ========================================
        .route("/api/notifications", get(handlers::a006_notification::list))
        .route(
            "/api/notifications/unread-count",
            get(handlers::a006_notification::unread_count),
        )
        .route(
            "/api/notifications/read-all",
            post(handlers::a006_notification::mark_all_read),
        )
        .route(
            "/api/notifications/:id/read",
            post(handlers::a006_notification::mark_read),
        )
        .route_layer(middleware::from_fn(auth_middleware::require_auth))
}

/// Доска тренеров и отчёты: только администратор
fn admin_routes() -> Router {
    Router::new()
        // ========================================
        // A007 TRAINER BOARD
        // ========================================
        .route(
            "/api/trainer-tasks/board",
            get(handlers::a007_trainer_task::get_board).put(handlers::a007_trainer_task::save_board),
        )
        .route(
            "/api/trainer-tasks/move",
            post(handlers::a007_trainer_task::move_card),
        )
        .route(
            "/api/trainer-tasks/weight",
            post(handlers::a007_trainer_task::set_weight),
        )
        // ========================================
        // REPORTS
        // ========================================
        .route(
            "/api/reports/inquiries",
            get(handlers::reports::inquiry_summary),
        )
        .route(
            "/api/reports/inquiries/export",
            get(handlers::reports::export_inquiries),
        )
        .route(
            "/api/reports/trainers",
            get(handlers::reports::trainer_performance),
        )
        .route(
            "/api/reports/sections",
            get(handlers::reports::section_follow_ups),
        )
        .route_layer(middleware::from_fn(auth_middleware::require_admin))
}
