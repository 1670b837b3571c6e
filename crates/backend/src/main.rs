pub mod api;
pub mod dashboards;
pub mod domain;
pub mod routes;
pub mod shared;
pub mod system;

use anyhow::Context;
use axum::http::{header, Method};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT, header::AUTHORIZATION])
}

async fn bind(port: u16) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = ([0, 0, 0, 0], port).into();
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::AddrInUse {
            tracing::error!("Port {} is already in use by another process", port);
        }
        e
    });
    let listener = listener.with_context(|| format!("cannot listen on {}", addr))?;
    tracing::info!("Helpdesk is listening on http://{}", addr);
    Ok(listener)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    system::tracing::initialize()?;
    let config = shared::config::init()?;

    // схема через sqlx миграции, дальше работает sea-orm
    let db_path = shared::config::get_database_path(config)?;
    shared::data::migration_runner::run_migrations(&db_path).await?;
    shared::data::db::initialize_database(&db_path)
        .await
        .map_err(|e| anyhow::anyhow!("db init failed: {e}"))?;

    system::initialization::run_startup_tasks(config).await?;

    let app = routes::configure_routes()
        .fallback_service(ServeDir::new(&config.server.static_dir))
        .layer(axum::middleware::from_fn(
            system::middleware::request_logger::request_logger,
        ))
        .layer(cors_layer());

    let listener = bind(config.server.port).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
