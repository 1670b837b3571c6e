use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;

use crate::shared::format::format_number;

/// Статика отдаётся часто и неинтересна в логе
fn is_quiet(path: &str) -> bool {
    !path.starts_with("/api/") || path == "/api/notifications/unread-count"
}

/// Строка журнала на каждый запрос: метод, путь, статус, длительность, размер ответа.
/// 5xx пишутся как error, 4xx как warn.
pub async fn request_logger(req: Request<Body>, next: Next) -> Response {
    let started = Instant::now();
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let (parts, body) = next.run(req).await.into_parts();
    // тело буферизуется, чтобы знать реальный размер
    let (size, body) = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => (format_number(bytes.len()), Body::from(bytes)),
        Err(_) => ("?".to_string(), Body::empty()),
    };
    let elapsed_ms = started.elapsed().as_millis() as u64;
    let status = parts.status;

    if status.is_server_error() {
        tracing::error!(target: "http", %method, %path, status = status.as_u16(), elapsed_ms, %size);
    } else if status.is_client_error() && status != StatusCode::NOT_FOUND {
        tracing::warn!(target: "http", %method, %path, status = status.as_u16(), elapsed_ms, %size);
    } else if is_quiet(&path) {
        tracing::debug!(target: "http", %method, %path, status = status.as_u16(), elapsed_ms, %size);
    } else {
        tracing::info!(target: "http", %method, %path, status = status.as_u16(), elapsed_ms, %size);
    }

    Response::from_parts(parts, body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quiet_paths() {
        assert!(is_quiet("/assets/app.wasm"));
        assert!(is_quiet("/api/notifications/unread-count"));
        assert!(!is_quiet("/api/inquiries"));
    }
}
