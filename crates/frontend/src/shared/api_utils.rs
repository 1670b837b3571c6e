//! API utilities for frontend-backend communication
//!
//! Все запросы к защищённым эндпоинтам идут через [`send`]: он добавляет
//! bearer-токен, при 401 один раз обновляет сессию и повторяет запрос,
//! а если обновить не удалось, выполняет принудительный выход.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::system::auth::{context, storage};

/// Get the base URL for API requests
///
/// Constructs the API base URL from the current window location,
/// using port 3000 for the backend server.
pub fn api_base() -> String {
    let window = match web_sys::window() {
        Some(w) => w,
        None => return String::new(),
    };
    let location = window.location();
    let protocol = location.protocol().unwrap_or_else(|_| "http:".to_string());
    let hostname = location
        .hostname()
        .unwrap_or_else(|_| "127.0.0.1".to_string());
    format!("{}//{}:3000", protocol, hostname)
}

/// Build a full API URL from a path
pub fn api_url(path: &str) -> String {
    format!("{}{}", api_base(), path)
}

#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Сессия истекла, пользователь уже разлогинен
    Unauthorized,
    Http(u16, String),
    Network(String),
    Parse(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => f.write_str("Сессия истекла, войдите снова"),
            ApiError::Http(403, msg) if msg.is_empty() => f.write_str("Недостаточно прав"),
            ApiError::Http(status, msg) if msg.is_empty() => write!(f, "Ошибка сервера ({})", status),
            ApiError::Http(_, msg) => f.write_str(msg),
            ApiError::Network(msg) => write!(f, "Сервер недоступен: {}", msg),
            ApiError::Parse(msg) => write!(f, "Некорректный ответ сервера: {}", msg),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Ответ upsert-эндпоинтов: `{"id": "..."}`
#[derive(Debug, Clone, Deserialize)]
pub struct CreatedId {
    pub id: String,
}

/// Текст ошибки из тела `{"error": "..."}`, иначе пустая строка
pub fn parse_error_body(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_default()
}

pub async fn error_message(response: Response) -> String {
    match response.text().await {
        Ok(body) => parse_error_body(&body),
        Err(_) => String::new(),
    }
}

/// Path with a serialized query string, `?` omitted when the query is empty
pub fn with_query<Q: Serialize>(path: &str, query: &Q) -> ApiResult<String> {
    let qs = serde_qs::to_string(query).map_err(|e| ApiError::Parse(e.to_string()))?;
    if qs.is_empty() {
        Ok(path.to_string())
    } else {
        Ok(format!("{}?{}", path, qs))
    }
}

#[derive(Debug, Clone, Copy)]
enum Verb {
    Get,
    Post,
    Put,
    Delete,
}

fn builder(verb: Verb, url: &str) -> RequestBuilder {
    match verb {
        Verb::Get => Request::get(url),
        Verb::Post => Request::post(url),
        Verb::Put => Request::put(url),
        Verb::Delete => Request::delete(url),
    }
}

async fn send_once(
    verb: Verb,
    path: &str,
    body: Option<&str>,
    token: Option<&str>,
) -> ApiResult<Response> {
    let mut request = builder(verb, &api_url(path)).header("Accept", "application/json");
    if let Some(token) = token {
        request = request.header("Authorization", &format!("Bearer {}", token));
    }
    let result = match body {
        Some(json) => request
            .header("Content-Type", "application/json")
            .body(json.to_string())
            .map_err(|e| ApiError::Parse(e.to_string()))?
            .send()
            .await,
        None => request.send().await,
    };
    result.map_err(|e| ApiError::Network(e.to_string()))
}

async fn check(response: Response) -> ApiResult<Response> {
    if response.ok() {
        return Ok(response);
    }
    let status = response.status();
    Err(ApiError::Http(status, error_message(response).await))
}

async fn send(verb: Verb, path: &str, body: Option<String>) -> ApiResult<Response> {
    let token = storage::get_access_token();
    let response = send_once(verb, path, body.as_deref(), token.as_deref()).await?;
    if response.status() != 401 {
        return check(response).await;
    }

    log::debug!("401 on {}, refreshing session", path);
    let Some(token) = context::refresh_session().await else {
        context::expire_session();
        return Err(ApiError::Unauthorized);
    };
    let response = send_once(verb, path, body.as_deref(), Some(&token)).await?;
    if response.status() == 401 {
        context::expire_session();
        return Err(ApiError::Unauthorized);
    }
    check(response).await
}

fn to_body<B: Serialize>(body: &B) -> ApiResult<String> {
    serde_json::to_string(body).map_err(|e| ApiError::Parse(e.to_string()))
}

async fn parse<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

pub async fn get_json<T: DeserializeOwned>(path: &str) -> ApiResult<T> {
    parse(send(Verb::Get, path, None).await?).await
}

pub async fn get_text(path: &str) -> ApiResult<String> {
    send(Verb::Get, path, None)
        .await?
        .text()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

pub async fn post_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> ApiResult<T> {
    parse(send(Verb::Post, path, Some(to_body(body)?)).await?).await
}

/// POST без тела и без интересного ответа (отметки «прочитано»)
pub async fn post_empty(path: &str) -> ApiResult<()> {
    send(Verb::Post, path, None).await.map(|_| ())
}

pub async fn put_json<B: Serialize, T: DeserializeOwned>(path: &str, body: &B) -> ApiResult<T> {
    parse(send(Verb::Put, path, Some(to_body(body)?)).await?).await
}

/// PUT, ответ без тела (200 OK)
pub async fn put_unit<B: Serialize>(path: &str, body: &B) -> ApiResult<()> {
    send(Verb::Put, path, Some(to_body(body)?)).await.map(|_| ())
}

/// POST, ответ без тела (200 OK)
pub async fn post_unit<B: Serialize>(path: &str, body: &B) -> ApiResult<()> {
    send(Verb::Post, path, Some(to_body(body)?)).await.map(|_| ())
}

pub async fn delete(path: &str) -> ApiResult<()> {
    send(Verb::Delete, path, None).await.map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_is_extracted() {
        assert_eq!(parse_error_body(r#"{"error":"Обращение не найдено"}"#), "Обращение не найдено");
        assert_eq!(parse_error_body("Internal Server Error"), "");
        assert_eq!(parse_error_body(r#"{"message":"x"}"#), "");
    }

    #[test]
    fn test_display_prefers_server_message() {
        assert_eq!(ApiError::Http(400, "Пустая тема".into()).to_string(), "Пустая тема");
        assert_eq!(ApiError::Http(403, String::new()).to_string(), "Недостаточно прав");
        assert_eq!(ApiError::Http(502, String::new()).to_string(), "Ошибка сервера (502)");
    }

    #[derive(Serialize)]
    struct Query {
        page: usize,
        #[serde(skip_serializing_if = "Option::is_none")]
        search: Option<String>,
    }

    #[test]
    fn test_with_query() {
        let path = with_query("/api/inquiries", &Query { page: 2, search: None }).unwrap();
        assert_eq!(path, "/api/inquiries?page=2");
    }
}
