use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use contracts::domain::a003_inquiry::status::{InquiryAction, InquiryStatus, TransitionError};

/// Бизнес-ошибки сервисов. Инфраструктурные ошибки уходят в `Internal`.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("Действие «{}» недоступно для обращения в статусе «{}»", .action.label(), .from.label())]
    InvalidTransition {
        from: InquiryStatus,
        action: InquiryAction,
    },

    #[error("{0}")]
    Conflict(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl ServiceError {
    pub fn not_found(what: impl std::fmt::Display) -> Self {
        Self::NotFound(format!("{} не найден(о)", what))
    }

    pub fn forbidden() -> Self {
        Self::Forbidden("Недостаточно прав для выполнения операции".into())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Validation(_) | Self::InvalidTransition { .. } => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<sea_orm::DbErr> for ServiceError {
    fn from(e: sea_orm::DbErr) -> Self {
        Self::Internal(e.into())
    }
}

impl From<TransitionError> for ServiceError {
    fn from(e: TransitionError) -> Self {
        Self::InvalidTransition {
            from: e.from,
            action: e.action,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            Self::Internal(e) => {
                tracing::error!("Internal error: {:#}", e);
                "Внутренняя ошибка сервера".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(serde_json::json!({ "error": message }))).into_response()
    }
}

/// Разбор UUID из пути запроса
pub fn parse_uuid(id: &str) -> ServiceResult<uuid::Uuid> {
    uuid::Uuid::parse_str(id).map_err(|_| ServiceError::Validation(format!("Некорректный идентификатор: {}", id)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ServiceError::not_found("Отдел").status_code(), StatusCode::NOT_FOUND);
        assert_eq!(ServiceError::forbidden().status_code(), StatusCode::FORBIDDEN);
        assert_eq!(
            ServiceError::Validation("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ServiceError::Conflict("x".into()).status_code(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::Internal(anyhow::anyhow!("db is gone")).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_transition_error_conversion() {
        let err: ServiceError = TransitionError {
            from: InquiryStatus::Closed,
            action: InquiryAction::Take,
        }
        .into();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(matches!(
            err,
            ServiceError::InvalidTransition {
                from: InquiryStatus::Closed,
                action: InquiryAction::Take
            }
        ));
    }

    #[test]
    fn test_internal_details_not_leaked() {
        let response = ServiceError::Internal(anyhow::anyhow!("secret path")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_uuid() {
        assert!(parse_uuid("not-a-uuid").is_err());
        let id = uuid::Uuid::new_v4();
        assert_eq!(parse_uuid(&id.to_string()).unwrap(), id);
    }
}
