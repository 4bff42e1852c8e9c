use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::common::response::ApiResponse;

// Nosso tipo de erro único. Os componentes só devolvem `AppError`;
// o mapeamento para status HTTP acontece em um só lugar (IntoResponse).
#[derive(Debug, Error)]
pub enum AppError {
    // --- 400 ---
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Invalid request body: {0}")]
    MalformedBody(String),

    #[error("Title is required")]
    TitleRequired,

    #[error("Invalid tenant slug: {0}")]
    InvalidSlug(String),

    // --- 401 ---
    #[error("Access token required")]
    Unauthenticated,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid credentials")]
    InvalidCredentials,

    // --- 403 ---
    #[error("Forbidden: missing capability '{0}'")]
    Forbidden(&'static str),

    // --- 404 ---
    #[error("Note not found")]
    NoteNotFound,

    #[error("Tenant not found")]
    TenantNotFound,

    #[error("Route not found")]
    RouteNotFound,

    // --- 405 ---
    #[error("Method not allowed")]
    MethodNotAllowed,

    // --- 409 ---
    #[error("Free plan allows maximum {limit} notes. Please upgrade to Pro plan.")]
    QuotaExceeded { limit: i64 },

    #[error("Tenant is already on Pro plan")]
    AlreadyUpgraded,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Tenant slug already exists: {0}")]
    SlugAlreadyExists(String),

    // --- 413 ---
    #[error("Request body too large")]
    PayloadTooLarge,

    // --- 429 ---
    #[error("Too many requests from this IP, please try again later.")]
    TooManyRequests,

    // --- 500 ---
    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        // O limite de corpo (DefaultBodyLimit) chega aqui como rejeição do Json
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            return AppError::PayloadTooLarge;
        }
        AppError::MalformedBody(rejection.body_text())
    }
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::MalformedBody(_)
            | AppError::TitleRequired
            | AppError::InvalidSlug(_) => StatusCode::BAD_REQUEST,

            AppError::Unauthenticated
            | AppError::InvalidToken
            | AppError::ExpiredToken
            | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,

            AppError::Forbidden(_) => StatusCode::FORBIDDEN,

            AppError::NoteNotFound | AppError::TenantNotFound | AppError::RouteNotFound => {
                StatusCode::NOT_FOUND
            }

            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,

            AppError::QuotaExceeded { .. }
            | AppError::AlreadyUpgraded
            | AppError::EmailAlreadyExists
            | AppError::SlugAlreadyExists(_) => StatusCode::CONFLICT,

            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,

            AppError::TooManyRequests => StatusCode::TOO_MANY_REQUESTS,

            AppError::DatabaseError(_)
            | AppError::InternalServerError(_)
            | AppError::BcryptError(_)
            | AppError::JwtError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem enviada ao cliente. Detalhes de erros internos ficam só no log.
    fn public_message(&self) -> String {
        match self {
            AppError::ValidationError(errors) => errors
                .field_errors()
                .values()
                .flat_map(|field_errors| field_errors.iter())
                .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
                .unwrap_or_else(|| "Um ou mais campos são inválidos.".to_string()),
            AppError::Forbidden(_) => "Admin access required".to_string(),
            AppError::EmailAlreadyExists => "A user with this email already exists".to_string(),
            e if e.status_code().is_server_error() => "Internal server error".to_string(),
            e => e.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
        if status.is_server_error() {
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let body = Json(ApiResponse::<()>::failure(self.public_message()));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;
    use validator::Validate;

    #[derive(Validate)]
    struct Login {
        #[validate(length(min = 1, message = "Email and password are required"))]
        email: String,
    }

    async fn body_of(error: AppError) -> (StatusCode, serde_json::Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn quota_error_is_a_conflict_with_upgrade_hint() {
        let (status, body) = body_of(AppError::QuotaExceeded { limit: 3 }).await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Free plan allows maximum 3 notes. Please upgrade to Pro plan."
        );
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn validation_error_uses_field_message() {
        let errors = Login { email: String::new() }.validate().unwrap_err();
        let (status, body) = body_of(AppError::from(errors)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Email and password are required");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let (status, body) =
            body_of(AppError::InternalServerError(anyhow::anyhow!("pool exhausted"))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "Internal server error");
    }

    #[test]
    fn auth_failures_map_to_unauthorized() {
        for e in [
            AppError::Unauthenticated,
            AppError::InvalidToken,
            AppError::ExpiredToken,
            AppError::InvalidCredentials,
        ] {
            assert_eq!(e.status_code(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(
            AppError::Forbidden("administer-tenant").status_code(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(AppError::NoteNotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::AlreadyUpgraded.status_code(), StatusCode::CONFLICT);
        assert_eq!(AppError::MethodNotAllowed.status_code(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn throttled_requests_keep_the_envelope() {
        let (status, body) = body_of(AppError::TooManyRequests).await;
        assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(body["success"], false);
        assert_eq!(
            body["message"],
            "Too many requests from this IP, please try again later."
        );
    }
}
