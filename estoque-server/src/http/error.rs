//! API error types with IntoResponse
//!
//! Errors are converted to JSON responses with appropriate status codes.
//! Client mistakes and name conflicts are 400 with an optional
//! `fieldErrors` map; everything else is a logged, generic 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::db::repos::DbError;
use crate::models::ValidationError;

const DUPLICATE_NAME_MESSAGE: &str = "Já existe um item com este nome.";

/// API error type with automatic HTTP status mapping
#[derive(Debug)]
pub enum ApiError {
    /// Validation failed (400)
    Validation(ValidationError),

    /// Unique name already taken (400, reported on the field)
    Conflict { field: &'static str },

    /// Database error (500, logged)
    Database(DbError),

    /// Method not routed on this resource (405)
    MethodNotAllowed,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::Validation(e) => (StatusCode::BAD_REQUEST, validation_body(e)),
            Self::Conflict { field } => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": DUPLICATE_NAME_MESSAGE,
                    "fieldErrors": { *field: DUPLICATE_NAME_MESSAGE }
                }),
            ),
            Self::Database(e) => {
                // Log the actual error, return generic message
                tracing::error!(error = %e, "items request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "error": "Erro interno do servidor",
                        "detail": redacted_detail(e)
                    }),
                )
            }
            Self::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                json!({ "error": "Método não permitido" }),
            ),
        };

        (status, Json(body)).into_response()
    }
}

fn validation_body(e: &ValidationError) -> Value {
    match e.field() {
        Some(field) => json!({
            "error": e.to_string(),
            "fieldErrors": { field: e.field_message() }
        }),
        None => json!({ "error": e.to_string() }),
    }
}

/// Coarse failure category safe to show to clients.
fn redacted_detail(e: &DbError) -> &'static str {
    match e {
        DbError::Sqlx(sqlx::Error::PoolTimedOut) => "tempo de conexão esgotado",
        DbError::Sqlx(sqlx::Error::PoolClosed) => "servidor encerrando",
        DbError::Sqlx(sqlx::Error::Io(_) | sqlx::Error::Tls(_)) => {
            "falha de conexão com o banco de dados"
        }
        DbError::Sqlx(sqlx::Error::Database(_)) => "erro no banco de dados",
        _ => "falha inesperada",
    }
}

impl From<ValidationError> for ApiError {
    fn from(e: ValidationError) -> Self {
        Self::Validation(e)
    }
}

impl From<DbError> for ApiError {
    fn from(e: DbError) -> Self {
        match e {
            DbError::DuplicateName => Self::Conflict { field: "nome_item" },
            _ => Self::Database(e),
        }
    }
}
