use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;
use validator::{ValidationErrors, ValidationErrorsKind};

use crate::services::workflow::WorkflowError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

/// Every handler error. Each variant fixes the HTTP status; the message is
/// returned to the caller except for internal errors, which are only logged.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    Unauthorized(String),
    Forbidden(String),
    Conflict(String),
    BadRequest(String),
    InternalServerError(anyhow::Error),
    Validation(Vec<String>),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InternalServerError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Stable machine-readable code for clients.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Unauthorized(_) => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::Conflict(_) => "CONFLICT",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            AppError::Validation(_) => "VALIDATION_ERROR",
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();
        let (error, details) = match self {
            AppError::NotFound(msg)
            | AppError::Unauthorized(msg)
            | AppError::Forbidden(msg)
            | AppError::Conflict(msg)
            | AppError::BadRequest(msg) => (msg, None),
            AppError::InternalServerError(err) => {
                tracing::error!(error = ?err, "Internal server error");
                ("Internal server error".to_string(), None)
            }
            AppError::Validation(errors) => (
                "Validation failed".to_string(),
                Some(serde_json::json!({ "errors": errors })),
            ),
        };

        (
            status,
            Json(ErrorResponse {
                error,
                code,
                details,
            }),
        )
            .into_response()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalServerError(err)
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => AppError::NotFound("Resource not found".to_string()),
            _ => AppError::InternalServerError(err.into()),
        }
    }
}

/// Turns a unique-constraint violation into a 409 with `message`. Inserts
/// that race past an existence check end up here.
pub fn conflict_on_unique(err: sqlx::Error, message: &str) -> AppError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return AppError::Conflict(message.to_string());
        }
    }
    err.into()
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        let mut messages = Vec::new();
        collect_validation_messages(&errors, "", &mut messages);
        messages.sort();
        AppError::Validation(messages)
    }
}

/// Flattens nested validation errors into `path: code` lines, e.g.
/// `items[1].quantity: range`. Struct-level errors use the parent path.
fn collect_validation_messages(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let path = match (prefix.is_empty(), &**field) {
            (true, "__all__") => "payload".to_string(),
            (false, "__all__") => prefix.to_string(),
            (true, name) => name.to_string(),
            (false, name) => format!("{}.{}", prefix, name),
        };
        match kind {
            ValidationErrorsKind::Field(errs) => {
                out.extend(errs.iter().map(|e| format!("{}: {}", path, e.code)));
            }
            ValidationErrorsKind::Struct(inner) => {
                collect_validation_messages(inner, &path, out);
            }
            ValidationErrorsKind::List(entries) => {
                for (idx, inner) in entries {
                    collect_validation_messages(inner, &format!("{}[{}]", path, idx), out);
                }
            }
        }
    }
}

impl From<WorkflowError> for AppError {
    fn from(err: WorkflowError) -> Self {
        let message = err.to_string();
        match err {
            WorkflowError::ItemNotPending { .. }
            | WorkflowError::ItemNotApproved { .. }
            | WorkflowError::InsufficientStock { .. }
            | WorkflowError::BatchAlreadyDecided
            | WorkflowError::NotEvaluable { .. }
            | WorkflowError::StockBelowZero { .. } => AppError::Conflict(message),
            WorkflowError::QuantityOutOfRange { .. }
            | WorkflowError::EmptyComment
            | WorkflowError::CommentTooLong { .. } => AppError::BadRequest(message),
            WorkflowError::RoleChangeDenied(_) => AppError::Forbidden(message),
        }
    }
}
