//! Errors surfaced by registration and login, and their HTTP mapping.

use std::fmt::Display;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::error;

use crate::auth::dto::ErrorBody;

pub const MSG_ALREADY_REGISTERED: &str = "Usuario ya registrado";
pub const MSG_INVALID_CREDENTIALS: &str = "Credenciales inválidas";
pub const MSG_REGISTER_FAILED: &str = "Error al registrar usuario";
pub const MSG_LOGIN_FAILED: &str = "Error al iniciar sesión";

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("{}", MSG_ALREADY_REGISTERED)]
    AlreadyRegistered,

    /// Same message for unknown email and wrong password.
    #[error("{}", MSG_INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("{0}")]
    Validation(String),

    /// `reason` is a fixed category; the underlying error only goes to the log.
    #[error("{message}: {reason}")]
    Internal {
        message: &'static str,
        reason: &'static str,
    },
}

impl AuthError {
    pub fn internal(message: &'static str, reason: &'static str, err: impl Display) -> Self {
        error!(error = %err, reason, "{}", message);
        Self::Internal { message, reason }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::AlreadyRegistered | AuthError::Validation(_) => StatusCode::BAD_REQUEST,
            AuthError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AuthError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AuthError::Internal { message, reason } => ErrorBody {
                message: message.to_string(),
                error: Some(reason.to_string()),
            },
            other => ErrorBody {
                message: other.to_string(),
                error: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
