//! Error taxonomy shared by every layer.

use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};

/// Application error type.
///
/// `NotFound` is the only domain error this application knows; handlers
/// catch it at the boundary and translate it into a redirect with a
/// human-readable message. Everything else is an infrastructure failure
/// and surfaces as an HTTP error status.
#[derive(Debug)]
pub enum CoreError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl CoreError {
    /// Message carried by the error, regardless of variant.
    pub fn message(&self) -> &str {
        match self {
            CoreError::NotFound(msg)
            | CoreError::BadRequest(msg)
            | CoreError::Internal(msg) => msg,
        }
    }
}

impl std::fmt::Display for CoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CoreError::NotFound(msg) => write!(f, "no encontrado: {}", msg),
            CoreError::BadRequest(msg) => write!(f, "peticion invalida: {}", msg),
            CoreError::Internal(msg) => write!(f, "error interno: {}", msg),
        }
    }
}

impl std::error::Error for CoreError {}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Internal(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for CoreError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        CoreError::BadRequest(err.to_string())
    }
}

#[cfg(feature = "database")]
impl From<sqlx::Error> for CoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => CoreError::NotFound("registro no encontrado".to_string()),
            other => CoreError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for CoreError {
    fn into_response(self) -> Response {
        let (status, titulo) = match &self {
            CoreError::NotFound(_) => (StatusCode::NOT_FOUND, "No encontrado"),
            CoreError::BadRequest(_) => (StatusCode::BAD_REQUEST, "Peticion invalida"),
            CoreError::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Error interno"),
        };

        let body = format!(
            "<!DOCTYPE html><html><head><title>{titulo}</title></head>\
             <body><h1>{titulo}</h1><p>{}</p></body></html>",
            self.message()
        );

        (status, Html(body)).into_response()
    }
}
