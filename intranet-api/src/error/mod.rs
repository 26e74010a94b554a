//! Error types

mod api;
mod auth;

pub use api::*;
pub use auth::*;

/// Top-level error for client operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// Returns `true` if the record was not found.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(ApiError::NotFound { .. }))
    }

    /// Returns the HTTP status code, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status_code(),
            _ => None,
        }
    }

    /// Short message suitable for a toast.
    pub fn user_message(&self) -> String {
        match self {
            Self::Api(ApiError::Http { message, .. }) if !message.is_empty() => message.clone(),
            Self::Api(ApiError::NotFound { .. }) => "No encontrado".to_string(),
            Self::Api(ApiError::Timeout(_)) => "El servidor no respondió a tiempo".to_string(),
            Self::Api(ApiError::Network(_)) => "Error de conexión con el servidor".to_string(),
            Self::Auth(_) => "Sesión no válida".to_string(),
            _ => "Ocurrió un error inesperado".to_string(),
        }
    }
}
