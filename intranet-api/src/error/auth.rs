//! Authentication error types

/// Errors that can occur while obtaining the bearer token.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// The session cookie does not carry a token.
    #[error("No '{cookie}' cookie in the session")]
    MissingToken { cookie: String },

    /// The token has expired.
    #[error("Token expired")]
    TokenExpired,
}
