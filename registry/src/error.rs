use axum::http::StatusCode;
use thiserror::Error;

/// The request body could not be turned into a field mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Invalid request body")]
    InvalidBody,
    #[error("Invalid XML")]
    InvalidXml,
}

/// The field mapping decoded fine but does not describe a valid player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing fields")]
    MissingFields,
    #[error("Invalid field types")]
    InvalidTypes,
    #[error("Invalid field values")]
    InvalidValues,
    #[error("No fields to update")]
    NoFields,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Token is missing")]
    Missing,
    // Expiry, signature and subject failures are not told apart.
    #[error("Invalid or expired token")]
    Invalid,
}

/// Anything the datastore reported. Callers only ever see a generic 500.
#[derive(Debug, Error)]
#[error("persistence failure: {0}")]
pub struct PersistenceError(#[from] pub sqlx::Error);

/// Every failure a request can end in.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("Player not found")]
    NotFound,
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Token generation error")]
    TokenIssue,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Decode(_) | ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Auth(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Persistence(_) | ApiError::TokenIssue => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The fixed, user-facing message. Persistence details never leak here.
    pub fn message(&self) -> String {
        match self {
            ApiError::Persistence(_) => "Database error".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_errors_map_to_400() {
        assert_eq!(ApiError::from(DecodeError::InvalidXml).status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::from(ValidationError::NoFields).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(ApiError::from(AuthError::Missing).status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn persistence_message_is_generic() {
        let err = ApiError::from(PersistenceError(sqlx::Error::PoolTimedOut));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.message(), "Database error");
    }

    #[test]
    fn messages_are_fixed() {
        assert_eq!(ApiError::from(ValidationError::MissingFields).message(), "Missing fields");
        assert_eq!(ApiError::from(AuthError::Invalid).message(), "Invalid or expired token");
        assert_eq!(ApiError::from(DecodeError::InvalidXml).message(), "Invalid XML");
    }
}
