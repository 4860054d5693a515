use crate::error::ApiError;
use crate::utils::respond::{Failure, OutputFormat};
use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

/// The `{id}` segment of `/players/{id}`.
///
/// axum's own `Path<i64>` rejects junk with a plain-text 400. An id that
/// isn't an integer can't name a player, so this reports it as a missing
/// player instead, in whatever format the request asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayerId(pub i64);

impl<S> FromRequestParts<S> for PlayerId
where
    S: Send + Sync,
{
    type Rejection = Failure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<i64>::from_request_parts(parts, state).await {
            Ok(Path(id)) => Ok(PlayerId(id)),
            Err(rejection) => {
                tracing::debug!("Unusable player id in {}: {}", parts.uri.path(), rejection);
                Err(Failure::new(
                    OutputFormat::from_query(parts.uri.query()),
                    ApiError::NotFound,
                ))
            }
        }
    }
}
