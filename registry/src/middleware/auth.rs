use crate::error::AuthError;
use crate::state::AppState;
use crate::utils::respond::{Failure, OutputFormat};
use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

/// Proof that the request carried a valid admin token.
///
/// Put this in a handler's argument list before the body extractor and axum
/// runs it first:
/// 1. Read the Authorization header (401 if missing)
/// 2. Strip an optional `Bearer ` prefix
/// 3. Verify signature, expiry and subject (401 on any failure)
///
/// A rejection is rendered in the format the request asked for, and the
/// handler body (decoding, database work) never runs.
///
/// There is a single admin identity, so nothing is carried downstream.
#[derive(Debug)]
pub struct AdminSession;

impl FromRequestParts<AppState> for AdminSession {
    type Rejection = Failure;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let format = OutputFormat::from_query(parts.uri.query());

        // An empty header counts as no header at all.
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .filter(|h| !h.is_empty())
            .ok_or_else(|| Failure::new(format, AuthError::Missing))?;

        // A header that isn't valid text can't hold a token either.
        let value = header
            .to_str()
            .map_err(|_| Failure::new(format, AuthError::Invalid))?;
        let token = value.strip_prefix("Bearer ").unwrap_or(value);

        state
            .tokens
            .verify(token)
            .map_err(|e| Failure::new(format, e))?;

        Ok(AdminSession)
    }
}
