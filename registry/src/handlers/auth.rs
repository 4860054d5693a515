use crate::error::ApiError;
use crate::state::AppState;
use crate::utils::respond::{Outcome, OutputFormat, respond};
use axum::{extract::State, response::Response};

/// Hands out a one-hour admin token.
///
/// There is no credential check here: this endpoint is open, and any caller
/// gets a token.
pub async fn login(State(state): State<AppState>, format: OutputFormat) -> Response {
    let result = state.tokens.issue().map(Outcome::TokenIssued).map_err(|e| {
        tracing::error!("Token generation failed: {}", e);
        ApiError::TokenIssue
    });
    respond(format, result)
}
