use crate::error::ApiError;
use crate::middleware::auth::AdminSession;
use crate::middleware::path::PlayerId;
use crate::models::player::PlayerFilter;
use crate::state::AppState;
use crate::utils::decode::{ContentKind, decode_body, query_value};
use crate::utils::respond::{Outcome, OutputFormat, respond};
use crate::utils::validation::{validate_create, validate_update};
use axum::{
    body::Bytes,
    extract::{RawQuery, State},
    http::HeaderMap,
    response::Response,
};

/// Lists players, optionally filtered.
///
/// Query parameters:
/// - club: exact club name (takes precedence)
/// - min_goals: lower bound on goals
/// - format: `xml` for XML, JSON otherwise
///
/// A repeated parameter uses its first value.
pub async fn list_players(
    State(state): State<AppState>,
    format: OutputFormat,
    RawQuery(query): RawQuery,
) -> Response {
    let query = query.as_deref();
    let filter = PlayerFilter::from_query(
        query_value(query, "club").as_deref(),
        query_value(query, "min_goals").as_deref(),
    );
    let result = state
        .players
        .list(&filter)
        .await
        .map(Outcome::Listed)
        .map_err(ApiError::from);
    respond(format, result)
}

/// Creates a player from a JSON, XML or form body.
///
/// All six fields are required. The id is always assigned by the database on
/// this path, even if the body carries one.
pub async fn create_player(
    State(state): State<AppState>,
    format: OutputFormat,
    _admin: AdminSession,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    respond(format, create(&state, &headers, &body).await)
}

async fn create(state: &AppState, headers: &HeaderMap, body: &[u8]) -> Result<Outcome, ApiError> {
    let fields = decode_body(ContentKind::from_headers(headers), body)?;
    let new_player = validate_create(&fields)?;

    let id = state.players.insert(&new_player).await?;
    tracing::info!("Created player {} ({})", id, new_player.name);

    // Read it back so the response has the stored values (created_at included).
    let player = state
        .players
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    Ok(Outcome::Created(player))
}

/// Partially updates a player. Fields left out of the body are untouched.
pub async fn update_player(
    State(state): State<AppState>,
    format: OutputFormat,
    _admin: AdminSession,
    PlayerId(id): PlayerId,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    respond(format, update(&state, id, &headers, &body).await)
}

async fn update(
    state: &AppState,
    id: i64,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<Outcome, ApiError> {
    let fields = decode_body(ContentKind::from_headers(headers), body)?;
    let changes = validate_update(&fields)?;

    state.players.update(id, &changes).await?;

    let player = state
        .players
        .find_by_id(id)
        .await?
        .ok_or(ApiError::NotFound)?;
    tracing::info!("Updated player {}", id);
    Ok(Outcome::Updated(player))
}

/// Deletes a player. Deleting an id that doesn't exist still reports success.
pub async fn delete_player(
    State(state): State<AppState>,
    format: OutputFormat,
    _admin: AdminSession,
    PlayerId(id): PlayerId,
) -> Response {
    let result = state
        .players
        .delete(id)
        .await
        .map(|()| Outcome::Deleted)
        .map_err(ApiError::from);
    if result.is_ok() {
        tracing::info!("Deleted player {}", id);
    }
    respond(format, result)
}
