//! Server-rendered admin pages.
//!
//! These mirror the API operations through plain form posts. They are not
//! behind the token gate.

use crate::error::{ApiError, ValidationError};
use crate::models::player::{Player, PlayerFilter};
use crate::state::AppState;
use crate::templates::{CreateTemplate, EditTemplate, IndexTemplate, PlayerForm, render_template};
use crate::utils::codec::{Fields, player_list_xml};
use crate::utils::decode::{decode_form, query_value};
use crate::utils::validation::{TEXT_FIELDS, explicit_id, validate_create, validate_update};
use axum::{
    body::Bytes,
    extract::{Path, RawQuery, State},
    response::{IntoResponse, Redirect, Response},
};
use serde_json::Value;

/// Shown instead of the generic validation message when the create form is
/// missing a text field.
pub const TEXT_FIELDS_REQUIRED: &str = "Name, Club, and Position are required";

/// GET / – Player table plus JSON and XML dumps of it.
pub async fn index(State(state): State<AppState>, RawQuery(query): RawQuery) -> Response {
    let message = query_value(query.as_deref(), "message");
    let template = match state.players.list(&PlayerFilter::All).await {
        Ok(players) => IndexTemplate {
            json_data: serde_json::to_string_pretty(&players).unwrap_or_default(),
            xml_data: player_list_xml(&players).unwrap_or_default(),
            players,
            message,
            error: None,
        },
        Err(e) => {
            tracing::error!("Admin index failed: {}", e);
            IndexTemplate {
                json_data: "[]".to_string(),
                error: Some(ApiError::from(e).message()),
                ..Default::default()
            }
        }
    };
    render_template(template)
}

/// GET /create – Empty create form.
pub async fn create_page() -> Response {
    render_template(CreateTemplate::default())
}

/// POST /create – Create from the form. Unlike the API, an explicit id is allowed.
pub async fn create_submit(State(state): State<AppState>, body: Bytes) -> Response {
    let fields = match decode_form(&body) {
        Ok(fields) => fields,
        Err(e) => return create_error(&Fields::new(), ApiError::from(e)),
    };

    match create_from_form(&state, &fields).await {
        Ok(id) => {
            let message = format!("Player created successfully! ID: {id}");
            let query = serde_urlencoded::to_string(&[("message", message)]).unwrap_or_default();
            Redirect::to(&format!("/?{query}")).into_response()
        }
        Err(e) => create_error(&fields, e),
    }
}

/// True when name, club or position is absent or only whitespace.
fn missing_text_field(fields: &Fields) -> bool {
    TEXT_FIELDS.iter().any(|key| match fields.get(*key) {
        Some(Value::String(s)) => s.trim().is_empty(),
        Some(_) => false,
        None => true,
    })
}

async fn create_from_form(state: &AppState, fields: &Fields) -> Result<i64, ApiError> {
    let mut new_player = validate_create(fields)?;
    new_player.id = explicit_id(fields)?;
    let id = state.players.insert(&new_player).await?;
    tracing::info!("Created player {} from admin form", id);
    Ok(id)
}

fn create_error(fields: &Fields, error: ApiError) -> Response {
    if let ApiError::Persistence(e) = &error {
        tracing::error!("Admin create failed: {}", e);
    }
    let message = match error {
        ApiError::Validation(_) if missing_text_field(fields) => TEXT_FIELDS_REQUIRED.to_string(),
        other => other.message(),
    };
    render_template(CreateTemplate {
        form: PlayerForm::from(fields),
        error: Some(message),
    })
}

/// GET /edit/{id} – Form pre-filled with the current values.
pub async fn edit_page(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.players.find_by_id(id).await {
        Ok(Some(player)) => render_template(EditTemplate {
            id,
            form: PlayerForm::from(&player),
            error: None,
        }),
        Ok(None) => Redirect::to("/").into_response(),
        Err(e) => {
            tracing::error!("Admin edit page failed: {}", e);
            render_template(EditTemplate {
                id,
                form: PlayerForm::default(),
                error: Some(ApiError::from(e).message()),
            })
        }
    }
}

/// POST /edit/{id} – Blank inputs keep their stored value.
pub async fn edit_submit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    body: Bytes,
) -> Response {
    let existing = match state.players.find_by_id(id).await {
        Ok(Some(player)) => player,
        Ok(None) => return Redirect::to("/").into_response(),
        Err(e) => return edit_error(id, &Fields::new(), ApiError::from(e)),
    };

    let fields = match decode_form(&body) {
        Ok(fields) => fields,
        Err(e) => return edit_error(id, &Fields::new(), ApiError::from(e)),
    };

    match edit_from_form(&state, &existing, &fields).await {
        Ok(()) => Redirect::to("/").into_response(),
        Err(e) => edit_error(id, &fields, e),
    }
}

async fn edit_from_form(state: &AppState, existing: &Player, fields: &Fields) -> Result<(), ApiError> {
    let filled: Fields = fields
        .iter()
        .filter(|(_, value)| !matches!(value, Value::String(s) if s.trim().is_empty()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    // Nothing filled in means nothing to change.
    let changes = match validate_update(&filled) {
        Ok(changes) => changes,
        Err(ValidationError::NoFields) => return Ok(()),
        Err(e) => return Err(e.into()),
    };

    state.players.update(existing.id, &changes).await?;
    tracing::info!("Updated player {} from admin form", existing.id);
    Ok(())
}

fn edit_error(id: i64, fields: &Fields, error: ApiError) -> Response {
    if let ApiError::Persistence(e) = &error {
        tracing::error!("Admin edit failed: {}", e);
    }
    render_template(EditTemplate {
        id,
        form: PlayerForm::from(fields),
        error: Some(error.message()),
    })
}

/// POST /delete/{id} – Always back to the list; failures are only logged.
pub async fn delete_submit(State(state): State<AppState>, Path(id): Path<i64>) -> Redirect {
    match state.players.delete(id).await {
        Ok(()) => tracing::info!("Deleted player {} from admin form", id),
        Err(e) => tracing::error!("Admin delete of player {} failed: {}", id, e),
    }
    Redirect::to("/")
}
