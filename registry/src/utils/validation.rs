use crate::error::ValidationError;
use crate::models::player::{NewPlayer, PlayerChanges};
use crate::utils::codec::Fields;
use serde_json::Value;

pub const TEXT_FIELDS: [&str; 3] = ["name", "club", "position"];
pub const NUMERIC_FIELDS: [&str; 3] = ["goals", "assists", "appearances"];

/// Coerces a raw value into trimmed text.
///
/// JSON numbers are accepted as their decimal form. Anything else that isn't
/// a string (null, bools, arrays, objects) is a type error.
fn coerce_text(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(s) => Ok(s.trim().to_string()),
        Value::Number(n) => Ok(n.to_string()),
        _ => Err(ValidationError::InvalidTypes),
    }
}

/// Coerces a raw value into an integer.
///
/// Whole JSON numbers pass, as does text holding an integer (surrounding
/// whitespace allowed). Fractions, bools and nulls do not.
fn coerce_integer(value: &Value) -> Result<i64, ValidationError> {
    match value {
        Value::Number(n) => n.as_i64().ok_or(ValidationError::InvalidTypes),
        Value::String(s) => s.trim().parse().map_err(|_| ValidationError::InvalidTypes),
        _ => Err(ValidationError::InvalidTypes),
    }
}

fn check_text(text: &str) -> Result<(), ValidationError> {
    if text.is_empty() {
        return Err(ValidationError::InvalidValues);
    }
    Ok(())
}

fn check_count(count: i64) -> Result<(), ValidationError> {
    if count < 0 {
        return Err(ValidationError::InvalidValues);
    }
    Ok(())
}

/// Coerces whichever known fields are present. Type errors win over value
/// errors across the whole request, so values are only checked afterwards.
fn coerce_present(fields: &Fields) -> Result<PlayerChanges, ValidationError> {
    let text = |key: &str| fields.get(key).map(coerce_text).transpose();
    let integer = |key: &str| fields.get(key).map(coerce_integer).transpose();

    Ok(PlayerChanges {
        name: text("name")?,
        club: text("club")?,
        position: text("position")?,
        goals: integer("goals")?,
        assists: integer("assists")?,
        appearances: integer("appearances")?,
    })
}

fn check_values(changes: &PlayerChanges) -> Result<(), ValidationError> {
    for text in [&changes.name, &changes.club, &changes.position]
        .into_iter()
        .flatten()
    {
        check_text(text)?;
    }
    for count in [changes.goals, changes.assists, changes.appearances]
        .into_iter()
        .flatten()
    {
        check_count(count)?;
    }
    Ok(())
}

/// Validates a create request. Every field is required.
///
/// Any `id` in the mapping is ignored here; see [`explicit_id`].
pub fn validate_create(fields: &Fields) -> Result<NewPlayer, ValidationError> {
    let all_present = TEXT_FIELDS
        .iter()
        .chain(NUMERIC_FIELDS.iter())
        .all(|key| fields.contains_key(*key));
    if !all_present {
        return Err(ValidationError::MissingFields);
    }

    let changes = coerce_present(fields)?;
    check_values(&changes)?;

    match changes {
        PlayerChanges {
            name: Some(name),
            club: Some(club),
            position: Some(position),
            goals: Some(goals),
            assists: Some(assists),
            appearances: Some(appearances),
        } => Ok(NewPlayer {
            id: None,
            name,
            club,
            position,
            goals,
            assists,
            appearances,
        }),
        _ => Err(ValidationError::MissingFields),
    }
}

/// Validates a partial update. Only the fields present are checked, and at
/// least one known field has to be there.
pub fn validate_update(fields: &Fields) -> Result<PlayerChanges, ValidationError> {
    let changes = coerce_present(fields)?;
    if changes.is_empty() {
        return Err(ValidationError::NoFields);
    }
    check_values(&changes)?;
    Ok(changes)
}

/// Reads the optional `id` the admin create form allows.
///
/// Blank or absent means the database assigns one.
pub fn explicit_id(fields: &Fields) -> Result<Option<i64>, ValidationError> {
    let Some(value) = fields.get("id") else {
        return Ok(None);
    };
    if matches!(value, Value::String(s) if s.trim().is_empty()) {
        return Ok(None);
    }
    let id = coerce_integer(value)?;
    if id <= 0 {
        return Err(ValidationError::InvalidValues);
    }
    Ok(Some(id))
}
