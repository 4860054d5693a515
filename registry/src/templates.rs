use crate::models::player::Player;
use crate::utils::codec::Fields;
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use serde_json::Value;

/// Raw form values, echoed back into the create/edit forms.
#[derive(Debug, Default, Clone)]
pub struct PlayerForm {
    pub id: String,
    pub name: String,
    pub club: String,
    pub position: String,
    pub goals: String,
    pub assists: String,
    pub appearances: String,
}

impl From<&Player> for PlayerForm {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id.to_string(),
            name: player.name.clone(),
            club: player.club.clone(),
            position: player.position.clone(),
            goals: player.goals.to_string(),
            assists: player.assists.to_string(),
            appearances: player.appearances.to_string(),
        }
    }
}

impl From<&Fields> for PlayerForm {
    fn from(fields: &Fields) -> Self {
        let get = |key: &str| match fields.get(key) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        };
        Self {
            id: get("id"),
            name: get("name"),
            club: get("club"),
            position: get("position"),
            goals: get("goals"),
            assists: get("assists"),
            appearances: get("appearances"),
        }
    }
}

/// Player list with JSON and XML renderings of the same data.
#[derive(Debug, Default, Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub players: Vec<Player>,
    pub json_data: String,
    pub xml_data: String,
    pub message: Option<String>, // flash message after a create
    pub error: Option<String>,
}

#[derive(Debug, Default, Template)]
#[template(path = "create.html")]
pub struct CreateTemplate {
    pub form: PlayerForm,
    pub error: Option<String>,
}

#[derive(Debug, Default, Template)]
#[template(path = "edit.html")]
pub struct EditTemplate {
    pub id: i64,
    pub form: PlayerForm,
    pub error: Option<String>,
}

/// Helper: render a Template to HTML or return 500 on error
pub fn render_template<T: Template>(template: T) -> Response {
    match template.render() {
        Ok(html) => Html(html).into_response(),
        Err(err) => {
            tracing::error!("Template render error: {}", err);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.").into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn create_form_escapes_echoed_values() {
        let fields = match json!({"name": "<script>", "goals": "3"}) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let html = CreateTemplate {
            form: PlayerForm::from(&fields),
            error: Some("Invalid field values".to_string()),
        }
        .render()
        .unwrap();

        assert!(html.contains("Invalid field values"));
        assert!(!html.contains("<script>"));
        assert!(html.contains(r#"name="goals" type="number" min="0" value="3""#));
    }

    #[test]
    fn index_lists_players_and_flash() {
        let html = IndexTemplate {
            message: Some("Player created successfully! ID: 7".to_string()),
            ..Default::default()
        }
        .render()
        .unwrap();
        assert!(html.contains("Player created successfully! ID: 7"));
        assert!(html.contains(r#"<a href="/create">"#));
    }
}
