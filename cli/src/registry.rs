use crate::cli::UpdateFields;
use anyhow::{Context, Result, anyhow};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use url::Url;

pub const DEFAULT_API_URL: &str = "http://localhost:5000";
pub const API_URL_ENV: &str = "PLAYERS_API_URL";

/// Picks the server to talk to: the `--api-url` flag, then `PLAYERS_API_URL`, then localhost.
pub fn resolve_api_url(flag: Option<&str>, env: Option<String>) -> Result<String> {
    let raw = flag
        .map(str::to_string)
        .or(env)
        .unwrap_or_else(|| DEFAULT_API_URL.to_string());
    Url::parse(&raw).with_context(|| format!("Invalid API URL: {}", raw))?;
    Ok(raw.trim_end_matches('/').to_string())
}

/// Pulls the human-readable message out of an error body.
/// JSON errors carry it under "error"; anything else is shown as-is.
pub fn error_message(text: &str) -> String {
    match serde_json::from_str::<serde_json::Value>(text) {
        Ok(json) => json["error"].as_str().unwrap_or(text).to_string(),
        Err(_) => text.trim().to_string(),
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub club: String,
    pub position: String,
    pub goals: i64,
    pub assists: i64,
    pub appearances: i64,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Request body for create and update. Unset fields are left out entirely.
#[derive(Debug, Default, Serialize)]
pub struct PlayerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assists: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appearances: Option<i64>,
}

impl From<UpdateFields> for PlayerInput {
    fn from(fields: UpdateFields) -> Self {
        Self {
            name: fields.name,
            club: fields.club,
            position: fields.position,
            goals: fields.goals,
            assists: fields.assists,
            appearances: fields.appearances,
        }
    }
}

#[derive(Debug, Default, Clone)]
pub struct ListFilter {
    pub club: Option<String>,
    pub min_goals: Option<i64>,
}

impl ListFilter {
    fn query(&self, xml: bool) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(club) = &self.club {
            pairs.push(("club", club.clone()));
        }
        if let Some(min_goals) = self.min_goals {
            pairs.push(("min_goals", min_goals.to_string()));
        }
        if xml {
            pairs.push(("format", "xml".to_string()));
        }
        pairs
    }
}

#[derive(Deserialize)]
struct TokenBody {
    token: String,
}

#[derive(Deserialize)]
struct MessageBody {
    message: String,
}

/// Thin wrapper over the registry's HTTP API.
pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl RegistryClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.to_string(),
            token: None,
        }
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, request: RequestBuilder) -> Result<RequestBuilder> {
        let token = self
            .token
            .as_ref()
            .context("Not logged in. Run 'players login' first.")?;
        Ok(request.header("Authorization", format!("Bearer {}", token)))
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        let text = response.text().await?;
        log::debug!("{} -> {}", status, text);

        if !status.is_success() {
            return Err(anyhow!("Request failed ({}): {}", status, error_message(&text)));
        }
        serde_json::from_str(&text).map_err(|_| anyhow!("Server returned invalid JSON: {}", text))
    }

    /// POST /login. Returns the new token and keeps it for the following calls.
    pub async fn login(&mut self) -> Result<String> {
        let response = self.http.post(self.url("/login")).send().await?;
        let body: TokenBody = Self::read_json(response).await?;
        self.token = Some(body.token.clone());
        Ok(body.token)
    }

    pub async fn list(&self, filter: &ListFilter) -> Result<Vec<Player>> {
        let response = self
            .http
            .get(self.url("/players"))
            .query(&filter.query(false))
            .send()
            .await?;
        Self::read_json(response).await
    }

    /// Same as [`list`](Self::list) but returns the server's XML document untouched.
    pub async fn list_xml(&self, filter: &ListFilter) -> Result<String> {
        let response = self
            .http
            .get(self.url("/players"))
            .query(&filter.query(true))
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(anyhow!("Request failed ({}): {}", status, text.trim()));
        }
        Ok(text)
    }

    pub async fn create(&self, player: &PlayerInput) -> Result<Player> {
        let request = self.authorized(self.http.post(self.url("/players")).json(player))?;
        Self::read_json(request.send().await?).await
    }

    pub async fn update(&self, id: i64, changes: &PlayerInput) -> Result<Player> {
        let request = self.authorized(
            self.http
                .put(self.url(&format!("/players/{}", id)))
                .json(changes),
        )?;
        Self::read_json(request.send().await?).await
    }

    /// Returns the server's confirmation message.
    pub async fn delete(&self, id: i64) -> Result<String> {
        let request = self.authorized(self.http.delete(self.url(&format!("/players/{}", id))))?;
        let body: MessageBody = Self::read_json(request.send().await?).await?;
        Ok(body.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flag_beats_env_beats_default() {
        assert_eq!(
            resolve_api_url(Some("http://flag:1/"), Some("http://env:2".to_string())).unwrap(),
            "http://flag:1"
        );
        assert_eq!(
            resolve_api_url(None, Some("http://env:2".to_string())).unwrap(),
            "http://env:2"
        );
        assert_eq!(resolve_api_url(None, None).unwrap(), DEFAULT_API_URL);
        assert!(resolve_api_url(Some("not a url"), None).is_err());
    }

    #[test]
    fn error_message_prefers_json_error_field() {
        assert_eq!(error_message(r#"{"error": "Token is missing"}"#), "Token is missing");
        assert_eq!(error_message("  Bad Gateway \n"), "Bad Gateway");
    }

    #[test]
    fn update_body_only_carries_set_fields() {
        let input = PlayerInput::from(UpdateFields {
            goals: Some(20),
            assists: Some(10),
            ..Default::default()
        });
        let body = serde_json::to_value(&input).unwrap();
        assert_eq!(body, serde_json::json!({"goals": 20, "assists": 10}));
    }

    #[test]
    fn list_query_carries_filters_and_format() {
        let filter = ListFilter {
            club: Some("Arsenal".to_string()),
            min_goals: Some(3),
        };
        assert_eq!(
            filter.query(true),
            vec![
                ("club", "Arsenal".to_string()),
                ("min_goals", "3".to_string()),
                ("format", "xml".to_string()),
            ]
        );
        assert!(ListFilter::default().query(false).is_empty());
    }

    #[test]
    fn mutations_need_a_token() {
        let client = RegistryClient::new(DEFAULT_API_URL);
        let request = client.http.delete(client.url("/players/1"));
        assert!(client.authorized(request).is_err());
    }
}
