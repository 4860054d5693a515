use crate::error::ApiError;
use crate::models::player::Player;
use crate::models::token::TokenResponse;
use crate::utils::codec::{message_xml, player_list_xml};
use crate::utils::decode::query_value;
use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, header, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use std::convert::Infallible;

/// Response serialization picked by the `format` query parameter.
///
/// Only `format=xml` selects XML; anything else (or nothing) is JSON.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Xml,
}

impl OutputFormat {
    pub fn from_query(query: Option<&str>) -> Self {
        match query_value(query, "format").as_deref() {
            Some("xml") => OutputFormat::Xml,
            _ => OutputFormat::Json,
        }
    }
}

impl<S> FromRequestParts<S> for OutputFormat
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(OutputFormat::from_query(parts.uri.query()))
    }
}

/// A successful operation, before serialization.
#[derive(Debug)]
pub enum Outcome {
    Created(Player),
    Listed(Vec<Player>),
    Updated(Player),
    Deleted,
    TokenIssued(String),
}

fn xml_response(status: StatusCode, body: anyhow::Result<String>) -> Response {
    match body {
        Ok(xml) => (status, [(header::CONTENT_TYPE, "application/xml")], xml).into_response(),
        Err(e) => {
            tracing::error!("XML encoding failed: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error.").into_response()
        }
    }
}

impl Outcome {
    pub fn status(&self) -> StatusCode {
        match self {
            Outcome::Created(_) => StatusCode::CREATED,
            _ => StatusCode::OK,
        }
    }

    pub fn render(self, format: OutputFormat) -> Response {
        let status = self.status();
        match format {
            OutputFormat::Json => match self {
                Outcome::Created(p) | Outcome::Updated(p) => (status, Json(p)).into_response(),
                Outcome::Listed(players) => (status, Json(players)).into_response(),
                Outcome::Deleted => {
                    (status, Json(json!({"message": "Player deleted"}))).into_response()
                }
                Outcome::TokenIssued(token) => {
                    (status, Json(TokenResponse { token })).into_response()
                }
            },
            OutputFormat::Xml => {
                let body = match self {
                    Outcome::Created(p) => message_xml("Player added", &p.text_fields()),
                    Outcome::Updated(p) => message_xml("Player updated", &p.text_fields()),
                    Outcome::Listed(players) => player_list_xml(&players),
                    Outcome::Deleted => message_xml("Player deleted", &[]),
                    Outcome::TokenIssued(token) => {
                        message_xml("Token issued", &[("token", token)])
                    }
                };
                xml_response(status, body)
            }
        }
    }
}

/// An error bound to the format the client asked for.
#[derive(Debug)]
pub struct Failure {
    pub format: OutputFormat,
    pub error: ApiError,
}

impl Failure {
    pub fn new(format: OutputFormat, error: impl Into<ApiError>) -> Self {
        Self {
            format,
            error: error.into(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        if let ApiError::Persistence(e) = &self.error {
            tracing::error!("Database error: {}", e);
        }

        let status = self.error.status();
        let message = self.error.message();
        match self.format {
            OutputFormat::Json => (status, Json(json!({"error": message}))).into_response(),
            OutputFormat::Xml => xml_response(status, message_xml(&message, &[])),
        }
    }
}

/// Final step of every API handler.
pub fn respond(format: OutputFormat, result: Result<Outcome, ApiError>) -> Response {
    match result {
        Ok(outcome) => outcome.render(format),
        Err(error) => Failure::new(format, error).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{AuthError, ValidationError};

    #[test]
    fn format_defaults_to_json() {
        assert_eq!(OutputFormat::from_query(None), OutputFormat::Json);
        assert_eq!(OutputFormat::from_query(Some("club=Ajax")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_query(Some("format=XML")), OutputFormat::Json);
    }

    #[test]
    fn format_xml_is_exact() {
        assert_eq!(OutputFormat::from_query(Some("format=xml")), OutputFormat::Xml);
        assert_eq!(OutputFormat::from_query(Some("club=Ajax&format=xml")), OutputFormat::Xml);
        assert_eq!(
            OutputFormat::from_query(Some("format=json&format=xml")),
            OutputFormat::Json
        );
    }

    #[test]
    fn statuses_follow_the_outcome() {
        assert_eq!(Outcome::Listed(vec![]).status(), StatusCode::OK);
        assert_eq!(Outcome::Deleted.status(), StatusCode::OK);
        assert_eq!(
            Outcome::Listed(vec![]).render(OutputFormat::Xml).status(),
            StatusCode::OK
        );
    }

    #[test]
    fn xml_errors_carry_xml_content_type() {
        let response = Failure::new(OutputFormat::Xml, ValidationError::MissingFields).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "application/xml"
        );
    }

    #[test]
    fn auth_failures_are_401() {
        let response = Failure::new(OutputFormat::Json, AuthError::Missing).into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
