use crate::error::DecodeError;
use crate::utils::codec::{Fields, read_fields_xml};
use axum::http::{HeaderMap, header::CONTENT_TYPE};
use serde_json::Value;

/// What a request says its body is.
///
/// Matching is done on the parsed media type, never on substrings, so
/// something like `application/xml+foo` is `Other` rather than XML.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    Json,
    Xml,
    Form,
    Other,
}

impl ContentKind {
    pub fn classify(content_type: Option<&str>) -> Self {
        let Some(raw) = content_type else {
            return ContentKind::Other;
        };
        // Drop parameters like "; charset=utf-8".
        let essence = raw.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
        let Some((kind, subtype)) = essence.split_once('/') else {
            return ContentKind::Other;
        };

        match (kind, subtype) {
            ("application", "json") => ContentKind::Json,
            ("application", s) if s.ends_with("+json") => ContentKind::Json,
            ("application" | "text", "xml") => ContentKind::Xml,
            ("application", s) if s.ends_with("+xml") => ContentKind::Xml,
            ("application", "x-www-form-urlencoded") => ContentKind::Form,
            _ => ContentKind::Other,
        }
    }

    pub fn from_headers(headers: &HeaderMap) -> Self {
        Self::classify(headers.get(CONTENT_TYPE).and_then(|h| h.to_str().ok()))
    }
}

/// Turns a raw body into a field mapping according to its declared kind.
///
/// Unknown or missing content types are tried as JSON.
pub fn decode_body(kind: ContentKind, body: &[u8]) -> Result<Fields, DecodeError> {
    match kind {
        ContentKind::Xml => {
            let xml = std::str::from_utf8(body).map_err(|_| DecodeError::InvalidXml)?;
            read_fields_xml(xml)
        }
        ContentKind::Form => decode_form(body),
        ContentKind::Json | ContentKind::Other => decode_json(body),
    }
}

fn decode_json(body: &[u8]) -> Result<Fields, DecodeError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(fields)) => Ok(fields),
        _ => Err(DecodeError::InvalidBody),
    }
}

/// First value of `key` in a raw query string.
///
/// Repeated keys are not an error: the first one wins and the rest are
/// ignored. A query string that doesn't parse has no values at all.
pub fn query_value(query: Option<&str>, key: &str) -> Option<String> {
    let pairs: Vec<(String, String)> = query
        .and_then(|q| serde_urlencoded::from_str(q).ok())
        .unwrap_or_default();
    pairs.into_iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

/// Form posts come from the admin UI and are taken as-is: every value a string.
pub fn decode_form(body: &[u8]) -> Result<Fields, DecodeError> {
    let pairs: Vec<(String, String)> =
        serde_urlencoded::from_bytes(body).map_err(|_| DecodeError::InvalidBody)?;
    Ok(pairs
        .into_iter()
        .map(|(key, value)| (key, Value::String(value)))
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn classifies_media_types() {
        assert_eq!(ContentKind::classify(Some("application/json")), ContentKind::Json);
        assert_eq!(
            ContentKind::classify(Some("Application/JSON; charset=utf-8")),
            ContentKind::Json
        );
        assert_eq!(ContentKind::classify(Some("application/vnd.api+json")), ContentKind::Json);
        assert_eq!(ContentKind::classify(Some("application/xml")), ContentKind::Xml);
        assert_eq!(ContentKind::classify(Some("text/xml; charset=UTF-8")), ContentKind::Xml);
        assert_eq!(ContentKind::classify(Some("application/atom+xml")), ContentKind::Xml);
        assert_eq!(
            ContentKind::classify(Some("application/x-www-form-urlencoded")),
            ContentKind::Form
        );
    }

    #[test]
    fn lookalike_types_are_not_xml() {
        assert_eq!(ContentKind::classify(Some("application/xml+foo")), ContentKind::Other);
        assert_eq!(ContentKind::classify(Some("text/xmlish")), ContentKind::Other);
        assert_eq!(ContentKind::classify(Some("xml")), ContentKind::Other);
        assert_eq!(ContentKind::classify(None), ContentKind::Other);
    }

    #[test]
    fn unknown_kind_falls_back_to_json() {
        let fields = decode_body(ContentKind::Other, br#"{"goals": 3}"#).unwrap();
        assert_eq!(fields["goals"], json!(3));
    }

    #[test]
    fn json_must_be_an_object() {
        assert_eq!(decode_body(ContentKind::Json, b"[1, 2]"), Err(DecodeError::InvalidBody));
        assert_eq!(decode_body(ContentKind::Json, b"{oops"), Err(DecodeError::InvalidBody));
        assert_eq!(decode_body(ContentKind::Json, b""), Err(DecodeError::InvalidBody));
    }

    #[test]
    fn xml_values_stay_text() {
        let fields =
            decode_body(ContentKind::Xml, b"<player><goals>9</goals></player>").unwrap();
        assert_eq!(fields["goals"], json!("9"));
    }

    #[test]
    fn invalid_utf8_xml_is_invalid_xml() {
        assert_eq!(
            decode_body(ContentKind::Xml, &[0x3c, 0xff, 0xfe]),
            Err(DecodeError::InvalidXml)
        );
    }

    #[test]
    fn query_value_takes_first_occurrence() {
        let query = Some("club=Ajax&club=PSV&min_goals=3");
        assert_eq!(query_value(query, "club").as_deref(), Some("Ajax"));
        assert_eq!(query_value(query, "min_goals").as_deref(), Some("3"));
        assert_eq!(query_value(query, "format"), None);
        assert_eq!(query_value(None, "club"), None);
    }

    #[test]
    fn form_values_are_strings() {
        let fields = decode_body(ContentKind::Form, b"name=Son+Heung-min&goals=17").unwrap();
        assert_eq!(fields["name"], json!("Son Heung-min"));
        assert_eq!(fields["goals"], json!("17"));
    }
}
