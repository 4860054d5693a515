use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row of the `players` table.
///
/// Field order here is the wire order: JSON objects and XML elements are
/// written in this sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Player {
    pub id: i64,
    pub name: String,
    pub club: String,
    pub position: String,
    pub goals: i64,
    pub assists: i64,
    pub appearances: i64,
    pub created_at: DateTime<Utc>,
}

impl Player {
    /// Every field as `(name, text)` pairs, in wire order.
    ///
    /// XML has no native integer or date type, so everything goes out as text.
    /// Timestamps use RFC 3339, which is an ISO-8601 profile.
    pub fn text_fields(&self) -> Vec<(&'static str, String)> {
        vec![
            ("id", self.id.to_string()),
            ("name", self.name.clone()),
            ("club", self.club.clone()),
            ("position", self.position.clone()),
            ("goals", self.goals.to_string()),
            ("assists", self.assists.to_string()),
            ("appearances", self.appearances.to_string()),
            ("created_at", self.created_at.to_rfc3339()),
        ]
    }
}

/// A fully validated create request.
///
/// `id` is only ever set by the HTML admin form; API creates always let the
/// database pick one.
#[derive(Debug, Clone, PartialEq)]
pub struct NewPlayer {
    pub id: Option<i64>,
    pub name: String,
    pub club: String,
    pub position: String,
    pub goals: i64,
    pub assists: i64,
    pub appearances: i64,
}

/// A validated partial update. `None` means "leave the column alone".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlayerChanges {
    pub name: Option<String>,
    pub club: Option<String>,
    pub position: Option<String>,
    pub goals: Option<i64>,
    pub assists: Option<i64>,
    pub appearances: Option<i64>,
}

impl PlayerChanges {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.club.is_none()
            && self.position.is_none()
            && self.goals.is_none()
            && self.assists.is_none()
            && self.appearances.is_none()
    }
}

/// Listing filter for `GET /players`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerFilter {
    All,
    Club(String),
    MinGoals(i64),
}

impl PlayerFilter {
    /// Builds a filter from raw query values.
    ///
    /// A non-empty club wins over `min_goals`. A `min_goals` that is not an
    /// integer is ignored.
    pub fn from_query(club: Option<&str>, min_goals: Option<&str>) -> Self {
        if let Some(club) = club.filter(|c| !c.is_empty()) {
            return PlayerFilter::Club(club.to_string());
        }
        match min_goals.and_then(|g| g.trim().parse::<i64>().ok()) {
            Some(goals) => PlayerFilter::MinGoals(goals),
            None => PlayerFilter::All,
        }
    }
}
