#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, Response, StatusCode, header};
use chrono::Utc;
use player_registry::db::PlayerRepository;
use player_registry::error::PersistenceError;
use player_registry::models::player::{NewPlayer, Player, PlayerChanges, PlayerFilter};
use player_registry::routes::create_routes;
use player_registry::state::AppState;
use player_registry::utils::token::TokenService;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

pub const SECRET: &str = "test_secret";

/// Vec-backed repository that keeps insertion order, like a table scan would.
#[derive(Default)]
pub struct InMemoryPlayers {
    rows: Mutex<Vec<Player>>,
    next_id: Mutex<i64>,
}

impl InMemoryPlayers {
    pub fn rows(&self) -> Vec<Player> {
        self.rows.lock().unwrap().clone()
    }

    pub fn seed(&self, name: &str, club: &str, goals: i64, assists: i64, appearances: i64) -> i64 {
        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let id = *next;
        self.rows.lock().unwrap().push(Player {
            id,
            name: name.to_string(),
            club: club.to_string(),
            position: "Forward".to_string(),
            goals,
            assists,
            appearances,
            created_at: Utc::now(),
        });
        id
    }
}

#[async_trait]
impl PlayerRepository for InMemoryPlayers {
    async fn insert(&self, player: &NewPlayer) -> Result<i64, PersistenceError> {
        let mut next = self.next_id.lock().unwrap();
        let id = match player.id {
            Some(id) => id,
            None => *next + 1,
        };
        *next = (*next).max(id);
        self.rows.lock().unwrap().push(Player {
            id,
            name: player.name.clone(),
            club: player.club.clone(),
            position: player.position.clone(),
            goals: player.goals,
            assists: player.assists,
            appearances: player.appearances,
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn list(&self, filter: &PlayerFilter) -> Result<Vec<Player>, PersistenceError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|p| match filter {
                PlayerFilter::All => true,
                PlayerFilter::Club(club) => &p.club == club,
                PlayerFilter::MinGoals(goals) => p.goals >= *goals,
            })
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, PersistenceError> {
        Ok(self.rows.lock().unwrap().iter().find(|p| p.id == id).cloned())
    }

    async fn update(&self, id: i64, changes: &PlayerChanges) -> Result<(), PersistenceError> {
        let mut rows = self.rows.lock().unwrap();
        if let Some(p) = rows.iter_mut().find(|p| p.id == id) {
            if let Some(name) = &changes.name {
                p.name = name.clone();
            }
            if let Some(club) = &changes.club {
                p.club = club.clone();
            }
            if let Some(position) = &changes.position {
                p.position = position.clone();
            }
            p.goals = changes.goals.unwrap_or(p.goals);
            p.assists = changes.assists.unwrap_or(p.assists);
            p.appearances = changes.appearances.unwrap_or(p.appearances);
        }
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), PersistenceError> {
        self.rows.lock().unwrap().retain(|p| p.id != id);
        Ok(())
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        Ok(())
    }
}

/// Repository whose every call fails, for the 500 paths.
pub struct BrokenPlayers;

#[async_trait]
impl PlayerRepository for BrokenPlayers {
    async fn insert(&self, _player: &NewPlayer) -> Result<i64, PersistenceError> {
        Err(PersistenceError(sqlx::Error::PoolTimedOut))
    }

    async fn list(&self, _filter: &PlayerFilter) -> Result<Vec<Player>, PersistenceError> {
        Err(PersistenceError(sqlx::Error::PoolTimedOut))
    }

    async fn find_by_id(&self, _id: i64) -> Result<Option<Player>, PersistenceError> {
        Err(PersistenceError(sqlx::Error::PoolTimedOut))
    }

    async fn update(&self, _id: i64, _changes: &PlayerChanges) -> Result<(), PersistenceError> {
        Err(PersistenceError(sqlx::Error::PoolTimedOut))
    }

    async fn delete(&self, _id: i64) -> Result<(), PersistenceError> {
        Err(PersistenceError(sqlx::Error::PoolTimedOut))
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        Err(PersistenceError(sqlx::Error::PoolTimedOut))
    }
}

pub fn app_with(players: Arc<dyn PlayerRepository>) -> Router {
    create_routes(AppState::new(players, TokenService::new(SECRET)))
}

pub fn app() -> (Router, Arc<InMemoryPlayers>) {
    let players = Arc::new(InMemoryPlayers::default());
    (app_with(players.clone()), players)
}

pub fn bearer() -> String {
    format!("Bearer {}", TokenService::new(SECRET).issue().unwrap())
}

pub struct TestResponse {
    pub status: StatusCode,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub body: String,
}

impl TestResponse {
    pub fn json(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

async fn collect(response: Response<Body>) -> TestResponse {
    let status = response.status();
    let header_text = |name: header::HeaderName| {
        response
            .headers()
            .get(name)
            .map(|v| v.to_str().unwrap().to_string())
    };
    let content_type = header_text(header::CONTENT_TYPE);
    let location = header_text(header::LOCATION);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    TestResponse {
        status,
        content_type,
        location,
        body: String::from_utf8(bytes.to_vec()).unwrap(),
    }
}

/// Fires one request at the router.
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: &str,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    let request = builder.body(Body::from(body.to_string())).unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    collect(response).await
}
