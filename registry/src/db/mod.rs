pub mod players;

use crate::config::Config;
use crate::error::PersistenceError;
use crate::models::player::{NewPlayer, Player, PlayerChanges, PlayerFilter};
use anyhow::Result;
use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

pub use players::PgPlayerRepository;

/// Persistence boundary for the `players` table.
///
/// Implementations must pass every value as a bound parameter. Nothing from a
/// request is ever spliced into query text.
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Inserts a player and returns its id (the supplied one, if any).
    async fn insert(&self, player: &NewPlayer) -> Result<i64, PersistenceError>;

    /// All players matching the filter, in whatever order the store returns them.
    async fn list(&self, filter: &PlayerFilter) -> Result<Vec<Player>, PersistenceError>;

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, PersistenceError>;

    /// Overwrites the columns set in `changes`. Unknown ids are a no-op.
    async fn update(&self, id: i64, changes: &PlayerChanges) -> Result<(), PersistenceError>;

    /// Removes a player. Unknown ids are a no-op.
    async fn delete(&self, id: i64) -> Result<(), PersistenceError>;

    /// Cheap liveness probe for the health endpoint.
    async fn ping(&self) -> Result<(), PersistenceError>;
}

const CREATE_PLAYERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS players (
    id BIGSERIAL PRIMARY KEY,
    name TEXT NOT NULL,
    club TEXT NOT NULL,
    position TEXT NOT NULL,
    goals BIGINT NOT NULL DEFAULT 0 CHECK (goals >= 0),
    assists BIGINT NOT NULL DEFAULT 0 CHECK (assists >= 0),
    appearances BIGINT NOT NULL DEFAULT 0 CHECK (appearances >= 0),
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
)
"#;

/// Opens the connection pool and makes sure the table exists.
///
/// There are no migrations: the table is created once if missing and left
/// alone afterwards.
pub async fn connect(config: &Config) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    sqlx::query(CREATE_PLAYERS_TABLE).execute(&pool).await?;

    Ok(pool)
}
