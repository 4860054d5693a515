use super::PlayerRepository;
use crate::error::PersistenceError;
use crate::models::player::{NewPlayer, Player, PlayerChanges, PlayerFilter};
use async_trait::async_trait;
use sqlx::PgPool;

/// Postgres-backed [`PlayerRepository`].
///
/// Holds the pool, not a connection: each query checks a connection out and
/// hands it back when done.
#[derive(Clone)]
pub struct PgPlayerRepository {
    pool: PgPool,
}

impl PgPlayerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PlayerRepository for PgPlayerRepository {
    async fn insert(&self, player: &NewPlayer) -> Result<i64, PersistenceError> {
        let Some(id) = player.id else {
            let id = sqlx::query_scalar::<_, i64>(
                r#"
                INSERT INTO players (name, club, position, goals, assists, appearances)
                VALUES ($1, $2, $3, $4, $5, $6)
                RETURNING id
                "#,
            )
            .bind(&player.name)
            .bind(&player.club)
            .bind(&player.position)
            .bind(player.goals)
            .bind(player.assists)
            .bind(player.appearances)
            .fetch_one(&self.pool)
            .await?;
            return Ok(id);
        };

        // An explicit id bypasses the sequence, so bump it past the new row
        // or the next auto-assigned insert would collide. Learned that one the
        // hard way.
        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO players (id, name, club, position, goals, assists, appearances)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(id)
        .bind(&player.name)
        .bind(&player.club)
        .bind(&player.position)
        .bind(player.goals)
        .bind(player.assists)
        .bind(player.appearances)
        .execute(&mut *tx)
        .await?;
        sqlx::query(
            "SELECT setval(pg_get_serial_sequence('players', 'id'), (SELECT MAX(id) FROM players))",
        )
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;

        Ok(id)
    }

    async fn list(&self, filter: &PlayerFilter) -> Result<Vec<Player>, PersistenceError> {
        let players = match filter {
            PlayerFilter::All => {
                sqlx::query_as::<_, Player>("SELECT * FROM players")
                    .fetch_all(&self.pool)
                    .await?
            }
            PlayerFilter::Club(club) => {
                sqlx::query_as::<_, Player>("SELECT * FROM players WHERE club = $1")
                    .bind(club)
                    .fetch_all(&self.pool)
                    .await?
            }
            PlayerFilter::MinGoals(goals) => {
                sqlx::query_as::<_, Player>("SELECT * FROM players WHERE goals >= $1")
                    .bind(goals)
                    .fetch_all(&self.pool)
                    .await?
            }
        };
        Ok(players)
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Player>, PersistenceError> {
        let player = sqlx::query_as::<_, Player>("SELECT * FROM players WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(player)
    }

    async fn update(&self, id: i64, changes: &PlayerChanges) -> Result<(), PersistenceError> {
        // NULL parameters keep the current column value.
        sqlx::query(
            r#"
            UPDATE players SET
                name = COALESCE($1, name),
                club = COALESCE($2, club),
                position = COALESCE($3, position),
                goals = COALESCE($4, goals),
                assists = COALESCE($5, assists),
                appearances = COALESCE($6, appearances)
            WHERE id = $7
            "#,
        )
        .bind(&changes.name)
        .bind(&changes.club)
        .bind(&changes.position)
        .bind(changes.goals)
        .bind(changes.assists)
        .bind(changes.appearances)
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn delete(&self, id: i64) -> Result<(), PersistenceError> {
        sqlx::query("DELETE FROM players WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), PersistenceError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
