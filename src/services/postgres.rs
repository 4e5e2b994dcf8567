use crate::core::error::MatchingError;
use crate::core::filters::pair_key;
use crate::models::{IdealType, Match, MatchStatus, Profile};
use crate::services::store::{MatchStore, ProfileStore};
use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Row};
use std::time::Duration;

/// PostgreSQL-backed profile and match store.
///
/// The matches table carries a unique index on the canonical pair columns,
/// so a duplicate proposal is rejected by the database even when two
/// requests race past the lifecycle pre-check. Status transitions are a
/// conditional UPDATE, re-validating PENDING at commit.
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, MatchingError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(5))
            .idle_timeout(Duration::from_secs(600))
            .test_before_acquire(true)
            .connect(database_url)
            .await?;

        // Run migrations on startup
        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .map_err(|e| MatchingError::Store(e.to_string()))?;

        Ok(Self { pool })
    }

    pub async fn health_check(&self) -> Result<bool, MatchingError> {
        let row: (i32,) = sqlx::query_as("SELECT 1").fetch_one(&self.pool).await?;
        Ok(row.0 == 1)
    }

    fn profile_from_row(row: &PgRow) -> Result<Profile, MatchingError> {
        let interests: Option<serde_json::Value> = row.try_get("interests")?;
        let keywords: Option<serde_json::Value> = row.try_get("personality_keywords")?;
        let ideal_type: Option<serde_json::Value> = row.try_get("ideal_type")?;

        Ok(Profile {
            user_id: row.try_get("user_id")?,
            name: row.try_get("name")?,
            mbti: row.try_get("mbti")?,
            interests: interests
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| MatchingError::Store(e.to_string()))?
                .unwrap_or_default(),
            personality_keywords: keywords
                .map(serde_json::from_value)
                .transpose()
                .map_err(|e| MatchingError::Store(e.to_string()))?
                .unwrap_or_default(),
            department: row.try_get("department")?,
            birth: row.try_get("birth")?,
            height: row.try_get("height")?,
            ideal_type: ideal_type
                .map(serde_json::from_value::<IdealType>)
                .transpose()
                .map_err(|e| MatchingError::Store(e.to_string()))?,
        })
    }

    fn match_from_row(row: &PgRow) -> Result<Match, MatchingError> {
        let status: String = row.try_get("status")?;
        let status = MatchStatus::parse(&status)
            .ok_or_else(|| MatchingError::Store(format!("unknown match status: {}", status)))?;

        Ok(Match {
            id: row.try_get("id")?,
            user_a_id: row.try_get("user_a_id")?,
            user_b_id: row.try_get("user_b_id")?,
            score: row.try_get("score")?,
            matched_at: row.try_get("matched_at")?,
            status,
        })
    }
}

const MATCH_COLUMNS: &str = "id, user_a_id, user_b_id, score, matched_at, status";

#[async_trait]
impl ProfileStore for PostgresStore {
    async fn get(&self, user_id: &str) -> Result<Profile, MatchingError> {
        let row = sqlx::query("SELECT * FROM profiles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| MatchingError::NotFound(format!("user {}", user_id)))?;

        Self::profile_from_row(&row)
    }

    async fn list_all(&self) -> Result<Vec<Profile>, MatchingError> {
        let rows = sqlx::query("SELECT * FROM profiles ORDER BY user_id")
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(Self::profile_from_row).collect()
    }
}

#[async_trait]
impl MatchStore for PostgresStore {
    async fn get(&self, match_id: &str) -> Result<Option<Match>, MatchingError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM matches WHERE id = $1",
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::match_from_row).transpose()
    }

    async fn find_by_user(&self, user_id: &str) -> Result<Vec<Match>, MatchingError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM matches WHERE user_a_id = $1 OR user_b_id = $1 ORDER BY matched_at DESC",
            MATCH_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::match_from_row).collect()
    }

    async fn find_by_pair(
        &self,
        user_a: &str,
        user_b: &str,
    ) -> Result<Option<Match>, MatchingError> {
        let (lo, hi) = pair_key(user_a, user_b);

        let row = sqlx::query(&format!(
            "SELECT {} FROM matches WHERE pair_lo = $1 AND pair_hi = $2",
            MATCH_COLUMNS
        ))
        .bind(lo)
        .bind(hi)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::match_from_row).transpose()
    }

    async fn find_by_status(&self, status: MatchStatus) -> Result<Vec<Match>, MatchingError> {
        let rows = sqlx::query(&format!(
            "SELECT {} FROM matches WHERE status = $1 ORDER BY matched_at DESC",
            MATCH_COLUMNS
        ))
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(Self::match_from_row).collect()
    }

    async fn insert(&self, proposal: Match) -> Result<Match, MatchingError> {
        let (lo, hi) = pair_key(&proposal.user_a_id, &proposal.user_b_id);

        let result = sqlx::query(
            r#"
            INSERT INTO matches (id, user_a_id, user_b_id, pair_lo, pair_hi, score, matched_at, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            ON CONFLICT (pair_lo, pair_hi) DO NOTHING
            "#,
        )
        .bind(&proposal.id)
        .bind(&proposal.user_a_id)
        .bind(&proposal.user_b_id)
        .bind(&lo)
        .bind(&hi)
        .bind(proposal.score)
        .bind(proposal.matched_at)
        .bind(proposal.status.as_str())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(MatchingError::Conflict(
                proposal.user_a_id,
                proposal.user_b_id,
            ));
        }

        Ok(proposal)
    }

    async fn transition(
        &self,
        match_id: &str,
        from: MatchStatus,
        to: MatchStatus,
    ) -> Result<Option<Match>, MatchingError> {
        let row = sqlx::query(&format!(
            "UPDATE matches SET status = $3 WHERE id = $1 AND status = $2 RETURNING {}",
            MATCH_COLUMNS
        ))
        .bind(match_id)
        .bind(from.as_str())
        .bind(to.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(Self::match_from_row).transpose()
    }
}
