use chrono::{DateTime, Utc};
use sqlx::{postgres::PgPoolOptions, FromRow, PgPool};
use uuid::Uuid;

use crate::{
    db::PreferenceStore,
    error::AppResult,
    models::{CategorySelections, NewPreference, PreferenceRecord},
};

/// Creates a PostgreSQL connection pool
///
/// Establishes a pool of database connections for efficient reuse.
/// The pool automatically manages connection lifecycle and limits.
pub async fn create_pool(database_url: &str) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}

/// Applies the embedded schema migrations
pub async fn run_migrations(pool: &PgPool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

const SELECT_COLUMNS: &str =
    "id, name, genres, time_periods, languages, quality_markers, moods, submitted_at";

#[derive(Debug, FromRow)]
struct PreferenceRow {
    id: Uuid,
    name: String,
    genres: Vec<String>,
    time_periods: Vec<String>,
    languages: Vec<String>,
    quality_markers: Vec<String>,
    moods: Vec<String>,
    submitted_at: DateTime<Utc>,
}

impl From<PreferenceRow> for PreferenceRecord {
    fn from(row: PreferenceRow) -> Self {
        PreferenceRecord {
            id: row.id,
            name: row.name,
            selections: CategorySelections {
                genres: row.genres,
                time_periods: row.time_periods,
                languages: row.languages,
                quality_markers: row.quality_markers,
                moods: row.moods,
            },
            timestamp: row.submitted_at,
        }
    }
}

/// Preference store backed by the `preferences` table
#[derive(Clone)]
pub struct PgPreferenceStore {
    pool: PgPool,
}

impl PgPreferenceStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl PreferenceStore for PgPreferenceStore {
    async fn fetch_all(&self) -> AppResult<Vec<PreferenceRecord>> {
        let rows = sqlx::query_as::<_, PreferenceRow>(&format!(
            "SELECT {} FROM preferences ORDER BY submitted_at, id",
            SELECT_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(records = rows.len(), "Fetched preferences");

        Ok(rows.into_iter().map(PreferenceRecord::from).collect())
    }

    async fn insert(&self, preference: NewPreference) -> AppResult<PreferenceRecord> {
        let selections = preference.selections;
        let row = sqlx::query_as::<_, PreferenceRow>(&format!(
            r#"
            INSERT INTO preferences (name, genres, time_periods, languages, quality_markers, moods)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(preference.name)
        .bind(selections.genres)
        .bind(selections.time_periods)
        .bind(selections.languages)
        .bind(selections.quality_markers)
        .bind(selections.moods)
        .fetch_one(&self.pool)
        .await?;

        tracing::info!(id = %row.id, "Preference stored");

        Ok(row.into())
    }

    async fn count(&self) -> AppResult<u64> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM preferences")
            .fetch_one(&self.pool)
            .await?;
        Ok(count as u64)
    }

    async fn count_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        let count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM preferences WHERE submitted_at >= $1")
                .bind(since)
                .fetch_one(&self.pool)
                .await?;
        Ok(count as u64)
    }
}
