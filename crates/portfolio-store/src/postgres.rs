//! Postgres-backed repositories.
//!
//! One generic [`PgRepository`] serves every record kind; the per-entity
//! parts (SQL text, row shape, row → record mapping) live in the [`Table`]
//! impls below. Columns are cast in SQL so the row types decode regardless
//! of whether the source schema uses `integer`/`timestamp` or
//! `bigint`/`timestamptz`.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::repository::{Repository, MAX_LIST_ROWS};
use crate::types::*;

/// Per-entity query definitions.
///
/// `LIST_SQL` takes the row cap as `$1`; `GET_SQL` takes the id as `$1`.
pub trait Table: Record {
    type Row: for<'r> FromRow<'r, PgRow> + Send + Unpin;

    const LIST_SQL: &'static str;
    const GET_SQL: &'static str;

    fn from_row(row: Self::Row) -> Self;
}

/// Single-table repository over a shared connection pool.
pub struct PgRepository<T> {
    pool: PgPool,
    _record: PhantomData<fn() -> T>,
}

impl<T: Table> PgRepository<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _record: PhantomData,
        }
    }
}

impl<T> Clone for PgRepository<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _record: PhantomData,
        }
    }
}

#[async_trait]
impl<T: Table> Repository for PgRepository<T> {
    type Record = T;

    async fn list(&self) -> StoreResult<Vec<T>> {
        let rows = sqlx::query_as::<_, T::Row>(T::LIST_SQL)
            .bind(MAX_LIST_ROWS)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::database(T::ENTITY, e))?;

        debug!(entity = %T::ENTITY, rows = rows.len(), "listed records");
        Ok(rows.into_iter().map(T::from_row).collect())
    }

    async fn get(&self, id: i64) -> StoreResult<T> {
        let row = sqlx::query_as::<_, T::Row>(T::GET_SQL)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::database(T::ENTITY, e))?;

        row.map(T::from_row).ok_or(StoreError::NotFound {
            entity: T::ENTITY,
            id,
        })
    }
}

// ── Skills ─────────────────────────────────────────────────────

#[derive(Debug, FromRow)]
pub struct SkillRow {
    id: i64,
    title: String,
    level: i32,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Table for Skill {
    type Row = SkillRow;

    // Skills carry no start date, so they list by id.
    const LIST_SQL: &'static str = "SELECT id::bigint AS id, title::text AS title, \
        level::integer AS level, created_at::timestamptz AS created_at, \
        updated_at::timestamptz AS updated_at \
        FROM skills ORDER BY id ASC LIMIT $1";

    const GET_SQL: &'static str = "SELECT id::bigint AS id, title::text AS title, \
        level::integer AS level, created_at::timestamptz AS created_at, \
        updated_at::timestamptz AS updated_at \
        FROM skills WHERE id = $1 LIMIT 1";

    fn from_row(row: SkillRow) -> Self {
        Skill {
            id: row.id,
            title: row.title,
            level: row.level,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ── Experiences ────────────────────────────────────────────────

#[derive(Debug, FromRow)]
pub struct ExperienceRow {
    id: i64,
    title: String,
    description: Option<String>,
    company_name: Option<String>,
    company_url: Option<String>,
    company_logo_url: Option<String>,
    languages: Option<String>,
    frameworks: Option<String>,
    started_on: Option<NaiveDate>,
    ended_on: Option<NaiveDate>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Table for Experience {
    type Row = ExperienceRow;

    const LIST_SQL: &'static str = "SELECT id::bigint AS id, title::text AS title, \
        description::text AS description, company_name::text AS company_name, \
        company_url::text AS company_url, company_logo_url::text AS company_logo_url, \
        languages::text AS languages, frameworks::text AS frameworks, \
        started_at::date AS started_on, finished_at::date AS ended_on, \
        created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at \
        FROM experiences ORDER BY started_at DESC NULLS FIRST, id ASC LIMIT $1";

    const GET_SQL: &'static str = "SELECT id::bigint AS id, title::text AS title, \
        description::text AS description, company_name::text AS company_name, \
        company_url::text AS company_url, company_logo_url::text AS company_logo_url, \
        languages::text AS languages, frameworks::text AS frameworks, \
        started_at::date AS started_on, finished_at::date AS ended_on, \
        created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at \
        FROM experiences WHERE id = $1 LIMIT 1";

    fn from_row(row: ExperienceRow) -> Self {
        let company = row.company_name.map(|name| Company {
            name,
            url: non_empty(row.company_url),
            logo_url: non_empty(row.company_logo_url),
        });

        Experience {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            company,
            languages: parse_string_list(row.languages.as_deref(), row.id, "languages"),
            frameworks: parse_string_list(row.frameworks.as_deref(), row.id, "frameworks"),
            started_on: row.started_on,
            ended_on: row.ended_on,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

// ── Educations ─────────────────────────────────────────────────

#[derive(Debug, FromRow)]
pub struct EducationRow {
    id: i64,
    title: String,
    institution_name: Option<String>,
    institution_url: Option<String>,
    started_on: Option<NaiveDate>,
    ended_on: Option<NaiveDate>,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
}

impl Table for Education {
    type Row = EducationRow;

    const LIST_SQL: &'static str = "SELECT id::bigint AS id, title::text AS title, \
        institution_name::text AS institution_name, institution_url::text AS institution_url, \
        started_at::date AS started_on, finished_at::date AS ended_on, \
        created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at \
        FROM education ORDER BY started_at DESC NULLS FIRST, id ASC LIMIT $1";

    const GET_SQL: &'static str = "SELECT id::bigint AS id, title::text AS title, \
        institution_name::text AS institution_name, institution_url::text AS institution_url, \
        started_at::date AS started_on, finished_at::date AS ended_on, \
        created_at::timestamptz AS created_at, updated_at::timestamptz AS updated_at \
        FROM education WHERE id = $1 LIMIT 1";

    fn from_row(row: EducationRow) -> Self {
        let institution = row.institution_name.map(|name| Institution {
            name,
            url: non_empty(row.institution_url),
        });

        Education {
            id: row.id,
            title: row.title,
            institution,
            started_on: row.started_on,
            ended_on: row.ended_on,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Decode a JSON text array column. NULL, blank or malformed input yields
/// an empty list.
fn parse_string_list(raw: Option<&str>, id: i64, column: &str) -> Vec<String> {
    let Some(raw) = raw.map(str::trim).filter(|r| !r.is_empty()) else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(items) => items,
        Err(e) => {
            warn!(id, column, error = %e, "ignoring malformed JSON list column");
            Vec::new()
        }
    }
}
