//! PostgreSQL implementation of the link store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::{PgConnection, PgPoolOptions};
use sqlx::{PgPool, Postgres, Transaction};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};
use tracing::warn;

use crate::domain::entities::{ClickEvent, ClickMeta, ClickReceipt, LinkPatch, LinkRecord};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;
use crate::utils::db_error::is_unique_violation_on_code;

/// Connection attempts made by [`PgLinkStore::connect`] before giving up.
pub const CONNECT_ATTEMPTS: usize = 5;

const LINK_COLUMNS: &str = "code, destination_url, created_at, expires_at, active, alias, description, click_count";

/// Connection pool tuning.
#[derive(Debug, Clone)]
pub struct PoolSettings {
    pub max_connections: u32,
    pub acquire_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_lifetime: Duration,
}

#[derive(sqlx::FromRow)]
struct LinkRow {
    code: String,
    destination_url: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
    active: bool,
    alias: Option<String>,
    description: String,
    click_count: i64,
}

impl LinkRow {
    fn into_record(self, click_history: Vec<ClickEvent>) -> LinkRecord {
        LinkRecord {
            code: self.code,
            destination_url: self.destination_url,
            created_at: self.created_at,
            expires_at: self.expires_at,
            active: self.active,
            alias: self.alias,
            description: self.description,
            click_count: self.click_count.max(0) as u64,
            click_history,
        }
    }
}

#[derive(sqlx::FromRow)]
struct ClickRow {
    link_code: String,
    clicked_at: DateTime<Utc>,
    source_ip: Option<String>,
    user_agent: Option<String>,
    referer: Option<String>,
}

impl From<ClickRow> for ClickEvent {
    fn from(row: ClickRow) -> Self {
        ClickEvent {
            timestamp: row.clicked_at,
            source_ip: row.source_ip,
            user_agent: row.user_agent,
            referer: row.referer,
        }
    }
}

/// PostgreSQL link store.
///
/// Links live in `links`, click events in `link_clicks` (ordered by their
/// serial id). The denormalized `links.click_count` is only ever changed in
/// the same transaction that inserts a click row.
pub struct PgLinkStore {
    pool: Arc<PgPool>,
}

impl PgLinkStore {
    /// Creates a store over an existing pool.
    pub fn new(pool: Arc<PgPool>) -> Self {
        Self { pool }
    }

    /// Opens a connection pool, retrying with exponential backoff.
    ///
    /// # Errors
    ///
    /// Returns the last connection error after [`CONNECT_ATTEMPTS`] failures.
    pub async fn connect(database_url: &str, settings: &PoolSettings) -> Result<PgPool, sqlx::Error> {
        let strategy = ExponentialBackoff::from_millis(2)
            .factor(100)
            .max_delay(Duration::from_secs(5))
            .map(jitter)
            .take(CONNECT_ATTEMPTS - 1);

        Retry::spawn(strategy, move || async move {
            PgPoolOptions::new()
                .max_connections(settings.max_connections)
                .acquire_timeout(settings.acquire_timeout)
                .idle_timeout(settings.idle_timeout)
                .max_lifetime(settings.max_lifetime)
                .connect(database_url)
                .await
                .inspect_err(|e| warn!(error = %e, "Database connection attempt failed"))
        })
        .await
    }

    /// Runs embedded migrations.
    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(self.pool.as_ref()).await
    }

    /// Opens a read-only transaction with a single snapshot, so a link row
    /// and its click rows agree on `click_count`.
    async fn begin_snapshot(&self) -> Result<Transaction<'static, Postgres>, AppError> {
        let mut tx = self.pool.begin().await?;
        sqlx::query("SET TRANSACTION ISOLATION LEVEL REPEATABLE READ, READ ONLY")
            .execute(&mut *tx)
            .await?;
        Ok(tx)
    }
}

async fn load_clicks(conn: &mut PgConnection, code: &str) -> Result<Vec<ClickEvent>, AppError> {
    let rows: Vec<ClickRow> = sqlx::query_as(
        r#"
        SELECT link_code, clicked_at, source_ip, user_agent, referer
        FROM link_clicks
        WHERE link_code = $1
        ORDER BY id
        "#,
    )
    .bind(code)
    .fetch_all(conn)
    .await?;

    Ok(rows.into_iter().map(ClickEvent::from).collect())
}

#[async_trait]
impl LinkStore for PgLinkStore {
    fn backend_name(&self) -> &'static str {
        "postgres"
    }

    async fn insert(&self, record: LinkRecord) -> Result<LinkRecord, AppError> {
        let result = sqlx::query(
            r#"
            INSERT INTO links (code, destination_url, created_at, expires_at, active, alias, description, click_count)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(&record.code)
        .bind(&record.destination_url)
        .bind(record.created_at)
        .bind(record.expires_at)
        .bind(record.active)
        .bind(&record.alias)
        .bind(&record.description)
        .bind(record.click_count as i64)
        .execute(self.pool.as_ref())
        .await;

        match result {
            Ok(_) => Ok(record),
            Err(e) if is_unique_violation_on_code(&e) => Err(AppError::AliasTaken(record.code)),
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_code(&self, code: &str) -> Result<Option<LinkRecord>, AppError> {
        let mut tx = self.begin_snapshot().await?;

        let row: Option<LinkRow> =
            sqlx::query_as(&format!("SELECT {LINK_COLUMNS} FROM links WHERE code = $1"))
                .bind(code)
                .fetch_optional(&mut *tx)
                .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let clicks = load_clicks(&mut *tx, code).await?;
        tx.commit().await?;

        Ok(Some(row.into_record(clicks)))
    }

    async fn list(&self, limit: usize, offset: usize) -> Result<Vec<LinkRecord>, AppError> {
        let mut tx = self.begin_snapshot().await?;

        let rows: Vec<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links ORDER BY created_at DESC, code LIMIT $1 OFFSET $2"
        ))
        .bind(limit as i64)
        .bind(offset as i64)
        .fetch_all(&mut *tx)
        .await?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let codes: Vec<String> = rows.iter().map(|r| r.code.clone()).collect();
        let click_rows: Vec<ClickRow> = sqlx::query_as(
            r#"
            SELECT link_code, clicked_at, source_ip, user_agent, referer
            FROM link_clicks
            WHERE link_code = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&codes)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;

        let mut clicks: HashMap<String, Vec<ClickEvent>> = HashMap::new();
        for row in click_rows {
            clicks.entry(row.link_code.clone()).or_default().push(row.into());
        }

        Ok(rows
            .into_iter()
            .map(|row| {
                let history = clicks.remove(&row.code).unwrap_or_default();
                row.into_record(history)
            })
            .collect())
    }

    async fn count(&self) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(count.max(0) as u64)
    }

    async fn total_clicks(&self) -> Result<u64, AppError> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
            .fetch_one(self.pool.as_ref())
            .await?;

        Ok(total.max(0) as u64)
    }

    async fn update(&self, code: &str, patch: LinkPatch) -> Result<Option<LinkRecord>, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1 FOR UPDATE"
        ))
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let mut record = row.into_record(Vec::new());
        record.apply_patch(patch);

        sqlx::query(
            "UPDATE links SET description = $2, active = $3, expires_at = $4 WHERE code = $1",
        )
        .bind(code)
        .bind(&record.description)
        .bind(record.active)
        .bind(record.expires_at)
        .execute(&mut *tx)
        .await?;

        // The row lock keeps appends out until commit.
        record.click_history = load_clicks(&mut *tx, code).await?;
        tx.commit().await?;

        Ok(Some(record))
    }

    async fn delete(&self, code: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM links WHERE code = $1")
            .bind(code)
            .execute(self.pool.as_ref())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn append_click(&self, code: &str, meta: ClickMeta) -> Result<ClickReceipt, AppError> {
        let mut tx = self.pool.begin().await?;

        let row: Option<LinkRow> = sqlx::query_as(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE code = $1 FOR UPDATE"
        ))
        .bind(code)
        .fetch_optional(&mut *tx)
        .await?;

        let record = row.ok_or(AppError::NotFound)?.into_record(Vec::new());

        // Stamped under the row lock so id order matches timestamp order.
        let event = meta.into_event(Utc::now());
        record.ensure_redirectable(event.timestamp)?;

        sqlx::query(
            r#"
            INSERT INTO link_clicks (link_code, clicked_at, source_ip, user_agent, referer)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(code)
        .bind(event.timestamp)
        .bind(&event.source_ip)
        .bind(&event.user_agent)
        .bind(&event.referer)
        .execute(&mut *tx)
        .await?;

        let click_count: i64 = sqlx::query_scalar(
            "UPDATE links SET click_count = click_count + 1 WHERE code = $1 RETURNING click_count",
        )
        .bind(code)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(ClickReceipt {
            destination_url: record.destination_url,
            click_count: click_count.max(0) as u64,
        })
    }

    async fn health_check(&self) -> bool {
        sqlx::query("SELECT 1")
            .execute(self.pool.as_ref())
            .await
            .is_ok()
    }
}
