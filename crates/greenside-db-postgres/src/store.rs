//! PostgreSQL implementation of the cache store.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use greenside_storage::{CacheEntry, KeyValueStore, StorageError};
use serde_json::Value;
use sqlx_core::pool::PoolOptions;
use sqlx_postgres::{PgPool, Postgres};
use time::OffsetDateTime;
use tokio::sync::OnceCell;
use tracing::{debug, info, instrument};

use crate::config::PostgresConfig;
use crate::error::{PostgresError, Result};

/// Connections are recycled after this long unless configured otherwise.
const DEFAULT_MAX_LIFETIME: Duration = Duration::from_secs(30 * 60);

/// Storage type of the `value` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ValueColumn {
    Text,
    /// Tables created by older deployments
    Jsonb,
}

/// Cache store holding one row per key in a single table.
///
/// Values are written as serialized JSON text. Reads cast the column to
/// text and writes cast to `jsonb` when the existing table uses it, so
/// tables created by older deployments keep working.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
    table: String,
    value_column: std::sync::Arc<OnceCell<ValueColumn>>,
}

impl PostgresStore {
    /// Validates the configuration, opens the pool and checks connectivity.
    #[instrument(skip(config), fields(url = %config.redacted_url(), table = %config.table))]
    pub async fn connect(config: PostgresConfig) -> Result<Self> {
        config.validate()?;

        // One warm connection unless configured
        let min_connections = config.min_connections.unwrap_or(1).min(config.pool_size);
        let options = PoolOptions::<Postgres>::new()
            .max_connections(config.pool_size)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_millis(config.connect_timeout_ms))
            .max_lifetime(
                config
                    .max_lifetime_secs
                    .map(Duration::from_secs)
                    .unwrap_or(DEFAULT_MAX_LIFETIME),
            )
            .idle_timeout(config.idle_timeout_ms.map(Duration::from_millis));

        let pool = options.connect(&config.url).await?;
        sqlx_core::query::query("SELECT 1").execute(&pool).await?;

        info!(
            max_connections = config.pool_size,
            min_connections, "Connected to cache database"
        );
        Ok(Self::from_pool(pool, config.table))
    }

    /// Wraps an existing pool. `table` must already be a validated identifier.
    pub fn from_pool(pool: PgPool, table: impl Into<String>) -> Self {
        Self {
            pool,
            table: table.into(),
            value_column: std::sync::Arc::new(OnceCell::new()),
        }
    }

    /// Ensures the cache table exists and reports its value column type.
    /// Runs at most once per store.
    #[instrument(skip(self), fields(table = %self.table))]
    async fn ensure_table(&self) -> Result<ValueColumn> {
        let column = self
            .value_column
            .get_or_try_init(|| async {
                let ddl = format!(
                    r#"
                    CREATE TABLE IF NOT EXISTS {table} (
                        key TEXT PRIMARY KEY,
                        value TEXT NOT NULL,
                        inserted_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                    )
                    "#,
                    table = self.table
                );
                sqlx_core::query::query(&ddl)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| PostgresError::schema(e.to_string()))?;

                let data_type: Option<(String,)> = sqlx_core::query_as::query_as(
                    r#"
                    SELECT data_type::text FROM information_schema.columns
                    WHERE table_schema = current_schema()
                      AND table_name = $1
                      AND column_name = 'value'
                    "#,
                )
                // Unquoted identifiers are folded to lower case
                .bind(self.table.to_ascii_lowercase())
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| PostgresError::schema(e.to_string()))?;

                let column = match data_type {
                    Some((t,)) if t.eq_ignore_ascii_case("jsonb") => ValueColumn::Jsonb,
                    _ => ValueColumn::Text,
                };
                info!(value_column = ?column, "Cache table ready");
                Ok::<ValueColumn, PostgresError>(column)
            })
            .await?;
        Ok(*column)
    }

    fn chrono_to_time(t: DateTime<Utc>) -> OffsetDateTime {
        OffsetDateTime::from_unix_timestamp(t.timestamp())
            .map(|ts| ts.replace_nanosecond(t.timestamp_subsec_nanos()).unwrap_or(ts))
            .unwrap_or_else(|_| OffsetDateTime::now_utc())
    }

    async fn fetch(&self, key: &str) -> Result<Option<CacheEntry>> {
        self.ensure_table().await?;

        let sql = format!(
            "SELECT value::text, inserted_at FROM {} WHERE key = $1",
            self.table
        );
        let row: Option<(String, DateTime<Utc>)> = sqlx_core::query_as::query_as(&sql)
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|(value, inserted_at)| {
            CacheEntry::new(key, Value::String(value), Self::chrono_to_time(inserted_at))
        }))
    }

    async fn upsert(&self, key: &str, value: &str) -> Result<CacheEntry> {
        let value_param = match self.ensure_table().await? {
            ValueColumn::Text => "$2",
            ValueColumn::Jsonb => "$2::jsonb",
        };

        let sql = format!(
            r#"
            INSERT INTO {table} (key, value, inserted_at)
            VALUES ($1, {value_param}, NOW())
            ON CONFLICT (key)
            DO UPDATE SET value = EXCLUDED.value, inserted_at = NOW()
            RETURNING inserted_at
            "#,
            table = self.table
        );
        let (inserted_at,): (DateTime<Utc>,) = sqlx_core::query_as::query_as(&sql)
            .bind(key)
            .bind(value)
            .fetch_one(&self.pool)
            .await?;

        Ok(CacheEntry::new(
            key,
            Value::String(value.to_string()),
            Self::chrono_to_time(inserted_at),
        ))
    }
}

#[async_trait]
impl KeyValueStore for PostgresStore {
    async fn get(&self, key: &str) -> std::result::Result<Option<CacheEntry>, StorageError> {
        let entry = self.fetch(key).await?;
        debug!(key = %key, hit = entry.is_some(), "postgres store get");
        Ok(entry)
    }

    async fn put(&self, key: &str, value: &str) -> std::result::Result<CacheEntry, StorageError> {
        let entry = self.upsert(key, value).await?;
        debug!(key = %key, "postgres store put");
        Ok(entry)
    }

    fn backend_name(&self) -> &'static str {
        "postgres"
    }
}
