//! PostgreSQL history store

use super::{HistoryQuery, HistoryRows, HistoryStore};
use async_trait::async_trait;
use serde_json::json;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

/// History store backed by a PostgreSQL table
///
/// The table needs the columns `account_key`, `tx_tp`, `tenant_id` and
/// `cre_dt_tm` (`timestamptz`).
pub struct PostgresHistoryStore {
    pool: PgPool,
    table: String,
}

impl PostgresHistoryStore {
    /// Connect to PostgreSQL
    pub async fn connect(
        database_url: &str,
        table: impl Into<String>,
        max_connections: u32,
    ) -> anyhow::Result<Self> {
        tracing::info!("Creating PostgreSQL connection pool for history queries");
        let pool = PgPoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect(database_url)
            .await
            .map_err(|e| anyhow::anyhow!("Failed to connect to PostgreSQL: {}", e))?;

        Self::with_pool(pool, table)
    }

    /// Use an existing pool
    pub fn with_pool(pool: PgPool, table: impl Into<String>) -> anyhow::Result<Self> {
        let table = table.into();
        let valid = !table.is_empty()
            && table
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.');
        if !valid {
            anyhow::bail!("Invalid history table name: {:?}", table);
        }

        Ok(Self { pool, table })
    }
}

#[async_trait]
impl HistoryStore for PostgresHistoryStore {
    async fn query_history(&self, query: &HistoryQuery) -> anyhow::Result<Option<HistoryRows>> {
        let sql = query.to_sql(&self.table);
        tracing::trace!(sql = %sql, "executing history query");

        let mut statement = sqlx::query(&sql)
            .bind(&query.account_key)
            .bind(&query.tx_tp)
            .bind(query.window.start)
            .bind(query.window.end);
        if let Some(ref tenant_id) = query.tenant_id {
            statement = statement.bind(tenant_id);
        }

        let row = statement.fetch_optional(&self.pool).await?;
        let Some(row) = row else {
            return Ok(None);
        };

        let total: Option<i64> = row.try_get("total")?;
        Ok(Some(vec![vec![json!(total)]]))
    }
}
