//! Stakeholder catalog using PostgreSQL.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::{postgres::PgPoolOptions, PgPool, Postgres, Transaction};
use tracing::{debug, info};

use foodmap_common::{ImportAction, ImportRow, TenantId};

use crate::store::{
    records_from_rows, StakeholderRecord, StakeholderStore, StorageError, StorageResult,
};

/// Database connection pool and stakeholder writes.
pub struct StakeholderCatalog {
    pool: PgPool,
}

impl StakeholderCatalog {
    /// Create a new catalog connection from database URL.
    pub async fn connect(database_url: &str) -> StorageResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(10)
            .connect(database_url)
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        Ok(Self { pool })
    }

    /// Run database migrations.
    pub async fn migrate(&self) -> StorageResult<()> {
        for statement in SCHEMA_SQL.split(';') {
            let trimmed = statement.trim();
            if !trimmed.is_empty() {
                sqlx::query(trimmed)
                    .execute(&self.pool)
                    .await
                    .map_err(|e| StorageError::Migration(e.to_string()))?;
            }
        }

        Ok(())
    }

    async fn write_record(
        tx: &mut Transaction<'_, Postgres>,
        record: &StakeholderRecord,
        action: ImportAction,
    ) -> StorageResult<()> {
        let sql = match action {
            ImportAction::Insert => INSERT_SQL,
            ImportAction::Upsert => UPSERT_SQL,
        };
        let attributes = serde_json::to_value(&record.attributes)
            .map_err(|e| StorageError::Query(format!("attributes: {}", e)))?;
        let now = Utc::now();

        sqlx::query(sql)
            .bind(record.tenant_id)
            .bind(&record.name)
            .bind(&record.address_1)
            .bind(&record.address_2)
            .bind(&record.city)
            .bind(&record.state)
            .bind(&record.zip)
            .bind(record.latitude)
            .bind(record.longitude)
            .bind(&record.category_ids)
            .bind(attributes)
            .bind(now)
            .execute(&mut **tx)
            .await
            .map_err(|e| StorageError::Query(format!("Insert failed: {}", e)))?;

        Ok(())
    }
}

#[async_trait]
impl StakeholderStore for StakeholderCatalog {
    async fn insert_bulk(
        &self,
        rows: &[ImportRow],
        action: ImportAction,
        tenant_id: TenantId,
    ) -> StorageResult<usize> {
        let records = records_from_rows(rows, tenant_id)?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StorageError::Connection(e.to_string()))?;

        for record in &records {
            Self::write_record(&mut tx, record, action).await?;
            debug!(name = %record.name, tenant_id, "Wrote stakeholder");
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::Query(format!("Commit failed: {}", e)))?;

        info!(count = records.len(), tenant_id, action = %action, "Stored stakeholder batch");
        Ok(records.len())
    }
}

const INSERT_SQL: &str = r#"
INSERT INTO stakeholders (
    tenant_id, name, address_1, address_2, city, state, zip,
    latitude, longitude, category_ids, attributes, created_at, updated_at
) VALUES (
    $1, $2, $3, $4, $5, $6, $7,
    $8, $9, $10, $11, $12, $12
)
"#;

const UPSERT_SQL: &str = r#"
INSERT INTO stakeholders (
    tenant_id, name, address_1, address_2, city, state, zip,
    latitude, longitude, category_ids, attributes, created_at, updated_at
) VALUES (
    $1, $2, $3, $4, $5, $6, $7,
    $8, $9, $10, $11, $12, $12
)
ON CONFLICT (tenant_id, name, address_1, zip)
DO UPDATE SET
    address_2 = EXCLUDED.address_2,
    city = EXCLUDED.city,
    state = EXCLUDED.state,
    latitude = EXCLUDED.latitude,
    longitude = EXCLUDED.longitude,
    category_ids = EXCLUDED.category_ids,
    attributes = EXCLUDED.attributes,
    updated_at = EXCLUDED.updated_at
"#;

const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS stakeholders (
    id BIGSERIAL PRIMARY KEY,
    tenant_id INTEGER NOT NULL,
    name TEXT NOT NULL DEFAULT '',
    address_1 TEXT NOT NULL DEFAULT '',
    address_2 TEXT NOT NULL DEFAULT '',
    city TEXT NOT NULL DEFAULT '',
    state TEXT NOT NULL DEFAULT '',
    zip TEXT NOT NULL DEFAULT '',
    latitude DOUBLE PRECISION NOT NULL,
    longitude DOUBLE PRECISION NOT NULL,
    category_ids INTEGER[] NOT NULL DEFAULT '{}',
    attributes JSONB NOT NULL DEFAULT '{}',
    verification_status_id INTEGER NOT NULL DEFAULT 1,
    inactive BOOLEAN NOT NULL DEFAULT FALSE,
    inactive_temporary BOOLEAN NOT NULL DEFAULT FALSE,
    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
    UNIQUE (tenant_id, name, address_1, zip)
);

CREATE INDEX IF NOT EXISTS idx_stakeholders_tenant ON stakeholders(tenant_id)
"#;
