//! Postgres-backed inventory repository.
//!
//! Records live in a single `inventory` table. The table is created on startup
//! by [`PostgresInventoryRepository::ensure_schema`] when it does not exist.
//!
//! ## Error Mapping
//!
//! | SQLx Error | RepositoryError |
//! |------------|-----------------|
//! | Database (check violation `23514`, string too long `22001`) | `Invalid` |
//! | Database (other) | `Storage` |
//! | PoolClosed / network / decode | `Storage` |
//!
//! ## Thread Safety
//!
//! `PostgresInventoryRepository` is `Send + Sync`. Connections are acquired
//! from the pool per operation and returned when the operation finishes,
//! whether it succeeds or fails.

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{FromRow, PgPool, Row};
use tracing::{field, instrument, Span};

use stockkeep_core::Entity;
use stockkeep_inventory::{InventoryFilter, InventoryItem, InventoryItemId, SupplierStatus};

use super::r#trait::{supplier_not_found, InventoryRepository, RepositoryError};

/// Postgres-backed inventory repository.
///
/// The bulk supplier toggle runs inside one transaction with the matched rows
/// locked (`FOR UPDATE`), so a failure part-way through rolls back every row.
#[derive(Debug, Clone)]
pub struct PostgresInventoryRepository {
    pool: Arc<PgPool>,
}

impl PostgresInventoryRepository {
    /// Create a new repository over an existing connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect a fresh pool to `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, RepositoryError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create the `inventory` table if it does not exist yet.
    #[instrument(skip(self), err)]
    pub async fn ensure_schema(&self) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS inventory (
                id                SERIAL PRIMARY KEY,
                product_id        INTEGER NOT NULL,
                product_name      VARCHAR(63) NOT NULL,
                quantity          INTEGER NOT NULL,
                restock_threshold INTEGER NULL,
                supplier_id       INTEGER NOT NULL,
                supplier_name     VARCHAR(63) NULL,
                unit_price        DOUBLE PRECISION NOT NULL,
                supplier_status   VARCHAR(8) NOT NULL
                    CHECK (supplier_status IN ('enabled', 'disabled'))
            )
            "#,
        )
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("ensure_schema", e))?;
        Ok(())
    }
}

#[async_trait]
impl InventoryRepository for PostgresInventoryRepository {
    #[instrument(skip(self, item), fields(product_name = %item.product_name, id = field::Empty), err)]
    async fn create(&self, item: InventoryItem) -> Result<InventoryItem, RepositoryError> {
        item.validate()?;

        let row = sqlx::query(
            r#"
            INSERT INTO inventory (
                product_id,
                product_name,
                quantity,
                restock_threshold,
                supplier_id,
                supplier_name,
                unit_price,
                supplier_status
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.restock_threshold)
        .bind(item.supplier_id)
        .bind(&item.supplier_name)
        .bind(item.unit_price)
        .bind(item.supplier_status.as_str())
        .fetch_one(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("create", e))?;

        let id: i32 = row
            .try_get("id")
            .map_err(|e| map_sqlx_error("create", e))?;

        Span::current().record("id", id);
        Ok(item.with_id(InventoryItemId::new(id)))
    }

    #[instrument(skip(self, item), err)]
    async fn save(&self, item: &InventoryItem) -> Result<(), RepositoryError> {
        let id = item.id().ok_or(RepositoryError::Unpersisted)?;
        item.validate()?;

        sqlx::query(
            r#"
            UPDATE inventory SET
                product_id = $2,
                product_name = $3,
                quantity = $4,
                restock_threshold = $5,
                supplier_id = $6,
                supplier_name = $7,
                unit_price = $8,
                supplier_status = $9
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .bind(item.product_id)
        .bind(&item.product_name)
        .bind(item.quantity)
        .bind(item.restock_threshold)
        .bind(item.supplier_id)
        .bind(&item.supplier_name)
        .bind(item.unit_price)
        .bind(item.supplier_status.as_str())
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save", e))?;

        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn delete(&self, id: InventoryItemId) -> Result<(), RepositoryError> {
        sqlx::query("DELETE FROM inventory WHERE id = $1")
            .bind(id.get())
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(id = %id), err)]
    async fn find(&self, id: InventoryItemId) -> Result<Option<InventoryItem>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT
                id,
                product_id,
                product_name,
                quantity,
                restock_threshold,
                supplier_id,
                supplier_name,
                unit_price,
                supplier_status
            FROM inventory
            WHERE id = $1
            "#,
        )
        .bind(id.get())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("find", e))?;

        row.map(|r| decode_row("find", &r)).transpose()
    }

    #[instrument(skip(self), err)]
    async fn all(&self) -> Result<Vec<InventoryItem>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT
                id,
                product_id,
                product_name,
                quantity,
                restock_threshold,
                supplier_id,
                supplier_name,
                unit_price,
                supplier_status
            FROM inventory
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("all", e))?;

        decode_rows("all", &rows)
    }

    #[instrument(skip(self), fields(filter = %filter, match_count = field::Empty), err)]
    async fn find_by(&self, filter: &InventoryFilter) -> Result<Vec<InventoryItem>, RepositoryError> {
        // Column names come from a closed enum, never from request input.
        let sql = format!(
            r#"
            SELECT
                id,
                product_id,
                product_name,
                quantity,
                restock_threshold,
                supplier_id,
                supplier_name,
                unit_price,
                supplier_status
            FROM inventory
            WHERE {} = $1
            ORDER BY id ASC
            "#,
            filter.field_name()
        );

        let query = sqlx::query(&sql);
        let query = match filter {
            InventoryFilter::SupplierName(v) | InventoryFilter::ProductName(v) => query.bind(v.as_str()),
            InventoryFilter::SupplierId(v) => query.bind(*v),
        };

        let rows = query
            .fetch_all(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_by", e))?;

        Span::current().record("match_count", rows.len());
        decode_rows("find_by", &rows)
    }

    #[instrument(skip(self), fields(toggled = field::Empty), err)]
    async fn toggle_supplier_status(
        &self,
        supplier_id: i32,
    ) -> Result<Vec<InventoryItem>, RepositoryError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("begin_transaction", e))?;

        let rows = sqlx::query(
            r#"
            SELECT
                id,
                product_id,
                product_name,
                quantity,
                restock_threshold,
                supplier_id,
                supplier_name,
                unit_price,
                supplier_status
            FROM inventory
            WHERE supplier_id = $1
            ORDER BY id ASC
            FOR UPDATE
            "#,
        )
        .bind(supplier_id)
        .fetch_all(&mut *tx)
        .await
        .map_err(|e| map_sqlx_error("toggle_supplier_status", e))?;

        if rows.is_empty() {
            tx.rollback()
                .await
                .map_err(|e| map_sqlx_error("rollback", e))?;
            return Err(supplier_not_found(supplier_id));
        }

        // Sequential per-row updates; dropping `tx` on an early return rolls everything back.
        let mut updated = decode_rows("toggle_supplier_status", &rows)?;
        for item in &mut updated {
            item.toggle_supplier_status();
            let id = item.id().ok_or(RepositoryError::Unpersisted)?;

            sqlx::query("UPDATE inventory SET supplier_status = $2 WHERE id = $1")
                .bind(id.get())
                .bind(item.supplier_status.as_str())
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("toggle_supplier_status", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("commit_transaction", e))?;

        Span::current().record("toggled", updated.len());
        Ok(updated)
    }
}

// SQLx row types

#[derive(Debug)]
struct InventoryRow {
    id: i32,
    product_id: i32,
    product_name: String,
    quantity: i32,
    restock_threshold: Option<i32>,
    supplier_id: i32,
    supplier_name: Option<String>,
    unit_price: f64,
    supplier_status: String,
}

impl<'r> FromRow<'r, PgRow> for InventoryRow {
    fn from_row(row: &'r PgRow) -> Result<Self, sqlx::Error> {
        Ok(InventoryRow {
            id: row.try_get("id")?,
            product_id: row.try_get("product_id")?,
            product_name: row.try_get("product_name")?,
            quantity: row.try_get("quantity")?,
            restock_threshold: row.try_get("restock_threshold")?,
            supplier_id: row.try_get("supplier_id")?,
            supplier_name: row.try_get("supplier_name")?,
            unit_price: row.try_get("unit_price")?,
            supplier_status: row.try_get("supplier_status")?,
        })
    }
}

impl TryFrom<InventoryRow> for InventoryItem {
    type Error = RepositoryError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        let supplier_status: SupplierStatus = row.supplier_status.parse().map_err(|e| {
            RepositoryError::Storage(format!("row {} has corrupt supplier_status: {e}", row.id))
        })?;

        Ok(InventoryItem {
            id: Some(InventoryItemId::new(row.id)),
            product_id: row.product_id,
            product_name: row.product_name,
            quantity: row.quantity,
            restock_threshold: row.restock_threshold,
            supplier_id: row.supplier_id,
            supplier_name: row.supplier_name,
            unit_price: row.unit_price,
            supplier_status,
        })
    }
}

fn decode_row(operation: &str, row: &PgRow) -> Result<InventoryItem, RepositoryError> {
    let row = InventoryRow::from_row(row).map_err(|e| {
        RepositoryError::Storage(format!("failed to decode inventory row in {operation}: {e}"))
    })?;
    InventoryItem::try_from(row)
}

fn decode_rows(operation: &str, rows: &[PgRow]) -> Result<Vec<InventoryItem>, RepositoryError> {
    rows.iter().map(|row| decode_row(operation, row)).collect()
}

/// Map SQLx errors into repository errors.
fn map_sqlx_error(operation: &str, err: sqlx::Error) -> RepositoryError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                // Check constraint violation
                Some("23514") => RepositoryError::Invalid(msg),
                // Value too long for column
                Some("22001") => RepositoryError::Invalid(msg),
                _ => RepositoryError::Storage(msg),
            }
        }
        sqlx::Error::PoolClosed => {
            RepositoryError::Storage(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::RowNotFound => {
            RepositoryError::Storage(format!("unexpected row not found in {}", operation))
        }
        _ => RepositoryError::Storage(format!("sqlx error in {}: {}", operation, err)),
    }
}
