//! Insurance repository implementation
//!
//! Provides PostgreSQL-backed storage for the insurance catalogue.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use insurance_core::{
    models::{Insurance, InsuranceDraft},
    traits::InsuranceRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, instrument};

/// Database row representation of an insurance
#[derive(Debug, FromRow)]
struct InsuranceRow {
    id: i64,
    name: String,
    description: Option<String>,
    coverage: Option<String>,
    price: Decimal,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<InsuranceRow> for Insurance {
    fn from(row: InsuranceRow) -> Self {
        Insurance {
            id: row.id,
            name: row.name,
            description: row.description,
            coverage: row.coverage,
            price: row.price,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// PostgreSQL implementation of InsuranceRepository
#[derive(Clone)]
pub struct PgInsuranceRepository {
    pool: PgPool,
}

impl PgInsuranceRepository {
    /// Create a new insurance repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl InsuranceRepository for PgInsuranceRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> AppResult<Option<Insurance>> {
        debug!("Finding insurance by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, InsuranceRow>(
            r#"
            SELECT id, name, description, coverage, price, created_at, updated_at
            FROM insurances
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding insurance {}: {}", id, e);
            AppError::Database(format!("Failed to find insurance: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> AppResult<Vec<Insurance>> {
        debug!("Listing all insurances");

        let rows = sqlx::query_as::<sqlx::Postgres, InsuranceRow>(
            r#"
            SELECT id, name, description, coverage, price, created_at, updated_at
            FROM insurances
            ORDER BY id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing insurances: {}", e);
            AppError::Database(format!("Failed to list insurances: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, draft), fields(name = %draft.name))]
    async fn create(&self, draft: &InsuranceDraft) -> AppResult<Insurance> {
        debug!("Creating insurance");

        let row = sqlx::query_as::<sqlx::Postgres, InsuranceRow>(
            r#"
            INSERT INTO insurances (name, description, coverage, price)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, coverage, price, created_at, updated_at
            "#,
        )
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.coverage)
        .bind(draft.price)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating insurance: {}", e);
            AppError::Database(format!("Failed to create insurance: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, draft))]
    async fn update(&self, id: i64, draft: &InsuranceDraft) -> AppResult<Option<Insurance>> {
        debug!("Updating insurance {}", id);

        let row = sqlx::query_as::<sqlx::Postgres, InsuranceRow>(
            r#"
            UPDATE insurances
            SET name = $2, description = $3, coverage = $4, price = $5, updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, description, coverage, price, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&draft.name)
        .bind(&draft.description)
        .bind(&draft.coverage)
        .bind(draft.price)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating insurance {}: {}", id, e);
            AppError::Database(format!("Failed to update insurance: {}", e))
        })?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM insurances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if e
                    .as_database_error()
                    .is_some_and(|db| db.is_foreign_key_violation())
                {
                    return AppError::Conflict(format!(
                        "Insurance {} is still referenced by pet insurances",
                        id
                    ));
                }
                error!("Database error deleting insurance {}: {}", id, e);
                AppError::Database(format!("Failed to delete insurance: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}
