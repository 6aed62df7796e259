//! Pet insurance repository implementation
//!
//! Provides PostgreSQL-backed storage for pet enrollments. Rows are addressed
//! by `pet_id`, which carries a unique constraint.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use insurance_core::{
    models::{NewPetInsurance, PetInsurance, PetInsuranceChanges},
    traits::PetInsuranceRepository,
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::{FromRow, PgPool};
use tracing::{debug, error, instrument};

/// Database row representation of a pet insurance
#[derive(Debug, FromRow)]
struct PetInsuranceRow {
    id: i64,
    pet_id: i64,
    insurance_id: i64,
    insurance_name: Option<String>,
    price: Decimal,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<PetInsuranceRow> for PetInsurance {
    fn from(row: PetInsuranceRow) -> Self {
        PetInsurance {
            id: row.id,
            pet_id: row.pet_id,
            insurance_id: row.insurance_id,
            insurance_name: row.insurance_name,
            price: row.price,
            start_date: row.start_date,
            end_date: row.end_date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Map write errors, turning constraint violations into client errors
fn map_write_error(pet_id: i64, err: sqlx::Error) -> AppError {
    if let Some(db) = err.as_database_error() {
        if db.is_unique_violation() {
            return AppError::AlreadyExists(format!(
                "Pet {} already has an insurance",
                pet_id
            ));
        }
        if db.is_foreign_key_violation() {
            return AppError::Validation("insurance_id does not reference an insurance".to_string());
        }
    }

    error!("Database error writing pet insurance for pet {}: {}", pet_id, err);
    AppError::Database(format!("Failed to write pet insurance: {}", err))
}

/// PostgreSQL implementation of PetInsuranceRepository
#[derive(Clone)]
pub struct PgPetInsuranceRepository {
    pool: PgPool,
}

impl PgPetInsuranceRepository {
    /// Create a new pet insurance repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PetInsuranceRepository for PgPetInsuranceRepository {
    #[instrument(skip(self))]
    async fn find_by_pet_id(&self, pet_id: i64) -> AppResult<Option<PetInsurance>> {
        debug!("Finding pet insurance for pet {}", pet_id);

        let result = sqlx::query_as::<sqlx::Postgres, PetInsuranceRow>(
            r#"
            SELECT
                id, pet_id, insurance_id, insurance_name, price,
                start_date, end_date, created_at, updated_at
            FROM pet_insurances
            WHERE pet_id = $1
            "#,
        )
        .bind(pet_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding pet insurance {}: {}", pet_id, e);
            AppError::Database(format!("Failed to find pet insurance: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn list_all(&self) -> AppResult<Vec<PetInsurance>> {
        debug!("Listing all pet insurances");

        let rows = sqlx::query_as::<sqlx::Postgres, PetInsuranceRow>(
            r#"
            SELECT
                id, pet_id, insurance_id, insurance_name, price,
                start_date, end_date, created_at, updated_at
            FROM pet_insurances
            ORDER BY pet_id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error listing pet insurances: {}", e);
            AppError::Database(format!("Failed to list pet insurances: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self, new), fields(pet_id = new.pet_id))]
    async fn create(&self, new: &NewPetInsurance) -> AppResult<PetInsurance> {
        debug!("Creating pet insurance");

        let row = sqlx::query_as::<sqlx::Postgres, PetInsuranceRow>(
            r#"
            INSERT INTO pet_insurances (
                pet_id, insurance_id, insurance_name, price, start_date, end_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING
                id, pet_id, insurance_id, insurance_name, price,
                start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(new.pet_id)
        .bind(new.insurance_id)
        .bind(&new.insurance_name)
        .bind(new.price)
        .bind(new.start_date)
        .bind(new.end_date)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| map_write_error(new.pet_id, e))?;

        Ok(row.into())
    }

    #[instrument(skip(self, changes))]
    async fn update(
        &self,
        pet_id: i64,
        changes: &PetInsuranceChanges,
    ) -> AppResult<Option<PetInsurance>> {
        debug!("Updating pet insurance for pet {}", pet_id);

        let row = sqlx::query_as::<sqlx::Postgres, PetInsuranceRow>(
            r#"
            UPDATE pet_insurances
            SET
                insurance_id = COALESCE($2, insurance_id),
                insurance_name = COALESCE($3, insurance_name),
                price = COALESCE($4, price),
                start_date = COALESCE($5, start_date),
                end_date = COALESCE($6, end_date),
                updated_at = NOW()
            WHERE pet_id = $1
            RETURNING
                id, pet_id, insurance_id, insurance_name, price,
                start_date, end_date, created_at, updated_at
            "#,
        )
        .bind(pet_id)
        .bind(changes.insurance_id)
        .bind(&changes.insurance_name)
        .bind(changes.price)
        .bind(changes.start_date)
        .bind(changes.end_date)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| map_write_error(pet_id, e))?;

        Ok(row.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn delete(&self, pet_id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM pet_insurances WHERE pet_id = $1")
            .bind(pet_id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting pet insurance {}: {}", pet_id, e);
                AppError::Database(format!("Failed to delete pet insurance: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}
