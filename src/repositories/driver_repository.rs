//! Repositorio de Drivers

use crate::models::driver::{Driver, DriverStatus};
use crate::utils::errors::AppError;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct DriverRepository {
    pool: PgPool,
}

impl DriverRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        school_id: Uuid,
        full_name: String,
        phone: Option<String>,
        license_number: String,
        license_expiry: NaiveDate,
        medical_check_expiry: Option<NaiveDate>,
        rating: Option<f64>,
    ) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            INSERT INTO drivers (id, school_id, full_name, phone, license_number, license_expiry, medical_check_expiry, rating, status, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, 'active', $9, $9)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(school_id)
        .bind(full_name)
        .bind(phone)
        .bind(license_number)
        .bind(license_expiry)
        .bind(medical_check_expiry)
        .bind(rating)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_by_id(&self, id: Uuid, school_id: Uuid) -> Result<Option<Driver>, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            "SELECT * FROM drivers WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(driver)
    }

    pub async fn find_all(
        &self,
        school_id: Uuid,
        status: Option<DriverStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Driver>, AppError> {
        let drivers = sqlx::query_as::<_, Driver>(
            r#"
            SELECT * FROM drivers
            WHERE school_id = $1
            AND ($2::driver_status IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(school_id)
        .bind(status)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(drivers)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        full_name: Option<String>,
        phone: Option<String>,
        license_number: Option<String>,
        license_expiry: Option<NaiveDate>,
        medical_check_expiry: Option<NaiveDate>,
        rating: Option<f64>,
        status: Option<DriverStatus>,
    ) -> Result<Driver, AppError> {
        let driver = sqlx::query_as::<_, Driver>(
            r#"
            UPDATE drivers SET
                full_name = COALESCE($3, full_name),
                phone = COALESCE($4, phone),
                license_number = COALESCE($5, license_number),
                license_expiry = COALESCE($6, license_expiry),
                medical_check_expiry = COALESCE($7, medical_check_expiry),
                rating = COALESCE($8, rating),
                status = COALESCE($9, status),
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(school_id)
        .bind(full_name)
        .bind(phone)
        .bind(license_number)
        .bind(license_expiry)
        .bind(medical_check_expiry)
        .bind(rating)
        .bind(status)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Driver with id '{}' not found", id)))?;

        Ok(driver)
    }

    pub async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<(), AppError> {
        let driver = self
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Driver with id '{}' not found", id)))?;

        if let Some(route_id) = driver.assigned_route_id {
            return Err(AppError::PreconditionFailed(format!(
                "Cannot delete driver '{}': they are still assigned to route '{}'",
                driver.full_name, route_id
            )));
        }

        sqlx::query("DELETE FROM drivers WHERE id = $1 AND school_id = $2")
            .bind(id)
            .bind(school_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
