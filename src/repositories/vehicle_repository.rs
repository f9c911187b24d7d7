//! Repositorio de Vehicles

use crate::models::vehicle::{Vehicle, VehicleStatus};
use crate::utils::errors::{map_unique_violation, AppError};
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use uuid::Uuid;

pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn create(
        &self,
        school_id: Uuid,
        license_plate: String,
        brand: Option<String>,
        model: Option<String>,
        capacity: i32,
        insurance_expiry: Option<NaiveDate>,
    ) -> Result<Vehicle, AppError> {
        let plate_for_error = license_plate.clone();
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicles (id, school_id, license_plate, brand, model, capacity, status, insurance_expiry, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, 'active', $7, $8, $8)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(school_id)
        .bind(license_plate)
        .bind(brand)
        .bind(model)
        .bind(capacity)
        .bind(insurance_expiry)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "uq_vehicles_plate_per_school",
                AppError::Conflict(format!(
                    "Vehicle with license plate '{}' already exists",
                    plate_for_error
                )),
            )
        })?;

        Ok(vehicle)
    }

    pub async fn find_by_id(&self, id: Uuid, school_id: Uuid) -> Result<Option<Vehicle>, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            "SELECT * FROM vehicles WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(vehicle)
    }

    pub async fn find_all(
        &self,
        school_id: Uuid,
        status: Option<VehicleStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Vehicle>, AppError> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT * FROM vehicles
            WHERE school_id = $1
            AND ($2::vehicle_status IS NULL OR status = $2)
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

        Ok(vehicles)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        license_plate: Option<String>,
        brand: Option<String>,
        model: Option<String>,
        capacity: Option<i32>,
        status: Option<VehicleStatus>,
        insurance_expiry: Option<NaiveDate>,
    ) -> Result<Vehicle, AppError> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            UPDATE vehicles SET
                license_plate = COALESCE($3, license_plate),
                brand = COALESCE($4, brand),
                model = COALESCE($5, model),
                capacity = COALESCE($6, capacity),
                status = COALESCE($7, status),
                insurance_expiry = COALESCE($8, insurance_expiry),
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(school_id)
        .bind(license_plate)
        .bind(brand)
        .bind(model)
        .bind(capacity)
        .bind(status)
        .bind(insurance_expiry)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            map_unique_violation(
                e,
                "uq_vehicles_plate_per_school",
                AppError::Conflict("Another vehicle already uses that license plate".to_string()),
            )
        })?
        .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", id)))?;

        Ok(vehicle)
    }

    pub async fn delete(&self, id: Uuid, school_id: Uuid) -> Result<(), AppError> {
        let vehicle = self
            .find_by_id(id, school_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Vehicle with id '{}' not found", id)))?;

        if let Some(route_id) = vehicle.assigned_route_id {
            return Err(AppError::PreconditionFailed(format!(
                "Cannot delete vehicle '{}': it is still assigned to route '{}'",
                vehicle.license_plate, route_id
            )));
        }

        sqlx::query("DELETE FROM vehicles WHERE id = $1 AND school_id = $2")
            .bind(id)
            .bind(school_id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
