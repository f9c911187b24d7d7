//! Repositorio de Stops

use crate::models::stop::{Stop, StopStatus, StopType};
use crate::utils::errors::AppError;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

pub struct StopRepository {
    pool: PgPool,
}

impl StopRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create(
        &self,
        school_id: Uuid,
        name: String,
        address: String,
        latitude: f64,
        longitude: f64,
        stop_type: StopType,
        capacity: i32,
        safety_rating: Option<f64>,
        created_by: Uuid,
    ) -> Result<Stop, AppError> {
        let stop = sqlx::query_as::<_, Stop>(
            r#"
            INSERT INTO stops (id, school_id, name, address, latitude, longitude, stop_type, status, capacity, safety_rating, created_by, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'active', $8, $9, $10, $11, $11)
            RETURNING *
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(school_id)
        .bind(name)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(stop_type)
        .bind(capacity)
        .bind(safety_rating)
        .bind(created_by)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await?;

        Ok(stop)
    }

    pub async fn find_by_id(&self, id: Uuid, school_id: Uuid) -> Result<Option<Stop>, AppError> {
        let stop = sqlx::query_as::<_, Stop>(
            "SELECT * FROM stops WHERE id = $1 AND school_id = $2",
        )
        .bind(id)
        .bind(school_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(stop)
    }

    /// Buscar varias paradas de una escuela por id (para optimización de rutas).
    pub async fn find_many(&self, ids: &[Uuid], school_id: Uuid) -> Result<Vec<Stop>, AppError> {
        let stops = sqlx::query_as::<_, Stop>(
            "SELECT * FROM stops WHERE id = ANY($1) AND school_id = $2",
        )
        .bind(ids)
        .bind(school_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(stops)
    }

    pub async fn find_all(
        &self,
        school_id: Uuid,
        status: Option<StopStatus>,
        stop_type: Option<StopType>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<Stop>, AppError> {
        let stops = sqlx::query_as::<_, Stop>(
            r#"
            SELECT * FROM stops
            WHERE school_id = $1
            AND ($2::stop_status IS NULL OR status = $2)
            AND ($3::stop_type IS NULL OR stop_type = $3)
            ORDER BY created_at DESC
            LIMIT $4 OFFSET $5
            "#,
        )
        .bind(school_id)
        .bind(status)
        .bind(stop_type)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(stops)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        id: Uuid,
        school_id: Uuid,
        name: Option<String>,
        address: Option<String>,
        latitude: Option<f64>,
        longitude: Option<f64>,
        stop_type: Option<StopType>,
        status: Option<StopStatus>,
        capacity: Option<i32>,
        safety_rating: Option<f64>,
        updated_by: Uuid,
    ) -> Result<Stop, AppError> {
        let stop = sqlx::query_as::<_, Stop>(
            r#"
            UPDATE stops SET
                name = COALESCE($3, name),
                address = COALESCE($4, address),
                latitude = COALESCE($5, latitude),
                longitude = COALESCE($6, longitude),
                stop_type = COALESCE($7, stop_type),
                status = COALESCE($8, status),
                capacity = COALESCE($9, capacity),
                safety_rating = COALESCE($10, safety_rating),
                updated_by = $11,
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(school_id)
        .bind(name)
        .bind(address)
        .bind(latitude)
        .bind(longitude)
        .bind(stop_type)
        .bind(status)
        .bind(capacity)
        .bind(safety_rating)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stop with id '{}' not found", id)))?;

        Ok(stop)
    }

    /// ¿La parada está referenciada por una ruta viva o un binding activo?
    /// Mientras lo esté, solo se permite el retiro por estado.
    pub async fn is_referenced(&self, id: Uuid, school_id: Uuid) -> Result<bool, AppError> {
        let row: (bool,) = sqlx::query_as(
            r#"
            SELECT EXISTS(
                SELECT 1 FROM route_waypoints w
                JOIN routes r ON r.id = w.route_id
                WHERE w.stop_id = $1 AND r.school_id = $2 AND r.deleted_at IS NULL
            ) OR EXISTS(
                SELECT 1 FROM transport_bindings b
                WHERE (b.pickup_stop_id = $1 OR b.dropoff_stop_id = $1)
                AND b.school_id = $2 AND b.status = 'active'
            )
            "#,
        )
        .bind(id)
        .bind(school_id)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.0)
    }

    /// Retiro lógico: las paradas nunca se borran físicamente.
    pub async fn retire(&self, id: Uuid, school_id: Uuid, updated_by: Uuid) -> Result<Stop, AppError> {
        let stop = sqlx::query_as::<_, Stop>(
            r#"
            UPDATE stops SET
                status = 'permanently_closed',
                updated_by = $3,
                updated_at = NOW()
            WHERE id = $1 AND school_id = $2
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(school_id)
        .bind(updated_by)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Stop with id '{}' not found", id)))?;

        Ok(stop)
    }
}
