//! Controlador de actividad y analytics
//!
//! Registro de viajes realizados (escritura append-only + métricas
//! rodantes) y agregados de flota/conductores/rutas recalculados bajo
//! demanda. Los escaneos de vencimientos se invocan desde fuera; aquí
//! no hay workers programados.

use crate::dto::analytics_dto::{
    ActivityResponse, BindingMetricsResponse, ComplianceQuery, DriverComplianceResponse,
    DriverPerformanceResponse, FleetAnalyticsResponse, PerformanceQuery, RecordActivityRequest,
    RoutePerformanceResponse, StatusCount,
};
use crate::dto::transport_dto::TransportResponse;
use crate::dto::ApiResponse;
use crate::models::transport::TripStatus;
use crate::repositories::activity_repository::{ActivityRepository, NewActivity};
use crate::repositories::transport_repository::TransportRepository;
use crate::services::metrics::RollingMetrics;
use crate::utils::errors::{validation_error, AppError};
use chrono::{Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

/// Ventana por defecto del escaneo de vencimientos (días)
const DEFAULT_COMPLIANCE_WINDOW_DAYS: i64 = 30;

/// Rango por defecto de los agregados de rendimiento (días hacia atrás)
const DEFAULT_PERFORMANCE_RANGE_DAYS: i64 = 30;

pub struct AnalyticsController {
    repository: ActivityRepository,
    bindings: TransportRepository,
}

impl AnalyticsController {
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: ActivityRepository::new(pool.clone()),
            bindings: TransportRepository::new(pool),
        }
    }

    pub async fn record_activity(
        &self,
        binding_id: Uuid,
        school_id: Uuid,
        actor_id: Uuid,
        request: RecordActivityRequest,
    ) -> Result<ApiResponse<TransportResponse>, AppError> {
        request.validate().map_err(AppError::Validation)?;

        let delay_minutes = request.delay_minutes.unwrap_or(0);
        if request.status == TripStatus::Delayed && delay_minutes == 0 {
            return Err(validation_error(
                "delay_minutes",
                "a delayed trip must carry a positive delay in minutes",
            ));
        }

        let (_record, binding) = self
            .repository
            .record(
                binding_id,
                school_id,
                NewActivity {
                    activity_date: request.activity_date,
                    status: request.status,
                    actual_pickup_time: request.actual_pickup_time,
                    actual_dropoff_time: request.actual_dropoff_time,
                    delay_minutes,
                    note: request.note,
                    recorded_by: actor_id,
                },
            )
            .await?;

        Ok(ApiResponse::success_with_message(
            TransportResponse::from(binding),
            "Actividad registrada exitosamente".to_string(),
        ))
    }

    pub async fn get_binding_activities(
        &self,
        binding_id: Uuid,
        school_id: Uuid,
    ) -> Result<Vec<ActivityResponse>, AppError> {
        let activities = self
            .repository
            .find_by_binding(binding_id, school_id)
            .await?;

        Ok(activities.into_iter().map(ActivityResponse::from).collect())
    }

    pub async fn get_binding_metrics(
        &self,
        binding_id: Uuid,
        school_id: Uuid,
    ) -> Result<BindingMetricsResponse, AppError> {
        let binding = self
            .bindings
            .find_by_id(binding_id, school_id)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(format!("Transport binding with id '{}' not found", binding_id))
            })?;

        let metrics = RollingMetrics {
            total_trips: binding.total_trips,
            completed_trips: binding.completed_trips,
            avg_delay_minutes: binding.avg_delay_minutes,
        };

        Ok(BindingMetricsResponse {
            binding_id: binding.id,
            total_trips: metrics.total_trips,
            completed_trips: metrics.completed_trips,
            avg_delay_minutes: metrics.avg_delay_minutes,
            on_time_rate: metrics.on_time_rate(),
        })
    }

    /// Resumen de flota: conteos por estado/tipo y rating medio de
    /// conductores, recalculados bajo demanda.
    pub async fn get_fleet_analytics(
        &self,
        school_id: Uuid,
    ) -> Result<FleetAnalyticsResponse, AppError> {
        let vehicles = self.repository.count_vehicles_by_status(school_id).await?;
        let routes = self.repository.count_routes_by_status(school_id).await?;
        let bindings = self.repository.count_bindings_by_status(school_id).await?;
        let types = self.repository.count_bindings_by_type(school_id).await?;
        let average_driver_rating = self.repository.average_driver_rating(school_id).await?;

        let to_counts = |rows: Vec<crate::repositories::activity_repository::StatusCountRow>| {
            rows.into_iter()
                .map(|r| StatusCount {
                    status: r.status,
                    count: r.count,
                })
                .collect::<Vec<_>>()
        };

        Ok(FleetAnalyticsResponse {
            vehicles_by_status: to_counts(vehicles),
            routes_by_status: to_counts(routes),
            bindings_by_status: to_counts(bindings),
            bindings_by_type: to_counts(types),
            average_driver_rating,
        })
    }

    /// Conductores con licencia o revisión médica dentro de la ventana
    /// de vencimiento.
    pub async fn get_driver_compliance(
        &self,
        school_id: Uuid,
        query: ComplianceQuery,
    ) -> Result<Vec<DriverComplianceResponse>, AppError> {
        let window = query.window_days.unwrap_or(DEFAULT_COMPLIANCE_WINDOW_DAYS);
        if window <= 0 {
            return Err(validation_error("window_days", "must be a positive number of days"));
        }

        let cutoff = Utc::now().date_naive() + Duration::days(window);
        let rows = self.repository.drivers_expiring_before(school_id, cutoff).await?;

        Ok(rows
            .into_iter()
            .map(|r| DriverComplianceResponse {
                driver_id: r.driver_id,
                full_name: r.full_name,
                license_expiring: r.license_expiry <= cutoff,
                medical_check_expiring: r.medical_check_expiry.map(|d| d <= cutoff).unwrap_or(false),
                license_expiry: r.license_expiry,
                medical_check_expiry: r.medical_check_expiry,
            })
            .collect())
    }

    pub async fn get_driver_performance(
        &self,
        school_id: Uuid,
        query: PerformanceQuery,
    ) -> Result<Vec<DriverPerformanceResponse>, AppError> {
        let to = query.to.unwrap_or_else(|| Utc::now().date_naive());
        let from = query
            .from
            .unwrap_or_else(|| to - Duration::days(DEFAULT_PERFORMANCE_RANGE_DAYS));

        let rows = self.repository.driver_performance(school_id, from, to).await?;

        Ok(rows
            .into_iter()
            .map(|r| DriverPerformanceResponse {
                driver_id: r.driver_id,
                full_name: r.full_name,
                total_trips: r.total_trips,
                completed_trips: r.completed_trips,
                on_time_rate: rate(r.completed_trips, r.total_trips),
                avg_delay_minutes: r.avg_delay_minutes,
            })
            .collect())
    }

    pub async fn get_route_performance(
        &self,
        school_id: Uuid,
        query: PerformanceQuery,
    ) -> Result<Vec<RoutePerformanceResponse>, AppError> {
        let to = query.to.unwrap_or_else(|| Utc::now().date_naive());
        let from = query
            .from
            .unwrap_or_else(|| to - Duration::days(DEFAULT_PERFORMANCE_RANGE_DAYS));

        let rows = self.repository.route_performance(school_id, from, to).await?;

        Ok(rows
            .into_iter()
            .map(|r| RoutePerformanceResponse {
                route_id: r.route_id,
                route_code: r.route_code,
                total_trips: r.total_trips,
                completed_trips: r.completed_trips,
                on_time_rate: rate(r.completed_trips, r.total_trips),
                avg_delay_minutes: r.avg_delay_minutes,
            })
            .collect())
    }
}

/// Tasa completado/total en porcentaje. Nunca divide por cero.
fn rate(completed: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    completed as f64 / total as f64 * 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rate_never_divides_by_zero() {
        assert_eq!(rate(0, 0), 0.0);
        assert_eq!(rate(3, 4), 75.0);
        assert_eq!(rate(4, 4), 100.0);
    }
}
