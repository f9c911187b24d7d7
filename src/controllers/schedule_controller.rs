//! Controlador del generador de horarios
//!
//! Proyección de solo lectura: selecciona los bindings activos cuya
//! ventana de validez cubre la fecha y los agrupa por ruta en listas de
//! recogida y entrega ordenadas. No muta nada y es seguro frente a
//! escrituras concurrentes (snapshot posiblemente obsoleto).

use crate::cache::schedule_cache::ScheduleCache;
use crate::dto::schedule_dto::{RouteSchedule, ScheduleEntry};
use crate::repositories::transport_repository::{ScheduleRow, TransportRepository};
use crate::utils::errors::AppError;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

pub struct ScheduleController {
    repository: TransportRepository,
    cache: ScheduleCache,
}

impl ScheduleController {
    pub fn new(pool: PgPool, cache: ScheduleCache) -> Self {
        Self {
            repository: TransportRepository::new(pool),
            cache,
        }
    }

    pub async fn get_schedule(
        &self,
        school_id: Uuid,
        date: NaiveDate,
        route_id: Option<Uuid>,
    ) -> Result<Vec<RouteSchedule>, AppError> {
        if let Ok(Some(cached)) = self.cache.get(school_id, date, route_id).await {
            return Ok(cached);
        }

        let rows = self
            .repository
            .find_schedule_rows(school_id, date, route_id)
            .await?;

        let schedules = group_by_route(rows, date);

        if let Err(e) = self.cache.set(school_id, date, route_id, &schedules).await {
            log::warn!("No se pudo cachear el horario: {}", e);
        }

        Ok(schedules)
    }
}

/// Agrupar filas (ya ordenadas por ruta y hora de recogida) en horarios
/// por ruta. Las entregas se reordenan por su propia hora programada.
fn group_by_route(rows: Vec<ScheduleRow>, date: NaiveDate) -> Vec<RouteSchedule> {
    let mut schedules: Vec<RouteSchedule> = Vec::new();

    for row in rows {
        let pickup = ScheduleEntry {
            binding_id: row.binding_id,
            student_id: row.student_id,
            stop_id: row.pickup_stop_id,
            stop_name: row.pickup_stop_name,
            scheduled_time: row.scheduled_pickup_time,
            needs_reassignment: row.needs_reassignment,
        };
        let dropoff = ScheduleEntry {
            binding_id: row.binding_id,
            student_id: row.student_id,
            stop_id: row.dropoff_stop_id,
            stop_name: row.dropoff_stop_name,
            scheduled_time: row.scheduled_dropoff_time,
            needs_reassignment: row.needs_reassignment,
        };

        match schedules.last_mut() {
            Some(current) if current.route_id == row.route_id => {
                current.pickups.push(pickup);
                current.dropoffs.push(dropoff);
            }
            _ => {
                schedules.push(RouteSchedule {
                    route_id: row.route_id,
                    route_code: row.route_code,
                    route_name: row.route_name,
                    date,
                    pickup_time: row.route_pickup_time,
                    dropoff_time: row.route_dropoff_time,
                    pickups: vec![pickup],
                    dropoffs: vec![dropoff],
                });
            }
        }
    }

    for schedule in &mut schedules {
        schedule
            .dropoffs
            .sort_by_key(|entry| entry.scheduled_time);
    }

    schedules
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveTime;

    fn row(route: Uuid, code: &str, pickup: &str, dropoff: &str) -> ScheduleRow {
        ScheduleRow {
            binding_id: Uuid::new_v4(),
            student_id: Uuid::new_v4(),
            needs_reassignment: false,
            pickup_stop_id: Uuid::new_v4(),
            pickup_stop_name: "Parada A".to_string(),
            dropoff_stop_id: Uuid::new_v4(),
            dropoff_stop_name: "Parada B".to_string(),
            scheduled_pickup_time: pickup.parse().unwrap(),
            scheduled_dropoff_time: dropoff.parse().unwrap(),
            route_id: route,
            route_code: code.to_string(),
            route_name: format!("Ruta {}", code),
            route_pickup_time: "07:00:00".parse().unwrap(),
            route_dropoff_time: "14:30:00".parse().unwrap(),
        }
    }

    #[test]
    fn test_groups_consecutive_rows_by_route() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let r1 = Uuid::new_v4();
        let r2 = Uuid::new_v4();
        let rows = vec![
            row(r1, "RT-01", "07:00:00", "14:30:00"),
            row(r1, "RT-01", "07:05:00", "14:20:00"),
            row(r2, "RT-02", "07:30:00", "15:00:00"),
        ];

        let schedules = group_by_route(rows, date);

        assert_eq!(schedules.len(), 2);
        assert_eq!(schedules[0].pickups.len(), 2);
        assert_eq!(schedules[0].dropoffs.len(), 2);
        assert_eq!(schedules[1].pickups.len(), 1);
        assert_eq!(schedules[0].date, date);
    }

    #[test]
    fn test_dropoffs_ordered_by_their_own_time() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        let r1 = Uuid::new_v4();
        // Orden de recogida no coincide con orden de entrega
        let rows = vec![
            row(r1, "RT-01", "07:00:00", "14:45:00"),
            row(r1, "RT-01", "07:10:00", "14:15:00"),
        ];

        let schedules = group_by_route(rows, date);

        let times: Vec<NaiveTime> = schedules[0]
            .dropoffs
            .iter()
            .map(|e| e.scheduled_time)
            .collect();
        assert!(times[0] <= times[1]);
        assert_eq!(times[0], "14:15:00".parse().unwrap());
    }

    #[test]
    fn test_empty_rows_yield_empty_schedule() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 15).unwrap();
        assert!(group_by_route(Vec::new(), date).is_empty());
    }
}
