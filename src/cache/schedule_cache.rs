//! Cache de snapshots de horarios
//!
//! El horario diario es una proyección de solo lectura; una lectura
//! reciente-pero-obsoleta es aceptable, así que el snapshot vive en
//! Redis con TTL corto y no se invalida al asignar o cancelar.

use anyhow::Result;
use chrono::NaiveDate;
use uuid::Uuid;

use super::redis_client::RedisClient;
use super::CacheOperations;
use crate::dto::schedule_dto::RouteSchedule;

/// TTL del snapshot de horario (segundos)
const SCHEDULE_TTL_SECONDS: u64 = 60;

#[derive(Clone)]
pub struct ScheduleCache {
    redis: RedisClient,
}

impl ScheduleCache {
    pub fn new(redis: RedisClient) -> Self {
        Self { redis }
    }

    fn key(&self, school_id: Uuid, date: NaiveDate, route_id: Option<Uuid>) -> String {
        let route = route_id.map(|r| r.to_string());
        self.redis.schedule_key(
            &school_id.to_string(),
            &date.to_string(),
            route.as_deref(),
        )
    }

    pub async fn get(
        &self,
        school_id: Uuid,
        date: NaiveDate,
        route_id: Option<Uuid>,
    ) -> Result<Option<Vec<RouteSchedule>>> {
        self.redis.get(&self.key(school_id, date, route_id)).await
    }

    pub async fn set(
        &self,
        school_id: Uuid,
        date: NaiveDate,
        route_id: Option<Uuid>,
        schedules: &Vec<RouteSchedule>,
    ) -> Result<()> {
        self.redis
            .set(&self.key(school_id, date, route_id), schedules, SCHEDULE_TTL_SECONDS)
            .await
    }
}
