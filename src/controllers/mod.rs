//! Controladores
//!
//! Reglas de negocio por subsistema: pre-validación, orquestación de
//! repositorios y conversión a DTO. Los pre-checks de exclusividad son
//! fast-fail; la palabra final la tiene el storage.

pub mod stop_controller;
pub mod route_controller;
pub mod vehicle_controller;
pub mod driver_controller;
pub mod assignment_controller;
pub mod transport_controller;
pub mod schedule_controller;
pub mod analytics_controller;
