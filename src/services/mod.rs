//! Servicios de dominio
//!
//! Lógica pura del motor: geometría, tarifas, planificación de rutas y
//! métricas rodantes. Sin acceso a datos; los repositorios y controladores
//! componen sobre estos módulos.

pub mod geo;
pub mod fees;
pub mod route_optimizer;
pub mod metrics;
