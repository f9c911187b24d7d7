//! Modelos del sistema
//!
//! Este módulo contiene todos los modelos de datos que mapean exactamente
//! al schema PostgreSQL. Los estados son enums cerrados (sqlx::Type) para
//! que cada rama dependiente de estado haga match exhaustivo.

pub mod stop;
pub mod route;
pub mod vehicle;
pub mod driver;
pub mod transport;
