//! Base de datos
//!
//! Construcción del pool de conexiones a PostgreSQL.

pub mod connection;

pub use connection::create_pool;
