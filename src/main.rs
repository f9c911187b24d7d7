mod cache;
mod config;
mod controllers;
mod database;
mod dto;
mod middleware;
mod models;
mod repositories;
mod routes;
mod services;
mod state;
mod utils;

use anyhow::Result;
use axum::{middleware::from_fn_with_state, response::Json, routing::get, Router};
use dotenvy::dotenv;
use serde_json::json;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info};

use cache::redis_client::RedisClient;
use cache::CacheConfig;
use config::environment::EnvironmentConfig;
use database::create_pool;
use middleware::cors::{cors_middleware, cors_middleware_with_origins};
use state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    // Configurar logging
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    info!("🚌 School Transport Engine - Rutas y Asignaciones");
    info!("=================================================");

    let config = EnvironmentConfig::from_env()?;

    // Inicializar base de datos
    let pool = match create_pool(None).await {
        Ok(pool) => pool,
        Err(e) => {
            error!("❌ Error conectando a la base de datos: {}", e);
            return Err(anyhow::anyhow!("Error de base de datos: {}", e));
        }
    };

    // Inicializar Redis (cache de snapshots de horarios)
    let redis_config = CacheConfig {
        redis_url: config.redis_url.clone(),
        default_ttl: 3600,
        max_connections: 10,
    };

    let redis_client = match RedisClient::new(redis_config).await {
        Ok(client) => client,
        Err(e) => {
            error!("❌ Error conectando a Redis: {}", e);
            return Err(anyhow::anyhow!("Error de Redis: {}", e));
        }
    };

    let app_state = AppState::new(pool, config.clone(), redis_client);

    // Router de la API: todos los recursos detrás del middleware JWT
    let api = Router::new()
        .nest("/api/stops", routes::stop_routes::create_stop_router())
        .nest("/api/routes", routes::route_routes::create_route_router())
        .nest("/api/vehicles", routes::vehicle_routes::create_vehicle_router())
        .nest("/api/drivers", routes::driver_routes::create_driver_router())
        .nest("/api/transport", routes::transport_routes::create_transport_router())
        .nest("/api/schedule", routes::schedule_routes::create_schedule_router())
        .nest("/api/analytics", routes::analytics_routes::create_analytics_router())
        .layer(from_fn_with_state(app_state.clone(), middleware::auth::auth_middleware));

    // CORS permisivo en desarrollo; orígenes explícitos en producción
    let cors = if config.is_production() {
        cors_middleware_with_origins(config.cors_origins.clone())
    } else {
        cors_middleware()
    };

    let app = Router::new()
        .route("/health", get(health_endpoint))
        .merge(api)
        .layer(cors)
        .with_state(app_state);

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;

    info!("🌐 Servidor iniciando en http://{}", addr);
    info!("🔍 Endpoints disponibles:");
    info!("   GET  /health - Health check");
    info!("📍 Stops:");
    info!("   POST /api/stops - Crear parada");
    info!("   GET  /api/stops - Listar paradas");
    info!("   GET  /api/stops/:id - Obtener parada");
    info!("   PUT  /api/stops/:id - Actualizar parada");
    info!("   DELETE /api/stops/:id - Retirar parada");
    info!("🗺️ Routes:");
    info!("   POST /api/routes - Crear ruta");
    info!("   POST /api/routes/optimize - Construir ruta desde paradas");
    info!("   GET  /api/routes - Listar rutas");
    info!("   GET  /api/routes/:id - Obtener ruta");
    info!("   PUT  /api/routes/:id - Actualizar ruta");
    info!("   DELETE /api/routes/:id - Eliminar ruta");
    info!("   POST /api/routes/:id/assignment - Asignar vehículo/conductor");
    info!("   DELETE /api/routes/:id/assignment - Desasignar recursos");
    info!("🚗 Vehicles / 🧑‍✈️ Drivers:");
    info!("   CRUD /api/vehicles y /api/drivers");
    info!("🎒 Transport:");
    info!("   POST /api/transport - Asignar transporte a alumno");
    info!("   GET  /api/transport - Listar bindings");
    info!("   PUT  /api/transport/:id - Actualizar binding");
    info!("   POST /api/transport/:id/cancel - Cancelar binding");
    info!("   POST /api/transport/:id/activity - Registrar viaje realizado");
    info!("📅 Schedule:");
    info!("   GET  /api/schedule?date=YYYY-MM-DD&route_id= - Horario diario");
    info!("📊 Analytics:");
    info!("   GET  /api/analytics/fleet - Resumen de flota");
    info!("   GET  /api/analytics/compliance - Vencimientos de conductores");
    info!("   GET  /api/analytics/drivers - Rendimiento por conductor");
    info!("   GET  /api/analytics/routes - Rendimiento por ruta");
    info!("   GET  /api/analytics/bindings/:id - Métricas de un binding");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            error!("❌ Error del servidor: {}", e);
            anyhow::anyhow!(e)
        })?;

    info!("👋 Servidor terminado");
    Ok(())
}

/// Health check simple
async fn health_endpoint() -> Json<serde_json::Value> {
    Json(json!({
        "service": "school-transport",
        "status": "healthy",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Señal de apagado graceful
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("🛑 Señal Ctrl+C recibida, apagando servidor...");
        },
        _ = terminate => {
            info!("🛑 Señal de terminación recibida, apagando servidor...");
        },
    }
}
