use axum::{
    body::Body,
    http::{Request, StatusCode},
    routing::{get, post},
    Router,
};
use tower::ServiceExt;

#[tokio::test]
async fn test_health_check() {
    let app = create_test_app().await;
    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_returns_404() {
    let app = create_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/unknown")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_transport_endpoint_rejects_wrong_method() {
    // POST /api/transport existe; GET sobre la misma ruta con solo POST
    // registrado debe dar 405
    let app = create_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/transport")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_schedule_endpoint_available() {
    let app = create_test_app().await;
    let response = app
        .oneshot(
            Request::builder()
                .uri("/api/schedule?date=2025-09-15")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

// Función helper para crear la app de test
async fn create_test_app() -> Router {
    // App de test básica que refleja la superficie de la API
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/api/schedule", get(|| async { "OK" }))
        .route("/api/transport", post(|| async { "OK" }))
}
