use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{get_all_telemetry, get_telemetry, health, metrics, root, submit_telemetry};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .route("/telemetry", post(submit_telemetry).get(get_all_telemetry))
        .route("/telemetry/:vehicle_id", get(get_telemetry))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn test_app() -> Router {
        build_router(AppState::new("test-container".to_string()))
    }

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.expect("response");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body");
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).expect("request")
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request")
    }

    fn sample(vehicle_id: i64, fuel_level: f64, engine_temp: f64, speed: f64) -> Value {
        json!({
            "vehicle_id": vehicle_id,
            "latitude": 55.75,
            "longitude": 37.61,
            "speed": speed,
            "fuel_level": fuel_level,
            "engine_temp": engine_temp,
        })
    }

    #[tokio::test]
    async fn submit_returns_derived_view() {
        let app = test_app();
        let mut body = sample(3, 5.0, 100.0, 130.0);
        body["timestamp"] = json!("2024-03-01T12:00:00Z");

        let (status, body) = send(&app, post_json("/telemetry", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["vehicle_id"], 3);
        assert_eq!(body["status"], "overspeed");
        assert_eq!(body["location"], json!({ "lat": 55.75, "lon": 37.61 }));
        assert_eq!(
            body["metrics"],
            json!({ "speed": 130.0, "fuel_level": 5.0, "engine_temp": 100.0 })
        );
        assert_eq!(body["last_update"], "2024-03-01T12:00:00Z");
    }

    #[tokio::test]
    async fn timestamp_without_offset_is_accepted_as_utc() {
        let app = test_app();
        let mut body = sample(4, 50.0, 80.0, 60.0);
        body["timestamp"] = json!("2024-03-01T12:00:00");

        let (status, body) = send(&app, post_json("/telemetry", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["last_update"], "2024-03-01T12:00:00Z");

        let (_, body) = send(&app, get("/telemetry/4")).await;
        assert_eq!(body["last_update"], "2024-03-01T12:00:00Z");

        let mut body = sample(5, 50.0, 80.0, 60.0);
        body["timestamp"] = json!("not a timestamp");
        let (status, body) = send(&app, post_json("/telemetry", body)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "invalid_payload");
    }

    #[tokio::test]
    async fn lookup_after_overwrite_returns_latest_sample() {
        let app = test_app();
        send(&app, post_json("/telemetry", sample(1, 50.0, 80.0, 60.0))).await;
        send(&app, post_json("/telemetry", sample(1, 5.0, 50.0, 50.0))).await;

        let (status, body) = send(&app, get("/telemetry/1")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "low_fuel");

        let (status, body) = send(&app, get("/telemetry")).await;
        assert_eq!(status, StatusCode::OK);
        let entries = body.as_array().expect("array");
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0]["metrics"]["fuel_level"], 5.0);
    }

    #[tokio::test]
    async fn unknown_vehicle_is_404() {
        let app = test_app();
        let (status, body) = send(&app, get("/telemetry/42")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "telemetry_not_found");
    }

    #[tokio::test]
    async fn non_numeric_vehicle_id_is_client_error() {
        let app = test_app();
        let (status, body) = send(&app, get("/telemetry/abc")).await;
        assert!(status.is_client_error());
        assert_eq!(body["code"], "invalid_payload");
    }

    #[tokio::test]
    async fn malformed_payload_is_rejected() {
        let app = test_app();
        let (status, body) = send(&app, post_json("/telemetry", json!({ "vehicle_id": 1 }))).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["code"], "invalid_payload");

        let (_, body) = send(&app, get("/health")).await;
        assert_eq!(body["vehicles_monitored"], 0);
    }

    #[tokio::test]
    async fn metrics_on_empty_store_are_zero() {
        let app = test_app();
        let (status, body) = send(&app, get("/metrics")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body,
            json!({
                "total_vehicles_monitored": 0,
                "alerts_count": 0,
                "avg_speed": 0.0,
                "avg_fuel_level": 0.0,
            })
        );

        let (_, body) = send(&app, get("/telemetry")).await;
        assert_eq!(body, json!([]));
    }

    #[tokio::test]
    async fn metrics_count_low_fuel_overspeed_as_alert() {
        let app = test_app();
        send(&app, post_json("/telemetry", sample(1, 5.0, 50.0, 200.0))).await;
        send(&app, post_json("/telemetry", sample(2, 50.0, 50.0, 200.0))).await;

        let (_, body) = send(&app, get("/metrics")).await;
        assert_eq!(body["total_vehicles_monitored"], 2);
        assert_eq!(body["alerts_count"], 1);
        assert_eq!(body["avg_speed"], 200.0);
        assert_eq!(body["avg_fuel_level"], 27.5);
    }

    #[tokio::test]
    async fn health_and_root_report_container() {
        let app = test_app();
        send(&app, post_json("/telemetry", sample(1, 50.0, 80.0, 60.0))).await;

        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["vehicles_monitored"], 1);
        assert_eq!(body["container_id"], "test-container");

        let (_, body) = send(&app, get("/")).await;
        assert_eq!(body["service"], "Telemetry Service");
        assert_eq!(body["container"], "test-container");
    }
}
