//! HTTP router construction.
//!
//! Assembles all Axum routes, middleware, and OpenAPI docs into a single `Router`.

use std::sync::Arc;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tracing::warn;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api;
use crate::state::AppState;

/// Permissive CORS for `*`, otherwise a single allowed origin.
fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new()
            .allow_origin(value)
            .allow_methods(Any)
            .allow_headers(Any),
        Err(e) => {
            warn!("Invalid CORS origin '{}' ({}), allowing any origin", origin, e);
            CorsLayer::permissive()
        }
    }
}

/// Build the complete application router with all routes and middleware.
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.config.server.cors_origin);

    Router::new()
        .route("/health", get(api::health))
        .route("/distributions", get(api::distributions))
        .route("/generate", post(api::generate))
        .route("/plot", post(api::plot))
        .route("/latest", get(api::latest))
        .layer(cors)
        .with_state(state)
        .merge(Scalar::with_url("/docs", api::doc::ApiDoc::openapi()))
}

#[cfg(test)]
mod tests {
    use super::*;

    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use distboard_core::Config;

    fn app() -> Router {
        build_router(Arc::new(AppState::new(Config::default())))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn post_json(uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn normal_request() -> Value {
        json!({
            "spec": {"name": "norm", "is_continuous": true, "parameters": {"mean": 0, "sd": 1}},
            "shape": 100,
            "primary_stat": "Survival Function",
            "random_seed": 42
        })
    }

    #[tokio::test]
    async fn health_reports_ok() {
        let (status, body) = send(app(), get_request("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["has_latest"], false);
    }

    #[tokio::test]
    async fn distributions_lists_the_registry() {
        let (status, body) = send(app(), get_request("/distributions")).await;
        assert_eq!(status, StatusCode::OK);
        let families = body["families"].as_array().unwrap();
        assert_eq!(families.len(), 6);
        let poisson = families.iter().find(|f| f["id"] == "poisson").unwrap();
        assert_eq!(poisson["kind"], "discrete");
        assert_eq!(poisson["columns"], json!(["value", "pmf", "cdf"]));
        assert_eq!(poisson["parameters"][0]["default"], 4.0);
        assert_eq!(body["observations"]["default"], 500);
    }

    #[tokio::test]
    async fn generate_returns_the_table_and_stats() {
        let (status, body) = send(app(), post_json("/generate", normal_request())).await;
        assert_eq!(status, StatusCode::OK);
        let names: Vec<&str> = body["table"]["columns"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["value", "pdf", "cdf", "Survival Function"]);
        assert_eq!(body["table"]["columns"][0]["values"].as_array().unwrap().len(), 100);
        assert!(body["stats"]["loc"].is_number());
    }

    #[tokio::test]
    async fn generate_maps_errors_to_status_codes() {
        let mut unknown = normal_request();
        unknown["spec"]["name"] = json!("frobnicate");
        let (status, body) = send(app(), post_json("/generate", unknown)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "unknown_distribution");

        let mut unsupported = normal_request();
        unsupported["primary_stat"] = json!("Nonexistent Function");
        let (status, body) = send(app(), post_json("/generate", unsupported)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["kind"], "unsupported_operation");

        let mut failing = normal_request();
        failing["primary_stat"] = json!("Percent Point Function");
        let (status, body) = send(app(), post_json("/generate", failing)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["kind"], "generation_failure");
    }

    #[tokio::test]
    async fn plot_becomes_the_latest_record() {
        let app = app();

        let (status, body) = send(app.clone(), get_request("/latest")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["kind"], "not_found");

        let form = json!({
            "distribution": "Poisson",
            "parameters": {"events": 3},
            "matrix": true,
            "min": 3,
            "max": 4,
            "secondary_stat": "ISF",
            "secondary_enabled": true,
            "seed": 9
        });
        let (status, plotted) = send(app.clone(), post_json("/plot", form)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(plotted["distribution"], "Poisson");
        assert_eq!(plotted["values"].as_array().unwrap().len(), 12);
        assert_eq!(plotted["result"]["array"][0]["rows"], 3);
        assert_eq!(plotted["result"]["table"]["columns"].as_array().unwrap().len(), 5);

        let (status, latest) = send(app, get_request("/latest")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(latest["id"], plotted["id"]);
    }

    #[tokio::test]
    async fn docs_are_served() {
        let response = app().oneshot(get_request("/docs")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
