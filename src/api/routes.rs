//! Router configuration for the API.
//!
//! This module provides centralized route registration and middleware
//! configuration for the application.

use axum::{Router, middleware};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{logging_middleware, not_found_handler, request_id_middleware};
use crate::state::AppState;

/// Creates the main application router with all routes and middleware.
///
/// # Middleware Order
/// Middleware is applied in reverse order of declaration (last added runs first):
/// 1. CORS (outermost)
/// 2. Request ID - generates/propagates request IDs
/// 3. Logging - logs requests with request IDs
///
/// # Routes
/// - `/api/notification` - Notification dispatch
/// - `/api/stations`, `/api/station/*` - Station directory proxy
/// - `/health`, `/health/ready`, `/health/live` - Health checks
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation
pub fn create_router(state: AppState) -> Router {
    let api_routes = OpenApiRouter::new()
        .merge(handlers::notifications::notification_routes())
        .merge(handlers::stations::station_routes());

    let (router, api) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", api_routes)
        .merge(handlers::health::health_routes())
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", api))
        .fallback(not_found_handler)
        // Middleware is applied in reverse order - last added runs first
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(cors_layer())
        .with_state(state)
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::dto::NOTIFICATIONS_SENT;
    use crate::api::middleware::REQUEST_ID_HEADER;
    use crate::config::StationSettings;
    use crate::error::{AppError, AppResult};
    use crate::external::StationDirectory;
    use crate::models::Account;
    use crate::repositories::AccountStore;
    use crate::services::notifications::{
        ChannelKind, ChannelSender, ChannelSet, Delivery, DeliveryReport, MISSING_PARAMETERS,
        NotificationDispatcher,
    };
    use crate::services::{Services, StationService};
    use async_trait::async_trait;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use std::sync::{Arc, Mutex};
    use std::time::Duration;
    use tower::ServiceExt;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn missing_parameters_body() -> Value {
        json!({"message": MISSING_PARAMETERS, "error": 422})
    }

    struct FixedStore {
        account: Option<Account>,
        healthy: bool,
    }

    #[async_trait]
    impl AccountStore for FixedStore {
        async fn find_account(&self, account_key: &str) -> AppResult<Option<Account>> {
            Ok(self
                .account
                .clone()
                .filter(|a| a.account_key == account_key))
        }

        async fn ping(&self) -> AppResult<()> {
            if self.healthy {
                Ok(())
            } else {
                Err(AppError::ConnectionPool {
                    source: anyhow::anyhow!("connection refused"),
                })
            }
        }
    }

    #[derive(Default)]
    struct RecordingEmail {
        sent: Mutex<Vec<Delivery>>,
    }

    #[async_trait]
    impl ChannelSender for RecordingEmail {
        async fn send(&self, delivery: &Delivery) -> AppResult<DeliveryReport> {
            self.sent.lock().unwrap().push(delivery.clone());
            Ok(DeliveryReport {
                channel: ChannelKind::Email,
                duration_ms: 0,
            })
        }

        fn kind(&self) -> ChannelKind {
            ChannelKind::Email
        }
    }

    struct TestApp {
        state: AppState,
        email: Arc<RecordingEmail>,
    }

    impl TestApp {
        fn new(station_url: &str, healthy: bool) -> Self {
            let store: Arc<dyn AccountStore> = Arc::new(FixedStore {
                account: Some(Account {
                    account_key: "A1".to_string(),
                    auth_token: "T1".to_string(),
                    email_address: Some("a@x.com".to_string()),
                    push_enabled: false,
                    messaging_identity: None,
                    locale: "en".to_string(),
                }),
                healthy,
            });
            let email = Arc::new(RecordingEmail::default());
            let stations = StationDirectory::from_settings(&StationSettings {
                api_url: station_url.to_string(),
                api_key: "?key=k".to_string(),
                timeout: 2,
                ..StationSettings::default()
            })
            .unwrap();

            let services = Services::new(
                NotificationDispatcher::new(
                    store.clone(),
                    ChannelSet::default().with_email(email.clone()),
                ),
                StationService::new(stations),
            );

            Self {
                state: AppState::new(services, store),
                email,
            }
        }

        async fn call(&self, request: Request<Body>) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
            let response = create_router(self.state.clone())
                .oneshot(request)
                .await
                .unwrap();
            let status = response.status();
            let headers = response.headers().clone();
            let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
            (status, headers, body.to_vec())
        }

        async fn post_json(&self, uri: &str, body: &str) -> (StatusCode, Value) {
            let (status, _, bytes) = self
                .call(
                    Request::post(uri)
                        .header(header::CONTENT_TYPE, "application/json")
                        .body(Body::from(body.to_string()))
                        .unwrap(),
                )
                .await;
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }

    #[tokio::test]
    async fn test_notification_success_sends_email() {
        let app = TestApp::new("http://127.0.0.1:9", true);

        let (status, body) = app
            .post_json(
                "/api/notification",
                r#"{"akey":"A1","token":"T1","error":"disk-full"}"#,
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"message": NOTIFICATIONS_SENT}));

        assert!(
            app.state
                .services
                .notifications
                .drain(Duration::from_secs(5))
                .await
        );
        let sent = app.email.sent.lock().unwrap().clone();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].destination, "a@x.com");
        assert_eq!(sent[0].payload.as_text(), "disk-full");
    }

    #[tokio::test]
    async fn test_notification_wrong_token() {
        let app = TestApp::new("http://127.0.0.1:9", true);

        let (status, body) = app
            .post_json(
                "/api/notification",
                r#"{"akey":"A1","token":"WRONG","error":"disk-full"}"#,
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({"message": "Unauthorized", "error": 401}));
        assert!(app.email.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_notification_missing_parameters() {
        let app = TestApp::new("http://127.0.0.1:9", true);

        for body in [r#"{"token":"T1"}"#, r#"{"akey":"A1","token":""}"#, "not json", "[]"] {
            let (status, json_body) = app.post_json("/api/notification", body).await;
            assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "body: {}", body);
            assert_eq!(json_body, missing_parameters_body());
        }
    }

    #[tokio::test]
    async fn test_cors_and_request_id_headers() {
        let app = TestApp::new("http://127.0.0.1:9", true);

        let (status, headers, _) = app
            .call(
                Request::post("/api/notification")
                    .header(header::ORIGIN, "https://app.example.com")
                    .header(header::CONTENT_TYPE, "application/json")
                    .header(REQUEST_ID_HEADER, "req-1")
                    .body(Body::from(r#"{"akey":"A1","token":"WRONG"}"#))
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "*");
        assert_eq!(headers[REQUEST_ID_HEADER], "req-1");
        assert!(
            headers[header::CONTENT_TYPE]
                .to_str()
                .unwrap()
                .starts_with("application/json")
        );
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let app = TestApp::new("http://127.0.0.1:9", true);

        let (status, _, bytes) = app
            .call(Request::get("/nope").body(Body::empty()).unwrap())
            .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["error"], 404);
    }

    #[tokio::test]
    async fn test_health_reflects_account_store() {
        let healthy = TestApp::new("http://127.0.0.1:9", true);
        let (status, _, bytes) = healthy
            .call(Request::get("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["checks"]["database"]["status"], "healthy");

        let unhealthy = TestApp::new("http://127.0.0.1:9", false);
        let (status, _, _) = unhealthy
            .call(Request::get("/health").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _, _) = unhealthy
            .call(Request::get("/health/ready").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);

        let (status, _, _) = unhealthy
            .call(Request::get("/health/live").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_station_search_envelope() {
        let server = MockServer::start().await;
        let upstream = json!({"status": "ok", "chargelocations": []});

        Mock::given(method("GET"))
            .and(path("/chargepoints/"))
            .and(query_param("radius", "10"))
            .respond_with(ResponseTemplate::new(200).set_body_json(&upstream))
            .mount(&server)
            .await;

        let app = TestApp::new(&server.uri(), true);
        let (status, body) = app
            .post_json("/api/stations", r#"{"lat":52.5,"lng":13.4}"#)
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"err": null, "stations": upstream}));
    }

    #[tokio::test]
    async fn test_station_upstream_failure_is_err_500() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let app = TestApp::new(&server.uri(), true);

        let (status, body) = app.post_json("/api/station", r#"{"id":4711}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({"err": 500, "station": null}));

        let (status, _, bytes) = app
            .call(Request::get("/api/station/cards").body(Body::empty()).unwrap())
            .await;
        assert_eq!(status, StatusCode::OK);
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"err": 500, "cards": null}));
    }

    #[tokio::test]
    async fn test_station_missing_parameters() {
        let app = TestApp::new("http://127.0.0.1:9", true);

        let (status, body) = app.post_json("/api/stations", r#"{"lat":52.5}"#).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, missing_parameters_body());

        let (status, _) = app.post_json("/api/station/photo", "{}").await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

        let (status, body) = app
            .post_json("/api/station", r#"{"id":"1&ge_id=2"}"#)
            .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body, missing_parameters_body());
    }

    #[tokio::test]
    async fn test_station_photo_is_streamed() {
        let server = MockServer::start().await;
        let image = vec![0x89, b'P', b'N', b'G', 1, 2, 3];

        Mock::given(method("GET"))
            .and(path("/chargepoints/photo/"))
            .and(query_param("id", "99"))
            .respond_with(
                ResponseTemplate::new(200).set_body_raw(image.clone(), "image/png"),
            )
            .mount(&server)
            .await;

        let app = TestApp::new(&server.uri(), true);
        let (status, headers, bytes) = app
            .call(
                Request::post("/api/station/photo")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"id":"99"}"#))
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers[header::CONTENT_TYPE], "image/png");
        assert_eq!(bytes, image);
    }

    #[tokio::test]
    async fn test_station_photo_upstream_failure() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let app = TestApp::new(&server.uri(), true);
        let (status, body) = app.post_json("/api/station/photo", r#"{"id":1}"#).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({"message": "Internal server error", "error": 500}));
    }

    #[tokio::test]
    async fn test_openapi_document_is_served() {
        let app = TestApp::new("http://127.0.0.1:9", true);

        let (status, _, bytes) = app
            .call(
                Request::get("/api-docs/openapi.json")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await;

        assert_eq!(status, StatusCode::OK);
        let doc: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(doc["paths"]["/api/notification"]["post"].is_object());
        assert!(doc["paths"]["/api/station/cards"]["get"].is_object());
        assert!(doc["paths"]["/health"]["get"].is_object());
    }
}
