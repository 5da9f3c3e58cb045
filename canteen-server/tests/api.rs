//! HTTP 层测试: 通过 oneshot 调用完整路由 (中间件 + 认证)

mod common;

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use chrono::Duration;
use http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use tower::ServiceExt;

use canteen_server::auth::JwtConfig;
use canteen_server::clock::{Clock, FixedClock};
use canteen_server::db::DbService;
use canteen_server::db::repository::menu_item;
use canteen_server::routes::build_app;
use canteen_server::{Config, ServerState};
use common::{monday_at, plain};

struct TestApp {
    state: ServerState,
    clock: Arc<FixedClock>,
}

impl TestApp {
    async fn new() -> Self {
        let db = DbService::in_memory().await.unwrap();
        let clock = Arc::new(FixedClock::at_local(monday_at(10, 0)));
        let dyn_clock: Arc<dyn Clock> = clock.clone();

        let mut config = Config::with_overrides(":memory:", 0);
        config.jwt = JwtConfig {
            secret: "api-test-secret-that-is-long-enough-123".into(),
            expiration_minutes: 60,
            issuer: "canteen-server".into(),
            audience: "canteen-clients".into(),
        };
        config.self_cancel_window_secs = 60;
        config.admin_order_window_hours = 24;

        let state = ServerState::new(config, db.pool, dyn_clock.clone(), dyn_clock);
        Self { state, clock }
    }

    fn app(&self) -> Router {
        build_app(&self.state).with_state(self.state.clone())
    }

    fn token(&self, user_id: i64, role: &str) -> String {
        self.state
            .jwt_service
            .generate_token(user_id, "tester", role)
            .unwrap()
    }

    async fn send(&self, req: Request<Body>) -> (StatusCode, http::HeaderMap, Value) {
        let resp = self.app().oneshot(req).await.unwrap();
        let status = resp.status();
        let headers = resp.headers().clone();
        let bytes = resp.into_body().collect().await.unwrap().to_bytes();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, headers, body)
    }
}

fn get(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(t) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {t}"));
    }
    builder.body(Body::empty()).unwrap()
}

fn send_json(method: &str, uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_public_routes_need_no_token() {
    let app = TestApp::new().await;

    let (status, headers, body) = app.send(get("/health", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert!(headers.contains_key("x-request-id"));

    let (status, _, body) = app.send(get("/api/time-slots", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["slots"].as_array().unwrap().len(), 3);
    assert_eq!(body["next_available"]["category"], "lunch");

    let (status, _, body) = app.send(get("/api/time-slots/check/snacks", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["category"], "snack");
    assert_eq!(body["is_within_slot"], false);

    let (status, _, _) = app.send(get("/api/time-slots/check/dinner", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_protected_routes_reject_missing_or_bad_token() {
    let app = TestApp::new().await;

    let (status, _, body) = app.send(get("/api/orders", None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], 1001);

    let (status, _, _) = app.send(get("/api/orders", Some("not-a-jwt"))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_admin_routes_forbidden_for_users() {
    let app = TestApp::new().await;
    let user = app.token(7, "user");

    let (status, _, body) = app
        .send(get("/api/orders/daily-summary", Some(&user)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let admin = app.token(1, "admin");
    let (status, _, body) = app
        .send(get("/api/orders/daily-summary?date=2026-03-02", Some(&admin)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["date"], "2026-03-02");
}

#[tokio::test]
async fn test_order_flow_over_http() {
    let app = TestApp::new().await;
    let tea = menu_item::create(&app.state.pool, plain("Tea", 12.5), app.clock.now_millis())
        .await
        .unwrap();
    let user = app.token(7, "user");

    let (status, _, order) = app
        .send(send_json(
            "POST",
            "/api/orders",
            &user,
            json!({ "items": [{ "menu_item_id": tea.id, "quantity": 2 }] }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total_price"], 25.0);
    assert_eq!(order["user_id"], 7);
    let id = order["id"].as_i64().unwrap();

    let (status, _, fetched) = app
        .send(get(&format!("/api/orders/{id}"), Some(&user)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["items"][0]["name_at_order"], "Tea");

    // Another user cannot read it
    let other = app.token(8, "user");
    let (status, _, _) = app
        .send(get(&format!("/api/orders/{id}"), Some(&other)))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    app.clock.advance(Duration::seconds(61));
    let (status, _, body) = app
        .send(send_json(
            "POST",
            &format!("/api/orders/{id}/cancel"),
            &user,
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::GONE);
    assert_eq!(body["code"], 4004);
}

#[tokio::test]
async fn test_batch_rejection_details() {
    let app = TestApp::new().await;
    let user = app.token(7, "user");

    let (status, _, body) = app
        .send(send_json(
            "POST",
            "/api/orders",
            &user,
            json!({ "items": [
                { "menu_item_id": 404, "quantity": 1 },
                { "menu_item_id": 405, "quantity": 1 }
            ] }),
        ))
        .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], 4009);
    let rejections = body["details"]["rejections"].as_array().unwrap();
    assert_eq!(rejections.len(), 2);
    assert_eq!(rejections[0]["menu_item_id"], 404);
    assert!(rejections[0]["reason"].is_string());
}

#[tokio::test]
async fn test_scheduling_endpoints() {
    let app = TestApp::new().await;
    let user = app.token(7, "user");

    let (status, _, constraints) = app
        .send(get("/api/scheduled-orders/constraints", Some(&user)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(constraints["min_start_date"], "2026-03-02");
    assert_eq!(constraints["max_end_date"], "2026-12-31");

    let (status, _, body) = app
        .send(send_json(
            "POST",
            "/api/scheduled-orders/bulk-cancel",
            &user,
            json!({ "order_ids": [1] }),
        ))
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["code"], 2003);

    let (status, _, body) = app
        .send(get("/api/scheduled-orders", Some(&user)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn test_notifications_for_admin_placed_order() {
    let app = TestApp::new().await;
    let tea = menu_item::create(&app.state.pool, plain("Tea", 10.0), app.clock.now_millis())
        .await
        .unwrap();
    let admin = app.token(1, "admin");
    let user = app.token(7, "user");

    let (status, _, order) = app
        .send(send_json(
            "POST",
            "/api/orders",
            &admin,
            json!({ "items": [{ "menu_item_id": tea.id, "quantity": 1 }], "for_user_id": 7 }),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["created_by_admin"], 1);

    let (status, _, list) = app.send(get("/api/notifications", Some(&user))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list["unread_count"], 1);
    let notification_id = list["notifications"][0]["id"].as_i64().unwrap();
    assert_eq!(list["notifications"][0]["type"], "admin_order");

    let (status, _, _) = app
        .send(send_json(
            "POST",
            &format!("/api/notifications/{notification_id}/read"),
            &user,
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (_, _, list) = app.send(get("/api/notifications", Some(&user))).await;
    assert_eq!(list["unread_count"], 0);

    // Someone else's notification
    let other = app.token(8, "user");
    let (status, _, _) = app
        .send(send_json(
            "POST",
            &format!("/api/notifications/{notification_id}/read"),
            &other,
            json!({}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
