use axum::Router;
use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;

use campus_core::middleware::REQUEST_ID_HEADER;
use campus_domain::id::SessionToken;
use campus_testing::auth::{body_json, request};

use campus_market::router::build_router;
use campus_market::state::AppState;

use crate::helpers::{ADMIN_PASSWORD, ADMIN_USERNAME, PASSWORD, state_with_admin};

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&SessionToken>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let resp = app
        .clone()
        .oneshot(request(method, uri, token, body))
        .await
        .unwrap();
    let status = resp.status();
    (status, body_json(resp.into_body()).await)
}

async fn sign_up(app: &Router, username: &str) -> SessionToken {
    let (status, _) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": username,
            "password": PASSWORD,
            "email": format!("{username}@campus.com"),
            "campus": "东校区",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    log_in(app, username, PASSWORD).await
}

async fn log_in(app: &Router, username: &str, password: &str) -> SessionToken {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login failed: {body}");
    body["token"].as_str().unwrap().parse().unwrap()
}

async fn publish(app: &Router, token: &SessionToken, title: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/products",
        Some(token),
        Some(json!({
            "title": title,
            "description": "几乎全新",
            "price": 88.0,
            "category": "electronics",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "publish failed: {body}");
    body["product_id"].as_str().unwrap().to_owned()
}

// ── Health / meta ────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_answer_health_checks_and_tag_request_ids() {
    let app = build_router(AppState::in_memory());
    let resp = app
        .clone()
        .oneshot(request(Method::GET, "/healthz", None, None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));

    let (status, _) = send(&app, Method::GET, "/readyz", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, meta) = send(&app, Method::GET, "/meta", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(meta["categories"].as_array().unwrap().len(), 6);
}

// ── Auth ─────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_register_without_exposing_password() {
    let app = build_router(AppState::in_memory());
    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({
            "username": "alice",
            "password": PASSWORD,
            "email": "alice@campus.com",
            "campus": "东校区",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["username"], "alice");
    assert_eq!(body["user_type"], "student");
    assert_eq!(body["user_type_label"], "学生");
    assert_eq!(body["credit_score"], 100);
    assert!(body.get("password").is_none());
}

#[tokio::test]
async fn should_map_registration_failures_to_status_codes() {
    let app = build_router(AppState::in_memory());
    sign_up(&app, "alice").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": "ab", "password": "x", "email": "y", "campus": "东校区" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_USERNAME");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": "alice", "password": PASSWORD, "email": "new@campus.com", "campus": "东校区" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "DUPLICATE_IDENTITY");

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "username": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "MISSING_FIELDS");
}

#[tokio::test]
async fn should_return_same_body_for_every_login_failure() {
    let app = build_router(AppState::in_memory());
    sign_up(&app, "alice").await;

    let (s1, unknown) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "nobody", "password": PASSWORD })),
    )
    .await;
    let (s2, wrong) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "wrong99" })),
    )
    .await;
    assert_eq!(s1, StatusCode::UNAUTHORIZED);
    assert_eq!(s2, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown, wrong);
}

#[tokio::test]
async fn should_end_session_on_logout() {
    let app = build_router(AppState::in_memory());
    let token = sign_up(&app, "alice").await;

    let (status, me) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["username"], "alice");

    let (status, _) = send(&app, Method::POST, "/auth/logout", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::POST, "/auth/logout", None, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(&app, Method::GET, "/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["kind"], "UNAUTHORIZED");
    let (status, _) = send(&app, Method::GET, "/auth/me", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ── Products ─────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_moderate_before_listing_shows_up() {
    let app = build_router(state_with_admin());
    let admin = log_in(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let alice = sign_up(&app, "alice").await;

    let (status, _) = send(&app, Method::POST, "/products", None, Some(json!({}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let id = publish(&app, &alice, "蓝牙音箱").await;
    let (_, listed) = send(&app, Method::GET, "/products", None, None).await;
    assert_eq!(listed, json!([]));

    let (status, _) = send(&app, Method::GET, "/products/pending", Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, pending) = send(&app, Method::GET, "/products/pending", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending[0]["status"], "待审核");

    let approve = format!("/products/{id}/approve");
    let (status, _) = send(&app, Method::POST, &approve, Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::POST, &approve, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, Method::POST, "/products/999/approve", Some(&admin), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let uri = "/products?keyword=%E9%9F%B3%E7%AE%B1&category=%E7%94%B5%E5%AD%90%E6%95%B0%E7%A0%81&max-price=100";
    let (status, found) = send(&app, Method::GET, uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(found.as_array().unwrap().len(), 1);
    assert_eq!(found[0]["product_id"], id.as_str());
    assert_eq!(found[0]["seller_name"], "alice");
    assert_eq!(found[0]["category"], "电子数码");
    assert_eq!(found[0]["condition"], "九成新");
    assert_eq!(found[0]["campus"], "东校区");

    let (_, cheaper) = send(&app, Method::GET, "/products?max-price=50", None, None).await;
    assert_eq!(cheaper, json!([]));
}

#[tokio::test]
async fn should_reject_unknown_category_on_publish() {
    let app = build_router(AppState::in_memory());
    let alice = sign_up(&app, "alice").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/products",
        Some(&alice),
        Some(json!({ "title": "桌子", "description": "木", "price": 10.0, "category": "furniture" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "UNKNOWN_CATEGORY");
}

#[tokio::test]
async fn should_hide_unpublished_listing_from_strangers() {
    let app = build_router(state_with_admin());
    let admin = log_in(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let id = publish(&app, &alice, "平板").await;
    let uri = format!("/products/{id}");

    let (status, _) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::GET, &uri, Some(&bob), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, own) = send(&app, Method::GET, &uri, Some(&alice), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(own["view_count"], 1);
    let (status, moderated) = send(&app, Method::GET, &uri, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moderated["view_count"], 2);
}

#[tokio::test]
async fn should_let_only_seller_or_admin_close_a_listing() {
    let app = build_router(state_with_admin());
    let admin = log_in(&app, ADMIN_USERNAME, ADMIN_PASSWORD).await;
    let alice = sign_up(&app, "alice").await;
    let bob = sign_up(&app, "bob").await;
    let sold = publish(&app, &alice, "显示器").await;
    let removed = publish(&app, &alice, "键盘").await;
    for id in [&sold, &removed] {
        let uri = format!("/products/{id}/approve");
        send(&app, Method::POST, &uri, Some(&admin), None).await;
    }

    let sell = format!("/products/{sold}/sold");
    let (status, _) = send(&app, Method::POST, &sell, Some(&bob), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = send(&app, Method::POST, &sell, Some(&alice), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, body) = send(&app, Method::POST, &sell, Some(&alice), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["kind"], "INVALID_TRANSITION");

    let take_down = format!("/products/{removed}/remove");
    let (status, _) = send(&app, Method::POST, &take_down, Some(&admin), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::POST, "/products/404/sold", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = send(&app, Method::GET, "/products", None, None).await;
    assert_eq!(listed, json!([]));
}

#[tokio::test]
async fn should_list_a_sellers_products_in_every_status() {
    let app = build_router(state_with_admin());
    let alice = sign_up(&app, "alice").await;
    publish(&app, &alice, "台灯").await;
    publish(&app, &alice, "风扇").await;

    let (_, me) = send(&app, Method::GET, "/auth/me", Some(&alice), None).await;
    let uri = format!("/sellers/{}/products", me["user_id"].as_str().unwrap());
    let (status, listed) = send(&app, Method::GET, &uri, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 2);

    let (_, none) = send(&app, Method::GET, "/sellers/77/products", None, None).await;
    assert_eq!(none, json!([]));
}

#[tokio::test]
async fn should_reject_malformed_search_query() {
    let app = build_router(AppState::in_memory());
    let (status, body) = send(&app, Method::GET, "/products?max-price=cheap", None, None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["kind"], "INVALID_QUERY");
}
