#![allow(dead_code)]

use axum::body::Body;
use axum::http::{header, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use invoicedash::{config::Config, create_app, db, seed, AppState};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use std::sync::Once;

// For initializing tracing once
static INIT: Once = Once::new();

/// Cheapest bcrypt cost, keeps seeding fast in tests.
pub const TEST_HASH_COST: u32 = 4;

pub const EVIL_RABBIT_ID: &str = "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa";
pub const DELBA_ID: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";

pub fn setup() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt::try_init();
    });
}

/// Fresh in-memory database with the schema applied and nothing else.
pub async fn empty_db() -> DatabaseConnection {
    setup();
    let conn = db::connect("sqlite::memory:").await.unwrap();
    db::migrate(&conn).await.unwrap();
    conn
}

/// Fresh in-memory database with the placeholder data loaded.
pub async fn seeded_db() -> DatabaseConnection {
    let conn = empty_db().await;
    seed::run(&conn, TEST_HASH_COST).await.unwrap();
    conn
}

pub fn app(db: DatabaseConnection) -> axum::Router {
    create_app(AppState::new(db, Config::default()))
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).method("GET").body(Body::empty()).unwrap()
}

pub fn form_post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn json_post(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .method("POST")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Drops the invoices table so every invoice query fails at the driver.
pub async fn break_invoices(db: &DatabaseConnection) {
    use sea_orm::ConnectionTrait;
    db.execute_unprepared("DROP TABLE invoices").await.unwrap();
}
