use axum::{
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use std::time::Duration;
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::SmartIpKeyExtractor,
    GovernorLayer,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub mod actions;
pub mod auth;
pub mod config;
pub mod data;
pub mod db;
pub mod entities;
pub mod error;
pub mod format;
pub mod routes;
pub mod seed;

use config::Config;

/// Shared handler state: the connection pool and the loaded configuration.
#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    )
)]
async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "Service is healthy")
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Invoice Dashboard API",
        version = "0.1.0",
    ),
    paths(
        health_check,
        routes::dashboard::revenue,
        routes::dashboard::latest_invoices,
        routes::dashboard::cards,
        routes::invoices::list_invoices,
        routes::invoices::invoice_pages,
        routes::invoices::get_invoice,
        routes::invoices::create_invoice,
        routes::invoices::update_invoice,
        routes::invoices::delete_invoice,
        routes::customers::list_customers,
        routes::customers::customer_table,
        routes::auth::login,
    ),
    components(schemas(
        entities::InvoiceStatus,
        data::RevenueEntry,
        data::LatestInvoice,
        data::CardData,
        data::InvoiceRow,
        data::InvoiceForm,
        data::CustomerField,
        data::CustomerRow,
        actions::InvoiceFormData,
        actions::FieldErrors,
        actions::FormState,
        auth::Credentials,
        auth::UserSummary,
        routes::dashboard::RevenueChart,
        routes::invoices::InvoiceListQuery,
        routes::invoices::InvoicePages,
        routes::customers::CustomerQuery,
    ))
)]
struct ApiDoc;

/// Create the application with all routes and middleware
pub fn create_app(state: AppState) -> Router {
    let api_doc = ApiDoc::openapi();
    let rate_limit = state.config.rate_limit;

    let api_routes = Router::new()
        .route("/health", get(health_check))
        .route("/dashboard/revenue", get(routes::dashboard::revenue))
        .route("/dashboard/latest-invoices", get(routes::dashboard::latest_invoices))
        .route("/dashboard/cards", get(routes::dashboard::cards))
        .route(
            "/invoices",
            get(routes::invoices::list_invoices).post(routes::invoices::create_invoice),
        )
        .route("/invoices/pages", get(routes::invoices::invoice_pages))
        .route(
            "/invoices/{id}",
            get(routes::invoices::get_invoice)
                .post(routes::invoices::update_invoice)
                .delete(routes::invoices::delete_invoice),
        )
        .route("/customers", get(routes::customers::list_customers))
        .route("/customers/table", get(routes::customers::customer_table))
        .route("/auth/login", post(routes::auth::login))
        .with_state(state);

    // Rate limit the API only; the docs stay reachable.
    let api_routes = match rate_limit {
        Some(limit) => {
            let governor_conf = GovernorConfigBuilder::default()
                .key_extractor(SmartIpKeyExtractor)
                .period(Duration::from_secs(limit.period_secs))
                .burst_size(limit.burst)
                .finish();
            match governor_conf {
                Some(conf) => api_routes.layer(GovernorLayer {
                    config: Arc::new(conf),
                }),
                None => {
                    tracing::warn!(?limit, "invalid rate limit settings, rate limiting disabled");
                    api_routes
                }
            }
        }
        None => api_routes,
    };

    let docs_router = SwaggerUi::new("/docs").url("/api-doc/openapi.json", api_doc);

    Router::new()
        .merge(api_routes)
        .merge(docs_router)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
}
