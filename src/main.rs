use anyhow::Context;
use invoicedash::{config::Config, create_app, db, AppState};
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) so DATABASE_URL from file is visible
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    let config = Config::from_env()?;
    let db_conn = db::connect(&config.database_url)
        .await
        .context("failed to connect to database")?;
    db::migrate(&db_conn)
        .await
        .context("failed to run migrations")?;

    let bind_addr = config.bind_addr;
    let app = create_app(AppState::new(db_conn, config));

    let listener = tokio::net::TcpListener::bind(bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!("Server running on http://{}", bind_addr);

    // Connect info feeds the per-IP rate limiter
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
