use invoicedash::{config::Config, db, seed};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info,sqlx=warn")),
        )
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "Seeding failed");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> anyhow::Result<()> {
    let config = Config::from_env()?;
    let conn = db::connect(&config.database_url).await?;
    db::migrate(&conn).await?;

    let report = seed::run(&conn, seed::SEED_HASH_COST).await?;
    info!(
        users = report.users,
        customers = report.customers,
        invoices = report.invoices,
        revenue = report.revenue,
        "seed finished"
    );

    conn.close().await?;
    Ok(())
}
