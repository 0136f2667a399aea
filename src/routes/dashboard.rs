use axum::{extract::State, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::data::{self, CardData, LatestInvoice, RevenueEntry};
use crate::error::AppError;
use crate::format::generate_y_axis;
use crate::AppState;

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueChart {
    /// Monthly revenue, calendar order
    pub revenue: Vec<RevenueEntry>,
    /// Y axis labels from the top value down to `$0K`
    pub y_axis_labels: Vec<String>,
    /// Rounded-up maximum, in whole dollars
    pub top_label: i64,
}

/// Monthly revenue with the chart's y axis
#[utoipa::path(
    get,
    path = "/dashboard/revenue",
    responses(
        (status = 200, description = "Revenue per month", body = RevenueChart),
        (status = 500, description = "Failed to fetch revenue data.")
    )
)]
pub async fn revenue(State(state): State<AppState>) -> Result<Json<RevenueChart>, AppError> {
    let revenue = data::fetch_revenue(&state.db).await?;
    let values: Vec<i32> = revenue.iter().map(|entry| entry.revenue).collect();
    let (y_axis_labels, top_label) = generate_y_axis(&values);

    Ok(Json(RevenueChart {
        revenue,
        y_axis_labels,
        top_label,
    }))
}

/// The five most recent invoices
#[utoipa::path(
    get,
    path = "/dashboard/latest-invoices",
    responses(
        (status = 200, description = "Latest invoices, newest first", body = [LatestInvoice]),
        (status = 500, description = "Failed to fetch the latest invoices.")
    )
)]
pub async fn latest_invoices(
    State(state): State<AppState>,
) -> Result<Json<Vec<LatestInvoice>>, AppError> {
    Ok(Json(data::fetch_latest_invoices(&state.db).await?))
}

/// Summary cards: counts and paid/pending totals
#[utoipa::path(
    get,
    path = "/dashboard/cards",
    responses(
        (status = 200, description = "Card figures", body = CardData),
        (status = 500, description = "Failed to fetch card data.")
    )
)]
pub async fn cards(State(state): State<AppState>) -> Result<Json<CardData>, AppError> {
    Ok(Json(data::fetch_card_data(&state.db).await?))
}
