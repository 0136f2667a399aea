use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::data::{self, CustomerField, CustomerRow};
use crate::error::AppError;
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// Case-insensitive substring of the customer name or email
    #[serde(default)]
    #[param(required = false)]
    query: String,
}

/// All customers (id and name), alphabetically
#[utoipa::path(
    get,
    path = "/customers",
    responses(
        (status = 200, description = "Customers for the invoice form", body = [CustomerField]),
        (status = 500, description = "Failed to fetch all customers.")
    )
)]
pub async fn list_customers(
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerField>>, AppError> {
    Ok(Json(data::fetch_customers(&state.db).await?))
}

/// Customers matching `query`, with invoice totals
#[utoipa::path(
    get,
    path = "/customers/table",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Customer table rows", body = [CustomerRow]),
        (status = 500, description = "Failed to fetch customer table.")
    )
)]
pub async fn customer_table(
    Query(query): Query<CustomerQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<CustomerRow>>, AppError> {
    Ok(Json(data::fetch_filtered_customers(&state.db, &query.query).await?))
}
