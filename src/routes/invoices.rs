use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Redirect,
    Form, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::actions::{self, FormState, InvoiceFormData, INVOICES_PATH};
use crate::data::{self, InvoiceForm, InvoiceRow};
use crate::error::AppError;
use crate::format::{generate_pagination, PageItem};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct InvoiceListQuery {
    /// Free-text filter: customer name/email or status substring, or an exact amount in cents
    #[serde(default)]
    #[param(required = false)]
    query: String,
    /// 1-based page number. Defaults to 1.
    #[serde(default = "default_page")]
    #[param(required = false)]
    page: u64,
}

fn default_page() -> u64 {
    1
}

#[derive(Debug, Serialize, ToSchema)]
pub struct InvoicePages {
    /// ceil(matching invoices / 6)
    pub total_pages: u64,
    /// Page links for the requested page: numbers and `"..."` gaps
    #[schema(value_type = Vec<Object>)]
    pub pages: Vec<PageItem>,
}

/// One page of invoices matching the query, newest first
#[utoipa::path(
    get,
    path = "/invoices",
    params(InvoiceListQuery),
    responses(
        (status = 200, description = "Up to 6 invoices", body = [InvoiceRow]),
        (status = 500, description = "Failed to fetch invoices.")
    )
)]
pub async fn list_invoices(
    Query(params): Query<InvoiceListQuery>,
    State(state): State<AppState>,
) -> Result<Json<Vec<InvoiceRow>>, AppError> {
    let rows = data::fetch_filtered_invoices(&state.db, &params.query, params.page).await?;
    Ok(Json(rows))
}

/// Page count for the query, plus pagination links around `page`
#[utoipa::path(
    get,
    path = "/invoices/pages",
    params(InvoiceListQuery),
    responses(
        (status = 200, description = "Total pages", body = InvoicePages),
        (status = 500, description = "Failed to fetch total number of invoices.")
    )
)]
pub async fn invoice_pages(
    Query(params): Query<InvoiceListQuery>,
    State(state): State<AppState>,
) -> Result<Json<InvoicePages>, AppError> {
    let total_pages = data::fetch_invoices_pages(&state.db, &params.query).await?;
    let pages = generate_pagination(params.page.max(1), total_pages);
    Ok(Json(InvoicePages { total_pages, pages }))
}

/// A single invoice for the edit form (amount in dollars)
#[utoipa::path(
    get,
    path = "/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 200, description = "Invoice found", body = InvoiceForm),
        (status = 404, description = "No such invoice")
    )
)]
pub async fn get_invoice(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<InvoiceForm>, AppError> {
    data::fetch_invoice_by_id(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("invoice {}", id)))
}

/// Create an invoice from a form submission
#[utoipa::path(
    post,
    path = "/invoices",
    request_body(content = InvoiceFormData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Created, redirect to the invoice list"),
        (status = 422, description = "Validation failed", body = FormState),
        (status = 500, description = "Database Error: Failed to Create Invoice.")
    )
)]
pub async fn create_invoice(
    State(state): State<AppState>,
    Form(form): Form<InvoiceFormData>,
) -> Result<Redirect, AppError> {
    actions::create_invoice(&state.db, &form).await?;
    Ok(Redirect::to(INVOICES_PATH))
}

/// Update an invoice from a form submission
#[utoipa::path(
    post,
    path = "/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    request_body(content = InvoiceFormData, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Updated, redirect to the invoice list"),
        (status = 404, description = "No such invoice"),
        (status = 422, description = "Validation failed", body = FormState),
        (status = 500, description = "Database Error: Failed to Update Invoice.")
    )
)]
pub async fn update_invoice(
    Path(id): Path<String>,
    State(state): State<AppState>,
    Form(form): Form<InvoiceFormData>,
) -> Result<Redirect, AppError> {
    actions::update_invoice(&state.db, &id, &form).await?;
    Ok(Redirect::to(INVOICES_PATH))
}

/// Delete an invoice
#[utoipa::path(
    delete,
    path = "/invoices/{id}",
    params(("id" = String, Path, description = "Invoice id")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 404, description = "No such invoice"),
        (status = 500, description = "Database Error: Failed to Delete Invoice.")
    )
)]
pub async fn delete_invoice(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    actions::delete_invoice(&state.db, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}
