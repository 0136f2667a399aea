//! Read queries backing the dashboard, invoice and customer screens.
//!
//! Every function logs the underlying database error and returns a generic
//! `AppError::FetchFailed` so callers never see driver details.

use chrono::NaiveDate;
use sea_orm::sea_query::extension::postgres::PgExpr;
use sea_orm::sea_query::{Expr, IntoColumnRef, LikeExpr, SimpleExpr};
use sea_orm::{
    ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait,
    FromQueryResult, JoinType, LoaderTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::entities::{customer, invoice, revenue, InvoiceStatus};
use crate::error::AppError;
use crate::format::{format_currency, parse_leading_int};

pub const ITEMS_PER_PAGE: u64 = 6;
const LATEST_INVOICES: u64 = 5;
const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct RevenueEntry {
    pub month: String,
    pub revenue: i32,
}

impl From<revenue::Model> for RevenueEntry {
    fn from(model: revenue::Model) -> Self {
        Self {
            month: model.month,
            revenue: model.revenue,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LatestInvoice {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    /// Formatted currency, e.g. `$1,234.56`
    pub amount: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardData {
    pub number_of_invoices: u64,
    pub number_of_customers: u64,
    pub total_paid_invoices: String,
    pub total_pending_invoices: String,
}

/// One row of the invoices table, joined with its customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct InvoiceRow {
    pub id: String,
    pub customer_id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub date: NaiveDate,
    /// Cents
    pub amount: i32,
    pub status: InvoiceStatus,
}

/// An invoice as the edit form shows it, amount in dollars.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct InvoiceForm {
    pub id: String,
    pub customer_id: String,
    pub amount: f64,
    pub status: InvoiceStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema, FromQueryResult)]
pub struct CustomerField {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct CustomerRow {
    pub id: String,
    pub name: String,
    pub email: String,
    pub image_url: String,
    pub total_invoices: u64,
    pub total_pending: String,
    pub total_paid: String,
}

fn fetch_failed(message: &str) -> impl FnOnce(DbErr) -> AppError + '_ {
    move |err| {
        tracing::error!(error = %err, "Database Error");
        AppError::FetchFailed(message.to_string())
    }
}

/// `%query%` with LIKE wildcards in the query matched literally.
fn contains_pattern(query: &str) -> String {
    let mut pattern = String::with_capacity(query.len() + 2);
    pattern.push('%');
    for ch in query.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Case-insensitive substring match against one column.
///
/// Postgres gets `ILIKE`. SQLite's `LIKE` already folds ASCII case, and its
/// `lower()` leaves non-ASCII text alone, so the pattern is compared as typed.
struct Search {
    backend: DbBackend,
    pattern: String,
}

impl Search {
    fn new(backend: DbBackend, query: &str) -> Self {
        Self {
            backend,
            pattern: contains_pattern(query),
        }
    }

    fn matches<C: IntoColumnRef>(&self, column: C) -> SimpleExpr {
        let like = LikeExpr::new(self.pattern.as_str()).escape('\\');
        match self.backend {
            DbBackend::Postgres => Expr::col(column).ilike(like),
            _ => Expr::col(column).like(like),
        }
    }
}

/// Case-insensitive substring match on customer name, email and invoice status,
/// or an exact match on the amount when the query starts with a non-zero integer.
fn invoice_search(backend: DbBackend, query: &str) -> Condition {
    let search = Search::new(backend, query);
    let mut condition = Condition::any()
        .add(search.matches((customer::Entity, customer::Column::Name)))
        .add(search.matches((customer::Entity, customer::Column::Email)))
        .add(search.matches((invoice::Entity, invoice::Column::Status)));

    if let Some(amount) = parse_leading_int(query)
        .filter(|n| *n != 0)
        .and_then(|n| i32::try_from(n).ok())
    {
        condition = condition.add(invoice::Column::Amount.eq(amount));
    }

    condition
}

fn month_rank(month: &str) -> usize {
    MONTHS
        .iter()
        .position(|m| m.eq_ignore_ascii_case(month))
        .unwrap_or(MONTHS.len())
}

/// All revenue rows, in calendar order for `Jan`..`Dec` keys.
#[tracing::instrument(skip(db))]
pub async fn fetch_revenue(db: &DatabaseConnection) -> Result<Vec<RevenueEntry>, AppError> {
    let mut rows = revenue::Entity::find()
        .order_by_asc(revenue::Column::Month)
        .all(db)
        .await
        .map_err(fetch_failed("Failed to fetch revenue data."))?;

    rows.sort_by_key(|row| month_rank(&row.month));
    Ok(rows.into_iter().map(RevenueEntry::from).collect())
}

#[tracing::instrument(skip(db))]
pub async fn fetch_latest_invoices(db: &DatabaseConnection) -> Result<Vec<LatestInvoice>, AppError> {
    let rows = invoice::Entity::find()
        .find_also_related(customer::Entity)
        .order_by_desc(invoice::Column::Date)
        .order_by_asc(invoice::Column::Id)
        .limit(LATEST_INVOICES)
        .all(db)
        .await
        .map_err(fetch_failed("Failed to fetch the latest invoices."))?;

    Ok(rows
        .into_iter()
        .filter_map(|(invoice, customer)| {
            let customer = customer?;
            Some(LatestInvoice {
                id: invoice.id,
                name: customer.name,
                email: customer.email,
                image_url: customer.image_url,
                amount: format_currency(invoice.amount as i64),
            })
        })
        .collect())
}

async fn sum_by_status(db: &DatabaseConnection, status: InvoiceStatus) -> Result<i64, DbErr> {
    let total = invoice::Entity::find()
        .select_only()
        .column_as(invoice::Column::Amount.sum(), "total")
        .filter(invoice::Column::Status.eq(status))
        .into_tuple::<Option<i64>>()
        .one(db)
        .await?;

    Ok(total.flatten().unwrap_or(0))
}

/// Counts and paid/pending totals for the dashboard cards. The four queries run
/// concurrently.
#[tracing::instrument(skip(db))]
pub async fn fetch_card_data(db: &DatabaseConnection) -> Result<CardData, AppError> {
    let (invoice_count, customer_count, paid, pending) = futures::try_join!(
        invoice::Entity::find().count(db),
        customer::Entity::find().count(db),
        sum_by_status(db, InvoiceStatus::Paid),
        sum_by_status(db, InvoiceStatus::Pending),
    )
    .map_err(fetch_failed("Failed to fetch card data."))?;

    Ok(CardData {
        number_of_invoices: invoice_count,
        number_of_customers: customer_count,
        total_paid_invoices: format_currency(paid),
        total_pending_invoices: format_currency(pending),
    })
}

/// One page (1-based, clamped to at least 1) of invoices matching `query`,
/// newest first.
#[tracing::instrument(skip(db))]
pub async fn fetch_filtered_invoices(
    db: &DatabaseConnection,
    query: &str,
    current_page: u64,
) -> Result<Vec<InvoiceRow>, AppError> {
    let offset = (current_page.max(1) - 1) * ITEMS_PER_PAGE;

    let rows = invoice::Entity::find()
        .find_also_related(customer::Entity)
        .filter(invoice_search(db.get_database_backend(), query))
        .order_by_desc(invoice::Column::Date)
        .order_by_asc(invoice::Column::Id)
        .offset(offset)
        .limit(ITEMS_PER_PAGE)
        .all(db)
        .await
        .map_err(fetch_failed("Failed to fetch invoices."))?;

    Ok(rows
        .into_iter()
        .filter_map(|(invoice, customer)| {
            let customer = customer?;
            Some(InvoiceRow {
                id: invoice.id,
                customer_id: invoice.customer_id,
                name: customer.name,
                email: customer.email,
                image_url: customer.image_url,
                date: invoice.date,
                amount: invoice.amount,
                status: invoice.status,
            })
        })
        .collect())
}

/// Number of pages of invoices matching `query`.
#[tracing::instrument(skip(db))]
pub async fn fetch_invoices_pages(db: &DatabaseConnection, query: &str) -> Result<u64, AppError> {
    let count = invoice::Entity::find()
        .join(JoinType::LeftJoin, invoice::Relation::Customer.def())
        .filter(invoice_search(db.get_database_backend(), query))
        .count(db)
        .await
        .map_err(fetch_failed("Failed to fetch total number of invoices."))?;

    Ok(count.div_ceil(ITEMS_PER_PAGE))
}

#[tracing::instrument(skip(db))]
pub async fn fetch_invoice_by_id(
    db: &DatabaseConnection,
    id: &str,
) -> Result<Option<InvoiceForm>, AppError> {
    let invoice = invoice::Entity::find_by_id(id.to_owned())
        .one(db)
        .await
        .map_err(fetch_failed("Failed to fetch invoice."))?;

    Ok(invoice.map(|invoice| InvoiceForm {
        id: invoice.id,
        customer_id: invoice.customer_id,
        amount: invoice.amount as f64 / 100.0,
        status: invoice.status,
    }))
}

/// Id and name of every customer, alphabetically. Feeds the invoice form's
/// customer picker.
#[tracing::instrument(skip(db))]
pub async fn fetch_customers(db: &DatabaseConnection) -> Result<Vec<CustomerField>, AppError> {
    customer::Entity::find()
        .select_only()
        .columns([customer::Column::Id, customer::Column::Name])
        .order_by_asc(customer::Column::Name)
        .into_model::<CustomerField>()
        .all(db)
        .await
        .map_err(fetch_failed("Failed to fetch all customers."))
}

#[tracing::instrument(skip(db))]
pub async fn fetch_filtered_customers(
    db: &DatabaseConnection,
    query: &str,
) -> Result<Vec<CustomerRow>, AppError> {
    let search = Search::new(db.get_database_backend(), query);

    let customers = customer::Entity::find()
        .filter(
            Condition::any()
                .add(search.matches((customer::Entity, customer::Column::Name)))
                .add(search.matches((customer::Entity, customer::Column::Email))),
        )
        .order_by_asc(customer::Column::Name)
        .all(db)
        .await
        .map_err(fetch_failed("Failed to fetch customer table."))?;

    let invoices = customers
        .load_many(invoice::Entity, db)
        .await
        .map_err(fetch_failed("Failed to fetch customer table."))?;

    Ok(customers
        .into_iter()
        .zip(invoices)
        .map(|(customer, invoices)| {
            let total_for = |status: InvoiceStatus| -> i64 {
                invoices
                    .iter()
                    .filter(|invoice| invoice.status == status)
                    .map(|invoice| invoice.amount as i64)
                    .sum()
            };

            CustomerRow {
                total_invoices: invoices.len() as u64,
                total_pending: format_currency(total_for(InvoiceStatus::Pending)),
                total_paid: format_currency(total_for(InvoiceStatus::Paid)),
                id: customer.id,
                name: customer.name,
                email: customer.email,
                image_url: customer.image_url,
            }
        })
        .collect())
}
