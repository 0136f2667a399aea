//! Form-validated invoice mutations.
//!
//! Submissions arrive as loosely typed form fields, are coerced into an
//! [`InvoiceInput`] and checked with `validator`. Validation problems come back
//! as [`AppError::Validation`] carrying field-level messages; database failures
//! are logged and propagated.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::entities::{customer, invoice, InvoiceStatus};
use crate::error::AppError;

/// Where the client lands after a successful create or update.
pub const INVOICES_PATH: &str = "/dashboard/invoices";

const CUSTOMER_MESSAGE: &str = "Please select a customer.";
const AMOUNT_MESSAGE: &str = "Please enter an amount greater than $0.";
const AMOUNT_TOO_LARGE_MESSAGE: &str = "Please enter a smaller amount.";

/// Raw invoice form fields, exactly as submitted.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceFormData {
    pub customer_id: Option<String>,
    pub amount: Option<String>,
    pub status: Option<String>,
}

/// Invoice form fields after coercion, ready for validation.
#[derive(Debug, Clone, PartialEq, Validate)]
pub struct InvoiceInput {
    #[validate(length(min = 1, message = "Please select a customer."))]
    pub customer_id: String,
    #[validate(range(exclusive_min = 0.0, message = "Please enter an amount greater than $0."))]
    pub amount: f64,
    #[validate(required(message = "Please select an invoice status."))]
    pub status: Option<InvoiceStatus>,
}

impl From<&InvoiceFormData> for InvoiceInput {
    /// Missing or blank amounts coerce to 0 and anything non-numeric is
    /// treated the same way, so both fail the "greater than $0" rule.
    fn from(form: &InvoiceFormData) -> Self {
        let amount = form
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .and_then(|s| s.parse::<f64>().ok())
            .filter(|n| n.is_finite())
            .unwrap_or(0.0);

        Self {
            customer_id: form.customer_id.clone().unwrap_or_default(),
            amount,
            status: form.status.as_deref().and_then(InvoiceStatus::parse),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FieldErrors {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub customer_id: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub amount: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub status: Vec<String>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.customer_id.is_empty() && self.amount.is_empty() && self.status.is_empty()
    }
}

impl From<&ValidationErrors> for FieldErrors {
    fn from(errors: &ValidationErrors) -> Self {
        let mut fields = FieldErrors::default();
        for (field, errs) in errors.field_errors() {
            let messages = errs
                .iter()
                .map(|e| {
                    e.message
                        .as_ref()
                        .map(|m| m.to_string())
                        .unwrap_or_else(|| e.code.to_string())
                })
                .collect::<Vec<_>>();
            match &*field {
                "customer_id" => fields.customer_id.extend(messages),
                "amount" => fields.amount.extend(messages),
                "status" => fields.status.extend(messages),
                _ => {}
            }
        }
        fields
    }
}

/// Outcome of a rejected form submission.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct FormState {
    pub errors: FieldErrors,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Copy)]
enum Action {
    Create,
    Update,
}

impl Action {
    fn verb(self) -> &'static str {
        match self {
            Action::Create => "Create",
            Action::Update => "Update",
        }
    }

    fn rejected(self, errors: FieldErrors) -> AppError {
        AppError::Validation(FormState {
            errors,
            message: Some(format!("Missing Fields. Failed to {} Invoice.", self.verb())),
        })
    }
}

/// A validated submission: amount already converted to cents.
#[derive(Debug, Clone, PartialEq, Eq)]
struct ValidInvoice {
    customer_id: String,
    amount_cents: i32,
    status: InvoiceStatus,
}

/// Dollars to integer cents, `None` when it does not fit the column.
pub fn to_cents(amount: f64) -> Option<i32> {
    let cents = (amount * 100.0).round();
    if cents.is_finite() && cents >= i32::MIN as f64 && cents <= i32::MAX as f64 {
        Some(cents as i32)
    } else {
        None
    }
}

fn write_failed(action: Action) -> impl FnOnce(sea_orm::DbErr) -> AppError {
    move |err| {
        tracing::error!(error = %err, action = action.verb(), "Database Error");
        AppError::DatabaseError(format!("Failed to {} Invoice.", action.verb()))
    }
}

async fn validate(
    db: &DatabaseConnection,
    form: &InvoiceFormData,
    action: Action,
) -> Result<ValidInvoice, AppError> {
    let input = InvoiceInput::from(form);

    let mut errors = match input.validate() {
        Ok(()) => FieldErrors::default(),
        Err(e) => FieldErrors::from(&e),
    };

    // positive dollars can still round down to zero cents
    let amount_cents = to_cents(input.amount);
    if errors.amount.is_empty() {
        match amount_cents {
            None => errors.amount.push(AMOUNT_TOO_LARGE_MESSAGE.to_string()),
            Some(cents) if cents <= 0 => errors.amount.push(AMOUNT_MESSAGE.to_string()),
            Some(_) => {}
        }
    }

    if errors.customer_id.is_empty() {
        let exists = customer::Entity::find_by_id(input.customer_id.clone())
            .one(db)
            .await
            .map_err(write_failed(action))?
            .is_some();
        if !exists {
            errors.customer_id.push(CUSTOMER_MESSAGE.to_string());
        }
    }

    match (errors.is_empty(), amount_cents, input.status) {
        (true, Some(amount_cents), Some(status)) => Ok(ValidInvoice {
            customer_id: input.customer_id,
            amount_cents,
            status,
        }),
        _ => {
            tracing::info!(action = action.verb(), ?errors, "invoice form rejected");
            Err(action.rejected(errors))
        }
    }
}

/// Validates the form and inserts a new invoice dated today (UTC).
#[tracing::instrument(skip(db, form))]
pub async fn create_invoice(
    db: &DatabaseConnection,
    form: &InvoiceFormData,
) -> Result<invoice::Model, AppError> {
    let valid = validate(db, form, Action::Create).await?;

    let created = invoice::ActiveModel {
        id: Set(Uuid::new_v4().to_string()),
        customer_id: Set(valid.customer_id),
        amount: Set(valid.amount_cents),
        status: Set(valid.status),
        date: Set(Utc::now().date_naive()),
    }
    .insert(db)
    .await
    .map_err(write_failed(Action::Create))?;

    tracing::info!(invoice_id = %created.id, amount = created.amount, "invoice created");
    Ok(created)
}

/// Validates the form and overwrites customer, amount and status of invoice `id`.
/// The date is left untouched.
#[tracing::instrument(skip(db, form))]
pub async fn update_invoice(
    db: &DatabaseConnection,
    id: &str,
    form: &InvoiceFormData,
) -> Result<invoice::Model, AppError> {
    let valid = validate(db, form, Action::Update).await?;

    let existing = invoice::Entity::find_by_id(id.to_owned())
        .one(db)
        .await
        .map_err(write_failed(Action::Update))?
        .ok_or_else(|| AppError::NotFound(format!("invoice {}", id)))?;

    let mut active: invoice::ActiveModel = existing.into();
    active.customer_id = Set(valid.customer_id);
    active.amount = Set(valid.amount_cents);
    active.status = Set(valid.status);

    let updated = active
        .update(db)
        .await
        .map_err(write_failed(Action::Update))?;

    tracing::info!(invoice_id = %updated.id, amount = updated.amount, "invoice updated");
    Ok(updated)
}

#[tracing::instrument(skip(db))]
pub async fn delete_invoice(db: &DatabaseConnection, id: &str) -> Result<(), AppError> {
    let result = invoice::Entity::delete_by_id(id.to_owned())
        .exec(db)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "Database Error");
            AppError::DatabaseError("Failed to Delete Invoice.".to_string())
        })?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound(format!("invoice {}", id)));
    }

    tracing::info!(invoice_id = %id, "invoice deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATUS_MESSAGE: &str = "Please select an invoice status.";

    fn form(customer_id: Option<&str>, amount: Option<&str>, status: Option<&str>) -> InvoiceFormData {
        InvoiceFormData {
            customer_id: customer_id.map(String::from),
            amount: amount.map(String::from),
            status: status.map(String::from),
        }
    }

    #[test]
    fn test_coercion() {
        let input = InvoiceInput::from(&form(Some("c1"), Some(" 12.34 "), Some("paid")));
        assert_eq!(input.customer_id, "c1");
        assert_eq!(input.amount, 12.34);
        assert_eq!(input.status, Some(InvoiceStatus::Paid));

        let input = InvoiceInput::from(&form(None, Some("abc"), Some("overdue")));
        assert_eq!(input.customer_id, "");
        assert_eq!(input.amount, 0.0);
        assert_eq!(input.status, None);
    }

    #[test]
    fn test_validation_messages() {
        let input = InvoiceInput::from(&form(None, None, None));
        let errors = FieldErrors::from(&input.validate().unwrap_err());
        assert_eq!(errors.customer_id, vec![CUSTOMER_MESSAGE]);
        assert_eq!(errors.amount, vec![AMOUNT_MESSAGE]);
        assert_eq!(errors.status, vec![STATUS_MESSAGE]);
    }

    #[test]
    fn test_negative_amount_rejected() {
        let input = InvoiceInput::from(&form(Some("c1"), Some("-5"), Some("pending")));
        let errors = FieldErrors::from(&input.validate().unwrap_err());
        assert!(errors.customer_id.is_empty());
        assert_eq!(errors.amount, vec![AMOUNT_MESSAGE]);
    }

    #[test]
    fn test_valid_input_passes() {
        let input = InvoiceInput::from(&form(Some("c1"), Some("0.01"), Some("pending")));
        assert!(input.validate().is_ok());
    }

    #[test]
    fn test_to_cents() {
        assert_eq!(to_cents(157.95), Some(15795));
        assert_eq!(to_cents(0.1 + 0.2), Some(30));
        assert_eq!(to_cents(1.005), Some(100));
        assert_eq!(to_cents(30_000_000.0), None);
    }

    #[test]
    fn test_form_state_serialization() {
        let state = FormState {
            errors: FieldErrors {
                customer_id: vec![CUSTOMER_MESSAGE.to_string()],
                ..Default::default()
            },
            message: Some("Missing Fields. Failed to Create Invoice.".to_string()),
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["errors"]["customerId"][0], CUSTOMER_MESSAGE);
        assert!(json["errors"].get("amount").is_none());
        assert_eq!(json["message"], "Missing Fields. Failed to Create Invoice.");
    }
}
