//! Email/password credential check against the stored bcrypt hashes.
//! Session handling is left to whatever sits in front of this service.

use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::entities::user;
use crate::error::AppError;

pub const INVALID_CREDENTIALS: &str = "Invalid credentials.";

#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct Credentials {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 6))]
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<user::Model> for UserSummary {
    fn from(model: user::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            email: model.email,
        }
    }
}

/// Hashes `password` with bcrypt at `cost` on the blocking pool.
pub async fn hash_password(password: String, cost: u32) -> Result<String, AppError> {
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .map_err(|e| AppError::InternalError(e.to_string()))
}

/// Returns the matching user, or `None` when the credentials are malformed,
/// the email is unknown or the password does not match.
#[tracing::instrument(skip(db, credentials))]
pub async fn authenticate(
    db: &DatabaseConnection,
    credentials: &Credentials,
) -> Result<Option<UserSummary>, AppError> {
    if credentials.validate().is_err() {
        tracing::debug!(email = %credentials.email, "malformed credentials");
        return Ok(None);
    }

    let user = user::Entity::find()
        .filter(user::Column::Email.eq(credentials.email.as_str()))
        .one(db)
        .await
        .map_err(|err| {
            tracing::error!(error = %err, "Database Error");
            AppError::FetchFailed("Failed to fetch user.".to_string())
        })?;

    let Some(user) = user else {
        tracing::debug!(email = %credentials.email, "unknown user");
        return Ok(None);
    };

    let password = credentials.password.clone();
    let hash = user.password.clone();
    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?
        .unwrap_or_else(|e| {
            tracing::warn!(error = %e, "stored password hash is unreadable");
            false
        });

    if !matches {
        tracing::debug!(email = %credentials.email, "password mismatch");
        return Ok(None);
    }

    Ok(Some(user.into()))
}
