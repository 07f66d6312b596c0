use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use campus_core::error::error_response;
use campus_domain::product::ProductStatus;

/// Malformed input. Each rule has its own variant so callers can tell which
/// check failed first.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("all fields are required")]
    MissingFields,
    #[error("username must be 3-20 letters, digits or underscores")]
    InvalidUsername,
    #[error("invalid email format")]
    InvalidEmail,
    #[error("password must be at least 6 characters and contain letters and digits")]
    WeakPassword,
    #[error("title and description are required")]
    IncompleteListing,
    #[error("price must be greater than zero")]
    InvalidPrice,
    #[error("unknown category")]
    UnknownCategory,
}

impl ValidationError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::MissingFields => "MISSING_FIELDS",
            Self::InvalidUsername => "INVALID_USERNAME",
            Self::InvalidEmail => "INVALID_EMAIL",
            Self::WeakPassword => "WEAK_PASSWORD",
            Self::IncompleteListing => "INCOMPLETE_LISTING",
            Self::InvalidPrice => "INVALID_PRICE",
            Self::UnknownCategory => "UNKNOWN_CATEGORY",
        }
    }
}

/// Marketplace service error variants.
#[derive(Debug, thiserror::Error)]
pub enum MarketError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Deliberately does not say which of the two fields collided.
    #[error("username or email already exists")]
    DuplicateIdentity,
    /// Same message for unknown username and wrong password.
    #[error("invalid username or password")]
    InvalidCredentials,
    #[error("login required")]
    Unauthorized,
    #[error("forbidden")]
    Forbidden,
    #[error("product not found")]
    ProductNotFound,
    #[error("malformed query: {0}")]
    InvalidQuery(String),
    #[error("cannot {action} a listing in status {from}")]
    InvalidTransition {
        from: ProductStatus,
        action: &'static str,
    },
    #[error("internal error")]
    Internal(#[from] anyhow::Error),
}

impl MarketError {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation(e) => e.kind(),
            Self::DuplicateIdentity => "DUPLICATE_IDENTITY",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::Forbidden => "FORBIDDEN",
            Self::ProductNotFound => "PRODUCT_NOT_FOUND",
            Self::InvalidQuery(_) => "INVALID_QUERY",
            Self::InvalidTransition { .. } => "INVALID_TRANSITION",
            Self::Internal(_) => "INTERNAL",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) | Self::InvalidQuery(_) => StatusCode::BAD_REQUEST,
            Self::DuplicateIdentity | Self::InvalidTransition { .. } => StatusCode::CONFLICT,
            Self::InvalidCredentials | Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::Forbidden => StatusCode::FORBIDDEN,
            Self::ProductNotFound => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Wrap a poisoned lock as an internal error.
    pub(crate) fn poisoned(what: &str) -> Self {
        Self::Internal(anyhow::anyhow!("{what} lock poisoned"))
    }
}

impl IntoResponse for MarketError {
    fn into_response(self) -> Response {
        // Internal errors need the anyhow chain logged so the root cause is traceable.
        if let Self::Internal(ref e) = self {
            tracing::error!(error = ?e, kind = "INTERNAL", "internal error");
        }
        error_response(self.status(), self.kind(), &self.to_string())
    }
}
