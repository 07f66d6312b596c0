//! Input rules for registration and publishing.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;

static USERNAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]{3,20}$").expect("username pattern compiles"));

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("email pattern compiles")
});

/// 3-20 ASCII letters, digits or underscores.
pub fn is_valid_username(username: &str) -> bool {
    USERNAME_RE.is_match(username)
}

/// `local@domain.tld` shape.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

/// At least 6 characters with at least one letter and one digit.
pub fn is_valid_password(password: &str) -> bool {
    password.chars().count() >= 6
        && password.chars().any(char::is_alphabetic)
        && password.chars().any(char::is_numeric)
}

/// Registration rules, evaluated in a fixed order; the first failure wins.
pub fn validate_registration(
    username: &str,
    password: &str,
    email: &str,
    campus: &str,
) -> Result<(), ValidationError> {
    if username.is_empty() || password.is_empty() || email.is_empty() || campus.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if !is_valid_username(username) {
        return Err(ValidationError::InvalidUsername);
    }
    if !is_valid_email(email) {
        return Err(ValidationError::InvalidEmail);
    }
    if !is_valid_password(password) {
        return Err(ValidationError::WeakPassword);
    }
    Ok(())
}

/// Core publishing rule: non-empty title and description, positive price.
/// Length limits are a front-end concern.
pub fn validate_listing(title: &str, description: &str, price: f64) -> Result<(), ValidationError> {
    if title.is_empty() || description.is_empty() {
        return Err(ValidationError::IncompleteListing);
    }
    if !price.is_finite() || price <= 0.0 {
        return Err(ValidationError::InvalidPrice);
    }
    Ok(())
}
