//! # Validation Module
//!
//! Input validation utilities for Stockbook.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP extractor (axum Json)                                   │
//! │  └── Shape and type checks (deserialization)                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Typed inputs (NewProduct, NewSale, ...)                      │
//! │  └── THIS MODULE: business rule validation                             │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantity >= 0), CHECK (price >= 0)                         │
//! │  ├── UNIQUE (username)                                                 │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockbook_core::validation::{validate_positive, validate_product_name};
//!
//! assert_eq!(validate_product_name("  Rice 5kg ").unwrap(), "Rice 5kg");
//! assert!(validate_positive("quantity", 0).is_err());
//! ```

use crate::error::ValidationError;
use crate::{MAX_PRODUCT_NAME_LEN, MAX_PROFILE_FIELD_LEN, MAX_USERNAME_LEN};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound on password length; Argon2 cost grows with input size.
pub const MAX_PASSWORD_LEN: usize = 128;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product name and returns it trimmed.
///
/// ## Rules
/// - Must not be empty after trimming
/// - At most [`MAX_PRODUCT_NAME_LEN`] characters
pub fn validate_product_name(name: &str) -> ValidationResult<String> {
    required_text("name", name, MAX_PRODUCT_NAME_LEN)
}

/// Validates a username and returns it trimmed.
///
/// ## Rules
/// - Must not be empty
/// - At most [`MAX_USERNAME_LEN`] characters
/// - Only ASCII letters, digits, `_`, `-` and `.`
///
/// ## Example
/// ```rust
/// use stockbook_core::validation::validate_username;
///
/// assert!(validate_username("store_owner").is_ok());
/// assert!(validate_username("").is_err());
/// assert!(validate_username("bad name").is_err());
/// ```
pub fn validate_username(username: &str) -> ValidationResult<String> {
    let username = required_text("username", username, MAX_USERNAME_LEN)?;

    let valid_chars = username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));

    if !valid_chars {
        return Err(ValidationError::InvalidFormat {
            field: "username".to_string(),
            reason: "only letters, digits, '_', '-' and '.' are allowed".to_string(),
        });
    }

    Ok(username)
}

/// Validates a plaintext password before hashing.
///
/// Not trimmed: leading and trailing spaces are part of the secret.
pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }

    if password.chars().count() > MAX_PASSWORD_LEN {
        return Err(ValidationError::TooLong {
            field: "password".to_string(),
            max: MAX_PASSWORD_LEN,
        });
    }

    Ok(())
}

/// Normalizes an optional free-text field (display name, contact).
///
/// Blank strings become `None`; present values are trimmed and length-checked.
pub fn validate_optional_text(
    field: &str,
    value: Option<String>,
) -> ValidationResult<Option<String>> {
    match value {
        None => Ok(None),
        Some(v) if v.trim().is_empty() => Ok(None),
        Some(v) => required_text(field, &v, MAX_PROFILE_FIELD_LEN).map(Some),
    }
}

fn required_text(field: &str, value: &str, max: usize) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(value.to_string())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a value that must be strictly positive (sale quantity).
pub fn validate_positive(field: &str, value: i64) -> ValidationResult<()> {
    if value <= 0 {
        return Err(ValidationError::MustBePositive {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a value that must not be negative (stock quantity).
pub fn validate_non_negative(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::MustNotBeNegative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a price in cents. Zero is allowed (free items, giveaways).
#[inline]
pub fn validate_price(field: &str, cents: i64) -> ValidationResult<()> {
    validate_non_negative(field, cents)
}

// =============================================================================
// Unit Tests
// =============================================================================
