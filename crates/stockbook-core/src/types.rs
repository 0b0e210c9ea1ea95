//! # Domain Types
//!
//! Core domain types used throughout Stockbook.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      User       │   │    Product      │   │      Sale       │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │◄──│  user_id        │   │  user_id        │       │
//! │  │  username       │   │  name           │◄──│  product_id     │       │
//! │  │  password_hash  │   │  purchase_price │   │  purchase_price │       │
//! │  │  full_name      │   │  quantity (≥0)  │   │   (snapshot)    │       │
//! │  │  email          │   │  purchase_date  │   │  sale_price     │       │
//! │  └─────────────────┘   └─────────────────┘   │  total_price    │       │
//! │                                              └─────────────────┘       │
//! │                                                                         │
//! │  Inputs: NewProduct, ProductUpdate, NewSale, NewUser, ProfileUpdate     │
//! │  Every input is validated here before the store is touched.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;
use crate::validation::{
    validate_non_negative, validate_optional_text, validate_password, validate_positive,
    validate_price, validate_product_name, validate_username, ValidationResult,
};

// =============================================================================
// User
// =============================================================================

/// A registered account. Every product and sale is scoped to one user.
///
/// The credential hash is opaque to the core and never serialized; clients
/// see [`UserProfile`] instead.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct User {
    pub id: i64,
    /// Unique login handle.
    pub username: String,
    /// Argon2 PHC string produced by the access boundary.
    pub password_hash: String,
    pub full_name: Option<String>,
    /// Contact string (an email address in the web client).
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Returns the client-facing view of this user.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            id: self.id,
            username: self.username.clone(),
            full_name: self.full_name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Public view of a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

/// Registration input, after the access boundary has hashed the password.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password_hash: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

impl NewUser {
    /// Validates and normalizes the registration fields.
    pub fn validate(mut self) -> ValidationResult<Self> {
        self.username = validate_username(&self.username)?;
        self.full_name = validate_optional_text("full_name", self.full_name)?;
        self.email = validate_optional_text("email", self.email)?;
        Ok(self)
    }
}

/// Registration credentials as typed by the user (checked before hashing).
pub fn validate_credentials(username: &str, password: &str) -> ValidationResult<()> {
    validate_username(username)?;
    validate_password(password)
}

/// Profile edit. Absent fields are cleared, matching a full-form PUT.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl ProfileUpdate {
    /// Trims fields, turns blanks into `None`, enforces length limits.
    pub fn validate(self) -> ValidationResult<Self> {
        Ok(ProfileUpdate {
            full_name: validate_optional_text("full_name", self.full_name)?,
            email: validate_optional_text("email", self.email)?,
        })
    }
}

// =============================================================================
// Product
// =============================================================================

/// A stock-keeping unit owned by exactly one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Product {
    pub id: i64,

    /// Owning user.
    pub user_id: i64,

    pub name: String,

    /// Unit purchase price in cents (cost basis).
    pub purchase_price_cents: i64,

    /// Quantity on hand. Never negative.
    pub quantity: i64,

    #[ts(as = "String")]
    pub purchase_date: DateTime<Utc>,
}

impl Product {
    /// Returns the unit purchase price as Money.
    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    /// Value of the stock on hand at cost; `None` if it overflows i64 cents.
    #[inline]
    pub fn stock_value(&self) -> Option<Money> {
        self.purchase_price().checked_multiply_quantity(self.quantity)
    }
}

/// Checks that `quantity` units at `unit_price` can be valued in i64 cents.
fn validate_stock_value(unit_price_cents: i64, quantity: i64) -> ValidationResult<()> {
    Money::from_cents(unit_price_cents)
        .checked_multiply_quantity(quantity)
        .map(|_| ())
        .ok_or_else(|| ValidationError::Overflow {
            field: "stock_value".to_string(),
        })
}

/// Input for creating a product.
#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub purchase_price_cents: i64,
    pub quantity: i64,
    /// Defaults to the creation time when absent.
    #[serde(default, deserialize_with = "flexible_datetime::deserialize")]
    pub purchase_date: Option<DateTime<Utc>>,
}

impl NewProduct {
    /// Validates the input; returns it with the name trimmed.
    pub fn validate(mut self) -> ValidationResult<Self> {
        self.name = validate_product_name(&self.name)?;
        validate_price("purchase_price_cents", self.purchase_price_cents)?;
        validate_non_negative("quantity", self.quantity)?;
        validate_stock_value(self.purchase_price_cents, self.quantity)?;
        Ok(self)
    }
}

/// Edit of a product's descriptive fields and cost basis.
///
/// No quantity field: stock only moves through sales.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProductUpdate {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub purchase_price_cents: Option<i64>,
}

impl ProductUpdate {
    pub fn validate(mut self) -> ValidationResult<Self> {
        if let Some(name) = self.name.take() {
            self.name = Some(validate_product_name(&name)?);
        }
        if let Some(price) = self.purchase_price_cents {
            validate_price("purchase_price_cents", price)?;
        }
        Ok(self)
    }

    pub fn is_empty(&self) -> bool {
        self.name.is_none() && self.purchase_price_cents.is_none()
    }

    /// Checks a new purchase price against the stock currently on hand.
    ///
    /// Stock never grows after creation, so a price that values today's
    /// quantity also values every later one.
    pub fn validate_against(&self, product: &Product) -> ValidationResult<()> {
        match self.purchase_price_cents {
            Some(price) => validate_stock_value(price, product.quantity),
            None => Ok(()),
        }
    }
}

// =============================================================================
// Sale
// =============================================================================

/// An immutable record of one sale event against one product.
///
/// Uses the snapshot pattern: the product's purchase price and name are
/// frozen into the sale so later product edits or deletion never change
/// historical profit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Sale {
    pub id: i64,
    pub user_id: i64,
    /// `None` once the product has been deleted.
    pub product_id: Option<i64>,
    /// Product name at time of sale (frozen).
    pub product_name: String,
    /// Units sold, always positive.
    pub quantity: i64,
    pub sale_price_cents: i64,
    /// Cost basis at time of sale (frozen).
    pub purchase_price_cents: i64,
    /// sale_price × quantity.
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub sale_date: DateTime<Utc>,
}

impl Sale {
    #[inline]
    pub fn sale_price(&self) -> Money {
        Money::from_cents(self.sale_price_cents)
    }

    #[inline]
    pub fn purchase_price(&self) -> Money {
        Money::from_cents(self.purchase_price_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    /// Profit contribution: (sale price - cost basis) × quantity.
    ///
    /// `None` if it overflows i64 cents.
    #[inline]
    pub fn profit(&self) -> Option<Money> {
        Sale::profit_for(self.sale_price(), self.purchase_price(), self.quantity)
    }

    /// (sale_price - purchase_price) × quantity with overflow checks.
    pub fn profit_for(sale_price: Money, purchase_price: Money, quantity: i64) -> Option<Money> {
        sale_price
            .checked_sub(purchase_price)?
            .checked_multiply_quantity(quantity)
    }

    /// Calendar date (UTC) on which the sale happened.
    #[inline]
    pub fn sale_day(&self) -> NaiveDate {
        self.sale_date.date_naive()
    }
}

/// Input for recording a sale.
#[derive(Debug, Clone, Deserialize)]
pub struct NewSale {
    pub product_id: i64,
    pub quantity: i64,
    pub sale_price_cents: i64,
    /// Defaults to the time of recording when absent.
    #[serde(default, deserialize_with = "flexible_datetime::deserialize")]
    pub sale_date: Option<DateTime<Utc>>,
}

impl NewSale {
    /// Validates the input and returns the computed total price.
    ///
    /// ## Rules
    /// - quantity > 0
    /// - sale_price >= 0
    /// - sale_price × quantity must fit in an i64
    pub fn validate(&self) -> ValidationResult<Money> {
        validate_positive("quantity", self.quantity)?;
        validate_price("sale_price_cents", self.sale_price_cents)?;

        Money::from_cents(self.sale_price_cents)
            .checked_multiply_quantity(self.quantity)
            .ok_or_else(|| ValidationError::Overflow {
                field: "total_price".to_string(),
            })
    }
}

// =============================================================================
// Date Input
// =============================================================================

/// Accepts either an RFC 3339 timestamp or a bare `YYYY-MM-DD` date
/// (interpreted as midnight UTC), which is what HTML date inputs submit.
pub mod flexible_datetime {
    use chrono::{DateTime, NaiveDate, Utc};
    use serde::{de, Deserialize, Deserializer};

    use crate::error::ValidationError;

    pub fn parse(raw: &str) -> Result<DateTime<Utc>, ValidationError> {
        let raw = raw.trim();

        if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
            return Ok(ts.with_timezone(&Utc));
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .map(|dt| dt.and_utc())
            .ok_or_else(|| ValidationError::InvalidFormat {
                field: "date".to_string(),
                reason: "expected YYYY-MM-DD or an RFC 3339 timestamp".to_string(),
            })
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(None),
            Some(raw) if raw.trim().is_empty() => Ok(None),
            Some(raw) => parse(&raw).map(Some).map_err(de::Error::custom),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
