//! # stockbook-core: Pure Business Logic for Stockbook
//!
//! This crate is the **heart** of Stockbook. It contains the domain model,
//! input validation and the metrics aggregator as pure functions with zero
//! I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Stockbook Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                stockbook-api (axum HTTP server)                 │   │
//! │  │    register, login ──► bearer token ──► user_id                 │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockbook-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  metrics  │  │ validation│  │   │
//! │  │   │  Product  │  │   Money   │  │  Summary  │  │   rules   │  │   │
//! │  │   │   Sale    │  │           │  │  DaySum.  │  │  checks   │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                 stockbook-db (Database Layer)                   │   │
//! │  │        SQLite queries, migrations, atomic sale transaction      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (User, Product, Sale) and typed inputs
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`error`] - Domain error types and the error taxonomy
//! - [`validation`] - Input validation
//! - [`metrics`] - Revenue, profit and capital aggregation
//!
//! ## Example Usage
//!
//! ```rust
//! use stockbook_core::money::Money;
//!
//! let cost = Money::from_cents(1000);
//! let price = Money::from_cents(1500);
//!
//! // Profit on 5 units sold at $15.00 bought at $10.00
//! let profit = (price - cost).multiply_quantity(5);
//! assert_eq!(profit.cents(), 2500);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod metrics;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ErrorKind, ValidationError};
pub use metrics::{DaySummary, MetricsSummary};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum length of a product name.
pub const MAX_PRODUCT_NAME_LEN: usize = 200;

/// Maximum length of a username (the unique login handle).
pub const MAX_USERNAME_LEN: usize = 50;

/// Maximum length of the optional profile fields (display name, contact).
pub const MAX_PROFILE_FIELD_LEN: usize = 200;
