//! # Metrics Aggregator
//!
//! Derived business figures computed from a user's products and sales.
//!
//! ## Formulas
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  total_revenue     = Σ sale.total_price                                 │
//! │  total_profit      = Σ (sale.sale_price - sale.purchase_price) × qty    │
//! │  inventory_value   = Σ product.purchase_price × product.quantity        │
//! │  remaining_capital = inventory_value + total_profit                     │
//! │                                                                         │
//! │  Day-scoped: same revenue/profit over sales whose UTC date == day       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Profit always uses the purchase price frozen into each sale, never the
//! product's current price. All functions are pure and order independent.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{Product, Sale};

// =============================================================================
// Reductions
// =============================================================================
//
// Every reduction is checked: a figure that does not fit in i64 cents is an
// `AmountOverflow` error, never a wrapped or panicking total.

/// Σ sale.total_price
pub fn total_revenue<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> CoreResult<Money> {
    Money::checked_sum(sales.into_iter().map(Sale::total_price)).ok_or(
        CoreError::AmountOverflow {
            figure: "total_revenue",
        },
    )
}

/// Σ (sale_price - purchase_price) × quantity
pub fn total_profit<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> CoreResult<Money> {
    sales
        .into_iter()
        .try_fold(Money::zero(), |total, sale| {
            sale.profit().and_then(|profit| total.checked_add(profit))
        })
        .ok_or(CoreError::AmountOverflow {
            figure: "total_profit",
        })
}

/// Σ purchase_price × quantity over stock on hand.
pub fn inventory_value<'a>(products: impl IntoIterator<Item = &'a Product>) -> CoreResult<Money> {
    products
        .into_iter()
        .try_fold(Money::zero(), |total, product| {
            product.stock_value().and_then(|value| total.checked_add(value))
        })
        .ok_or(CoreError::AmountOverflow {
            figure: "inventory_value",
        })
}

// =============================================================================
// Dashboard Summary
// =============================================================================

/// Overall figures for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MetricsSummary {
    pub total_revenue_cents: i64,
    pub total_profit_cents: i64,
    pub inventory_value_cents: i64,
    pub remaining_capital_cents: i64,
    pub product_count: usize,
    pub sale_count: usize,
}

impl MetricsSummary {
    pub fn compute(products: &[Product], sales: &[Sale]) -> CoreResult<Self> {
        let revenue = total_revenue(sales)?;
        let profit = total_profit(sales)?;
        let stock = inventory_value(products)?;
        let capital = stock.checked_add(profit).ok_or(CoreError::AmountOverflow {
            figure: "remaining_capital",
        })?;

        Ok(MetricsSummary {
            total_revenue_cents: revenue.cents(),
            total_profit_cents: profit.cents(),
            inventory_value_cents: stock.cents(),
            remaining_capital_cents: capital.cents(),
            product_count: products.len(),
            sale_count: sales.len(),
        })
    }
}

// =============================================================================
// Day-Scoped Summary
// =============================================================================

/// Revenue and profit for a single UTC calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DaySummary {
    #[ts(as = "String")]
    pub date: NaiveDate,
    pub revenue_cents: i64,
    pub profit_cents: i64,
    pub sale_count: usize,
    /// The sales that fell on `date`, in the order given.
    pub sales: Vec<Sale>,
}

impl DaySummary {
    /// Filters `sales` to those dated on `date` (UTC) and aggregates them.
    pub fn for_day(sales: &[Sale], date: NaiveDate) -> CoreResult<Self> {
        let day_sales: Vec<Sale> = sales
            .iter()
            .filter(|s| s.sale_day() == date)
            .cloned()
            .collect();

        Ok(DaySummary {
            date,
            revenue_cents: total_revenue(&day_sales)?.cents(),
            profit_cents: total_profit(&day_sales)?.cents(),
            sale_count: day_sales.len(),
            sales: day_sales,
        })
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
