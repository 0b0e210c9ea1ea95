//! # Product Repository
//!
//! The inventory ledger: per-user product CRUD.
//!
//! ## Stock Movement
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create()          quantity set once, from validated input              │
//! │  update_details()  name / purchase price only, quantity untouched      │
//! │  delete()          hard delete; sales keep their snapshot              │
//! │                                                                         │
//! │  decrement_quantity()  crate-internal, only called on the sale         │
//! │                        transaction's connection:                        │
//! │                                                                         │
//! │     UPDATE products SET quantity = quantity - n                        │
//! │     WHERE id = ? AND user_id = ? AND quantity >= n                     │
//! │                                                                         │
//! │  Check and write are one statement, so two concurrent sales can never  │
//! │  both pass the check on the same stale quantity.                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every query is filtered by `user_id`. A product owned by someone else is
//! indistinguishable from one that doesn't exist.

use chrono::Utc;
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, info};

use crate::error::{DbError, DbResult, LedgerResult};
use stockbook_core::{NewProduct, Product, ProductUpdate};

pub(crate) const PRODUCT_COLUMNS: &str =
    "id, user_id, name, purchase_price_cents, quantity, purchase_date";

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = db.products();
/// let product = repo.create(user_id, new_product).await?;
/// let all = repo.list(user_id).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Validates and inserts a new product owned by `user_id`.
    ///
    /// ## Returns
    /// * `Ok(Product)` - Inserted product with generated id
    /// * `Err(LedgerError::Core(Validation))` - Empty name, negative price or quantity
    pub async fn create(&self, user_id: i64, input: NewProduct) -> LedgerResult<Product> {
        let input = input.validate()?;
        let purchase_date = input.purchase_date.unwrap_or_else(Utc::now);

        debug!(user_id, name = %input.name, quantity = input.quantity, "Inserting product");

        let sql = format!(
            "INSERT INTO products (user_id, name, purchase_price_cents, quantity, purchase_date) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {PRODUCT_COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(user_id)
            .bind(&input.name)
            .bind(input.purchase_price_cents)
            .bind(input.quantity)
            .bind(purchase_date)
            .fetch_one(&self.pool)
            .await?;

        info!(user_id, product_id = product.id, "Product created");
        Ok(product)
    }

    /// Lists every product owned by `user_id`, oldest first.
    pub async fn list(&self, user_id: i64) -> DbResult<Vec<Product>> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE user_id = ?1 ORDER BY id");

        let products = sqlx::query_as::<_, Product>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id, count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets one product owned by `user_id`.
    ///
    /// ## Returns
    /// * `Ok(None)` - Missing, or owned by another user
    pub async fn get(&self, user_id: i64, product_id: i64) -> DbResult<Option<Product>> {
        let mut conn = self.pool.acquire().await?;
        fetch_owned(&mut conn, user_id, product_id).await
    }

    /// Edits the name and/or purchase price of a product.
    ///
    /// Quantity is never touched. Existing sales keep the purchase price
    /// they were recorded with.
    ///
    /// ## Returns
    /// * `Err(LedgerError::Db(NotFound))` - Missing or foreign product
    pub async fn update_details(
        &self,
        user_id: i64,
        product_id: i64,
        update: ProductUpdate,
    ) -> LedgerResult<Product> {
        let update = update.validate()?;

        if update.purchase_price_cents.is_some() {
            let current = self
                .get(user_id, product_id)
                .await?
                .ok_or_else(|| DbError::not_found("Product", product_id))?;
            update.validate_against(&current)?;
        }

        debug!(user_id, product_id, "Updating product details");

        let sql = format!(
            "UPDATE products SET \
                 name = COALESCE(?3, name), \
                 purchase_price_cents = COALESCE(?4, purchase_price_cents) \
             WHERE id = ?1 AND user_id = ?2 \
             RETURNING {PRODUCT_COLUMNS}"
        );

        let product = sqlx::query_as::<_, Product>(&sql)
            .bind(product_id)
            .bind(user_id)
            .bind(update.name.as_deref())
            .bind(update.purchase_price_cents)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("Product", product_id))?;

        Ok(product)
    }

    /// Deletes a product owned by `user_id`.
    ///
    /// Idempotent: deleting a missing or foreign product is not an error.
    ///
    /// ## Returns
    /// * `Ok(true)` - A row was removed
    /// * `Ok(false)` - Nothing matched
    pub async fn delete(&self, user_id: i64, product_id: i64) -> DbResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE id = ?1 AND user_id = ?2")
            .bind(product_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;

        let deleted = result.rows_affected() > 0;
        if deleted {
            info!(user_id, product_id, "Product deleted");
        } else {
            debug!(user_id, product_id, "Delete matched no product");
        }

        Ok(deleted)
    }
}

// =============================================================================
// Transaction-scoped helpers
// =============================================================================

/// Fetches a product owned by `user_id` on an existing connection.
pub(crate) async fn fetch_owned(
    conn: &mut SqliteConnection,
    user_id: i64,
    product_id: i64,
) -> DbResult<Option<Product>> {
    let sql = format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?1 AND user_id = ?2");

    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

    Ok(product)
}

/// Guarded stock decrement.
///
/// Subtracts `amount` only when the product is owned by `user_id` and has at
/// least `amount` on hand. Returns the post-decrement row, or `None` when
/// nothing matched (missing, foreign, or not enough stock).
///
/// Must run on the sale transaction's connection so it commits or rolls back
/// together with the sale insert.
pub(crate) async fn decrement_quantity(
    conn: &mut SqliteConnection,
    user_id: i64,
    product_id: i64,
    amount: i64,
) -> DbResult<Option<Product>> {
    let sql = format!(
        "UPDATE products SET quantity = quantity - ?1 \
         WHERE id = ?2 AND user_id = ?3 AND quantity >= ?1 \
         RETURNING {PRODUCT_COLUMNS}"
    );

    let product = sqlx::query_as::<_, Product>(&sql)
        .bind(amount)
        .bind(product_id)
        .bind(user_id)
        .fetch_optional(conn)
        .await?;

    Ok(product)
}

// =============================================================================
// Unit Tests
// =============================================================================
