//! # Sale Repository
//!
//! The sale transaction processor and sale history.
//!
//! ## Recording a Sale
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  record_sale(user_id, NewSale)                                          │
//! │       │                                                                 │
//! │       ├── validate input (quantity > 0, price >= 0, total fits i64)    │
//! │       │                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────────────────┐  │
//! │  │    ▼                                                              │  │
//! │  │  guarded decrement (first statement, takes the write lock)       │  │
//! │  │    │                                                              │  │
//! │  │    ├── no row ──► lookup product ──► NotFound | InsufficientStock │  │
//! │  │    │                                 (transaction dropped)        │  │
//! │  │    ▼                                                              │  │
//! │  │  profit on the snapshotted cost must fit i64, else roll back      │  │
//! │  │    │                                                              │  │
//! │  │  INSERT sale with purchase price + name snapshot                  │  │
//! │  │    │                                                              │  │
//! │  COMMIT ◄──────────────────────────────────────────────────────────┘  │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Sale                                                                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any early return drops the transaction, which rolls it back, so the
//! decrement and the insert land together or not at all.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult, LedgerResult};
use crate::repository::product::{decrement_quantity, fetch_owned};
use stockbook_core::{CoreError, Money, NewSale, Sale, ValidationError};

const SALE_COLUMNS: &str = "id, user_id, product_id, product_name, quantity, sale_price_cents, \
                            purchase_price_cents, total_price_cents, sale_date";

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a sale, decrementing stock atomically.
    ///
    /// ## Returns
    /// * `Ok(Sale)` - Committed sale with generated id
    /// * `Err(Core(Validation))` - Bad quantity or price; nothing touched
    /// * `Err(Core(ProductNotFound))` - Missing or foreign product
    /// * `Err(Core(InsufficientStock))` - Not enough on hand; nothing changed
    /// * `Err(Db(..))` - Store failure; transaction rolled back
    pub async fn record_sale(&self, user_id: i64, input: NewSale) -> LedgerResult<Sale> {
        let total = input.validate()?;
        let sale_date = input.sale_date.unwrap_or_else(Utc::now);

        debug!(
            user_id,
            product_id = input.product_id,
            quantity = input.quantity,
            "Recording sale"
        );

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let product =
            match decrement_quantity(&mut tx, user_id, input.product_id, input.quantity).await? {
                Some(product) => product,
                None => {
                    let err = match fetch_owned(&mut tx, user_id, input.product_id).await? {
                        None => CoreError::ProductNotFound(input.product_id),
                        Some(product) => CoreError::InsufficientStock {
                            product_id: product.id,
                            available: product.quantity,
                            requested: input.quantity,
                        },
                    };
                    warn!(user_id, error = %err, "Sale rejected");
                    return Err(err.into());
                }
            };

        // The snapshotted cost basis must leave a reportable profit; an early
        // return here drops the transaction and undoes the decrement.
        let profit = Sale::profit_for(
            Money::from_cents(input.sale_price_cents),
            product.purchase_price(),
            input.quantity,
        );
        if profit.is_none() {
            warn!(user_id, product_id = product.id, "Sale profit overflows");
            return Err(ValidationError::Overflow {
                field: "profit".to_string(),
            }
            .into());
        }

        let sql = format!(
            "INSERT INTO sales (user_id, product_id, product_name, quantity, sale_price_cents, \
                                purchase_price_cents, total_price_cents, sale_date) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8) RETURNING {SALE_COLUMNS}"
        );

        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(user_id)
            .bind(product.id)
            .bind(&product.name)
            .bind(input.quantity)
            .bind(input.sale_price_cents)
            .bind(product.purchase_price_cents)
            .bind(total.cents())
            .bind(sale_date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        info!(
            user_id,
            sale_id = sale.id,
            product_id = product.id,
            remaining = product.quantity,
            total_cents = sale.total_price_cents,
            "Sale recorded"
        );

        Ok(sale)
    }

    /// Lists the user's sales, newest first.
    pub async fn list(&self, user_id: i64) -> DbResult<Vec<Sale>> {
        let sql = format!(
            "SELECT {SALE_COLUMNS} FROM sales WHERE user_id = ?1 ORDER BY sale_date DESC, id DESC"
        );

        let sales = sqlx::query_as::<_, Sale>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;

        debug!(user_id, count = sales.len(), "Listed sales");
        Ok(sales)
    }

    /// Gets one sale owned by `user_id`.
    pub async fn get(&self, user_id: i64, sale_id: i64) -> DbResult<Option<Sale>> {
        let sql = format!("SELECT {SALE_COLUMNS} FROM sales WHERE id = ?1 AND user_id = ?2");

        let sale = sqlx::query_as::<_, Sale>(&sql)
            .bind(sale_id)
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::pool::{Database, DbConfig};
    use stockbook_core::{ErrorKind, NewProduct, NewUser};

    async fn setup(quantity: i64) -> (Database, i64, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let user = db
            .users()
            .insert(&NewUser {
                username: "seller".to_string(),
                password_hash: "hash".to_string(),
                full_name: None,
                email: None,
            })
            .await
            .unwrap();
        let product = db
            .products()
            .create(
                user.id,
                NewProduct {
                    name: "Widget".to_string(),
                    purchase_price_cents: 1000,
                    quantity,
                    purchase_date: None,
                },
            )
            .await
            .unwrap();
        (db, user.id, product.id)
    }

    fn sell(product_id: i64, quantity: i64, price: i64) -> NewSale {
        NewSale {
            product_id,
            quantity,
            sale_price_cents: price,
            sale_date: None,
        }
    }

    #[tokio::test]
    async fn test_record_sale_snapshots_product() {
        let (db, user_id, product_id) = setup(5).await;

        let sale = db
            .sales()
            .record_sale(user_id, sell(product_id, 2, 1500))
            .await
            .unwrap();

        assert_eq!(sale.product_id, Some(product_id));
        assert_eq!(sale.product_name, "Widget");
        assert_eq!(sale.purchase_price_cents, 1000);
        assert_eq!(sale.total_price_cents, 3000);

        let stored = db.sales().get(user_id, sale.id).await.unwrap();
        assert_eq!(stored, Some(sale));
    }

    #[tokio::test]
    async fn test_invalid_quantity_touches_nothing() {
        let (db, user_id, product_id) = setup(5).await;

        let err = db
            .sales()
            .record_sale(user_id, sell(product_id, 0, 1500))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);

        let product = db.products().get(user_id, product_id).await.unwrap().unwrap();
        assert_eq!(product.quantity, 5);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let (db, user_id, _) = setup(5).await;

        let err = db
            .sales()
            .record_sale(user_id, sell(777, 1, 100))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Core(CoreError::ProductNotFound(777))
        ));
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let (db, user_id, product_id) = setup(5).await;
        let repo = db.sales();

        let mut older = sell(product_id, 1, 100);
        older.sale_date = Some(Utc::now() - chrono::Duration::days(1));
        let older = repo.record_sale(user_id, older).await.unwrap();
        let newer = repo.record_sale(user_id, sell(product_id, 1, 100)).await.unwrap();

        let ids: Vec<i64> = repo.list(user_id).await.unwrap().iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }
}
