//! # Repository Module
//!
//! Database repository implementations for Stockbook.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  HTTP handler (already knows the caller's user_id)                     │
//! │       │                                                                 │
//! │       │  db.sales().record_sale(user_id, new_sale)                     │
//! │       ▼                                                                 │
//! │  Repository                                                            │
//! │  ├── UserRepository     accounts and profiles                         │
//! │  ├── ProductRepository  inventory ledger                              │
//! │  └── SaleRepository     atomic sale transaction, sale history         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (every product/sale query is filtered by user_id)             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod product;
pub mod sale;
pub mod user;
