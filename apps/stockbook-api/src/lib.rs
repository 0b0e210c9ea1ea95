//! # Stockbook API
//!
//! HTTP server for the Stockbook inventory and sales tracker.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         API Routes                                      │
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐  ┌────────────────────────────┐│
//! │  │  auth          │  │  products      │  │  sales                     ││
//! │  │ • register     │  │ • list/create  │  │ • list                     ││
//! │  │ • login        │  │ • get/update   │  │ • record (atomic)          ││
//! │  │ • profile      │  │ • delete       │  │ • get                      ││
//! │  └────────────────┘  └────────────────┘  └────────────────────────────┘│
//! │                                                                         │
//! │  ┌────────────────┐  ┌────────────────┐                                │
//! │  │  reports       │  │  health        │                                │
//! │  │ • metrics      │  │ • store ping   │                                │
//! │  │ • daily        │  │                │                                │
//! │  └────────────────┘  └────────────────┘                                │
//! │                                                                         │
//! │  Everything except register, login and health requires a bearer token. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration
//! Environment variables:
//! - `HTTP_HOST` / `HTTP_PORT` - bind address (default: 0.0.0.0:3000)
//! - `DATABASE_PATH` - SQLite file (default: store.db)
//! - `DB_MAX_CONNECTIONS` - pool size (default: 5)
//! - `JWT_SECRET` - Secret for JWT signing
//! - `JWT_ACCESS_LIFETIME_SECS` - Access token lifetime (default: 86400)

pub mod auth;
pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use stockbook_db::Database;

pub use auth::JwtManager;
pub use config::ApiConfig;
pub use error::{ApiError, ErrorCode};
pub use routes::router;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub jwt: Arc<JwtManager>,
}

impl AppState {
    pub fn new(db: Database, jwt: JwtManager) -> Self {
        AppState {
            db,
            jwt: Arc::new(jwt),
        }
    }
}
