//! # User Repository
//!
//! Accounts and profiles. Password hashing happens in the HTTP layer; this
//! repository only ever sees the finished hash.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use stockbook_core::{NewUser, ProfileUpdate, User};

const USER_COLUMNS: &str = "id, username, password_hash, full_name, email, created_at";

/// Repository for user database operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Creates a new UserRepository.
    pub fn new(pool: SqlitePool) -> Self {
        UserRepository { pool }
    }

    /// Inserts a new user.
    ///
    /// ## Returns
    /// * `Ok(User)` - Inserted user with generated id
    /// * `Err(DbError::UniqueViolation)` - Username already taken
    pub async fn insert(&self, user: &NewUser) -> DbResult<User> {
        debug!(username = %user.username, "Inserting user");

        let sql = format!(
            "INSERT INTO users (username, password_hash, full_name, email, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5) RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(&user.username)
            .bind(&user.password_hash)
            .bind(&user.full_name)
            .bind(&user.email)
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => {
                    DbError::duplicate(field, user.username.clone())
                }
                other => other,
            })
    }

    /// Finds a user by login handle.
    pub async fn find_by_username(&self, username: &str) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Gets a user by id.
    pub async fn get(&self, id: i64) -> DbResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1");

        let user = sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    /// Replaces the user's profile fields.
    ///
    /// ## Returns
    /// * `Err(DbError::NotFound)` - No such user
    pub async fn update_profile(&self, id: i64, update: &ProfileUpdate) -> DbResult<User> {
        debug!(user_id = id, "Updating profile");

        let sql = format!(
            "UPDATE users SET full_name = ?2, email = ?3 WHERE id = ?1 RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, User>(&sql)
            .bind(id)
            .bind(&update.full_name)
            .bind(&update.email)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DbError::not_found("User", id))
    }
}
