//! SQLite-backed repository for hotel records.

use crate::models::hotel::Hotel;
use sqlx::SqlitePool;
use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
}

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository over the `hotels` table.
///
/// The pool is shared across requests; connections are pooled rather than
/// opened per invocation.
#[derive(Clone, Debug)]
pub struct HotelRepo {
    db: Arc<SqlitePool>,
}

impl HotelRepo {
    pub fn new(db: Arc<SqlitePool>) -> Self {
        Self { db }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.db
    }

    /// Insert a newly created hotel record.
    pub async fn insert(&self, hotel: &Hotel) -> RepoResult<()> {
        sqlx::query(
            "INSERT INTO hotels (user_id, id, name, city_name, price, rating, file_name)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&hotel.user_id)
        .bind(hotel.id)
        .bind(&hotel.name)
        .bind(&hotel.city_name)
        .bind(hotel.price)
        .bind(hotel.rating)
        .bind(&hotel.file_name)
        .execute(&*self.db)
        .await?;

        Ok(())
    }

    /// All hotels owned by `user_id`.
    ///
    /// Returns every matching row in one shot; the data set per owner is
    /// small and the API exposes no pagination.
    pub async fn list_for_user(&self, user_id: &str) -> RepoResult<Vec<Hotel>> {
        let hotels = sqlx::query_as::<_, Hotel>(
            "SELECT user_id, id, name, city_name, price, rating, file_name
             FROM hotels WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(hotels)
    }
}
