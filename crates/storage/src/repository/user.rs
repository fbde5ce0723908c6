use sqlx::{PgConnection, PgPool};
use uuid::Uuid;

use crate::error::{Result, StorageError};
use crate::models::User;

const COLUMNS: &str = "user_id, external_id, email, username, created_at";

/// Repository for local user accounts
pub struct UserRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> UserRepository<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_id(&self, user_id: Uuid) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE user_id = $1"))
            .bind(user_id)
            .fetch_optional(self.pool)
            .await?
            .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    pub async fn find_by_external_id(&self, external_id: &str) -> Result<User> {
        let mut conn = self.pool.acquire().await?;
        find_by_external_id(&mut conn, external_id)
            .await?
            .ok_or(StorageError::NotFound)
    }

    pub async fn update_username(&self, user_id: Uuid, username: &str) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "UPDATE users SET username = $2 WHERE user_id = $1 RETURNING {COLUMNS}"
        ))
        .bind(user_id)
        .bind(username)
        .fetch_optional(self.pool)
        .await?
        .ok_or(StorageError::NotFound)?;

        Ok(user)
    }

    /// Delete a user; everything they own goes with them
    pub async fn delete(&self, user_id: Uuid) -> Result<()> {
        let result = sqlx::query("DELETE FROM users WHERE user_id = $1")
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound);
        }

        Ok(())
    }
}

pub(crate) async fn find_by_external_id(
    conn: &mut PgConnection,
    external_id: &str,
) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!(
        "SELECT {COLUMNS} FROM users WHERE external_id = $1"
    ))
    .bind(external_id)
    .fetch_optional(&mut *conn)
    .await?;

    Ok(user)
}

pub(crate) async fn find_by_email(conn: &mut PgConnection, email: &str) -> Result<Option<User>> {
    let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE email = $1"))
        .bind(email)
        .fetch_optional(&mut *conn)
        .await?;

    Ok(user)
}

pub(crate) async fn set_external_id(
    conn: &mut PgConnection,
    user_id: Uuid,
    external_id: &str,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        "UPDATE users SET external_id = $2 WHERE user_id = $1 RETURNING {COLUMNS}"
    ))
    .bind(user_id)
    .bind(external_id)
    .fetch_one(&mut *conn)
    .await?;

    Ok(user)
}

pub(crate) async fn insert(
    conn: &mut PgConnection,
    external_id: &str,
    email: Option<&str>,
) -> Result<User> {
    let user = sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (external_id, email, username)
         VALUES ($1, $2, $2)
         RETURNING {COLUMNS}"
    ))
    .bind(external_id)
    .bind(email)
    .fetch_one(&mut *conn)
    .await?;

    Ok(user)
}
