use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    #[error("Not found")]
    NotFound,

    #[error("Permission denied")]
    PermissionDenied,

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),
}

pub type Result<T> = std::result::Result<T, StorageError>;

impl StorageError {
    pub fn is_unique_violation(&self) -> bool {
        matches!(
            self,
            StorageError::Database(sqlx::Error::Database(e))
                if e.code().as_deref() == Some("23505")
        )
    }

    /// Maps a unique violation onto a `ConstraintViolation` carrying `message`,
    /// leaving every other error untouched.
    pub fn on_unique_violation(self, message: &str) -> Self {
        if self.is_unique_violation() {
            StorageError::ConstraintViolation(message.to_string())
        } else {
            self
        }
    }
}

/// Fails with `PermissionDenied` unless `owner` is the acting user.
pub fn ensure_owner(owner: uuid::Uuid, user_id: uuid::Uuid) -> Result<()> {
    if owner == user_id {
        Ok(())
    } else {
        Err(StorageError::PermissionDenied)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_ensure_owner_accepts_same_user() {
        let user = Uuid::new_v4();
        assert!(ensure_owner(user, user).is_ok());
    }

    #[test]
    fn test_ensure_owner_rejects_other_user() {
        let result = ensure_owner(Uuid::new_v4(), Uuid::new_v4());
        assert!(matches!(result, Err(StorageError::PermissionDenied)));
    }

    #[test]
    fn test_on_unique_violation_keeps_other_errors() {
        let err = StorageError::NotFound.on_unique_violation("Name already exists");
        assert!(matches!(err, StorageError::NotFound));
    }
}
