use sqlx::PgPool;
use storage::{
    dto::user::UpdateUserRequest,
    error::{Result, ensure_owner},
    models::User,
    repository::UserRepository,
};

use crate::provider::ProviderAdmin;

/// Look up an account by provider subject; only its owner may see it
pub async fn get_user(pool: &PgPool, current: &User, external_id: &str) -> Result<User> {
    let repo = UserRepository::new(pool);
    let user = repo.find_by_external_id(external_id).await?;
    ensure_owner(user.user_id, current.user_id)?;
    Ok(user)
}

pub async fn update_user(
    pool: &PgPool,
    current: &User,
    external_id: &str,
    request: &UpdateUserRequest,
) -> Result<User> {
    let user = get_user(pool, current, external_id).await?;

    match request.username.as_deref() {
        Some(username) => UserRepository::new(pool).update_username(user.user_id, username).await,
        None => Ok(user),
    }
}

/// Remove the provider account first, then the local one with everything it owns
pub async fn delete_user(
    pool: &PgPool,
    admin: &ProviderAdmin,
    current: &User,
    external_id: &str,
) -> Result<()> {
    let user = get_user(pool, current, external_id).await?;

    admin.delete_account(external_id).await;
    UserRepository::new(pool).delete(user.user_id).await?;

    tracing::info!(user_id = %user.user_id, "Deleted user account");
    Ok(())
}
