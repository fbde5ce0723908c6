//! Just-in-time provisioning of local users for identity-provider subjects.

use sqlx::{PgConnection, PgPool};
use tracing::{info, warn};

use crate::error::{Result, StorageError};
use crate::models::User;
use crate::repository::user;

/// Find or create the local user for a verified subject.
///
/// Lookup order: the subject id, then the email (adopting that account and
/// recording the subject id on it), then a new account.
pub async fn resolve_user(pool: &PgPool, external_id: &str, email: Option<&str>) -> Result<User> {
    let mut tx = pool.begin().await?;

    if let Some(existing) = find_or_link(&mut tx, external_id, email).await? {
        tx.commit().await?;
        return Ok(existing);
    }

    match user::insert(&mut tx, external_id, email).await {
        Ok(created) => {
            tx.commit().await?;
            info!(user_id = %created.user_id, "Provisioned new user");
            Ok(created)
        }
        Err(e) if e.is_unique_violation() => {
            drop(tx);
            warn!("User provisioning raced, looking the account up again");
            reload_after_race(pool, external_id, email).await
        }
        Err(e) => Err(e),
    }
}

/// A concurrent request inserted a user with this subject or this email
/// first. Either way the lookup now finds it.
async fn reload_after_race(pool: &PgPool, external_id: &str, email: Option<&str>) -> Result<User> {
    let mut tx = pool.begin().await?;

    let found = find_or_link(&mut tx, external_id, email)
        .await?
        .ok_or(StorageError::NotFound)?;
    tx.commit().await?;

    Ok(found)
}

async fn find_or_link(
    conn: &mut PgConnection,
    external_id: &str,
    email: Option<&str>,
) -> Result<Option<User>> {
    if let Some(existing) = user::find_by_external_id(conn, external_id).await? {
        return Ok(Some(existing));
    }

    let Some(email) = email else {
        return Ok(None);
    };
    let Some(by_email) = user::find_by_email(conn, email).await? else {
        return Ok(None);
    };

    let linked = user::set_external_id(conn, by_email.user_id, external_id).await?;
    info!(user_id = %linked.user_id, "Linked existing account to identity provider subject");

    Ok(Some(linked))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_resolve_creates_then_reuses(pool: PgPool) -> Result<()> {
        let created = resolve_user(&pool, "sub-1", Some("lifter@example.com")).await?;
        let again = resolve_user(&pool, "sub-1", Some("lifter@example.com")).await?;

        assert_eq!(created.user_id, again.user_id);
        assert_eq!(created.external_id.as_deref(), Some("sub-1"));

        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_resolve_links_by_email(pool: PgPool) -> Result<()> {
        let by_email = resolve_user(&pool, "old-sub", Some("lifter@example.com")).await?;
        let linked = resolve_user(&pool, "new-sub", Some("lifter@example.com")).await?;

        assert_eq!(by_email.user_id, linked.user_id);
        assert_eq!(linked.external_id.as_deref(), Some("new-sub"));

        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_reload_after_email_race_links_the_winner(pool: PgPool) -> Result<()> {
        let mut conn = pool.acquire().await?;
        let winner = user::insert(&mut conn, "sub-a", Some("lifter@example.com")).await?;
        drop(conn);

        let resolved = reload_after_race(&pool, "sub-b", Some("lifter@example.com")).await?;

        assert_eq!(resolved.user_id, winner.user_id);
        assert_eq!(resolved.external_id.as_deref(), Some("sub-b"));

        Ok(())
    }

    #[sqlx::test]
    #[ignore = "requires DATABASE_URL"]
    async fn test_reload_after_subject_race_finds_the_winner(pool: PgPool) -> Result<()> {
        let mut conn = pool.acquire().await?;
        let winner = user::insert(&mut conn, "sub-a", None).await?;
        drop(conn);

        let resolved = reload_after_race(&pool, "sub-a", Some("lifter@example.com")).await?;

        assert_eq!(resolved.user_id, winner.user_id);

        Ok(())
    }
}
