use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Local account mirroring an identity-provider subject.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct User {
    pub user_id: Uuid,
    pub external_id: Option<String>,
    pub email: Option<String>,
    pub username: Option<String>,
    pub created_at: DateTime<Utc>,
}
