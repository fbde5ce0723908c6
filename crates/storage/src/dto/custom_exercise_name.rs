use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::CustomExerciseName;

/// Request payload for creating or renaming a custom exercise name
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CustomExerciseNameRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Name must be between 1 and 255 characters"
    ))]
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CustomExerciseNameResponse {
    pub id: Uuid,
    pub name: String,
}

impl From<CustomExerciseName> for CustomExerciseNameResponse {
    fn from(custom: CustomExerciseName) -> Self {
        Self {
            id: custom.custom_exercise_name_id,
            name: custom.name,
        }
    }
}
