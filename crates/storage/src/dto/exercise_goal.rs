use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use super::common::{decimal_to_f64, validate_measurement};
use crate::models::ExerciseGoal;

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateExerciseGoalRequest {
    #[validate(length(
        min = 1,
        max = 255,
        message = "Exercise name must be between 1 and 255 characters"
    ))]
    pub exercise_name: String,

    #[validate(custom(function = "validate_measurement"))]
    #[schema(value_type = f64)]
    pub goal_weight: Decimal,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update_goal"))]
pub struct UpdateExerciseGoalRequest {
    #[validate(length(min = 1, max = 255))]
    pub exercise_name: Option<String>,

    #[schema(value_type = Option<f64>)]
    pub goal_weight: Option<Decimal>,
}

fn validate_update_goal(req: &UpdateExerciseGoalRequest) -> Result<(), validator::ValidationError> {
    match req.goal_weight {
        Some(ref weight) => validate_measurement(weight),
        None => Ok(()),
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct ExerciseGoalFilter {
    pub exercise_name: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExerciseGoalResponse {
    pub id: Uuid,
    pub exercise_name: String,
    pub goal_weight: f64,
}

impl From<ExerciseGoal> for ExerciseGoalResponse {
    fn from(goal: ExerciseGoal) -> Self {
        Self {
            id: goal.exercise_goal_id,
            exercise_name: goal.exercise_name,
            goal_weight: decimal_to_f64(goal.goal_weight),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_negative_goal_weight_rejected() {
        let request: CreateExerciseGoalRequest =
            serde_json::from_str(r#"{"exercise_name": "Squat", "goal_weight": -5}"#).unwrap();
        assert!(request.validate().is_err());

        let update: UpdateExerciseGoalRequest =
            serde_json::from_str(r#"{"goal_weight": -1}"#).unwrap();
        assert!(update.validate().is_err());
    }

    #[test]
    fn test_goal_weight_accepts_fractional() {
        let request: CreateExerciseGoalRequest =
            serde_json::from_str(r#"{"exercise_name": "Squat", "goal_weight": 142.5}"#).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.goal_weight, Decimal::new(1425, 1));
    }

    #[test]
    fn test_goal_weight_must_fit_the_column() {
        let request: CreateExerciseGoalRequest =
            serde_json::from_str(r#"{"exercise_name": "Squat", "goal_weight": 1000000}"#).unwrap();
        assert!(request.validate().is_err());

        let update: UpdateExerciseGoalRequest =
            serde_json::from_str(r#"{"goal_weight": 100.125}"#).unwrap();
        assert!(update.validate().is_err());
    }
}
