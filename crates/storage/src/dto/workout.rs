use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::{decimal_to_f64, deserialize_present, validate_measurement, validate_rep_range};
use crate::models::{ExerciseTree, RestPeriod, Set, WorkoutSummary, WorkoutTree};

/// Request payload for instantiating a workout from a template
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateWorkoutRequest {
    pub template: Uuid,

    /// Defaults to the time of the request
    pub date: Option<DateTime<Utc>>,
}

/// Partial update; `exercises`, when present, replaces every exercise and set
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateWorkoutRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub date: Option<DateTime<Utc>>,

    pub notes: Option<String>,

    #[validate(nested)]
    pub exercises: Option<Vec<ExerciseInput>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct ExerciseInput {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[schema(value_type = String, example = "PT2M")]
    pub rest_period: RestPeriod,

    #[serde(default)]
    pub notes: String,

    #[validate(nested)]
    pub sets: Vec<SetInput>,
}

/// A set as submitted by the client. Omitted `reps`/`weight` become zero,
/// an explicit `null` is stored as not yet performed.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_set_input"))]
pub struct SetInput {
    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<f64>)]
    pub reps: Option<Option<Decimal>>,

    #[validate(range(min = 0))]
    pub min_reps: Option<i32>,

    #[validate(range(min = 0))]
    pub max_reps: Option<i32>,

    #[serde(default, deserialize_with = "deserialize_present")]
    #[schema(value_type = Option<f64>)]
    pub weight: Option<Option<Decimal>>,

    #[serde(default)]
    pub notes: String,
}

impl SetInput {
    pub fn reps_or_default(&self) -> Option<Decimal> {
        self.reps.unwrap_or(Some(Decimal::ZERO))
    }

    pub fn weight_or_default(&self) -> Option<Decimal> {
        self.weight.unwrap_or(Some(Decimal::ZERO))
    }
}

fn validate_set_input(input: &SetInput) -> Result<(), validator::ValidationError> {
    validate_rep_range(input.min_reps, input.max_reps)?;

    for value in [input.reps_or_default(), input.weight_or_default()]
        .into_iter()
        .flatten()
    {
        validate_measurement(&value)?;
    }

    Ok(())
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkoutResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub exercises: Vec<ExerciseResponse>,
    pub template: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExerciseResponse {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "00:02:00")]
    pub rest_period: RestPeriod,
    pub notes: String,
    pub sets: Vec<SetResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetResponse {
    pub id: Uuid,
    pub reps: Option<f64>,
    pub min_reps: Option<i32>,
    pub max_reps: Option<i32>,
    pub weight: Option<f64>,
    pub notes: String,
}

/// Compact workout entry used by the paginated listing
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WorkoutListEntry {
    pub id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub notes: String,
    pub template: Option<Uuid>,
    pub exercise_count: i64,
}

impl From<WorkoutTree> for WorkoutResponse {
    fn from(tree: WorkoutTree) -> Self {
        Self {
            id: tree.workout.workout_id,
            user: tree.workout.user_id,
            name: tree.workout.name,
            date: tree.workout.date,
            notes: tree.workout.notes,
            exercises: tree.exercises.into_iter().map(ExerciseResponse::from).collect(),
            template: tree.workout.template_id,
        }
    }
}

impl From<ExerciseTree> for ExerciseResponse {
    fn from(tree: ExerciseTree) -> Self {
        Self {
            id: tree.exercise.exercise_id,
            name: tree.exercise.name,
            rest_period: tree.exercise.rest_period,
            notes: tree.exercise.notes,
            sets: tree.sets.into_iter().map(SetResponse::from).collect(),
        }
    }
}

impl From<Set> for SetResponse {
    fn from(set: Set) -> Self {
        Self {
            id: set.set_id,
            reps: set.reps.map(decimal_to_f64),
            min_reps: set.min_reps,
            max_reps: set.max_reps,
            weight: set.weight.map(decimal_to_f64),
            notes: set.notes,
        }
    }
}

impl From<WorkoutSummary> for WorkoutListEntry {
    fn from(summary: WorkoutSummary) -> Self {
        Self {
            id: summary.workout_id,
            name: summary.name,
            date: summary.date,
            notes: summary.notes,
            template: summary.template_id,
            exercise_count: summary.exercise_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_reps_and_weight_default_to_zero() {
        let set: SetInput = serde_json::from_str(r#"{"notes": "warmup"}"#).unwrap();
        assert_eq!(set.reps_or_default(), Some(Decimal::ZERO));
        assert_eq!(set.weight_or_default(), Some(Decimal::ZERO));
    }

    #[test]
    fn test_explicit_null_reps_is_kept() {
        let set: SetInput = serde_json::from_str(r#"{"reps": null, "weight": 62.5}"#).unwrap();
        assert_eq!(set.reps_or_default(), None);
        assert_eq!(set.weight_or_default(), Some(Decimal::new(625, 1)));
    }

    #[test]
    fn test_exercise_without_sets_fails_to_parse() {
        let payload = r#"{"exercises": [{"name": "Squat", "rest_period": "PT2M"}]}"#;
        assert!(serde_json::from_str::<UpdateWorkoutRequest>(payload).is_err());
    }

    #[test]
    fn test_negative_weight_is_invalid() {
        let payload = r#"{"exercises": [{
            "name": "Squat",
            "rest_period": "PT2M",
            "sets": [{"reps": 5, "weight": -20}]
        }]}"#;

        let request: UpdateWorkoutRequest = serde_json::from_str(payload).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_weight_beyond_column_range_is_invalid() {
        let payload = r#"{"exercises": [{
            "name": "Squat",
            "rest_period": "PT2M",
            "sets": [{"reps": 5, "weight": 1000000}]
        }]}"#;

        let request: UpdateWorkoutRequest = serde_json::from_str(payload).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_weight_with_three_decimals_is_invalid() {
        let set: SetInput = serde_json::from_str(r#"{"reps": 5, "weight": 22.675}"#).unwrap();
        assert!(set.validate().is_err());

        let set: SetInput = serde_json::from_str(r#"{"reps": 5.5, "weight": 22.75}"#).unwrap();
        assert!(set.validate().is_ok());
    }

    #[test]
    fn test_notes_only_patch_leaves_exercises_absent() {
        let request: UpdateWorkoutRequest = serde_json::from_str(r#"{"notes": "x"}"#).unwrap();
        assert!(request.validate().is_ok());
        assert!(request.exercises.is_none());
        assert!(request.name.is_none());
        assert!(request.date.is_none());
    }
}
