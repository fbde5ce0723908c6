use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use super::common::validate_rep_range;
use crate::models::{ExerciseTemplateTree, RestPeriod, SetTemplate, TemplateTree};

/// Nested payload for creating a template together with its exercises and sets
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTemplateRequest {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Name must be between 1 and 100 characters"
    ))]
    pub name: String,

    #[serde(default)]
    pub notes: String,

    #[validate(nested)]
    pub exercise_templates: Vec<ExerciseTemplateInput>,
}

/// Partial update; `exercise_templates`, when present, replaces every child
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateTemplateRequest {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,

    pub notes: Option<String>,

    #[validate(nested)]
    pub exercise_templates: Option<Vec<ExerciseTemplateInput>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_exercise_template_input"))]
pub struct ExerciseTemplateInput {
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

    #[validate(range(min = 0))]
    pub min_reps: Option<i32>,

    #[validate(range(min = 0))]
    pub max_reps: Option<i32>,

    #[validate(nested)]
    pub set_templates: Vec<SetTemplateInput>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_set_template_input"))]
pub struct SetTemplateInput {
    #[validate(range(min = 0))]
    pub min_reps: Option<i32>,

    #[validate(range(min = 0))]
    pub max_reps: Option<i32>,

    #[serde(default)]
    pub notes: String,
}

fn validate_exercise_template_input(
    input: &ExerciseTemplateInput,
) -> Result<(), validator::ValidationError> {
    validate_rep_range(input.min_reps, input.max_reps)
}

fn validate_set_template_input(input: &SetTemplateInput) -> Result<(), validator::ValidationError> {
    validate_rep_range(input.min_reps, input.max_reps)
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TemplateResponse {
    pub id: Uuid,
    pub user: Uuid,
    pub name: String,
    pub notes: String,
    pub exercise_templates: Vec<ExerciseTemplateResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ExerciseTemplateResponse {
    pub id: Uuid,
    pub name: String,
    #[schema(value_type = String, example = "00:02:00")]
    pub rest_period: RestPeriod,
    pub notes: String,
    pub min_reps: Option<i32>,
    pub max_reps: Option<i32>,
    pub set_templates: Vec<SetTemplateResponse>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SetTemplateResponse {
    pub id: Uuid,
    pub min_reps: Option<i32>,
    pub max_reps: Option<i32>,
    pub notes: String,
}

impl From<TemplateTree> for TemplateResponse {
    fn from(tree: TemplateTree) -> Self {
        Self {
            id: tree.template.template_id,
            user: tree.template.user_id,
            name: tree.template.name,
            notes: tree.template.notes,
            exercise_templates: tree
                .exercises
                .into_iter()
                .map(ExerciseTemplateResponse::from)
                .collect(),
        }
    }
}

impl From<ExerciseTemplateTree> for ExerciseTemplateResponse {
    fn from(tree: ExerciseTemplateTree) -> Self {
        Self {
            id: tree.exercise.exercise_template_id,
            name: tree.exercise.name,
            rest_period: tree.exercise.rest_period,
            notes: tree.exercise.notes,
            min_reps: tree.exercise.min_reps,
            max_reps: tree.exercise.max_reps,
            set_templates: tree.sets.into_iter().map(SetTemplateResponse::from).collect(),
        }
    }
}

impl From<SetTemplate> for SetTemplateResponse {
    fn from(set: SetTemplate) -> Self {
        Self {
            id: set.set_template_id,
            min_reps: set.min_reps,
            max_reps: set.max_reps,
            notes: set.notes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_day_payload_parses_and_validates() {
        let payload = r#"{
            "name": "Leg Day",
            "exercise_templates": [{
                "name": "Squat",
                "rest_period": "PT2M",
                "set_templates": [
                    {"min_reps": 5, "max_reps": 5, "notes": ""},
                    {"min_reps": 5, "max_reps": 5, "notes": ""}
                ]
            }]
        }"#;

        let request: CreateTemplateRequest = serde_json::from_str(payload).unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.notes, "");
        assert_eq!(request.exercise_templates[0].rest_period.seconds(), 120);
        assert_eq!(request.exercise_templates[0].set_templates.len(), 2);
    }

    #[test]
    fn test_missing_set_templates_is_rejected() {
        let payload = r#"{
            "name": "Push",
            "exercise_templates": [{"name": "Bench", "rest_period": "00:01:30"}]
        }"#;

        assert!(serde_json::from_str::<CreateTemplateRequest>(payload).is_err());
    }

    #[test]
    fn test_nested_rep_range_is_validated() {
        let payload = r#"{
            "name": "Pull",
            "exercise_templates": [{
                "name": "Row",
                "rest_period": 60,
                "set_templates": [{"min_reps": 12, "max_reps": 8}]
            }]
        }"#;

        let request: CreateTemplateRequest = serde_json::from_str(payload).unwrap();
        let errors = request.validate().unwrap_err();
        assert!(errors.errors().contains_key("exercise_templates"));
    }

    #[test]
    fn test_update_request_absent_fields_stay_none() {
        let request: UpdateTemplateRequest = serde_json::from_str(r#"{"notes": "x"}"#).unwrap();
        assert_eq!(request.notes.as_deref(), Some("x"));
        assert!(request.name.is_none());
        assert!(request.exercise_templates.is_none());
    }
}
