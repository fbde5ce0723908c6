mod custom_exercise_name;
mod exercise_goal;
mod rest_period;
mod template;
mod user;
mod workout;

pub use custom_exercise_name::CustomExerciseName;
pub use exercise_goal::ExerciseGoal;
pub use rest_period::{ParseRestPeriodError, RestPeriod};
pub use template::{ExerciseTemplate, ExerciseTemplateTree, SetTemplate, TemplateTree, WorkoutTemplate};
pub use user::User;
pub use workout::{Exercise, ExerciseTree, Set, Workout, WorkoutSummary, WorkoutTree};
