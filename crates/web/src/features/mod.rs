pub mod custom_exercise_names;
pub mod exercise_goals;
pub mod exercises;
pub mod templates;
pub mod users;
pub mod workouts;
