pub mod common;
pub mod custom_exercise_name;
pub mod exercise;
pub mod exercise_goal;
pub mod template;
pub mod user;
pub mod workout;
