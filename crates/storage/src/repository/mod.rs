pub mod custom_exercise_name;
pub mod exercise;
pub mod exercise_goal;
pub mod template;
pub mod user;
pub mod workout;

mod tree;

pub use custom_exercise_name::CustomExerciseNameRepository;
pub use exercise::ExerciseRepository;
pub use exercise_goal::ExerciseGoalRepository;
pub use template::TemplateRepository;
pub use user::UserRepository;
pub use workout::WorkoutRepository;
