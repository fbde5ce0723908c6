//! Grouping of flat child rows into ordered trees.

use std::collections::HashMap;

use uuid::Uuid;

use crate::models::{
    Exercise, ExerciseTemplate, ExerciseTemplateTree, ExerciseTree, Set, SetTemplate,
    TemplateTree, WorkoutTemplate,
};

/// Attaches each set to its exercise. Parents keep their given order and
/// children keep theirs; a set whose exercise is absent is dropped.
pub(crate) fn assemble_exercises(exercises: Vec<Exercise>, sets: Vec<Set>) -> Vec<ExerciseTree> {
    let mut by_parent = group_by(sets, |set| set.exercise_id);

    exercises
        .into_iter()
        .map(|exercise| ExerciseTree {
            sets: by_parent.remove(&exercise.exercise_id).unwrap_or_default(),
            exercise,
        })
        .collect()
}

pub(crate) fn assemble_exercise_templates(
    exercises: Vec<ExerciseTemplate>,
    sets: Vec<SetTemplate>,
) -> Vec<ExerciseTemplateTree> {
    let mut by_parent = group_by(sets, |set| set.exercise_template_id);

    exercises
        .into_iter()
        .map(|exercise| ExerciseTemplateTree {
            sets: by_parent
                .remove(&exercise.exercise_template_id)
                .unwrap_or_default(),
            exercise,
        })
        .collect()
}

pub(crate) fn assemble_templates(
    templates: Vec<WorkoutTemplate>,
    exercises: Vec<ExerciseTemplateTree>,
) -> Vec<TemplateTree> {
    let mut by_parent = group_by(exercises, |tree| tree.exercise.template_id);

    templates
        .into_iter()
        .map(|template| TemplateTree {
            exercises: by_parent.remove(&template.template_id).unwrap_or_default(),
            template,
        })
        .collect()
}

fn group_by<T>(items: Vec<T>, key: impl Fn(&T) -> Uuid) -> HashMap<Uuid, Vec<T>> {
    let mut groups: HashMap<Uuid, Vec<T>> = HashMap::new();
    for item in items {
        groups.entry(key(&item)).or_default().push(item);
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RestPeriod;

    fn exercise(workout_id: Uuid, position: i32, name: &str) -> Exercise {
        Exercise {
            exercise_id: Uuid::new_v4(),
            workout_id,
            position,
            name: name.to_string(),
            rest_period: RestPeriod::default(),
            notes: String::new(),
        }
    }

    fn set(exercise_id: Uuid, position: i32) -> Set {
        Set {
            set_id: Uuid::new_v4(),
            exercise_id,
            position,
            reps: None,
            min_reps: None,
            max_reps: None,
            weight: None,
            notes: String::new(),
        }
    }

    #[test]
    fn test_assemble_exercises_keeps_order() {
        let workout_id = Uuid::new_v4();
        let squat = exercise(workout_id, 0, "Squat");
        let bench = exercise(workout_id, 1, "Bench");
        let sets = vec![
            set(bench.exercise_id, 0),
            set(squat.exercise_id, 0),
            set(squat.exercise_id, 1),
        ];
        let squat_sets: Vec<Uuid> = sets[1..].iter().map(|s| s.set_id).collect();

        let trees = assemble_exercises(vec![squat, bench], sets);

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].exercise.name, "Squat");
        assert_eq!(
            trees[0].sets.iter().map(|s| s.set_id).collect::<Vec<_>>(),
            squat_sets
        );
        assert_eq!(trees[1].sets.len(), 1);
    }

    #[test]
    fn test_exercise_without_sets_gets_empty_list() {
        let trees = assemble_exercises(vec![exercise(Uuid::new_v4(), 0, "Plank")], Vec::new());
        assert!(trees[0].sets.is_empty());
    }
}
