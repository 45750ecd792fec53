use serde::{Deserialize, Deserializer, Serialize};

use crate::model::ids::{CourseId, LevelId};

/// A course within a learning path, with the caller's completion flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub course_id: CourseId,
    pub course_name: String,
    pub level_id: LevelId,
    pub level_name: String,
    #[serde(default, deserialize_with = "de_hours")]
    pub hours_to_study: f64,
    #[serde(default, deserialize_with = "de_flag")]
    pub is_graduated: bool,
}

impl Course {
    /// The flag value a toggle request sends: always the negation of the
    /// current state.
    #[must_use]
    pub fn toggle_target(&self) -> bool {
        !self.is_graduated
    }
}

/// Courses sharing a `level_name`, in display order.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelGroup {
    pub level_id: LevelId,
    pub level_name: String,
    pub courses: Vec<Course>,
}

impl LevelGroup {
    #[must_use]
    pub fn completed(&self) -> usize {
        self.courses.iter().filter(|c| c.is_graduated).count()
    }

    #[must_use]
    pub fn total_hours(&self) -> f64 {
        self.courses.iter().map(|c| c.hours_to_study).sum()
    }
}

/// Group courses by `level_name` and order the groups by `level_id`.
///
/// A group's `level_id` is taken from the first course seen with that name.
/// Courses keep their relative order inside a group, and groups with equal
/// level ids keep first-appearance order.
#[must_use]
pub fn group_by_level(courses: &[Course]) -> Vec<LevelGroup> {
    let mut groups: Vec<LevelGroup> = Vec::new();
    for course in courses {
        match groups
            .iter_mut()
            .find(|group| group.level_name == course.level_name)
        {
            Some(group) => group.courses.push(course.clone()),
            None => groups.push(LevelGroup {
                level_id: course.level_id,
                level_name: course.level_name.clone(),
                courses: vec![course.clone()],
            }),
        }
    }
    groups.sort_by_key(|group| group.level_id);
    groups
}

/// Set the completion flag of one course, returning whether it was found.
pub fn set_graduated(courses: &mut [Course], course_id: CourseId, is_graduated: bool) -> bool {
    match courses.iter_mut().find(|c| c.course_id == course_id) {
        Some(course) => {
            course.is_graduated = is_graduated;
            true
        }
        None => false,
    }
}

fn de_hours<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.unwrap_or(0.0).max(0.0))
}

fn de_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<bool>::deserialize(deserializer)?.unwrap_or(false))
}
