use serde::{Deserialize, Deserializer, Serialize};

use crate::model::ids::LearningPathId;

/// Aggregated view of a learning path with the caller's progress.
///
/// Rows come from the `get_learning_paths_with_progress` procedure; this is
/// a derived view, not a table row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LearningPath {
    pub learning_path_id: LearningPathId,
    pub learning_path_name: String,
    #[serde(default)]
    pub total_courses: u32,
    #[serde(default, deserialize_with = "de_hours")]
    pub total_hours: f64,
    #[serde(default, deserialize_with = "de_percent")]
    pub progress_percent: f64,
}

impl LearningPath {
    #[must_use]
    pub fn new(
        learning_path_id: LearningPathId,
        learning_path_name: impl Into<String>,
        total_courses: u32,
        total_hours: f64,
        progress_percent: f64,
    ) -> Self {
        Self {
            learning_path_id,
            learning_path_name: learning_path_name.into(),
            total_courses,
            total_hours: total_hours.max(0.0),
            progress_percent: clamp_percent(progress_percent),
        }
    }

    /// Progress rounded to a whole percent for display.
    #[must_use]
    pub fn rounded_progress(&self) -> u8 {
        round_percent(self.progress_percent)
    }

    #[must_use]
    pub fn is_started(&self) -> bool {
        self.progress_percent > 0.0
    }
}

/// Clamp into `[0, 100]`, mapping NaN to zero.
#[must_use]
pub fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 100.0)
    }
}

#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn round_percent(value: f64) -> u8 {
    clamp_percent(value).round() as u8
}

fn de_percent<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.map_or(0.0, clamp_percent))
}

fn de_hours<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw.unwrap_or(0.0).max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_procedure_row_and_clamps_progress() {
        let json = r#"{
            "learning_path_id": 3,
            "learning_path_name": "Back-End Developer",
            "total_courses": 12,
            "total_hours": 140.5,
            "progress_percent": 104.2
        }"#;
        let path: LearningPath = serde_json::from_str(json).unwrap();
        assert_eq!(path.learning_path_id, LearningPathId::new(3));
        assert!((path.progress_percent - 100.0).abs() < f64::EPSILON);
        assert_eq!(path.rounded_progress(), 100);
    }

    #[test]
    fn null_progress_is_zero() {
        let json = r#"{
            "learning_path_id": 1,
            "learning_path_name": "Web Development",
            "total_courses": 0,
            "total_hours": null,
            "progress_percent": null
        }"#;
        let path: LearningPath = serde_json::from_str(json).unwrap();
        assert_eq!(path.rounded_progress(), 0);
        assert!(!path.is_started());
        assert!(path.total_hours.abs() < f64::EPSILON);
    }

    #[test]
    fn rounding_matches_display() {
        assert_eq!(round_percent(33.4), 33);
        assert_eq!(round_percent(66.6), 67);
        assert_eq!(round_percent(-3.0), 0);
        assert_eq!(round_percent(f64::NAN), 0);
    }
}
