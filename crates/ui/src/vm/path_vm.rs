use coddy_core::model::{LearningPath, LearningPathId};

use super::time_fmt::format_hours;

/// Presentation hints for a learning path, looked up by its name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PathMetadata {
    pub icon: &'static str,
    pub accent: &'static str,
    pub description: &'static str,
}

const PATH_METADATA: &[(&str, PathMetadata)] = &[
    (
        "Web Development",
        PathMetadata {
            icon: "code",
            accent: "blue",
            description: "Pelajari HTML, CSS, JavaScript, React, dan teknologi web modern",
        },
    ),
    (
        "Mobile Development",
        PathMetadata {
            icon: "smartphone",
            accent: "purple",
            description: "Bangun aplikasi mobile dengan React Native dan Flutter",
        },
    ),
    (
        "Data Science",
        PathMetadata {
            icon: "database",
            accent: "green",
            description: "Analisis data, machine learning, dan visualisasi data",
        },
    ),
    (
        "Machine Learning",
        PathMetadata {
            icon: "brain",
            accent: "orange",
            description: "Deep learning, AI, dan model prediktif",
        },
    ),
    (
        "Back-End Developer",
        PathMetadata {
            icon: "server",
            accent: "teal",
            description: "Server, database, API, dan cloud computing",
        },
    ),
    (
        "Front-End Developer",
        PathMetadata {
            icon: "globe",
            accent: "indigo",
            description: "Frontend development end-to-end",
        },
    ),
];

pub const DEFAULT_PATH_METADATA: PathMetadata = PathMetadata {
    icon: "code",
    accent: "gray",
    description: "Learning Path",
};

#[must_use]
pub fn path_metadata(name: &str) -> PathMetadata {
    PATH_METADATA
        .iter()
        .find(|(known, _)| *known == name)
        .map_or(DEFAULT_PATH_METADATA, |(_, meta)| *meta)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PathCardVm {
    pub id: LearningPathId,
    pub name: String,
    pub meta: PathMetadata,
    pub progress: u8,
    pub started: bool,
    pub courses_label: String,
    pub hours_label: String,
}

#[must_use]
pub fn map_path_cards(paths: &[LearningPath]) -> Vec<PathCardVm> {
    paths
        .iter()
        .map(|path| PathCardVm {
            id: path.learning_path_id,
            name: path.learning_path_name.clone(),
            meta: path_metadata(&path.learning_path_name),
            progress: path.rounded_progress(),
            started: path.is_started(),
            courses_label: format!("{} kelas", path.total_courses),
            hours_label: format_hours(path.total_hours),
        })
        .collect()
}
