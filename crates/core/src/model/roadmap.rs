use serde::{Deserialize, Serialize};

use crate::model::learning_path::round_percent;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeStatus {
    Completed,
    InProgress,
    Locked,
}

impl NodeStatus {
    /// Locked nodes are inert.
    #[must_use]
    pub fn is_interactive(self) -> bool {
        !matches!(self, NodeStatus::Locked)
    }
}

/// Entry of the skill roadmap.
///
/// `prerequisites` is informational: status is supplied, never derived from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoadmapNode {
    pub id: String,
    pub title: String,
    pub description: String,
    pub status: NodeStatus,
    pub level: u8,
    #[serde(default)]
    pub prerequisites: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapLevel {
    pub name: &'static str,
    pub nodes: Vec<RoadmapNode>,
}

/// Tier names, indexed by `RoadmapNode::level`.
pub const LEVEL_NAMES: [&str; 4] = ["Foundation", "Intermediate", "Advanced", "Expert"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoadmapProgress {
    pub completed: usize,
    pub total: usize,
}

impl RoadmapProgress {
    #[must_use]
    pub fn of(nodes: &[RoadmapNode]) -> Self {
        Self {
            completed: nodes
                .iter()
                .filter(|n| n.status == NodeStatus::Completed)
                .count(),
            total: nodes.len(),
        }
    }

    /// `round(completed / total * 100)`, zero for an empty roadmap.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        round_percent(self.completed as f64 / self.total as f64 * 100.0)
    }
}

/// Split nodes into the four named tiers. Nodes above the last tier are
/// folded into it.
#[must_use]
pub fn group_into_levels(nodes: &[RoadmapNode]) -> Vec<RoadmapLevel> {
    let last = LEVEL_NAMES.len() - 1;
    LEVEL_NAMES
        .into_iter()
        .enumerate()
        .map(|(index, name)| RoadmapLevel {
            name,
            nodes: nodes
                .iter()
                .filter(|n| usize::from(n.level).min(last) == index)
                .cloned()
                .collect(),
        })
        .collect()
}

fn node(
    id: &str,
    title: &str,
    description: &str,
    status: NodeStatus,
    level: u8,
    prerequisites: &[&str],
) -> RoadmapNode {
    RoadmapNode {
        id: id.to_owned(),
        title: title.to_owned(),
        description: description.to_owned(),
        status,
        level,
        prerequisites: prerequisites.iter().map(|p| (*p).to_owned()).collect(),
    }
}

/// The shipped web-development skill roadmap.
#[must_use]
#[rustfmt::skip]
pub fn web_development_roadmap() -> Vec<RoadmapNode> {
    use NodeStatus::{Completed, InProgress, Locked};
    vec![
        node("1", "HTML & CSS Basics", "Dasar-dasar HTML dan CSS untuk membuat halaman web", Completed, 0, &[]),
        node("2", "JavaScript Fundamentals", "Pelajari dasar-dasar JavaScript", InProgress, 0, &[]),
        node("3", "Responsive Design", "Membuat website yang responsif", Completed, 1, &["1"]),
        node("4", "CSS Frameworks", "Tailwind CSS & Bootstrap", Locked, 1, &["1", "3"]),
        node("5", "JavaScript ES6+", "Modern JavaScript features", Locked, 1, &["2"]),
        node("6", "DOM Manipulation", "Manipulasi elemen HTML dengan JavaScript", Locked, 1, &["2"]),
        node("7", "React Fundamentals", "Membangun aplikasi dengan React", Locked, 2, &["5", "6"]),
        node("8", "State Management", "Redux & Context API", Locked, 2, &["7"]),
        node("9", "API Integration", "Bekerja dengan REST API", Locked, 2, &["5"]),
        node("10", "Full Stack Project", "Bangun aplikasi web lengkap", Locked, 3, &["7", "8", "9"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shipped_roadmap_progress_is_twenty_percent() {
        let nodes = web_development_roadmap();
        let progress = RoadmapProgress::of(&nodes);
        assert_eq!(progress.completed, 2);
        assert_eq!(progress.total, 10);
        assert_eq!(progress.percent(), 20);
    }

    #[test]
    fn empty_roadmap_has_zero_progress() {
        assert_eq!(RoadmapProgress::of(&[]).percent(), 0);
    }

    #[test]
    fn levels_follow_tier_order() {
        let levels = group_into_levels(&web_development_roadmap());
        let sizes: Vec<_> = levels.iter().map(|l| l.nodes.len()).collect();
        assert_eq!(sizes, [2, 4, 3, 1]);
        assert_eq!(levels[3].name, "Expert");
    }

    #[test]
    fn status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&NodeStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert!(!NodeStatus::Locked.is_interactive());
        assert!(NodeStatus::Completed.is_interactive());
    }
}
