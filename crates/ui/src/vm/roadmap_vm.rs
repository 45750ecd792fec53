use coddy_core::model::{
    LearningPathId, NodeStatus, RoadmapLevel, RoadmapNode, RoadmapProgress, group_into_levels,
};

/// Icon, accent class and badge text for a node status.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NodeStyle {
    pub icon: &'static str,
    pub accent: &'static str,
    pub badge: &'static str,
}

#[must_use]
pub fn node_style(status: NodeStatus) -> NodeStyle {
    match status {
        NodeStatus::Completed => NodeStyle {
            icon: "✔",
            accent: "node-completed",
            badge: "Selesai",
        },
        NodeStatus::InProgress => NodeStyle {
            icon: "◯",
            accent: "node-in-progress",
            badge: "Lanjutkan",
        },
        NodeStatus::Locked => NodeStyle {
            icon: "🔒",
            accent: "node-locked",
            badge: "Selesaikan prerequisites terlebih dahulu",
        },
    }
}

/// What the roadmap page currently shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum RoadmapScreen {
    #[default]
    SelectPath,
    Skills {
        path_id: LearningPathId,
        path_name: String,
    },
}

/// Skill roadmap of the selected path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RoadmapVm {
    levels: Vec<RoadmapLevel>,
    progress: RoadmapProgress,
    selected: Option<String>,
}

impl RoadmapVm {
    #[must_use]
    pub fn from_nodes(nodes: &[RoadmapNode]) -> Self {
        Self {
            levels: group_into_levels(nodes),
            progress: RoadmapProgress::of(nodes),
            selected: None,
        }
    }

    #[must_use]
    pub fn levels(&self) -> &[RoadmapLevel] {
        &self.levels
    }

    #[must_use]
    pub fn progress(&self) -> RoadmapProgress {
        self.progress
    }

    #[must_use]
    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Select a node. Locked and unknown nodes are refused.
    pub fn select(&mut self, node_id: &str) -> bool {
        let interactive = self
            .levels
            .iter()
            .flat_map(|level| level.nodes.iter())
            .find(|node| node.id == node_id)
            .is_some_and(|node| node.status.is_interactive());
        if interactive {
            self.selected = Some(node_id.to_owned());
        }
        interactive
    }

    #[must_use]
    pub fn summary_label(&self) -> String {
        format!(
            "{} dari {} skill diselesaikan",
            self.progress.completed, self.progress.total
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use coddy_core::model::web_development_roadmap;

    #[test]
    fn built_in_roadmap_reports_progress() {
        let vm = RoadmapVm::from_nodes(&web_development_roadmap());
        assert_eq!(vm.progress().percent(), 20);
        assert_eq!(vm.summary_label(), "2 dari 10 skill diselesaikan");
        let names: Vec<&str> = vm.levels().iter().map(|l| l.name).collect();
        assert_eq!(names, ["Foundation", "Intermediate", "Advanced", "Expert"]);
    }

    #[test]
    fn locked_nodes_cannot_be_selected() {
        let mut vm = RoadmapVm::from_nodes(&web_development_roadmap());
        assert!(!vm.select("4"));
        assert_eq!(vm.selected(), None);
        assert!(vm.select("2"));
        assert_eq!(vm.selected(), Some("2"));
        assert!(!vm.select("missing"));
        assert_eq!(vm.selected(), Some("2"));
    }

    #[test]
    fn empty_roadmap_is_zero_percent() {
        let vm = RoadmapVm::from_nodes(&[]);
        assert_eq!(vm.progress().percent(), 0);
    }

    #[test]
    fn status_styles_differ() {
        assert_ne!(
            node_style(NodeStatus::Completed),
            node_style(NodeStatus::Locked)
        );
        assert_eq!(node_style(NodeStatus::InProgress).badge, "Lanjutkan");
    }
}
