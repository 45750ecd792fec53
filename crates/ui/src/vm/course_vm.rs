use std::collections::HashMap;

use coddy_core::model::{Course, CourseId, LevelGroup, group_by_level, set_graduated};
use services::{ApiError, CoddyApi, InFlight, InFlightGuard, RequestKey};

const TOGGLE_OPERATION: &str = "course.toggle";

pub const TOGGLE_FAILED_MESSAGE: &str = "Failed to update progress";

/// Lifecycle of one course's completion toggle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ToggleState {
    #[default]
    Idle,
    Pending,
    Committed,
    Reverted,
}

/// A claimed toggle. The flag is already flipped locally; hand it back to
/// [`CourseListVm::finish_toggle`] with the remote result.
#[derive(Debug)]
pub struct PendingToggle {
    pub course_id: CourseId,
    pub target: bool,
    _guard: InFlightGuard,
}

/// Course list of one learning path plus per-course toggle state.
#[derive(Debug, Clone)]
pub struct CourseListVm {
    courses: Vec<Course>,
    toggles: HashMap<CourseId, ToggleState>,
    inflight: InFlight,
    notice: Option<String>,
}

impl CourseListVm {
    #[must_use]
    pub fn new(courses: Vec<Course>, inflight: InFlight) -> Self {
        Self {
            courses,
            toggles: HashMap::new(),
            inflight,
            notice: None,
        }
    }

    #[must_use]
    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    #[must_use]
    pub fn groups(&self) -> Vec<LevelGroup> {
        group_by_level(&self.courses)
    }

    #[must_use]
    pub fn toggle_state(&self, course_id: CourseId) -> ToggleState {
        self.toggles.get(&course_id).copied().unwrap_or_default()
    }

    /// Any toggle running on this view.
    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.inflight.is_operation_pending(TOGGLE_OPERATION)
    }

    #[must_use]
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Flip the course locally and claim the toggle latch.
    ///
    /// Returns `None` for unknown courses and while another toggle on this
    /// view is still pending.
    pub fn begin_toggle(&mut self, course_id: CourseId) -> Option<PendingToggle> {
        let target = self
            .courses
            .iter()
            .find(|c| c.course_id == course_id)?
            .toggle_target();
        let guard = self
            .inflight
            .try_begin_exclusive(RequestKey::new(TOGGLE_OPERATION, course_id))?;

        set_graduated(&mut self.courses, course_id, target);
        self.toggles.insert(course_id, ToggleState::Pending);
        self.notice = None;
        Some(PendingToggle {
            course_id,
            target,
            _guard: guard,
        })
    }

    /// Settle a toggle. A rejected update restores the previous flag.
    pub fn finish_toggle(&mut self, pending: PendingToggle, result: Result<(), ApiError>) {
        let state = match result {
            Ok(()) => ToggleState::Committed,
            Err(err) => {
                tracing::warn!(course_id = %pending.course_id, error = %err, "progress update rejected");
                set_graduated(&mut self.courses, pending.course_id, !pending.target);
                self.notice = Some(TOGGLE_FAILED_MESSAGE.to_owned());
                ToggleState::Reverted
            }
        };
        self.toggles.insert(pending.course_id, state);
    }
}

/// Send a claimed toggle to the backend.
///
/// # Errors
///
/// Returns the backend rejection unchanged.
pub async fn commit_toggle(api: &CoddyApi, pending: &PendingToggle) -> Result<(), ApiError> {
    api.update_course_progress(pending.course_id, pending.target)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    use backend::{Backend, FailureMode, InMemoryBackend, Operation};
    use coddy_core::model::{Credentials, LearningPathId};

    async fn signed_in_api(project: &InMemoryBackend) -> CoddyApi {
        project.register("rina@example.com", "rahasia1");
        let api = CoddyApi::new(Backend::in_memory(project));
        api.sign_in(Credentials::new("rina@example.com", "rahasia1"))
            .await
            .unwrap();
        api
    }

    async fn loaded(api: &CoddyApi) -> CourseListVm {
        let courses = api
            .fetch_courses_by_learning_path(LearningPathId::new(1))
            .await
            .unwrap();
        CourseListVm::new(courses, InFlight::new())
    }

    fn flag(vm: &CourseListVm, id: u64) -> bool {
        vm.courses()
            .iter()
            .find(|c| c.course_id == CourseId::new(id))
            .is_some_and(|c| c.is_graduated)
    }

    #[tokio::test]
    async fn toggle_flips_optimistically_then_commits() {
        let project = InMemoryBackend::seeded();
        let api = signed_in_api(&project).await;
        let mut vm = loaded(&api).await;

        let pending = vm.begin_toggle(CourseId::new(101)).unwrap();
        assert!(flag(&vm, 101));
        assert_eq!(vm.toggle_state(CourseId::new(101)), ToggleState::Pending);
        assert!(vm.is_busy());

        let result = commit_toggle(&api, &pending).await;
        vm.finish_toggle(pending, result);
        assert!(flag(&vm, 101));
        assert_eq!(vm.toggle_state(CourseId::new(101)), ToggleState::Committed);
        assert!(!vm.is_busy());
    }

    #[tokio::test]
    async fn rejected_toggle_reverts_and_shows_notice() {
        let project = InMemoryBackend::seeded();
        let api = signed_in_api(&project).await;
        let mut vm = loaded(&api).await;
        project.fail(Operation::Rpc, FailureMode::Once, "permission denied");

        let pending = vm.begin_toggle(CourseId::new(103)).unwrap();
        let result = commit_toggle(&api, &pending).await;
        vm.finish_toggle(pending, result);

        assert!(!flag(&vm, 103));
        assert_eq!(vm.toggle_state(CourseId::new(103)), ToggleState::Reverted);
        assert_eq!(vm.notice(), Some(TOGGLE_FAILED_MESSAGE));

        vm.dismiss_notice();
        assert_eq!(vm.notice(), None);
        assert_eq!(vm.toggle_state(CourseId::new(103)), ToggleState::Reverted);
    }

    #[tokio::test]
    async fn second_toggle_while_pending_is_dropped() {
        let project = InMemoryBackend::seeded();
        let api = signed_in_api(&project).await;
        let mut vm = loaded(&api).await;

        let first = vm.begin_toggle(CourseId::new(101)).unwrap();
        assert!(vm.begin_toggle(CourseId::new(102)).is_none());
        assert!(vm.begin_toggle(CourseId::new(101)).is_none());
        assert!(!flag(&vm, 102));

        vm.finish_toggle(first, Ok(()));
        assert!(vm.begin_toggle(CourseId::new(102)).is_some());
    }

    #[test]
    fn unknown_course_is_ignored() {
        let mut vm = CourseListVm::new(Vec::new(), InFlight::new());
        assert!(vm.begin_toggle(CourseId::new(9)).is_none());
        assert!(!vm.is_busy());
    }
}
