use coddy_core::model::{CourseId, LearningPathId, LevelGroup};
use dioxus::prelude::*;
use dioxus_router::Link;
use services::InFlight;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_state_from_resource};
use crate::vm::{CourseListVm, ToggleState, commit_toggle, format_hours};

#[component]
pub fn LearningPathView(id: LearningPathId) -> Element {
    let ctx = use_context::<AppContext>();
    let path_id = id;
    let inflight = use_hook(InFlight::new);
    let list = use_signal(|| None::<CourseListVm>);

    let api = ctx.api();
    let resource = use_resource(use_reactive!(|path_id| {
        let api = api.clone();
        let inflight = inflight.clone();
        let mut list = list;
        async move {
            let courses = api
                .fetch_courses_by_learning_path(path_id)
                .await
                .map_err(ViewError::from)?;
            list.set(Some(CourseListVm::new(courses, inflight)));
            Ok::<_, ViewError>(())
        }
    }));

    let api = ctx.api();
    let on_toggle = move |course_id: CourseId| {
        let mut list = list;
        let pending = list
            .write()
            .as_mut()
            .and_then(|vm| vm.begin_toggle(course_id));
        let Some(pending) = pending else {
            return;
        };
        let api = api.clone();
        spawn(async move {
            let result = commit_toggle(&api, &pending).await;
            if let Some(vm) = list.write().as_mut() {
                vm.finish_toggle(pending, result);
            }
        });
    };

    let on_dismiss = move |()| {
        let mut list = list;
        if let Some(vm) = list.write().as_mut() {
            vm.dismiss_notice();
        }
    };

    let body = match view_state_from_resource(&resource) {
        ViewState::Idle | ViewState::Loading => rsx! {
            p { class: "muted", "Loading courses..." }
        },
        ViewState::Error(err) => rsx! {
            p { class: "banner banner-error", "Error: {err}" }
        },
        ViewState::Ready(()) => {
            let guard = list.read();
            match guard.as_ref() {
                None => rsx! {
                    p { class: "muted", "Loading courses..." }
                },
                Some(vm) => {
                    let pending = vm
                        .courses()
                        .iter()
                        .map(|c| c.course_id)
                        .filter(|id| vm.toggle_state(*id) == ToggleState::Pending)
                        .collect::<Vec<_>>();
                    rsx! {
                        CourseGroups {
                            groups: vm.groups(),
                            pending,
                            busy: vm.is_busy(),
                            notice: vm.notice().map(str::to_owned),
                            on_toggle,
                            on_dismiss,
                        }
                    }
                }
            }
        }
    };

    rsx! {
        div { class: "page",
            Link { class: "back-link", to: Route::Dashboard {}, "← Back to Dashboard" }
            h1 { "Course Curriculum" }
            {body}
        }
    }
}

#[component]
fn CourseGroups(
    groups: Vec<LevelGroup>,
    pending: Vec<CourseId>,
    busy: bool,
    notice: Option<String>,
    on_toggle: EventHandler<CourseId>,
    on_dismiss: EventHandler<()>,
) -> Element {
    let is_empty = groups.is_empty();
    let sections: Vec<(LevelGroup, String)> = groups
        .into_iter()
        .map(|group| {
            let summary = format!(
                "{} / {} selesai · {}",
                group.completed(),
                group.courses.len(),
                format_hours(group.total_hours())
            );
            (group, summary)
        })
        .collect();

    rsx! {
        if let Some(notice) = notice {
            div { class: "banner banner-error banner-dismissable",
                span { "{notice}" }
                button {
                    class: "banner-close",
                    r#type: "button",
                    aria_label: "Dismiss",
                    onclick: move |_| on_dismiss.call(()),
                    "×"
                }
            }
        }
        if is_empty {
            p { class: "muted", "This path has no courses yet." }
        }
        for (group, summary) in sections {
            section { key: "{group.level_id}", class: "level-group",
                h2 { class: "level-name", "{group.level_name}" }
                p { class: "muted", "{summary}" }
                div { class: "card course-list",
                    for course in group.courses.iter() {
                        CourseRow {
                            key: "{course.course_id}",
                            course_id: course.course_id,
                            name: course.course_name.clone(),
                            hours: format_hours(course.hours_to_study),
                            done: course.is_graduated,
                            pending: pending.contains(&course.course_id),
                            busy,
                            on_toggle,
                        }
                    }
                }
            }
        }
    }
}

#[component]
fn CourseRow(
    course_id: CourseId,
    name: String,
    hours: String,
    done: bool,
    pending: bool,
    busy: bool,
    on_toggle: EventHandler<CourseId>,
) -> Element {
    let done_class = if done { "done" } else { "" };
    let pending_class = if pending { "pending" } else { "" };

    rsx! {
        div { class: "course-row {done_class}",
            div { class: "course-text",
                h3 { "{name}" }
                span { class: "muted", "{hours}" }
            }
            button {
                class: "toggle {done_class} {pending_class}",
                r#type: "button",
                disabled: busy,
                onclick: move |_| on_toggle.call(course_id),
                if done { "✔" } else { "○" }
            }
        }
    }
}
