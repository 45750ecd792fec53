use backend::{FailureMode, Operation};
use coddy_core::model::LearningPathId;

use super::test_harness::{ViewKind, setup_view_harness};

fn rpc_calls(calls: &[String]) -> usize {
    calls.iter().filter(|call| call.starts_with("rpc.")).count()
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_lists_learning_paths() {
    let mut harness = setup_view_harness(ViewKind::Dashboard).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Learning Paths"));
    assert!(html.contains("Front-End Developer"));
    assert!(html.contains("Back-End Developer"));
    assert!(html.contains("0%"));
}

#[tokio::test(flavor = "current_thread")]
async fn dashboard_shows_error_without_retrying() {
    let mut harness = setup_view_harness(ViewKind::Dashboard).await;
    harness.project.clear_calls();
    harness
        .project
        .fail(Operation::Rpc, FailureMode::Always, "connection refused");
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Error:"));
    assert_eq!(rpc_calls(&harness.project.calls()), 1);
}

#[tokio::test(flavor = "current_thread")]
async fn path_detail_groups_courses_by_level() {
    let mut harness = setup_view_harness(ViewKind::LearningPath(LearningPathId::new(1))).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Course Curriculum"));
    let dasar = html.find("Dasar").expect("Dasar group");
    let pemula = html.find("Pemula").expect("Pemula group");
    let menengah = html.find("Menengah").expect("Menengah group");
    assert!(dasar < pemula && pemula < menengah);
    assert!(html.contains("Belajar Dasar Git dengan GitHub"));
}

#[tokio::test(flavor = "current_thread")]
async fn chat_opens_with_welcome_message() {
    let mut harness = setup_view_harness(ViewKind::Chat).await;
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Coddy Chat"));
    assert!(html.contains("Aku Coddy, asisten belajarmu"));
    assert!(!html.contains("Mengetik..."));
}

#[tokio::test(flavor = "current_thread")]
async fn roadmap_starts_on_path_selection() {
    let mut harness = setup_view_harness(ViewKind::Roadmap).await;
    harness.rebuild();
    harness.settle().await;

    let html = harness.render();
    assert!(html.contains("Pilih Learning Path Anda"));
    assert!(html.contains("Front-End Developer"));
    assert!(!html.contains("Learning Roadmap Anda"));
}

#[tokio::test(flavor = "current_thread")]
async fn login_renders_form() {
    let mut harness = setup_view_harness(ViewKind::Login).await;
    harness.rebuild();

    let html = harness.render();
    assert!(html.contains("Welcome Back"));
    assert!(html.contains("you@example.com"));
}
