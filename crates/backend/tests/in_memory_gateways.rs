use backend::{Backend, BackendError, InMemoryBackend};
use coddy_core::model::{Course, LearningPath, Profile};
use serde_json::{Value, json};

#[tokio::test]
async fn progress_is_scoped_to_the_signed_in_user() {
    let project = InMemoryBackend::seeded();
    project.register("rina@example.com", "rahasia1");
    project.register("budi@example.com", "rahasia2");
    let backend = Backend::in_memory(&project);

    backend
        .auth
        .sign_in_with_password("rina@example.com", "rahasia1")
        .await
        .unwrap();
    backend
        .rpc
        .call(
            "set_course_progress",
            json!({ "p_course_id": 201, "p_is_graduated": true }),
        )
        .await
        .unwrap();

    backend.auth.sign_out().await.unwrap();
    backend
        .auth
        .sign_in_with_password("budi@example.com", "rahasia2")
        .await
        .unwrap();
    let rows = backend
        .rpc
        .call(
            "get_courses_by_learning_path",
            json!({ "p_learning_path_id": 2 }),
        )
        .await
        .unwrap();
    let courses: Vec<Course> = serde_json::from_value(rows).unwrap();
    assert!(courses.iter().all(|c| !c.is_graduated));
}

#[tokio::test]
async fn rows_decode_into_core_models() {
    let project = InMemoryBackend::seeded();
    let backend = Backend::in_memory(&project);

    let rows = backend
        .rpc
        .call("get_learning_paths_with_progress", Value::Null)
        .await
        .unwrap();
    let paths: Vec<LearningPath> = serde_json::from_value(rows).unwrap();
    assert_eq!(paths.len(), 2);
    assert!(paths.iter().all(|p| p.total_courses == 4 && !p.is_started()));
}

#[tokio::test]
async fn profile_rows_are_read_back_or_missing() {
    let project = InMemoryBackend::new();
    let id = project.register("rina@example.com", "rahasia1");
    let backend = Backend::in_memory(&project);

    let err = backend.profiles.get_profile(id).await.unwrap_err();
    assert!(err.is_no_rows());

    backend
        .profiles
        .insert_profile(&Profile::new(id, "Rina"))
        .await
        .unwrap();
    let profile = backend.profiles.get_profile(id).await.unwrap();
    assert_eq!(profile.full_name.as_deref(), Some("Rina"));

    let err = backend
        .profiles
        .insert_profile(&Profile::new(id, "Rina"))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Api { status: 409, .. }));
}

#[tokio::test]
async fn unknown_procedure_and_function_are_reported() {
    let project = InMemoryBackend::new();
    let backend = Backend::in_memory(&project);

    let err = backend.rpc.call("drop_everything", Value::Null).await.unwrap_err();
    assert_eq!(err.status(), Some(404));

    let err = backend
        .functions
        .invoke("other-function", json!({}))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Function { status: 404, .. }));
}
