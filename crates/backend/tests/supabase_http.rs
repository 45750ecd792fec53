use backend::{AuthGateway, BackendConfig, BackendError, RpcGateway, SupabaseClient};
use coddy_core::model::UserId;
use serde_json::{Value, json};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn session_body(user_id: UserId, access: &str, refresh: &str) -> Value {
    json!({
        "access_token": access,
        "refresh_token": refresh,
        "token_type": "bearer",
        "expires_in": 1,
        "user": { "id": user_id.to_string(), "email": "rina@example.com" }
    })
}

fn client_for(server: &MockServer) -> SupabaseClient {
    let config = BackendConfig::new(&server.uri(), "anon").unwrap();
    SupabaseClient::new(config).unwrap()
}

async fn mount_password_grant(server: &MockServer, user_id: UserId) {
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(user_id, "old", "r1")))
        .mount(server)
        .await;
}

async fn mount_expired_token(server: &MockServer) {
    let expired = json!({ "code": 401, "error_code": "bad_jwt", "msg": "JWT expired" });
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401).set_body_json(expired))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_learning_paths_with_progress"))
        .and(header("authorization", "Bearer old"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "PGRST301",
            "message": "JWT expired"
        })))
        .mount(server)
        .await;
}

async fn refresh_requests(server: &MockServer) -> usize {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .filter(|request| {
            request
                .url
                .query()
                .is_some_and(|query| query.contains("grant_type=refresh_token"))
        })
        .count()
}

#[tokio::test]
async fn expired_access_token_is_refreshed_once() {
    let server = MockServer::start().await;
    let user_id = UserId::random();
    mount_password_grant(&server, user_id).await;
    mount_expired_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "r1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(session_body(user_id, "new", "r2")))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/v1/user"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": user_id.to_string(),
            "email": "rina@example.com"
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_learning_paths_with_progress"))
        .and(header("authorization", "Bearer new"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .sign_in_with_password("rina@example.com", "rahasia1")
        .await
        .unwrap();

    let rows = client
        .call("get_learning_paths_with_progress", Value::Null)
        .await
        .unwrap();
    assert_eq!(rows, json!([]));
    let user = client.get_user().await.unwrap().expect("refreshed user");
    assert_eq!(user.id, user_id);

    let session = client.session().expect("session kept");
    assert_eq!(session.access_token, "new");
    assert_eq!(session.refresh_token.as_deref(), Some("r2"));
    assert_eq!(refresh_requests(&server).await, 1);
}

#[tokio::test]
async fn refused_refresh_signs_the_client_out() {
    let server = MockServer::start().await;
    let user_id = UserId::random();
    mount_password_grant(&server, user_id).await;
    mount_expired_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "code": 400,
            "error_code": "refresh_token_not_found",
            "msg": "Invalid Refresh Token: Refresh Token Not Found"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    client
        .sign_in_with_password("rina@example.com", "rahasia1")
        .await
        .unwrap();

    assert!(client.get_user().await.unwrap().is_none());
    assert!(client.session().is_none());

    // Signed out: the rpc goes out with the anon key and no further refresh.
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/get_learning_paths_with_progress"))
        .and(header("authorization", "Bearer anon"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;
    let rows = client
        .call("get_learning_paths_with_progress", Value::Null)
        .await
        .unwrap();
    assert_eq!(rows, json!([]));
    assert_eq!(refresh_requests(&server).await, 1);
}

#[tokio::test]
async fn rpc_rejection_without_session_is_not_refreshed() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/rest/v1/rpc/set_course_progress"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "42501",
            "message": "permission denied for function set_course_progress"
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = client
        .call("set_course_progress", json!({ "p_course_id": 1, "p_is_graduated": true }))
        .await
        .unwrap_err();
    assert!(matches!(err, BackendError::Api { status: 401, .. }));
    assert_eq!(refresh_requests(&server).await, 0);
}

#[tokio::test]
async fn deleting_the_signed_in_user_ends_the_session() {
    let server = MockServer::start().await;
    let user_id = UserId::random();
    mount_password_grant(&server, user_id).await;
    Mock::given(method("DELETE"))
        .and(path(format!("/auth/v1/admin/users/{user_id}")))
        .and(header("authorization", "Bearer service"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .expect(1)
        .mount(&server)
        .await;
    let other = UserId::random();
    Mock::given(method("DELETE"))
        .and(path(format!("/auth/v1/admin/users/{other}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let config = BackendConfig::new(&server.uri(), "anon")
        .unwrap()
        .with_service_role_key("service");
    let client = SupabaseClient::new(config).unwrap();
    client
        .sign_in_with_password("rina@example.com", "rahasia1")
        .await
        .unwrap();

    client.delete_user(other).await.unwrap();
    assert!(client.session().is_some());

    client.delete_user(user_id).await.unwrap();
    assert!(client.session().is_none());
}
