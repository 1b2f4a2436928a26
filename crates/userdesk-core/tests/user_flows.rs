//! End-to-end flow tests: login, list, mutate, and session invalidation
//! against a mock server.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use userdesk_core::api::{ApiClient, User, UserId};
use userdesk_core::config::Config;
use userdesk_core::flows::{
    self, AuthOutcome, LoginFlow, Navigation, UserDraft, UserListFlow, UsersStatus,
};
use userdesk_core::nav::Route;
use userdesk_core::session::{
    FileSessionStore, MemorySessionStore, SessionStore, SharedSession,
};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(server: &MockServer) -> ApiClient {
    let config = Config {
        api_url: server.uri(),
        ..Config::default()
    };
    ApiClient::new(&config).unwrap()
}

fn user(id: i64, username: &str, email: &str) -> User {
    User {
        id: UserId::Number(id),
        username: username.to_string(),
        email: email.to_string(),
    }
}

#[tokio::test]
async fn test_login_then_list_uses_stored_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T1"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "username": "bob", "email": "b@x.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let store = MemorySessionStore::new().shared();

    let mut login = LoginFlow::new(Arc::clone(&store));
    login.username = "bob".to_string();
    login.password = "pw".to_string();
    let outcome = login.submit(&client).await;
    assert_eq!(
        outcome,
        AuthOutcome::Navigate {
            to: Route::Users,
            notice: None
        }
    );
    assert_eq!(store.get_token().as_deref(), Some("T1"));

    let mut users = UserListFlow::new(store);
    assert_eq!(users.load(&client).await, Navigation::Stay);
    assert_eq!(users.status(), UsersStatus::Ready);
    assert_eq!(users.users(), &[user(1, "bob", "b@x.com")]);
}

#[tokio::test]
async fn test_blank_login_sends_nothing() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T1"})))
        .expect(0)
        .mount(&server)
        .await;

    let mut login = LoginFlow::new(MemorySessionStore::new().shared());
    login.username = "bob".to_string();
    assert_eq!(login.submit(&client_for(&server)).await, AuthOutcome::Failed);
}

#[tokio::test]
async fn test_list_unauthorized_clears_persisted_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let file_store = FileSessionStore::new(dir.path().join("session.json"));
    file_store.set_session("stale", Some("bob")).unwrap();
    let store: SharedSession = Arc::new(file_store);

    let mut users = UserListFlow::new(Arc::clone(&store));
    assert_eq!(users.load(&client_for(&server)).await, Navigation::ToLogin);
    assert_eq!(store.get_token(), None);
    assert!(!dir.path().join("session.json").exists());
}

#[tokio::test]
async fn test_create_resyncs_with_server_list() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    // Initial load.
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "username": "bob", "email": "b@x.com"}
        ])))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 99})))
        .expect(1)
        .mount(&server)
        .await;
    // Resync: the server assigned id 2, not whatever the create response said.
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "username": "bob", "email": "b@x.com"},
            {"id": 2, "username": "amy", "email": "a@x.com"}
        ])))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut users = UserListFlow::new(MemorySessionStore::with_token("T1", None).shared());
    users.load(&client).await;
    assert_eq!(users.users().len(), 1);

    let draft = UserDraft {
        username: "amy".to_string(),
        email: "a@x.com".to_string(),
        password: "secret".to_string(),
    };
    let step = users.begin_create(&draft);
    assert_eq!(users.drive(&client, step).await, Navigation::Stay);

    let fresh = client.list_users("T1").await.unwrap();
    assert_eq!(users.users(), fresh.as_slice());
    assert_eq!(users.status(), UsersStatus::Ready);
}

#[tokio::test]
async fn test_failed_mutation_keeps_list() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "username": "bob", "email": "b@x.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/1"))
        .respond_with(
            ResponseTemplate::new(409).set_body_json(json!({"message": "Cannot delete self"})),
        )
        .mount(&server)
        .await;

    let client = client_for(&server);
    let mut users = UserListFlow::new(MemorySessionStore::with_token("T1", None).shared());
    users.load(&client).await;

    let step = users.begin_delete(UserId::Number(1));
    assert_eq!(users.drive(&client, step).await, Navigation::Stay);
    assert_eq!(users.error(), Some("Server error: 409 - Cannot delete self"));
    assert_eq!(users.users(), &[user(1, "bob", "b@x.com")]);
}

#[tokio::test]
async fn test_logout_during_mutation_skips_resync() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/1"))
        .respond_with(ResponseTemplate::new(204).set_delay(Duration::from_millis(300)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let store = MemorySessionStore::with_token("T1", None).shared();
    let mut users = UserListFlow::new(Arc::clone(&store));

    let step = users.begin_delete(UserId::Number(1));
    let (navigation, route) = tokio::join!(users.drive(&client, step), async {
        tokio::time::sleep(Duration::from_millis(50)).await;
        flows::logout(store.as_ref())
    });

    assert_eq!(route, Route::Login);
    assert_eq!(navigation, Navigation::ToLogin);
    assert_eq!(store.get_token(), None);
}
