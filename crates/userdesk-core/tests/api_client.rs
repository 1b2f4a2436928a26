//! Integration tests for the HTTP client against a mock server.
//!
//! Covers request shapes (paths, bodies, bearer header) and error
//! normalization for each failure class.

use std::time::Duration;

use serde_json::json;
use userdesk_core::api::{
    ApiClient, ApiErrorKind, NO_RESPONSE_MESSAGE, User, UserId, UserMutation, UserPayload,
};
use userdesk_core::config::Config;
use wiremock::matchers::{body_json, header, method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

fn client_for(uri: &str) -> ApiClient {
    let config = Config {
        api_url: uri.to_string(),
        request_timeout_secs: 1,
        ..Config::default()
    };
    ApiClient::new(&config).unwrap()
}

#[tokio::test]
async fn test_login_posts_credentials_and_returns_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"username": "bob", "password": "pw"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "T1"})))
        .expect(1)
        .mount(&server)
        .await;

    let response = client_for(&server.uri()).login("bob", "pw").await.unwrap();
    assert_eq!(response.token, "T1");
}

#[tokio::test]
async fn test_login_rejection_uses_server_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .login("bob", "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Auth);
    assert_eq!(err.status, Some(401));
    assert_eq!(err.message, "Server error: 401 - Invalid credentials");
}

#[tokio::test]
async fn test_server_error_without_message_uses_fallback() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .register("bob", "pw", "b@x.com")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Server);
    assert_eq!(err.message, "Server error: 500 - Could not register the user.");
}

#[tokio::test]
async fn test_forbidden_is_a_server_error_not_auth() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({"message": "Forbidden"})))
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .list_users("T1")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Server);
    assert!(!err.is_auth());
}

#[tokio::test]
async fn test_list_users_sends_bearer_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", "Bearer abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 1, "username": "bob", "email": "b@x.com"},
            {"id": "u-2", "username": "amy", "email": "a@x.com"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let users = client_for(&server.uri()).list_users("abc").await.unwrap();
    assert_eq!(
        users,
        vec![
            User {
                id: UserId::Number(1),
                username: "bob".to_string(),
                email: "b@x.com".to_string(),
            },
            User {
                id: UserId::Text("u-2".to_string()),
                username: "amy".to_string(),
                email: "a@x.com".to_string(),
            },
        ]
    );
}

#[tokio::test]
async fn test_update_targets_user_path_and_omits_blank_password() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path("/api/users/7"))
        .and(header("authorization", "Bearer T1"))
        .and(body_json(json!({"username": "amy", "email": "a@x.com"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let mutation = UserMutation::Update(
        UserId::Number(7),
        UserPayload {
            username: "amy".to_string(),
            email: "a@x.com".to_string(),
            password: None,
        },
    );
    client_for(&server.uri())
        .mutate_user(&mutation, "T1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_delete_targets_user_path() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/users/7"))
        .and(header("authorization", "Bearer T1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server.uri())
        .mutate_user(&UserMutation::Delete(UserId::Number(7)), "T1")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_text_ids_are_percent_encoded_in_path() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path_regex(r"^/api/users/a(%20| )b$"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/api/users/team%2Fops\+1$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server.uri());
    client
        .mutate_user(&UserMutation::Delete(UserId::Text("a b".to_string())), "T1")
        .await
        .unwrap();

    let update = UserMutation::Update(
        UserId::Text("team/ops+1".to_string()),
        UserPayload {
            username: "ops".to_string(),
            email: "ops@x.com".to_string(),
            password: None,
        },
    );
    client.mutate_user(&update, "T1").await.unwrap();
}

#[tokio::test]
async fn test_slow_server_times_out() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let err = client_for(&server.uri())
        .list_users("T1")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Timeout);
    assert_eq!(err.message, "Request timed out after 1s.");
}

#[tokio::test]
async fn test_unreachable_server_reports_no_response() {
    let port = match std::net::TcpListener::bind("127.0.0.1:0") {
        Ok(listener) => listener.local_addr().unwrap().port(),
        Err(_) => {
            eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
            return;
        }
    };
    // The listener is dropped above, so nothing accepts on this port.
    let err = client_for(&format!("http://127.0.0.1:{port}"))
        .login("bob", "pw")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ApiErrorKind::Network);
    assert_eq!(err.message, NO_RESPONSE_MESSAGE);
}
