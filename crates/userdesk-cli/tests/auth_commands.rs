//! Integration tests for login, register, logout, and status.

use std::fs;

use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

#[tokio::test]
async fn test_login_stores_session() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/login"))
        .and(body_json(json!({"username": "bob", "password": "pw"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"token": "tok-1234567890abcdef"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["login", "--username", "bob", "--password", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as bob"))
        .stdout(predicate::str::contains("tok-1234..."))
        .stdout(predicate::str::contains("tok-1234567890abcdef").not());

    let saved: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(home.path().join("session.json")).unwrap())
            .unwrap();
    assert_eq!(saved["token"], "tok-1234567890abcdef");
    assert_eq!(saved["username"], "bob");
}

#[tokio::test]
async fn test_login_reads_missing_values_from_stdin() {
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

    let home = tempdir().unwrap();
    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .env("USERDESK_API_URL", server.uri())
        .arg("login")
        .write_stdin("bob\npw\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as bob"));
}

#[tokio::test]
async fn test_login_rejected_reports_server_message() {
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

    let home = tempdir().unwrap();
    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["login", "-u", "bob", "-p", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Server error: 401 - Invalid credentials",
        ));

    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_blank_login_fails_without_request() {
    let home = tempdir().unwrap();

    // Nothing listens here; validation must fail before any request.
    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .args(["--api-url", "http://127.0.0.1:9"])
        .args(["login", "-u", "bob", "-p", "   "])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please fill in all fields."));
}

#[tokio::test]
async fn test_register_prints_notice_and_keeps_signed_out() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_json(
            json!({"username": "amy", "password": "pw", "email": "a@x.com"}),
        ))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": 5})))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["register", "-u", "amy", "-e", "a@x.com", "-p", "pw"])
        .assert()
        .success()
        .stdout(predicate::str::contains("User registered successfully"));

    assert!(!home.path().join("session.json").exists());
}

#[test]
fn test_register_rejects_bad_email() {
    let home = tempdir().unwrap();

    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .args(["--api-url", "http://127.0.0.1:9"])
        .args(["register", "-u", "amy", "-e", "not-an-email", "-p", "pw"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter a valid email address."));
}

#[test]
fn test_status_and_logout() {
    let home = tempdir().unwrap();
    fs::write(
        home.path().join("session.json"),
        r#"{"token":"tok-1234567890abcdef","username":"bob"}"#,
    )
    .unwrap();

    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as bob"));

    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));

    assert!(!home.path().join("session.json").exists());

    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Not logged in."));
}

#[tokio::test]
async fn test_register_reads_password_from_stdin_without_printing_it() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/register"))
        .and(body_json(
            json!({"username": "amy", "password": "s3cret-pw", "email": "a@x.com"}),
        ))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    let home = tempdir().unwrap();
    cargo_bin_cmd!("userdesk")
        .env("USERDESK_HOME", home.path())
        .args(["--api-url", &server.uri()])
        .args(["register", "-u", "amy", "-e", "a@x.com"])
        .write_stdin("s3cret-pw\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Password: "))
        .stdout(predicate::str::contains("s3cret-pw").not())
        .stderr(predicate::str::contains("s3cret-pw").not());
}
