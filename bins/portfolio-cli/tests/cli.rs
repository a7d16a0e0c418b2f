use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Command with a private token directory and the given API base URL
fn portfolio(token_dir: &Path, base_url: &str) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("portfolio");
    cmd.env("PORTFOLIO_TOKEN_DIR", token_dir)
        .env("PORTFOLIO_API_BASE_URL", base_url)
        .env("PORTFOLIO_API_TIMEOUT_MS", "2000")
        .env_remove("PORTFOLIO_CONFIG")
        .env_remove("PORTFOLIO_ADMIN_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

const UNREACHABLE: &str = "http://127.0.0.1:1/api";

// ============================================================================
// Help and Version Tests
// ============================================================================

#[test]
fn test_help_mentions_subcommands() {
    cargo_bin_cmd!("portfolio")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("contact"))
        .stdout(predicate::str::contains("projects"))
        .stdout(predicate::str::contains("skills"))
        .stdout(predicate::str::contains("analytics"));
}

#[test]
fn test_version_flag() {
    cargo_bin_cmd!("portfolio")
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("portfolio"));
}

// ============================================================================
// Session Tests
// ============================================================================

#[test]
fn test_logout_removes_saved_token() {
    let dir = TempDir::new().unwrap();
    let token_file = dir.path().join("auth_token");
    fs::write(&token_file, "jwt-abc").unwrap();

    portfolio(dir.path(), UNREACHABLE)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!token_file.exists());

    // second logout is a no-op
    portfolio(dir.path(), UNREACHABLE)
        .arg("logout")
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to do"));
}

#[test]
fn test_whoami_requires_login() {
    let dir = TempDir::new().unwrap();

    portfolio(dir.path(), UNREACHABLE)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not logged in"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_token_for_later_commands() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .and(body_json(json!({"username": "admin", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "message": "Login successful",
            "token": "jwt-abc"
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/auth/profile"))
        .and(header("authorization", "Bearer jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "username": "admin",
            "created_at": "2024-01-01T00:00:00",
            "is_active": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let base_url = format!("{}/api", server.uri());

    portfolio(dir.path(), &base_url)
        .args(["login", "--username", "admin", "--password", "hunter22"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Logged in as"));
    assert_eq!(
        fs::read_to_string(dir.path().join("auth_token")).unwrap(),
        "jwt-abc"
    );

    portfolio(dir.path(), &base_url)
        .arg("whoami")
        .assert()
        .success()
        .stdout(predicate::str::contains("admin"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_login_reports_server_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    portfolio(dir.path(), &format!("{}/api", server.uri()))
        .args(["login", "-u", "admin", "-p", "wrong"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));
    assert!(!dir.path().join("auth_token").exists());
}

// ============================================================================
// Error Reporting Tests
// ============================================================================

#[test]
fn test_network_failure_message() {
    let dir = TempDir::new().unwrap();

    portfolio(dir.path(), UNREACHABLE)
        .args(["projects", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Network error - please check your connection",
        ));
}

#[test]
fn test_invalid_base_url_rejected() {
    let dir = TempDir::new().unwrap();

    portfolio(dir.path(), UNREACHABLE)
        .args(["--api-url", "ftp://example.com", "projects", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url must start with http"));
}

#[test]
fn test_blank_contact_fields_fail_without_request() {
    let dir = TempDir::new().unwrap();

    portfolio(dir.path(), UNREACHABLE)
        .args(["contact", "send", "--name", "Ana", "--email", "", "--message", "Hi"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("email: This field is required"))
        .stderr(predicate::str::contains("All fields are required"));
}

#[test]
fn test_config_file_is_used() {
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("client.toml");
    fs::write(&config, "base_url = \"not a url\"\n").unwrap();

    portfolio(dir.path(), UNREACHABLE)
        .arg("--config")
        .arg(&config)
        .args(["projects", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("base_url must start with http"));
}

// ============================================================================
// Resource Tests
// ============================================================================

#[tokio::test(flavor = "multi_thread")]
async fn test_projects_list_json() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/projects"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "projects": [
                {"id": "p1", "title": "Portfolio", "description": "This site", "tech_stack": ["Rust"], "order": 1}
            ]
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let output = portfolio(dir.path(), &format!("{}/api", server.uri()))
        .args(["--format", "json", "projects", "list"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let projects: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(projects[0]["title"], "Portfolio");
    assert_eq!(projects[0]["tech_stack"], json!(["Rust"]));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_skills_list_flat_and_grouped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/skills"))
        .and(query_param("grouped", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "skills": [{"id": "s1", "name": "Rust", "category": "Backend", "proficiency": "Expert"}]
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/skills"))
        .and(query_param("grouped", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "skills": {"Backend": [{"id": "s1", "name": "Rust", "category": "Backend", "proficiency": "Expert"}]}
        })))
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let base_url = format!("{}/api", server.uri());

    let output = portfolio(dir.path(), &base_url)
        .args(["-f", "json", "skills", "list", "--flat"])
        .output()
        .unwrap();
    let flat: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(flat.is_array());

    let output = portfolio(dir.path(), &base_url)
        .args(["-f", "json", "skills", "list"])
        .output()
        .unwrap();
    let grouped: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(grouped["Backend"][0]["name"], "Rust");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_skills_batch_from_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/skills/batch"))
        .and(body_json(json!({
            "skills": [
                {"name": "Rust", "category": "Backend", "proficiency": "Expert"},
                {"name": "React", "category": "Frontend", "proficiency": "Advanced"}
            ]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "message": "2 skills created successfully",
            "count": 2
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = TempDir::new().unwrap();
    let file = dir.path().join("skills.json");
    fs::write(
        &file,
        r#"[
            {"name": "Rust", "category": "Backend", "proficiency": "Expert"},
            {"name": "React", "category": "Frontend", "proficiency": "Advanced"}
        ]"#,
    )
    .unwrap();

    portfolio(dir.path(), &format!("{}/api", server.uri()))
        .args(["skills", "batch", "--file"])
        .arg(&file)
        .assert()
        .success()
        .stdout(predicate::str::contains("Inserted 2 skills"));
}

#[test]
fn test_track_never_fails() {
    let dir = TempDir::new().unwrap();

    portfolio(dir.path(), UNREACHABLE)
        .args(["analytics", "track", "home"])
        .assert()
        .success();
}
