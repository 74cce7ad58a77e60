mod common;

use assert_cmd::assert::{Assert, OutputAssertExt};
use assert_cmd::Command;
use common::*;
use fitness_tracker_cli::config::Config;
use fitness_tracker_cli::models::Role;
use predicates::prelude::*;
use serde_json::json;
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fitness_tracker(config: &Path) -> Command {
    let mut cmd = Command::cargo_bin("fitness-tracker").unwrap();
    cmd.env("FITNESS_TRACKER_CONFIG", config)
        .env("NO_COLOR", "1")
        .env_remove("FITNESS_TRACKER_API_URL")
        .env_remove("FITNESS_TRACKER_PASSWORD")
        .env_remove("RUST_LOG");
    cmd
}

/// Config file holding a signed in session against `server`
fn signed_in_config(server: &MockServer, role: Role) -> (TempDir, PathBuf) {
    let dir = tempdir().unwrap();
    let file = dir.path().join("config.toml");

    let mut config = Config::load_from(&file).unwrap();
    config.api.base_url = server.uri();
    config.set_session(TOKEN.to_string(), user(role));
    config.save().unwrap();

    (dir, file)
}

/// Run a command off the async runtime so the mock server keeps serving
async fn run(mut cmd: Command) -> Assert {
    let output = tokio::task::spawn_blocking(move || cmd.output())
        .await
        .unwrap()
        .unwrap();
    output.assert()
}

#[test]
fn test_help_command() {
    let mut cmd = Command::cargo_bin("fitness-tracker").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Track workouts and fitness goals"))
        .stdout(predicate::str::contains("login"))
        .stdout(predicate::str::contains("workouts"))
        .stdout(predicate::str::contains("goals"));
}

#[test]
fn test_version_command() {
    let mut cmd = Command::cargo_bin("fitness-tracker").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_completions_command() {
    let mut cmd = Command::cargo_bin("fitness-tracker").unwrap();
    cmd.arg("completions").arg("bash");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("_fitness-tracker"));
}

#[test]
fn test_pages_require_login() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fitness_tracker(&config)
        .args(["workouts", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("You are not logged in"));

    fitness_tracker(&config)
        .arg("whoami")
        .assert()
        .failure()
        .stderr(predicate::str::contains("You are not logged in"));
}

#[test]
fn test_config_init_and_show() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fitness_tracker(&config)
        .args(["config", "init", "--api-url", "http://example.test/api"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration initialized"));
    assert!(config.exists());

    fitness_tracker(&config)
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("http://example.test/api"));

    fitness_tracker(&config)
        .args(["config", "init"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .and(body_json(json!({ "email": "ada@example.com", "password": "secret" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "user": user_json("user"), "token": TOKEN })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let mut cmd = fitness_tracker(&config);
    cmd.args(["login", "--email", "ada@example.com", "--password", "secret"])
        .args(["--api-url", &server.uri()]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Welcome, Ada!"));

    let saved = Config::load_from(&config).unwrap();
    assert!(saved.is_authenticated());
    assert_eq!(saved.auth.token, TOKEN);
    // --api-url only applies to the run it was given to
    assert_eq!(saved.api.base_url, "http://localhost:5000/api");

    let mut cmd = fitness_tracker(&config);
    cmd.arg("profile");
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("ada@example.com"));

    let mut cmd = fitness_tracker(&config);
    cmd.arg("logout");
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Logged out"));
    assert!(!Config::load_from(&config).unwrap().is_authenticated());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_login_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({ "message": "Invalid credentials" })),
        )
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let mut cmd = fitness_tracker(&config);
    cmd.args(["login", "--email", "ada@example.com", "--password", "nope"])
        .args(["--api-url", &server.uri()]);
    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("Invalid credentials"));

    assert!(!Config::load_from(&config).unwrap().is_authenticated());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_workouts_list_prints_cards() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            workout_json("w1", "Running", 30.0, 250.0),
            workout_json("w2", "Cycling", 60.0, 500.0)
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.args(["workouts", "list"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Running · 30 mins · 250 kcal"))
        .stdout(predicate::str::contains("Cycling"))
        .stdout(predicate::str::contains("2024-05-01"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_goals_list_empty_state() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.args(["goals", "list"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("No recent goals found."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_goals_add_from_flags() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/goals"))
        .and(body_json(json!({
            "goalType": "run-distance",
            "targetValue": 10.0,
            "timeFrame": "weekly"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(goal_json("g1", "run-distance", 10.0, "weekly")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([goal_json("g1", "run-distance", 10.0, "weekly")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.args(["goals", "add", "--goal-type", "run-distance", "--target", "10"])
        .args(["--time-frame", "weekly"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Goal saved (g1)"))
        .stdout(predicate::str::contains("You now have 1 goals."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_invalid_input_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.args(["workouts", "add", "--activity", "Running"])
        .args(["--duration", "abc", "--calories", "100"]);
    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("Duration (minutes) must be a number"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_delete_needs_confirmation_or_force() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/workouts/w1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workouts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.args(["workouts", "delete", "w1"]);
    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("--force"));

    let mut cmd = fitness_tracker(&config);
    cmd.args(["workouts", "delete", "w1", "--force"]);
    run(cmd)
        .await
        .success()
        .stdout(predicate::str::contains("Workout w1 deleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_reload_after_delete_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/workouts/w1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/workouts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.args(["workouts", "delete", "w1", "--force"]);
    run(cmd)
        .await
        .failure()
        .stdout(predicate::str::contains("Workout w1 deleted"))
        .stdout(predicate::str::contains("You now have").not())
        .stderr(predicate::str::contains("Could not reload workouts"))
        .stderr(predicate::str::contains("db down"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_rejected_reload_after_save_drops_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/goals"))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(goal_json("g1", "run-distance", 10.0, "weekly")),
        )
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.args(["goals", "add", "--goal-type", "run-distance", "--target", "10"])
        .args(["--time-frame", "weekly"]);
    run(cmd)
        .await
        .failure()
        .stdout(predicate::str::contains("Goal saved (g1)"))
        .stderr(predicate::str::contains("session has expired"));

    assert!(!Config::load_from(&config).unwrap().is_authenticated());
}

#[test]
fn test_config_edit_reports_editor_failure() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");

    fitness_tracker(&config)
        .args(["config", "edit"])
        .env("EDITOR", "false")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Editor false exited with"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_admin_command_is_role_gated() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/admin/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.arg("admin");
    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("Admin access required."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_expired_session_is_dropped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/workouts"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "message": "jwt expired" })))
        .mount(&server)
        .await;

    let (_dir, config) = signed_in_config(&server, Role::User);

    let mut cmd = fitness_tracker(&config);
    cmd.args(["workouts", "list"]);
    run(cmd)
        .await
        .failure()
        .stderr(predicate::str::contains("session has expired"));

    assert!(!Config::load_from(&config).unwrap().is_authenticated());
}
