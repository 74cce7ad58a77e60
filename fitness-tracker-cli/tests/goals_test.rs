mod common;

use common::*;
use fitness_tracker_cli::forms::{EntityForm, GoalForm};
use fitness_tracker_cli::models::{Role, TimeFrame};
use fitness_tracker_cli::pages::{AdminPage, DashboardPage, GoalsPage, PageState};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_weekly_run_distance_goal_appears_after_creation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/goals"))
        .and(header("Authorization", format!("Bearer {}", TOKEN).as_str()))
        .and(body_json(json!({
            "goalType": "run-distance",
            "targetValue": 10.0,
            "timeFrame": "weekly"
        })))
        .respond_with(
            ResponseTemplate::new(201)
                .set_body_json(goal_json("g-generated", "run-distance", 10.0, "weekly")),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([goal_json("g-generated", "run-distance", 10.0, "weekly")])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session(&server, Role::User);
    let mut page = GoalsPage::new();
    page.open_add();

    let form = page.form_mut().unwrap();
    assert_eq!(form.title(), "Add Goal");
    form.fields_mut().set(GoalForm::GOAL_TYPE, "run-distance");
    form.fields_mut().set(GoalForm::TARGET_VALUE, "10");
    form.fields_mut().set(GoalForm::TIME_FRAME, "weekly");

    let goal = page.submit(session.api()).await.unwrap().unwrap();
    assert_eq!(goal.id, "g-generated");
    assert_eq!(goal.time_frame, TimeFrame::Weekly);
    assert_eq!(goal.progress, 0.0);

    let listed = page.list().items();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, "g-generated");
}

#[tokio::test]
async fn test_goal_edit_uses_existing_values() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([goal_json("g1", "run-distance", 10.0, "weekly")])),
        )
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/goals/g1"))
        .and(body_json(json!({
            "goalType": "run-distance",
            "targetValue": 10.0,
            "timeFrame": "monthly"
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(goal_json("g1", "run-distance", 10.0, "monthly")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session(&server, Role::User);
    let mut page = GoalsPage::new();
    page.refresh(session.api()).await.unwrap();
    assert!(page.open_edit("g1"));

    let form = page.form_mut().unwrap();
    assert_eq!(form.title(), "Edit Goal");
    assert_eq!(form.submit_label(), "Update Goal");
    form.fields_mut().focus_next();
    form.fields_mut().focus_next();
    form.fields_mut().cycle(true);
    assert_eq!(form.fields().value(GoalForm::TIME_FRAME), "monthly");

    page.submit(session.api()).await.unwrap();
}

#[tokio::test]
async fn test_target_must_be_positive() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let session = signed_in_session(&server, Role::User);
    let mut page = GoalsPage::new();
    page.open_add();

    let form = page.form_mut().unwrap();
    form.fields_mut().set(GoalForm::GOAL_TYPE, "run-distance");
    form.fields_mut().set(GoalForm::TARGET_VALUE, "0");
    form.fields_mut().set(GoalForm::TIME_FRAME, "weekly");

    assert!(page.submit(session.api()).await.is_err());
    assert_eq!(
        page.form().unwrap().fields().error(),
        Some("Target Value must be greater than 0")
    );
}

#[tokio::test]
async fn test_dashboard_fetches_both_collections() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/workouts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([workout_json("w1", "Running", 30.0, 250.0)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session(&server, Role::User);
    let mut page = DashboardPage::new();
    assert!(page.is_loading());

    page.refresh(session.api()).await.unwrap();

    assert!(!page.is_loading());
    assert_eq!(page.workouts.items().len(), 1);
    assert_eq!(page.goals.state(), &PageState::Empty);
}

#[tokio::test]
async fn test_dashboard_failure_is_visible_per_section() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/workouts"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({ "message": "db down" })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/goals"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([goal_json("g1", "steps", 10000.0, "weekly")])),
        )
        .mount(&server)
        .await;

    let session = signed_in_session(&server, Role::User);
    let mut page = DashboardPage::new();

    assert!(page.refresh(session.api()).await.is_err());
    assert_eq!(
        page.workouts.state(),
        &PageState::Failed("Server error: db down".to_string())
    );
    assert_eq!(page.goals.items().len(), 1);
}

#[tokio::test]
async fn test_admin_statistics_per_user() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/admin/statistics"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {
                "user": user_json("user"),
                "goals": [goal_json("g1", "run-distance", 10.0, "weekly")],
                "workouts": []
            },
            {
                "user": { "_id": "u2", "name": "Grace", "email": "grace@example.com", "role": "coach" }
            }
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let session = signed_in_session(&server, Role::Admin);
    let mut page = AdminPage::new();
    page.refresh(session.api()).await.unwrap();

    let stats = page.statistics.items();
    assert_eq!(stats.len(), 2);
    assert_eq!(stats[0].goals.len(), 1);
    assert!(stats[0].workouts.is_empty());
    // Unknown roles never count as admin
    assert!(!stats[1].user.is_admin());
    assert!(stats[1].goals.is_empty());
}
