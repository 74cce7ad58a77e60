#![allow(dead_code)]

use fitness_tracker_cli::api::AuthResponse;
use fitness_tracker_cli::config::Config;
use fitness_tracker_cli::models::{Role, User};
use fitness_tracker_cli::session::Session;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const TOKEN: &str = "test-token";

/// In-memory config pointing at the mock backend
pub fn config_for(server: &MockServer) -> Config {
    let mut config = Config::default();
    config.api.base_url = server.uri();
    config
}

pub fn user(role: Role) -> User {
    User {
        id: "u1".to_string(),
        name: "Ada".to_string(),
        email: "ada@example.com".to_string(),
        role,
    }
}

pub fn anonymous_session(server: &MockServer) -> Session {
    Session::restore(config_for(server)).unwrap()
}

pub fn signed_in_session(server: &MockServer, role: Role) -> Session {
    let mut session = anonymous_session(server);
    session.establish(AuthResponse {
        user: user(role),
        token: TOKEN.to_string(),
    });
    session
}

pub fn user_json(role: &str) -> Value {
    json!({ "_id": "u1", "name": "Ada", "email": "ada@example.com", "role": role })
}

pub fn workout_json(id: &str, activity: &str, duration: f64, calories: f64) -> Value {
    json!({
        "_id": id,
        "activity": activity,
        "duration": duration,
        "caloriesBurned": calories,
        "createdAt": "2024-05-01T08:30:00Z"
    })
}

pub fn goal_json(id: &str, goal_type: &str, target: f64, time_frame: &str) -> Value {
    json!({
        "_id": id,
        "goalType": goal_type,
        "targetValue": target,
        "progress": 0,
        "timeFrame": time_frame
    })
}
