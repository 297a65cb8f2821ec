//! Router tests -- exercise the JSON API against an in-memory snapshot.

use authtriage::api::{self, state::AppState};
use authtriage::config::ScoringConfig;
use authtriage::ingest;
use authtriage::model::LoginEvent;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

fn event(user: &str, ts: &str, device: &str, city: (&str, f64, f64)) -> LoginEvent {
    LoginEvent {
        user_id: user.to_string(),
        timestamp: ts.parse().unwrap(),
        device_type: device.to_string(),
        login_method: "password".to_string(),
        channel: "app".to_string(),
        os_browser: "Android/Chrome".to_string(),
        city: city.0.to_string(),
        lat: city.1,
        lon: city.2,
    }
}

fn test_state() -> AppState {
    let nyc = ("New York", 40.7128, -74.0060);
    let la = ("Los Angeles", 34.0522, -118.2437);
    let events = vec![
        event("U0001", "2024-03-01T09:00:00Z", "mobile", nyc),
        event("U0001", "2024-03-02T09:00:00Z", "mobile", nyc),
        event("U0001", "2024-03-03T09:00:00Z", "mobile", nyc),
        // One hour later, other coast, new device: velocity + device flags.
        event("U0001", "2024-03-03T10:00:00Z", "desktop", la),
        event("U0002", "2024-03-01T20:00:00Z", "desktop", la),
        event("U0002", "2024-03-02T20:00:00Z", "desktop", la),
    ];
    AppState::new(ingest::group_by_user(events), ScoringConfig::default())
}

async fn get_json(path: &str) -> (StatusCode, serde_json::Value) {
    let app = api::router(test_state());
    let response = app
        .oneshot(Request::builder().uri(path).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
    (status, json)
}

#[tokio::test]
async fn test_health() {
    let (status, body) = get_json("/api/v1/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");
}

#[tokio::test]
async fn test_list_users() {
    let (status, body) = get_json("/api/v1/users").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"], serde_json::json!(["U0001", "U0002"]));
    assert_eq!(body["meta"]["total"], 2);
}

#[tokio::test]
async fn test_compare_users() {
    let (status, body) = get_json("/api/v1/users/U0001/compare/U0002").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["left"]["user_id"], "U0001");
    assert_eq!(body["data"]["left"]["modal_device"], "mobile");
    assert_eq!(body["data"]["left"]["total_logins"], 4);
    assert_eq!(body["data"]["right"]["user_id"], "U0002");
    assert_eq!(body["data"]["right"]["modal_device"], "desktop");
    assert_eq!(body["data"]["right"]["modal_hour"], 20);

    let (status, _) = get_json("/api/v1/users/U0001/compare/U9999").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_baseline_summary() {
    let (status, body) = get_json("/api/v1/users/U0001/baseline").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["modal_device"], "mobile");
    assert_eq!(body["data"]["modal_city"], "New York");
    assert_eq!(body["data"]["total_logins"], 4);
}

#[tokio::test]
async fn test_score_returns_one_result_per_event() {
    let (status, body) = get_json("/api/v1/users/U0001/score").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 4);
    let last = &body["data"][3];
    assert_eq!(last["tier"], "medium");
    assert!(last["reasons"]
        .as_array()
        .unwrap()
        .contains(&serde_json::json!("High GeoVelocity")));
}

#[tokio::test]
async fn test_anomalies_respects_threshold_param() {
    let (status, body) = get_json("/api/v1/users/U0001/anomalies").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["meta"]["threshold"], 0.4);
    assert_eq!(body["meta"]["total"], 1);

    // 0.55 sits above the stacked 0.25 + 0.30 score: nothing selected.
    let (_, body) = get_json("/api/v1/users/U0001/anomalies?threshold=0.55").await;
    assert_eq!(body["meta"]["total"], 0);
    assert_eq!(body["data"], serde_json::json!([]));
}

#[tokio::test]
async fn test_unknown_user_is_404() {
    let (status, body) = get_json("/api/v1/users/U9999/anomalies").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("U9999"));
}
