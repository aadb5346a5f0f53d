//! HTTP API integration tests

use api::{create_router, AppConfig, AppState};
use serde_json::{json, Value};
use std::sync::Arc;
use tokio::sync::RwLock;

async fn spawn_app(state: AppState) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = create_router(Arc::new(RwLock::new(state)));

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

async fn diagnose(client: &reqwest::Client, base: &str, symptoms: &[&str]) -> reqwest::Response {
    client
        .post(format!("{}/api/v1/diagnose", base))
        .json(&json!({ "symptoms": symptoms }))
        .send()
        .await
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let base = spawn_app(AppState::default()).await;
    let body: Value = reqwest::get(format!("{}/api/v1/health", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["metrics"]["rule_count"], 6);
    assert_eq!(body["metrics"]["symptom_count"], 13);
    assert_eq!(body["metrics"]["history_count"], 0);
}

#[tokio::test]
async fn test_symptoms_sorted() {
    let base = spawn_app(AppState::default()).await;
    let body: Value = reqwest::get(format!("{}/api/v1/symptoms", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<String> = serde_json::from_value(body["data"].clone()).unwrap();
    assert_eq!(body["count"], 13);
    assert!(names.windows(2).all(|w| w[0] < w[1]));
}

#[tokio::test]
async fn test_rules_in_declaration_order() {
    let base = spawn_app(AppState::default()).await;
    let body: Value = reqwest::get(format!("{}/api/v1/rules", base))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["count"], 6);
    assert_eq!(body["data"][0]["name"], "Komputer tidak menyala");
    assert_eq!(body["data"][1]["base_confidence"], 0.9);
}

#[tokio::test]
async fn test_diagnose_ranks_and_records() {
    let base = spawn_app(AppState::default()).await;
    let client = reqwest::Client::new();

    let response = diagnose(
        &client,
        &base,
        &["Bunyi beep 3 kali", "Layar black screen/blank", "Komputer restart sendiri"],
    )
    .await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    let results = &body["session"]["results"];
    assert_eq!(results[0]["rule_name"], "RAM rusak");
    assert_eq!(results[0]["confidence_percent"], 98);
    assert_eq!(results[0]["matched_symptom_count"], 3);
    assert_eq!(body["chart"][0]["rule_name"], "RAM rusak");
    assert_eq!(body["chart"][0]["confidence_percent"], 98);
    assert_eq!(body["chart"].as_array().map(Vec::len), Some(4));

    let history: Value = client
        .get(format!("{}/api/v1/history", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["count"], 1);
    assert_eq!(history["data"][0]["id"], body["session"]["id"]);
}

#[tokio::test]
async fn test_unknown_symptom_is_not_an_error() {
    let base = spawn_app(AppState::default()).await;
    let client = reqwest::Client::new();

    let response = diagnose(&client, &base, &["Suara aneh tidak dikenal"]).await;
    assert_eq!(response.status(), 200);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["session"]["results"], json!([]));
    assert_eq!(body["chart"], json!([]));
}

#[tokio::test]
async fn test_empty_selection_rejected() {
    let base = spawn_app(AppState::default()).await;
    let client = reqwest::Client::new();

    let response = diagnose(&client, &base, &[]).await;
    assert_eq!(response.status(), 400);

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "select at least one symptom");
}

#[tokio::test]
async fn test_history_bounded_and_clearable() {
    let base = spawn_app(AppState::default()).await;
    let client = reqwest::Client::new();

    for _ in 0..12 {
        diagnose(&client, &base, &["Kipas bising"]).await;
    }
    diagnose(&client, &base, &["Bunyi klik"]).await;

    let history: Value = client
        .get(format!("{}/api/v1/history?limit=50", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["count"], 10);
    assert_eq!(history["data"][0]["observed_symptoms"], json!(["Bunyi klik"]));

    let cleared: Value = client
        .delete(format!("{}/api/v1/history", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(cleared["cleared"], 10);
}

#[tokio::test]
async fn test_history_session_by_id() {
    let base = spawn_app(AppState::default()).await;
    let client = reqwest::Client::new();

    let body: Value = diagnose(&client, &base, &["Bunyi klik", "Booting lambat"])
        .await
        .json()
        .await
        .unwrap();
    let id = body["session"]["id"].as_str().unwrap().to_string();

    let response = client
        .get(format!("{}/api/v1/history/{}", base, id))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
    let session: Value = response.json().await.unwrap();
    assert_eq!(session["id"], body["session"]["id"]);
    assert_eq!(session["results"], body["session"]["results"]);

    let missing = client
        .get(format!(
            "{}/api/v1/history/00000000-0000-4000-8000-000000000000",
            base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(missing.status(), 404);

    let malformed = client
        .get(format!("{}/api/v1/history/not-a-uuid", base))
        .send()
        .await
        .unwrap();
    assert_eq!(malformed.status(), 400);
}

#[tokio::test]
async fn test_unwritable_history_keeps_diagnosis_and_memory_consistent() {
    let dir = tempfile::tempdir().unwrap();
    let history_path = dir.path().join("history.json");

    let mut config = AppConfig::default();
    config.history.file = history_path.to_str().map(String::from);
    let base = spawn_app(AppState::from_config(&config).unwrap()).await;
    let client = reqwest::Client::new();

    // A directory in place of the history file makes every write fail
    std::fs::create_dir(&history_path).unwrap();

    let response = diagnose(&client, &base, &["Kipas bising"]).await;
    assert_eq!(response.status(), 200);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["session"]["results"][0]["rule_name"], "Overheat processor");

    let history: Value = client
        .get(format!("{}/api/v1/history", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(history["count"], 0);

    let cleared = client
        .delete(format!("{}/api/v1/history", base))
        .send()
        .await
        .unwrap();
    assert_eq!(cleared.status(), 500);
}

#[tokio::test]
async fn test_state_from_config_with_custom_rules() {
    let dir = tempfile::tempdir().unwrap();
    let rules_path = dir.path().join("rules.json");
    std::fs::write(
        &rules_path,
        r#"[{"id": 1, "name": "PSU lemah", "symptoms": ["Mati mendadak"],
             "base_confidence": 0.5, "remedy": "Ganti PSU"}]"#,
    )
    .unwrap();

    let mut config = AppConfig::default();
    config.engine.knowledge_base_path = rules_path.to_str().map(String::from);
    config.engine.user_certainty = 1.0;
    config.history.file = dir.path().join("history.json").to_str().map(String::from);

    let base = spawn_app(AppState::from_config(&config).unwrap()).await;
    let client = reqwest::Client::new();

    let body: Value = diagnose(&client, &base, &["Mati mendadak"]).await.json().await.unwrap();
    assert_eq!(body["session"]["results"][0]["confidence_percent"], 50);
    assert!(dir.path().join("history.json").exists());
}

#[test]
fn test_malformed_knowledge_base_aborts_startup() {
    let dir = tempfile::tempdir().unwrap();
    let rules_path = dir.path().join("rules.json");
    std::fs::write(
        &rules_path,
        r#"[{"id": 1, "name": "x", "symptoms": ["a"], "base_confidence": 1.5, "remedy": "-"}]"#,
    )
    .unwrap();

    let mut config = AppConfig::default();
    config.engine.knowledge_base_path = rules_path.to_str().map(String::from);

    assert!(AppState::from_config(&config).is_err());
}

#[test]
fn test_zero_history_capacity_aborts_startup() {
    let mut config = AppConfig::default();
    config.history.capacity = 0;

    assert!(AppState::from_config(&config).is_err());
}
