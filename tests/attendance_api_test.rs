use std::sync::Arc;

use eduzo::api::router;
use eduzo::notify::NoopNotifier;
use eduzo::state::AppState;
use serde_json::{Value, json};
use sqlx::SqlitePool;
use sqlx::sqlite::SqlitePoolOptions;

async fn spawn_server() -> String {
    let pool: SqlitePool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to create database");
    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    let state = AppState {
        db: pool,
        notifier: Arc::new(NoopNotifier),
    };
    let app = router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });

    format!("http://{}", addr)
}

async fn create_class(client: &reqwest::Client, base: &str, schedule: &str) -> String {
    let resp = client
        .post(format!("{base}/classes"))
        .json(&json!({
            "name": "Algebra",
            "scheduleText": schedule,
            "durationMinutes": 60
        }))
        .send()
        .await
        .expect("create class");
    assert!(resp.status().is_success());
    let body: Value = resp.json().await.expect("class json");
    body["id"].as_str().expect("class id").to_string()
}

async fn create_student(client: &reqwest::Client, base: &str, name: &str) -> String {
    let resp = client
        .post(format!("{base}/students"))
        .json(&json!({ "name": name }))
        .send()
        .await
        .expect("create student");
    let body: Value = resp.json().await.expect("student json");
    body["id"].as_str().expect("student id").to_string()
}

#[tokio::test]
async fn malformed_class_id_is_rejected() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{base}/classes/not-a-uuid/attendance?dates=2024-08-02"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 400);
}

#[tokio::test]
async fn unknown_class_is_404() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();

    let missing = uuid::Uuid::new_v4();
    let resp = client
        .get(format!("{base}/classes/{missing}/attendance?dates=2024-08-02"))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 404);
}

#[tokio::test]
async fn malformed_range_dates_are_rejected() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let class_id = create_class(&client, &base, "Mon - 9:00 AM").await;

    for query in ["from=08-02-2024&to=2024-08-31", "from=2024-08-01&to=garbage"] {
        let resp = client
            .get(format!("{base}/classes/{class_id}/attendance/range?{query}"))
            .send()
            .await
            .expect("request");
        assert_eq!(resp.status(), 400, "query: {query}");
    }
}

#[tokio::test]
async fn invalid_dates_entries_yield_empty_result_not_error() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let class_id = create_class(&client, &base, "Mon - 9:00 AM").await;

    let resp = client
        .get(format!(
            "{base}/classes/{class_id}/attendance?dates=garbage,08/02/2024"
        ))
        .send()
        .await
        .expect("request");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["records"].as_array().expect("records").len(), 0);
}

#[tokio::test]
async fn bulk_patch_reports_applied_count_and_skips_malformed_rows() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let class_id = create_class(&client, &base, "Mon, Wed, Fri - 9:00 AM").await;
    let student_id = create_student(&client, &base, "Alice").await;

    let resp = client
        .patch(format!("{base}/classes/{class_id}/attendance/bulk"))
        .json(&json!({
            "changes": [
                { "studentId": student_id, "dateKey": "2024-08-02", "attendance": true },
                { "dateKey": "2024-08-05", "attendance": true },
                { "studentId": student_id, "homework": true }
            ],
            "tuitionChanges": [
                { "studentId": student_id, "tuition": true }
            ]
        }))
        .send()
        .await
        .expect("bulk patch");
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.expect("json");
    assert_eq!(body["saved"], json!(2));
}

#[tokio::test]
async fn month_scenario_end_to_end() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let class_id = create_class(&client, &base, "Mon, Wed, Fri - 9:00 AM").await;
    let student_id = create_student(&client, &base, "Alice").await;

    client
        .post(format!("{base}/classes/{class_id}/students"))
        .json(&json!({ "studentId": student_id }))
        .send()
        .await
        .expect("enroll");

    // August 2024 has exactly 13 Mon/Wed/Fri dates.
    let resp = client
        .get(format!("{base}/classes/{class_id}/sessions?month=2024-08"))
        .send()
        .await
        .expect("sessions");
    let sessions: Value = resp.json().await.expect("json");
    let dates: Vec<String> = sessions["dates"]
        .as_array()
        .expect("dates")
        .iter()
        .map(|v| v.as_str().expect("date string").to_string())
        .collect();
    assert_eq!(dates.len(), 13);
    assert_eq!(dates[0], "2024-08-02");

    // Toggle attendance on the first session.
    let resp = client
        .patch(format!("{base}/classes/{class_id}/attendance/bulk"))
        .json(&json!({
            "changes": [
                { "studentId": student_id, "dateKey": dates[0], "attendance": true }
            ],
            "tuitionChanges": []
        }))
        .send()
        .await
        .expect("bulk patch");
    assert_eq!(resp.status(), 200);

    // Fetch the whole month: only the toggled key has a record.
    let resp = client
        .get(format!(
            "{base}/classes/{class_id}/attendance?dates={}",
            dates.join(",")
        ))
        .send()
        .await
        .expect("attendance fetch");
    let body: Value = resp.json().await.expect("json");
    let records = body["records"].as_array().expect("records");
    assert!(records.len() <= 14);
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["dateKey"], json!(dates[0]));
    assert_eq!(records[0]["attendance"], json!(true));
    assert_eq!(records[0]["homework"], json!(false));

    // The dense grid shows true for that date and false everywhere else.
    let resp = client
        .get(format!(
            "{base}/classes/{class_id}/attendance/grid?month=2024-08"
        ))
        .send()
        .await
        .expect("grid fetch");
    let grid: Value = resp.json().await.expect("json");
    let rows = grid["rows"].as_array().expect("rows");
    assert_eq!(rows.len(), 1);
    let first_half = rows[0]["firstHalf"].as_array().expect("cells");
    let second_half = rows[0]["secondHalf"].as_array().expect("cells");
    assert_eq!(first_half.len(), second_half.len(), "halves pad to equal length");

    let mut true_count = 0;
    for cell in first_half.iter().chain(second_half.iter()) {
        if cell["attendance"] == json!(true) {
            assert_eq!(cell["date"], json!(dates[0]));
            true_count += 1;
        }
    }
    assert_eq!(true_count, 1);
    assert_eq!(rows[0]["tuition"], json!(false));
}

#[tokio::test]
async fn upcoming_sessions_include_matching_start() {
    let base = spawn_server().await;
    let client = reqwest::Client::new();
    let class_id = create_class(&client, &base, "Mon, Wed, Fri - 9:00 AM").await;

    let resp = client
        .get(format!(
            "{base}/classes/{class_id}/sessions/upcoming?from=2024-08-07&count=3"
        ))
        .send()
        .await
        .expect("upcoming");
    let body: Value = resp.json().await.expect("json");
    assert_eq!(
        body["dates"],
        json!(["2024-08-07", "2024-08-09", "2024-08-12"])
    );
    assert_eq!(body["exhausted"], json!(false));
}
