use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("cozydo-{nanos}-{file_name}"))
}

fn write_store(path: &PathBuf, tasks: serde_json::Value, points: u64) {
    let content = serde_json::json!({
        "tasks": tasks,
        "points": points
    });
    std::fs::write(path, serde_json::to_string_pretty(&content).unwrap()).unwrap();
}

// Children run with TZ=UTC0 so their local clock matches this arithmetic.
fn deadline_days_from_now(days: i64) -> String {
    (OffsetDateTime::now_utc() + Duration::days(days))
        .format(format_description!("[year]-[month]-[day] [hour]:[minute]"))
        .expect("format deadline")
}

#[test]
fn done_before_the_deadline_awards_ten_points() {
    let exe = env!("CARGO_BIN_EXE_cozydo");
    let store_path = temp_path("cli-done-on-time.json");

    write_store(
        &store_path,
        serde_json::json!([
            {
                "id": 1,
                "name": "Write report",
                "deadline": deadline_days_from_now(1),
                "duration_hours": 2.0,
                "priority": 2,
                "created_at": "2025-12-20T00:00:00Z"
            }
        ]),
        0,
    );

    let output = Command::new(exe)
        .args(["done", "1"])
        .env("COZYDO_STORE_PATH", &store_path)
        .env("COZYDO_DISABLE_NOTIFICATIONS", "1")
        .env("TZ", "UTC0")
        .output()
        .expect("failed to run done command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Completed 'Write report' (+10 points). Total points: 10"));
    assert!(stdout.contains("Great job! Keep the momentum going!"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(stored["points"], 10);
    assert_eq!(stored["tasks"][0]["completed"], true);
    OffsetDateTime::parse(
        stored["tasks"][0]["completed_at"]
            .as_str()
            .expect("completed_at string"),
        &Rfc3339,
    )
    .expect("completed_at rfc3339");
}

#[test]
fn done_after_the_deadline_awards_five_points() {
    let exe = env!("CARGO_BIN_EXE_cozydo");
    let store_path = temp_path("cli-done-late.json");

    write_store(
        &store_path,
        serde_json::json!([
            {
                "id": 1,
                "name": "Write report",
                "deadline": deadline_days_from_now(-2),
                "duration_hours": 2.0,
                "priority": 2,
                "created_at": "2025-12-20T00:00:00Z"
            }
        ]),
        0,
    );

    let output = Command::new(exe)
        .args(["done", "1"])
        .env("COZYDO_STORE_PATH", &store_path)
        .env("COZYDO_DISABLE_NOTIFICATIONS", "1")
        .env("TZ", "UTC0")
        .output()
        .expect("failed to run done command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(+5 points). Total points: 5"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(stored["points"], 5);
    assert_eq!(stored["tasks"][0]["completed"], true);
}

#[test]
fn done_with_unreadable_deadline_counts_as_late() {
    let exe = env!("CARGO_BIN_EXE_cozydo");
    let store_path = temp_path("cli-done-unreadable.json");

    write_store(
        &store_path,
        serde_json::json!([
            {
                "id": 1,
                "name": "old",
                "deadline": "whenever",
                "duration_hours": 1.0,
                "priority": 3,
                "created_at": "2025-12-20T00:00:00Z"
            }
        ]),
        0,
    );

    let output = Command::new(exe)
        .args(["done", "1"])
        .env("COZYDO_STORE_PATH", &store_path)
        .env("COZYDO_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run done command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("(+5 points). Total points: 5"));
}

#[test]
fn done_twice_keeps_points_and_timestamp() {
    let exe = env!("CARGO_BIN_EXE_cozydo");
    let store_path = temp_path("cli-done-twice.json");

    write_store(
        &store_path,
        serde_json::json!([
            {
                "id": 1,
                "name": "old",
                "deadline": "2030-01-01 09:00",
                "duration_hours": 1.0,
                "priority": 3,
                "created_at": "2025-12-20T00:00:00Z",
                "completed": true,
                "completed_at": "2025-12-21T10:00:00Z"
            }
        ]),
        10,
    );

    let output = Command::new(exe)
        .args(["done", "1"])
        .env("COZYDO_STORE_PATH", &store_path)
        .env("COZYDO_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run done command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Task 'old' is already completed."));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).unwrap();
    std::fs::remove_file(&store_path).ok();

    assert_eq!(stored["points"], 10);
    assert_eq!(stored["tasks"][0]["completed_at"], "2025-12-21T10:00:00Z");
}

#[test]
fn done_reports_missing_id() {
    let exe = env!("CARGO_BIN_EXE_cozydo");
    let store_path = temp_path("cli-done-missing.json");

    write_store(&store_path, serde_json::json!([]), 0);

    let output = Command::new(exe)
        .args(["done", "9"])
        .env("COZYDO_STORE_PATH", &store_path)
        .env("COZYDO_DISABLE_NOTIFICATIONS", "1")
        .output()
        .expect("failed to run done command");

    std::fs::remove_file(&store_path).ok();
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: not_found"));
    assert!(stderr.contains("no task with id 9"));
}

#[test]
fn done_json_reports_gained_and_total_points() {
    let exe = env!("CARGO_BIN_EXE_cozydo");
    let store_path = temp_path("cli-done-json.json");

    write_store(
        &store_path,
        serde_json::json!([
            {
                "id": 1,
                "name": "Write report",
                "deadline": deadline_days_from_now(1),
                "duration_hours": 2.0,
                "priority": 2,
                "created_at": "2025-12-20T00:00:00Z"
            }
        ]),
        5,
    );

    let output = Command::new(exe)
        .args(["--json", "done", "1"])
        .env("COZYDO_STORE_PATH", &store_path)
        .env("COZYDO_DISABLE_NOTIFICATIONS", "1")
        .env("TZ", "UTC0")
        .output()
        .expect("failed to run done command");

    std::fs::remove_file(&store_path).ok();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");

    assert_eq!(parsed["gained"], 10);
    assert_eq!(parsed["points"], 15);
    assert_eq!(parsed["task"]["id"], 1);
    assert_eq!(parsed["task"]["completed"], true);
    assert!(parsed["task"]["completed_at"].is_string());
}
