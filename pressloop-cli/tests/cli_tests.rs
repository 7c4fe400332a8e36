use std::net::SocketAddr;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::tempdir;
use warp::Filter;

fn run_pressloop(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pressloop"))
        .args(args)
        .env_remove("PRESSLOOP_BOT_TOKEN")
        .env_remove("PRESSLOOP_TABLE_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run pressloop")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn path_arg(path: &Path) -> &str {
    path.to_str().expect("temp path is utf-8")
}

#[test]
fn test_help_lists_units() {
    let output = run_pressloop(&["--help"]);
    assert!(output.status.success());
    let help = stdout(&output);
    for command in ["notify", "poll", "report", "record", "config"] {
        assert!(help.contains(command), "missing {command} in help");
    }
}

#[test]
fn test_config_init_refuses_to_overwrite() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");

    let first = run_pressloop(&["config", "init", "--config", path_arg(&config)]);
    assert!(first.status.success(), "{}", stderr(&first));
    assert!(config.exists());

    let second = run_pressloop(&["config", "init", "--config", path_arg(&config)]);
    assert!(!second.status.success());
    assert!(stderr(&second).contains("already exists"));

    let forced = run_pressloop(&["config", "init", "--config", path_arg(&config), "--force"]);
    assert!(forced.status.success());
}

#[test]
fn test_config_show_reports_missing_secrets() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("absent.toml");

    let output = run_pressloop(&["config", "show", "--config", path_arg(&config)]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("PRESSLOOP_BOT_TOKEN: missing"));
    assert!(text.contains("invalid: chat.chat_id must be set"));
}

#[test]
fn test_record_reset_and_show() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let record = dir.path().join("press.json");
    std::fs::write(&record, r#"{"update_id": 12}"#).unwrap();

    let reset = run_pressloop(&[
        "record",
        "reset",
        "--config",
        path_arg(&config),
        "--record-path",
        path_arg(&record),
    ]);
    assert!(reset.status.success(), "{}", stderr(&reset));

    let show = run_pressloop(&[
        "record",
        "show",
        "--config",
        path_arg(&config),
        "--record-path",
        path_arg(&record),
    ]);
    assert!(show.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&show)).unwrap();
    assert_eq!(value, serde_json::json!({ "update_id": -1 }));
}

#[test]
fn test_poll_requires_bot_token() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let record = dir.path().join("press.json");

    let output = run_pressloop(&[
        "poll",
        "--config",
        path_arg(&config),
        "--chat-id",
        "42",
        "--button-marker",
        "X",
        "--record-path",
        path_arg(&record),
    ]);

    assert_eq!(output.status.code(), Some(2));
    assert!(stderr(&output).contains("PRESSLOOP_BOT_TOKEN not set"));
    assert!(!record.exists());
}

#[test]
fn test_report_refuses_sentinel_record() {
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let record = dir.path().join("press.json");
    std::fs::write(&config, "[table]\nurl = \"http://127.0.0.1:9/v0/app/Presses\"\n").unwrap();
    std::fs::write(&record, r#"{"update_id": -1}"#).unwrap();

    let output = Command::new(env!("CARGO_BIN_EXE_pressloop"))
        .args([
            "report",
            "--config",
            path_arg(&config),
            "--record-path",
            path_arg(&record),
        ])
        .env("PRESSLOOP_TABLE_TOKEN", "secret")
        .output()
        .expect("Failed to run pressloop");

    assert!(!output.status.success());
    assert!(stderr(&output).contains("holds no button press"));
}

/// Bot API double for token "test-token" with no buffered updates.
fn spawn_idle_bot_api() -> SocketAddr {
    let route = warp::post()
        .and(warp::path!("bottest-token" / "getUpdates"))
        .map(|| warp::reply::json(&serde_json::json!({ "ok": true, "result": [] })));
    let (addr, server) = warp::serve(route).bind_ephemeral(([127, 0, 0, 1], 0));
    tokio::spawn(server);
    addr
}

fn run_poll(config: &Path, record: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_pressloop"))
        .args([
            "poll",
            "--config",
            path_arg(config),
            "--chat-id",
            "42",
            "--button-marker",
            "X",
            "--record-path",
            path_arg(record),
        ])
        .env("PRESSLOOP_BOT_TOKEN", "test-token")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run pressloop")
}

// The binary blocks this thread, so the API double needs its own workers
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_poll_exit_status_separates_waiting_from_errors() {
    let addr = spawn_idle_bot_api();
    let dir = tempdir().unwrap();
    let config = dir.path().join("config.toml");
    let record = dir.path().join("press.json");
    std::fs::write(&config, format!("[chat]\napi_base = \"http://{}\"\n", addr)).unwrap();

    let waiting = run_poll(&config, &record);
    assert_eq!(waiting.status.code(), Some(1), "{}", stderr(&waiting));
    assert!(record.exists());

    std::fs::write(&record, "{not json").unwrap();
    let corrupt = run_poll(&config, &record);
    assert_eq!(corrupt.status.code(), Some(2));
    assert!(stderr(&corrupt).contains("is corrupt"));
}
