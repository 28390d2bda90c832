use std::io::Write;
use std::time::Duration;

use tempfile::NamedTempFile;
use tokio::time::{sleep, timeout};
use tokio_test::assert_ok;

/// Create a minimal valid config
fn minimal_config() -> &'static str {
    r#"
[sweeper]
interval_ms = 50

[[responders.tier1]]
id = "harry@sentinel.example"
name = "Harry"

[[responders.tier2]]
id = "louis@sentinel.example"
name = "Louis"
"#
}

fn write_config(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("Failed to create temp file");
    write!(file, "{}", contents).expect("Failed to write config");
    file
}

/// Spawn the daemon with the given config file
fn spawn_daemon(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_sentineld"))
        .env("SENTINEL_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn daemon")
}

#[tokio::test]
async fn test_daemon_stays_up_with_valid_config() {
    let config = write_config(minimal_config());
    let mut child = spawn_daemon(config.path());

    sleep(Duration::from_millis(300)).await;
    let exit = assert_ok!(child.try_wait());
    assert!(exit.is_none(), "Daemon should keep running until signalled");

    assert_ok!(child.kill().await);
}

#[tokio::test]
async fn test_daemon_exits_on_missing_config() {
    let mut child = spawn_daemon(std::path::Path::new("/nonexistent/sentinel.toml"));

    let status = timeout(Duration::from_secs(5), child.wait())
        .await
        .expect("Daemon should exit promptly")
        .expect("Failed to wait for daemon");
    assert!(!status.success());
}

#[tokio::test]
async fn test_daemon_exits_on_invalid_config() {
    let config = write_config(
        r#"
[desk]
archive_after_hours = 0

[[responders.tier1]]
id = "harry@sentinel.example"
"#,
    );
    let mut child = spawn_daemon(config.path());

    let status = timeout(Duration::from_secs(5), child.wait())
        .await
        .expect("Daemon should exit promptly")
        .expect("Failed to wait for daemon");
    assert!(!status.success());
}

#[tokio::test]
async fn test_daemon_exits_on_duplicate_responders() {
    let config = write_config(
        r#"
[[responders.tier1]]
id = "same@sentinel.example"

[[responders.tier2]]
id = "same@sentinel.example"
"#,
    );
    let mut child = spawn_daemon(config.path());

    let status = timeout(Duration::from_secs(5), child.wait())
        .await
        .expect("Daemon should exit promptly")
        .expect("Failed to wait for daemon");
    assert!(!status.success());
}
