//! Drives the PM2 adapter against a scripted stand-in for the `pm2` client.
#![cfg(unix)]

use nserve_supervisor::{
    Connector, LaunchSpec, Pm2Connector, ProcessEntry, ProcessRef, Supervisor, SupervisorError,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const FAKE_PM2: &str = r#"#!/bin/sh
log="$(dirname "$0")/calls.log"
echo "$*" >> "$log"
case "$1" in
  ping)
    echo "{ msg: 'pong' }"
    ;;
  jlist)
    echo "[PM2] Spawning PM2 daemon with pm2_home=/tmp/.pm2"
    echo '[{"pm_id":0,"name":"site","pid":4242,"pm2_env":{"status":"online","pm_uptime":1700000000000,"restart_time":2,"args":["--port=8080","--dir=/srv/site"]}}]'
    ;;
  start)
    echo "env=$NSERVE_ENV" >> "$log"
    ;;
  stop)
    echo "[PM2][ERROR] Process or Namespace $2 not found" >&2
    exit 1
    ;;
  startup)
    echo ""
    echo "sudo env PATH=\$PATH pm2 startup systemd -u deploy"
    ;;
esac
"#;

fn fake_pm2(dir: &Path) -> PathBuf {
    let bin = dir.join("pm2");
    fs::write(&bin, FAKE_PM2).unwrap();
    fs::set_permissions(&bin, fs::Permissions::from_mode(0o755)).unwrap();
    bin
}

fn calls(dir: &Path) -> Vec<String> {
    fs::read_to_string(dir.join("calls.log"))
        .unwrap_or_default()
        .lines()
        .map(str::to_string)
        .collect()
}

#[tokio::test]
async fn test_connect_pings_and_lists_processes() {
    let dir = TempDir::new().unwrap();
    let connector = Pm2Connector::new(fake_pm2(dir.path()));

    let session = connector.connect().await.unwrap();
    let processes = session.list().await.unwrap();

    assert_eq!(
        processes,
        vec![ProcessEntry {
            pm_id: 0,
            name: "site".to_string(),
            status: Some("online".to_string()),
            args: vec!["--port=8080".to_string(), "--dir=/srv/site".to_string()],
            started_at_ms: Some(1_700_000_000_000),
            restart_count: 2,
        }]
    );
    assert_eq!(calls(dir.path()), vec!["ping", "jlist"]);
}

#[tokio::test]
async fn test_start_passes_launch_args_and_env() {
    let dir = TempDir::new().unwrap();
    let session = Pm2Connector::new(fake_pm2(dir.path()))
        .connect()
        .await
        .unwrap();

    let spec = LaunchSpec::new(
        "site",
        "/usr/local/bin/nserve-static",
        vec!["--port=8080".to_string(), "--dir=/srv/site".to_string()],
    )
    .with_env("NSERVE_ENV", "production");
    session.start(&spec).await.unwrap();

    assert_eq!(
        calls(dir.path()),
        vec![
            "ping",
            "start /usr/local/bin/nserve-static --name site --interpreter none -- --port=8080 --dir=/srv/site",
            "env=production",
        ]
    );
}

#[tokio::test]
async fn test_failed_call_reports_supervisor_message() {
    let dir = TempDir::new().unwrap();
    let session = Pm2Connector::new(fake_pm2(dir.path()))
        .connect()
        .await
        .unwrap();

    let err = session
        .stop(&ProcessRef::Name("missing".to_string()))
        .await
        .unwrap_err();

    match err {
        SupervisorError::Call {
            action,
            target,
            reason,
        } => {
            assert_eq!(action, "stop");
            assert_eq!(target, "missing");
            assert_eq!(reason, "[PM2][ERROR] Process or Namespace missing not found");
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_startup_returns_trimmed_instructions() {
    let dir = TempDir::new().unwrap();
    let session = Pm2Connector::new(fake_pm2(dir.path()))
        .connect()
        .await
        .unwrap();

    let instructions = session.startup().await.unwrap();
    assert_eq!(
        instructions,
        "sudo env PATH=$PATH pm2 startup systemd -u deploy"
    );
}

#[tokio::test]
async fn test_missing_executable_fails_to_connect() {
    let dir = TempDir::new().unwrap();
    let connector = Pm2Connector::new(dir.path().join("no-such-pm2"));

    let err = connector.connect().await.err().unwrap();
    assert!(matches!(err, SupervisorError::Connect { .. }));
}
