// ABOUTME: PM2 adapter for the supervisor seam
// ABOUTME: Drives the pm2 executable and parses its JSON process listing

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::sync::Arc;
use tokio::process::Command;
use tracing::{debug, info};

use crate::error::{SupervisorError, SupervisorResult};
use crate::session::{Connector, Supervisor};
use crate::types::{LaunchSpec, ProcessEntry, ProcessRef};

/// Opens sessions against a PM2 daemon through its command-line client.
#[derive(Debug, Clone)]
pub struct Pm2Connector {
    bin: PathBuf,
}

impl Pm2Connector {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }
}

#[async_trait]
impl Connector for Pm2Connector {
    /// Pings the daemon, which also spawns it when it is not running yet.
    async fn connect(&self) -> SupervisorResult<Arc<dyn Supervisor>> {
        let session = Pm2Session::new(self.bin.clone());
        session
            .run("ping", "daemon", &["ping".into()], &BTreeMap::new())
            .await
            .map_err(|e| SupervisorError::Connect {
                reason: match e {
                    SupervisorError::Call { reason, .. } => reason,
                    other => other.to_string(),
                },
            })?;
        info!("Connected to PM2 via {}", self.bin.display());
        Ok(Arc::new(session))
    }
}

/// A session backed by the `pm2` executable.
///
/// Every call is a separate client invocation, so no socket is held open
/// between calls and disconnecting has nothing to release.
#[derive(Debug, Clone)]
pub struct Pm2Session {
    bin: PathBuf,
}

impl Pm2Session {
    pub fn new(bin: impl Into<PathBuf>) -> Self {
        Self { bin: bin.into() }
    }

    async fn run(
        &self,
        action: &'static str,
        target: &str,
        args: &[OsString],
        env: &BTreeMap<String, String>,
    ) -> SupervisorResult<String> {
        debug!("Running {} {:?}", self.bin.display(), args);

        let output = Command::new(&self.bin)
            .args(args)
            .envs(env)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| SupervisorError::Call {
                action,
                target: target.to_string(),
                reason: format!("could not run {}: {}", self.bin.display(), e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let stdout = String::from_utf8_lossy(&output.stdout);
            return Err(SupervisorError::Call {
                action,
                target: target.to_string(),
                reason: failure_reason(&stderr, &stdout, output.status.code()),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    async fn by_ref(&self, action: &'static str, target: &ProcessRef) -> SupervisorResult<()> {
        let target = target.to_string();
        self.run(
            action,
            &target,
            &[action.into(), target.clone().into()],
            &BTreeMap::new(),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl Supervisor for Pm2Session {
    async fn list(&self) -> SupervisorResult<Vec<ProcessEntry>> {
        let stdout = self
            .run("list", "processes", &["jlist".into()], &BTreeMap::new())
            .await?;
        parse_process_list(&stdout)
    }

    async fn start(&self, spec: &LaunchSpec) -> SupervisorResult<()> {
        self.run("start", &spec.name, &start_args(spec), &spec.env)
            .await?;
        info!("PM2 launched '{}'", spec.name);
        Ok(())
    }

    async fn stop(&self, target: &ProcessRef) -> SupervisorResult<()> {
        self.by_ref("stop", target).await
    }

    async fn restart(&self, target: &ProcessRef) -> SupervisorResult<()> {
        self.by_ref("restart", target).await
    }

    async fn delete(&self, target: &ProcessRef) -> SupervisorResult<()> {
        self.by_ref("delete", target).await
    }

    async fn dump(&self) -> SupervisorResult<()> {
        self.run("save", "process list", &["save".into()], &BTreeMap::new())
            .await?;
        Ok(())
    }

    async fn startup(&self) -> SupervisorResult<String> {
        let stdout = self
            .run("startup", "boot script", &["startup".into()], &BTreeMap::new())
            .await?;
        Ok(stdout.trim().to_string())
    }

    async fn disconnect(&self) {
        debug!("Released PM2 session");
    }
}

/// Command line for `pm2 start`; launch arguments follow the `--` separator.
fn start_args(spec: &LaunchSpec) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![
        "start".into(),
        spec.script.clone().into_os_string(),
        "--name".into(),
        spec.name.clone().into(),
        "--interpreter".into(),
        "none".into(),
    ];
    if !spec.autorestart {
        args.push("--no-autorestart".into());
    }
    if !spec.args.is_empty() {
        args.push("--".into());
        args.extend(spec.args.iter().map(OsString::from));
    }
    args
}

fn failure_reason(stderr: &str, stdout: &str, code: Option<i32>) -> String {
    let last_line = |text: &str| {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .last()
            .map(str::to_string)
    };
    last_line(stderr)
        .or_else(|| last_line(stdout))
        .unwrap_or_else(|| match code {
            Some(code) => format!("exited with status {}", code),
            None => "terminated by signal".to_string(),
        })
}

#[derive(Debug, Deserialize)]
struct Pm2Process {
    pm_id: u32,
    name: String,
    #[serde(default)]
    pm2_env: Option<Pm2Env>,
}

#[derive(Debug, Default, Deserialize)]
struct Pm2Env {
    #[serde(default)]
    status: Option<String>,
    #[serde(default)]
    pm_uptime: Option<f64>,
    #[serde(default)]
    restart_time: Option<u32>,
    #[serde(default)]
    args: Option<Pm2Args>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Pm2Args {
    List(Vec<String>),
    Line(String),
}

impl From<Pm2Process> for ProcessEntry {
    fn from(raw: Pm2Process) -> Self {
        let env = raw.pm2_env.unwrap_or_default();
        let args = match env.args {
            Some(Pm2Args::List(list)) => list,
            Some(Pm2Args::Line(line)) => split_arg_line(&line),
            None => Vec::new(),
        };
        ProcessEntry {
            pm_id: raw.pm_id,
            name: raw.name,
            status: env.status,
            args,
            started_at_ms: env.pm_uptime.map(|ms| ms as i64),
            restart_count: env.restart_time.unwrap_or(0),
        }
    }
}

/// Splits a string-form argument line on whitespace.
///
/// A word that does not start with `-` and follows a `--key=value` token is
/// part of that value, so `--dir=/srv/my site` stays one argument.
fn split_arg_line(line: &str) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    for word in line.split_whitespace() {
        match args.last_mut() {
            Some(last) if !word.starts_with('-') && is_key_value(last) => {
                last.push(' ');
                last.push_str(word);
            }
            _ => args.push(word.to_string()),
        }
    }
    args
}

fn is_key_value(arg: &str) -> bool {
    arg.starts_with("--") && arg.contains('=')
}

/// Parses `pm2 jlist` output.
///
/// PM2 may print notices such as `[PM2] Spawning PM2 daemon` ahead of the
/// JSON array and update banners after it. The listing starts at the first
/// `[` that opens an array of objects (or an empty array) and ends with that
/// array.
pub fn parse_process_list(stdout: &str) -> SupervisorResult<Vec<ProcessEntry>> {
    if stdout.trim().is_empty() {
        return Ok(Vec::new());
    }

    let start = stdout
        .char_indices()
        .filter(|(_, c)| *c == '[')
        .map(|(idx, _)| idx)
        .find(|idx| {
            let rest = stdout[idx + 1..].trim_start();
            rest.starts_with('{') || rest.starts_with(']')
        })
        .ok_or_else(|| {
            SupervisorError::InvalidOutput("process listing is not a JSON array".to_string())
        })?;

    let raw: Vec<Pm2Process> = serde_json::Deserializer::from_str(&stdout[start..])
        .into_iter::<Vec<Pm2Process>>()
        .next()
        .ok_or_else(|| {
            SupervisorError::InvalidOutput("process listing is empty".to_string())
        })??;
    Ok(raw.into_iter().map(ProcessEntry::from).collect())
}
