use std::env;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::constants::{
    DEFAULT_PM2_BIN, NSERVE_LOG, NSERVE_PM2_BIN, NSERVE_STATIC_BIN, STATIC_WORKER_NAME,
};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("{0} is set but empty")]
    EmptyValue(&'static str),
    #[error("Unable to locate the n-serve executable: {0}")]
    CurrentExe(#[from] std::io::Error),
    #[error("Executable path {0} has no parent directory")]
    NoParentDir(PathBuf),
}

/// Runtime settings for the `n-serve` front end.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Supervisor executable (`pm2` unless overridden).
    pub pm2_bin: PathBuf,
    /// Static worker executable launched for each managed server.
    pub static_bin: PathBuf,
    /// Optional tracing filter directive.
    pub log_filter: Option<String>,
}

impl Settings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let exe = env::current_exe()?;
        Self::from_lookup(|key| env::var(key).ok(), &exe)
    }

    /// Builds settings from an arbitrary variable source.
    ///
    /// `exe` is the path of the running binary; the static worker defaults to
    /// a sibling file named [`STATIC_WORKER_NAME`].
    pub fn from_lookup<F>(lookup: F, exe: &Path) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pm2_bin = match lookup(NSERVE_PM2_BIN) {
            Some(value) => non_empty(NSERVE_PM2_BIN, value)?.into(),
            None => PathBuf::from(DEFAULT_PM2_BIN),
        };

        let static_bin = match lookup(NSERVE_STATIC_BIN) {
            Some(value) => non_empty(NSERVE_STATIC_BIN, value)?.into(),
            None => default_static_bin(exe)?,
        };

        let log_filter = lookup(NSERVE_LOG).filter(|v| !v.trim().is_empty());

        debug!(
            "Resolved settings: pm2={} worker={}",
            pm2_bin.display(),
            static_bin.display()
        );

        Ok(Settings {
            pm2_bin,
            static_bin,
            log_filter,
        })
    }
}

fn non_empty(key: &'static str, value: String) -> Result<String, ConfigError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::EmptyValue(key));
    }
    Ok(trimmed.to_string())
}

fn default_static_bin(exe: &Path) -> Result<PathBuf, ConfigError> {
    let dir = exe
        .parent()
        .ok_or_else(|| ConfigError::NoParentDir(exe.to_path_buf()))?;
    let mut worker = dir.join(STATIC_WORKER_NAME);
    if cfg!(windows) {
        worker.set_extension("exe");
    }
    Ok(worker)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let exe = Path::new("/opt/nserve/bin/n-serve");
        let settings = Settings::from_lookup(lookup_from(&[]), exe).unwrap();

        assert_eq!(settings.pm2_bin, PathBuf::from("pm2"));
        assert_eq!(
            settings.static_bin.parent(),
            Some(Path::new("/opt/nserve/bin"))
        );
        assert!(settings
            .static_bin
            .file_stem()
            .is_some_and(|s| s == STATIC_WORKER_NAME));
        assert!(settings.log_filter.is_none());
    }

    #[test]
    fn test_overrides() {
        let exe = Path::new("/usr/local/bin/n-serve");
        let settings = Settings::from_lookup(
            lookup_from(&[
                (NSERVE_PM2_BIN, "/usr/lib/node_modules/.bin/pm2"),
                (NSERVE_STATIC_BIN, " /srv/bin/worker "),
                (NSERVE_LOG, "debug"),
            ]),
            exe,
        )
        .unwrap();

        assert_eq!(
            settings.pm2_bin,
            PathBuf::from("/usr/lib/node_modules/.bin/pm2")
        );
        assert_eq!(settings.static_bin, PathBuf::from("/srv/bin/worker"));
        assert_eq!(settings.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn test_empty_override_is_rejected() {
        let exe = Path::new("/usr/local/bin/n-serve");
        let result = Settings::from_lookup(lookup_from(&[(NSERVE_PM2_BIN, "  ")]), exe);
        assert!(matches!(result, Err(ConfigError::EmptyValue(NSERVE_PM2_BIN))));
    }

    #[test]
    fn test_blank_log_filter_is_ignored() {
        let exe = Path::new("/usr/local/bin/n-serve");
        let settings = Settings::from_lookup(lookup_from(&[(NSERVE_LOG, "")]), exe).unwrap();
        assert!(settings.log_filter.is_none());
    }
}
