//! Client configuration loaded from `.env` and environment variables.
//!
//! `Config` is built once per process and shared through the reference [`Config::init`] returns.
//! Tests construct their own value with [`Config::from_env`] or struct literals
//! instead of touching the global.

use once_cell::sync::OnceCell;
use std::{env, path::PathBuf, str::FromStr, time::Duration};

#[derive(Debug, Clone)]
pub struct Config {
    pub project_name: String,
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    /// Default attendance window applied when a session does not carry its own.
    pub attendance_window_minutes: i64,
    pub query_stale_secs: u64,
    pub query_gc_secs: u64,
    pub query_retries: u32,
    pub state_dir: PathBuf,
    pub log_level: String,
    pub log_file: String,
    pub log_to_stdout: bool,
}

static CONFIG: OnceCell<Config> = OnceCell::new();

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.into())
}

fn parse_or<T: FromStr>(key: &str, default: T) -> T {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Reads the current environment. Unset or unparseable values fall back to defaults.
    pub fn from_env() -> Self {
        Config {
            project_name: var_or("PROJECT_NAME", "rollcall"),
            api_base_url: var_or("API_BASE_URL", "http://127.0.0.1:3000/api"),
            request_timeout_secs: parse_or("REQUEST_TIMEOUT_SECS", 10),
            attendance_window_minutes: parse_or("ATTENDANCE_WINDOW_MINUTES", 10),
            query_stale_secs: parse_or("QUERY_STALE_SECS", 30),
            query_gc_secs: parse_or("QUERY_GC_SECS", 600),
            query_retries: parse_or("QUERY_RETRIES", 1),
            state_dir: PathBuf::from(var_or("STATE_DIR", ".rollcall")),
            log_level: var_or("LOG_LEVEL", "client=info"),
            log_file: var_or("LOG_FILE", "rollcall.log"),
            log_to_stdout: var_or("LOG_TO_STDOUT", "false") == "true",
        }
    }

    /// Loads `env_path` (if present) and initialises the process-wide config.
    pub fn init(env_path: &str) -> &'static Self {
        dotenvy::from_filename(env_path).ok();
        CONFIG.get_or_init(Config::from_env)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn query_stale_time(&self) -> Duration {
        Duration::from_secs(self.query_stale_secs)
    }

    pub fn query_gc_time(&self) -> Duration {
        Duration::from_secs(self.query_gc_secs)
    }

    /// Location of the persisted client session (role flag).
    pub fn session_file(&self) -> PathBuf {
        self.state_dir.join("session.json")
    }
}
