//! Runtime settings read from the environment.
//! 运行时配置（环境变量）。

use std::path::PathBuf;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_SESSION_TTL_SECS: u64 = 600;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// Upper bound on one subscription fetch.
    pub fetch_timeout: Duration,
    pub user_agent: String,
    /// Lifetime of a pending choice in interactive mode.
    pub session_ttl: Duration,
    /// Directory `--save` writes into.
    pub output_dir: PathBuf,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            fetch_timeout: Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS),
            user_agent: default_user_agent(),
            session_ttl: Duration::from_secs(DEFAULT_SESSION_TTL_SECS),
            output_dir: PathBuf::from("."),
        }
    }
}

fn default_user_agent() -> String {
    format!("sbconv/{}", env!("CARGO_PKG_VERSION"))
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            fetch_timeout: secs(&lookup, "SB_FETCH_TIMEOUT_SECS", defaults.fetch_timeout),
            user_agent: lookup("SB_FETCH_USER_AGENT")
                .filter(|v| !v.trim().is_empty())
                .unwrap_or(defaults.user_agent),
            session_ttl: secs(&lookup, "SB_SESSION_TTL_SECS", defaults.session_ttl),
            output_dir: lookup("SB_OUTPUT_DIR")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
        }
    }
}

fn secs(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: Duration) -> Duration {
    let Some(raw) = lookup(key) else {
        return default;
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 => Duration::from_secs(n),
        _ => {
            warn!(key, value = %raw, default = default.as_secs(), "invalid duration, using default");
            default
        }
    }
}
