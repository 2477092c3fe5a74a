use anyhow::{Context, Result};
use sb_export::ExportError;
use sb_link::LinkError;
use sb_subscribe::SubsError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Structured error line printed with `--json`.
#[derive(Debug, Serialize)]
pub struct ErrorReport {
    pub kind: &'static str,
    pub detail: String,
}

/// Stable kind of the first typed error in the chain, `error` otherwise.
pub fn error_kind(err: &anyhow::Error) -> &'static str {
    for cause in err.chain() {
        if let Some(e) = cause.downcast_ref::<ExportError>() {
            return e.kind();
        }
        if let Some(e) = cause.downcast_ref::<LinkError>() {
            return e.kind();
        }
        if let Some(e) = cause.downcast_ref::<SubsError>() {
            return e.kind();
        }
    }
    "error"
}

pub fn error_report(err: &anyhow::Error) -> ErrorReport {
    ErrorReport {
        kind: error_kind(err),
        detail: format!("{err:#}"),
    }
}

pub fn report_error(json: bool, err: &anyhow::Error) {
    if json {
        println!(
            "{}",
            serde_json::to_string(&error_report(err)).unwrap_or_else(|_| "{}".into())
        );
    } else {
        eprintln!("error: {err:#}");
    }
}

/// Human text or pretty JSON, whichever the caller asked for.
pub fn emit<T: Serialize>(json: bool, human: impl FnOnce() -> String, value: &T) {
    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| "{}".into())
        );
    } else {
        println!("{}", human());
    }
}

/// Write `text` to `dir/name` (or an explicit path) and return where it went.
pub fn save(text: &str, explicit: Option<&Path>, dir: &Path, name: &str) -> Result<PathBuf> {
    let path = explicit.map_or_else(|| dir.join(name), Path::to_path_buf);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    std::fs::write(&path, text).with_context(|| format!("write {}", path.display()))?;
    tracing::info!(path = %path.display(), bytes = text.len(), "config saved");
    Ok(path)
}
