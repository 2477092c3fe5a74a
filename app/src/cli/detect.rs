use crate::cli::output;
use anyhow::Result;
use clap::Parser;
use sb_link::detect_dialect;
use serde_json::json;

#[derive(Parser, Debug, Clone)]
pub struct DetectArgs {
    /// Share link to classify
    pub link: String,
}

/// Exit 0 with the dialect name, 2 when the scheme is not supported.
pub fn run(args: &DetectArgs, json: bool) -> Result<i32> {
    match detect_dialect(&args.link) {
        Some(d) => {
            output::emit(json, || d.name().to_string(), &json!({ "dialect": d }));
            Ok(0)
        }
        None => {
            output::emit(
                json,
                || "unknown".to_string(),
                &json!({ "kind": "unknown_scheme", "detail": "unsupported link scheme" }),
            );
            Ok(2)
        }
    }
}
