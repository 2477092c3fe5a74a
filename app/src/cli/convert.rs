//! `convert`: link or subscription in, client config out.

use crate::cli::{output, InputArgs};
use crate::format::OutputFormat;
use crate::naming;
use crate::resolve::{resolve, Resolved};
use crate::settings::Settings;
use anyhow::Result;
use clap::Parser;
use sb_export::{emit_batch, emit_single, EmittedConfig, SkippedLink};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
pub struct ConvertArgs {
    #[command(flatten)]
    pub input: InputArgs,
    /// Output format; `singbox` for a single link and `clash` for a subscription by default
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
    /// Write to a file named after the subscription host (or the format's default name)
    #[arg(long)]
    pub save: bool,
    /// Write to this path instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Conversion {
    pub format: &'static str,
    #[serde(skip)]
    pub text: String,
    pub converted: usize,
    pub skipped: Vec<SkippedLink>,
}

impl Conversion {
    fn plain(format: OutputFormat, text: String, converted: usize) -> Self {
        Self {
            format: format.name(),
            text,
            converted,
            skipped: Vec::new(),
        }
    }

    fn emitted(format: OutputFormat, cfg: EmittedConfig) -> Self {
        Self {
            format: format.name(),
            text: cfg.text,
            converted: cfg.converted,
            skipped: cfg.skipped,
        }
    }
}

pub fn default_format(resolved: &Resolved) -> OutputFormat {
    match resolved {
        Resolved::Single { .. } => OutputFormat::SingBox,
        Resolved::Batch { .. } => OutputFormat::Clash,
    }
}

/// Render `resolved` in `format`. Single links are strict; batches skip what cannot convert.
pub fn convert(resolved: &Resolved, format: OutputFormat) -> Result<Conversion> {
    let conversion = match (resolved, format.target()) {
        (Resolved::Single { link, .. }, None) => Conversion::plain(format, link.clone(), 1),
        (Resolved::Batch { links, .. }, None) => {
            Conversion::plain(format, links.join("\n"), links.len())
        }
        (Resolved::Single { link, .. }, Some(target)) => {
            let full = format == OutputFormat::SingBoxFull;
            Conversion::emitted(format, emit_single(target, link, full)?)
        }
        // a batch sing-box export is always a runnable config
        (Resolved::Batch { links, .. }, Some(target)) => {
            Conversion::emitted(format, emit_batch(target, links, true)?)
        }
    };
    Ok(conversion)
}

#[derive(Debug, Serialize)]
struct SaveReport<'a> {
    path: String,
    #[serde(flatten)]
    conversion: &'a Conversion,
}

pub async fn run(args: &ConvertArgs, settings: &Settings, json: bool) -> Result<i32> {
    let raw = args.input.read()?;
    let resolved = resolve(&raw, settings).await?;
    let format = args.format.unwrap_or_else(|| default_format(&resolved));
    let conversion = convert(&resolved, format)?;

    if !conversion.skipped.is_empty() {
        eprintln!(
            "{} of {} links skipped",
            conversion.skipped.len(),
            conversion.skipped.len() + conversion.converted
        );
    }

    if !args.save && args.output.is_none() {
        println!("{}", conversion.text.trim_end());
        return Ok(0);
    }

    let name = naming::file_name(resolved.source(), format);
    let path = output::save(&conversion.text, args.output.as_deref(), &settings.output_dir, &name)?;
    let report = SaveReport {
        path: path.display().to_string(),
        conversion: &conversion,
    };
    output::emit(
        json,
        || format!("saved {} ({} converted)", report.path, conversion.converted),
        &report,
    );
    Ok(0)
}
