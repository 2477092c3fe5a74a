pub mod convert;
pub mod detect;
pub mod extract;
pub mod interactive;
pub mod output;
pub mod parse;

use crate::settings::Settings;
use anyhow::{Context, Result};
use clap::{Args as ClapArgs, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "sbconv", version)]
#[command(about = "Convert proxy share links and subscriptions into client configs", long_about = None)]
pub struct Args {
    /// Machine-readable output; errors become `{"kind", "detail"}` objects
    #[arg(long, global = true)]
    pub json: bool,
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the dialect of a link (exit 2 when unrecognised)
    Detect(detect::DetectArgs),
    /// Parse a link and print its canonical form
    Parse(parse::ParseArgs),
    /// Print the links found in a subscription (text, base64, HTML or URL)
    Extract(extract::ExtractArgs),
    /// Convert a link or subscription into a client config
    Convert(convert::ConvertArgs),
    /// Line-oriented session: submit a link, then pick a format
    Interactive(interactive::InteractiveArgs),
}

/// Positional text, `-` for stdin, or `--file`.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct InputArgs {
    /// Link, subscription text or subscription URL; `-` or absent reads stdin
    pub input: Option<String>,
    /// Read the input from a file
    #[arg(long, short = 'f', conflicts_with = "input")]
    pub file: Option<PathBuf>,
}

impl InputArgs {
    pub fn read(&self) -> Result<String> {
        if let Some(path) = &self.file {
            return std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()));
        }
        match self.input.as_deref() {
            Some(text) if text != "-" => Ok(text.to_string()),
            _ => {
                let mut buf = String::new();
                std::io::stdin()
                    .read_to_string(&mut buf)
                    .context("read input from stdin")?;
                Ok(buf)
            }
        }
    }
}

/// Run one command; returns the process exit code.
pub async fn dispatch(args: Args, settings: &Settings) -> i32 {
    let json = args.json;
    let result = match args.command {
        Commands::Detect(a) => detect::run(&a, json),
        Commands::Parse(a) => parse::run(&a, json),
        Commands::Extract(a) => extract::run(&a, settings, json).await,
        Commands::Convert(a) => convert::run(&a, settings, json).await,
        Commands::Interactive(a) => interactive::run(&a, settings).await,
    };
    match result {
        Ok(code) => code,
        Err(e) => {
            output::report_error(json, &e);
            1
        }
    }
}
