use crate::cli::{output, InputArgs};
use crate::resolve::subscription_text;
use crate::settings::Settings;
use anyhow::Result;
use clap::Parser;
use sb_subscribe::collect_links;

#[derive(Parser, Debug, Clone)]
pub struct ExtractArgs {
    #[command(flatten)]
    pub input: InputArgs,
}

pub async fn run(args: &ExtractArgs, settings: &Settings, json: bool) -> Result<i32> {
    let raw = args.input.read()?;
    let text = subscription_text(&raw, settings).await?;
    let batch = collect_links(&text)?;
    output::emit(json, || batch.join(), &batch.as_slice());
    Ok(0)
}
