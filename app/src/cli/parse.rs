use anyhow::Result;
use clap::Parser;
use sb_link::CanonicalLink;

#[derive(Parser, Debug, Clone)]
pub struct ParseArgs {
    /// Share link to parse
    pub link: String,
    /// Also print the sing-box outbound fragment
    #[arg(long)]
    pub outbound: bool,
}

/// Canonical link as pretty JSON. The output is JSON either way.
pub fn run(args: &ParseArgs, _json: bool) -> Result<i32> {
    let link = CanonicalLink::parse(args.link.trim())?;
    let value = if args.outbound {
        serde_json::json!({
            "link": link,
            "outbound": link.to_singbox_outbound()?,
        })
    } else {
        serde_json::to_value(&link)?
    };
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(0)
}
