//! sbconv entrypoint
//! - tracing init (SB_LOG_LEVEL / SB_LOG_FORMAT)
//! - settings from the environment
//! - subcommand dispatch

use app::{cli, logging, settings::Settings};
use clap::Parser;

#[tokio::main]
async fn main() {
    let args = cli::Args::parse();
    logging::init_logging();
    let settings = Settings::from_env();
    let code = cli::dispatch(args, &settings).await;
    std::process::exit(code);
}
