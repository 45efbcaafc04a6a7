#![cfg(not(tarpaulin_include))]

use cheatsheeter::app;
use cheatsheeter::config::Config;
use clap::Parser;

/// Main entry point for the CheatSheeter web host
///
/// Reads the configuration from the command line and environment, sets up
/// logging (`RUST_LOG`, `info` by default) and serves the front end.
///
/// # Returns
/// * `Result<(), Box<dyn std::error::Error>>` - Success or error object
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    app::run(config).await
}
