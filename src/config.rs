use std::net::SocketAddr;

use clap::Parser;

use crate::api::DEFAULT_API_URL;

/// Default address the web host listens on
pub const DEFAULT_BIND: &str = "127.0.0.1:3000";

/// Options of the web host
///
/// Every option can also be given through its environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "website", version, about = "Serve the CheatSheeter front end")]
pub struct Config {
    /// Root URL of the cheatsheet backend API
    #[arg(long, env = "CHEATSHEETER_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Address to listen on
    #[arg(long, env = "CHEATSHEETER_BIND", default_value = DEFAULT_BIND)]
    pub bind: SocketAddr,
}
