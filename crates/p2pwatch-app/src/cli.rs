use std::path::PathBuf;

use clap::Parser;

/// p2pwatch: live view of a p2p session's active client and roster.
#[derive(Parser, Debug)]
#[command(name = "p2pwatch", version, about)]
pub struct Args {
    /// Node to watch, e.g. http://127.0.0.1:3000. Overrides `server.base_url`.
    pub addr: Option<String>,

    /// Config file path override.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Log filter override (debug, info, warn, error, or a full directive).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Print the current state once and exit.
    #[arg(long)]
    pub once: bool,
}

pub fn parse() -> Args {
    Args::parse()
}

/// Turn a bare `host:port` into an http URL.
pub fn normalize_addr(addr: &str) -> String {
    let addr = addr.trim().trim_end_matches('/');
    if addr.contains("://") {
        addr.to_string()
    } else {
        format!("http://{addr}")
    }
}
