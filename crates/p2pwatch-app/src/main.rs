mod cli;
mod monitor;

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use p2pwatch_common::WatchError;
use p2pwatch_config::{validation, LogLevel, WatchConfig};

/// Build the log filter from a CLI override or the configured level.
///
/// `RUST_LOG` is honoured; the directive is added on top of it.
fn env_filter(cli_directive: Option<&str>, level: LogLevel) -> EnvFilter {
    let directive = cli_directive.map_or_else(|| level.directive(), str::to_string);
    let mut filter = EnvFilter::from_default_env();
    for part in directive.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        match part.parse() {
            Ok(directive) => filter = filter.add_directive(directive),
            Err(e) => eprintln!("p2pwatch: ignoring log directive {part:?}: {e}"),
        }
    }
    filter
}

/// Resolve the effective config from the file and the command line.
fn load_config(args: &cli::Args) -> Result<WatchConfig, WatchError> {
    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Using config override: {}", path.display());
            p2pwatch_config::load_config(Some(path.as_path()))?
        }
        None => p2pwatch_config::load_config(None).unwrap_or_else(|e| {
            tracing::warn!("Config load failed, using defaults: {e}");
            WatchConfig::default()
        }),
    };

    if let Some(addr) = &args.addr {
        config.server.base_url = cli::normalize_addr(addr);
        validation::validate(&config)?;
    }
    Ok(config)
}

fn main() -> ExitCode {
    let args = cli::parse();

    // Config loading logs through a temporary subscriber; the configured
    // level is only known once it is done.
    let bootstrap = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(args.log_level.as_deref(), LogLevel::default()))
        .finish();
    let config = tracing::subscriber::with_default(bootstrap, || load_config(&args));

    let config = match config {
        Ok(config) => config,
        Err(e) => {
            eprintln!("p2pwatch: {e}");
            return ExitCode::from(2);
        }
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(env_filter(args.log_level.as_deref(), config.logging.level))
        .init();

    tracing::info!("p2pwatch v{} watching {}", env!("CARGO_PKG_VERSION"), config.server.base_url);

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = runtime.block_on(async {
        if args.once {
            monitor::print_once(&config).await
        } else {
            monitor::watch(&config).await
        }
    });

    match result {
        Ok(()) => {
            tracing::info!("Shutdown complete");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "p2pwatch failed");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn addr_overrides_base_url() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[server]\nbase_url = \"http://127.0.0.1:3000\"\n").unwrap();

        let args = cli::Args::try_parse_from([
            "p2pwatch",
            "10.0.0.9:3000",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        let config = load_config(&args).unwrap();
        assert_eq!(config.server.base_url, "http://10.0.0.9:3000");
        assert_eq!(config.server.stream_url(), "http://10.0.0.9:3000/p2p/sse");
    }

    #[test]
    fn missing_explicit_config_is_an_error() {
        let args = cli::Args::try_parse_from([
            "p2pwatch",
            "--config",
            "/nonexistent/p2pwatch/config.toml",
        ])
        .unwrap();
        let err = load_config(&args).unwrap_err();
        assert!(matches!(err, WatchError::Config(_)));
    }

    #[test]
    fn invalid_addr_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "").unwrap();

        let args = cli::Args::try_parse_from([
            "p2pwatch",
            "ftp://node",
            "--config",
            path.to_str().unwrap(),
        ])
        .unwrap();
        assert!(load_config(&args).is_err());
    }
}
