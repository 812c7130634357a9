//! Listener bootstrap server.
//!
//! Serves HTTP/HTTPS, an optional raw TCP echo listener and an optional UDP
//! echo socket, all supervised by one listener group. The first listener to
//! die takes the process down with it.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use listen_bootstrap::config::validation::validate_config;
use listen_bootstrap::config::{load_config, ServerConfig};
use listen_bootstrap::lifecycle::start;
use listen_bootstrap::observability::logging;

#[derive(Parser)]
#[command(name = "listen-bootstrap")]
#[command(about = "Start and supervise TCP, UDP, HTTP and HTTPS listeners", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Plain HTTP address (overrides config).
    #[arg(long)]
    http: Option<String>,

    /// HTTPS address (overrides config).
    #[arg(long)]
    https: Option<String>,

    /// PEM certificate for HTTPS (overrides config).
    #[arg(long)]
    cert: Option<String>,

    /// PEM private key for HTTPS (overrides config).
    #[arg(long)]
    key: Option<String>,
}

impl Cli {
    fn apply(self, config: &mut ServerConfig) {
        if let Some(http) = self.http {
            config.listener.plain_address = Some(http);
        }
        if let Some(https) = self.https {
            config.listener.tls_address = Some(https);
        }
        if let Some(cert) = self.cert {
            config.listener.cert_path = cert;
        }
        if let Some(key) = self.key {
            config.listener.key_path = key;
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(e) => {
                eprintln!("[bootstrap] failed to load {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => ServerConfig::default(),
    };
    cli.apply(&mut config);

    if let Err(errors) = validate_config(&config) {
        for error in errors {
            eprintln!("[bootstrap] invalid configuration: {error}");
        }
        return ExitCode::FAILURE;
    }

    if let Err(e) = logging::init(&config.observability.log_level) {
        eprintln!("[bootstrap] failed to initialize logging: {e}");
    }

    tracing::info!("listen-bootstrap v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        plain_address = ?config.listener.plain(),
        tls_address = ?config.listener.tls(),
        tcp_address = ?config.tcp.as_ref().map(|t| &t.address),
        udp_address = ?config.udp.as_ref().map(|u| &u.address),
        "Configuration loaded"
    );

    match start(config).await {
        Ok(()) => {
            tracing::info!("No listeners configured; exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(target: "bootstrap", error = %e, "Fatal listener error");
            ExitCode::FAILURE
        }
    }
}
