//! UDM SBI server.
//!
//! ```text
//!   NRF ◀── register ── ┌──────────────────────────────────────────┐
//!                       │                 SbiServer                 │
//!   NF consumer ───────▶│ listener → router → gate → processor ────┼──▶ EE store
//!                       │             (request id, trace, panics)   │
//!                       └──────────────────────────────────────────┘
//! ```

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use udm_sbi::config::{load_config, UdmConfig};
use udm_sbi::consumer::{InMemoryEeStore, NrfClient};
use udm_sbi::lifecycle::shutdown_signal;
use udm_sbi::observability::{init_logging, install_panic_hook};
use udm_sbi::processor::Processor;
use udm_sbi::{SbiServer, UdmContext};

#[derive(Debug, Parser)]
#[command(name = "udm-sbi", version, about = "UDM service-based interface server")]
struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level override (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => match load_config(path) {
            Ok(config) => config,
            Err(err) => {
                eprintln!("Failed to load config {}: {err}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => UdmConfig::default(),
    };

    let level = args
        .log_level
        .as_deref()
        .unwrap_or(&config.observability.log_level);
    init_logging(level);
    install_panic_hook();

    tracing::info!(version = env!("CARGO_PKG_VERSION"), "udm-sbi starting");
    tracing::info!(
        bind_address = %config.sbi.bind_address,
        scheme = %config.sbi.scheme,
        nrf = %config.nrf.uri,
        oauth2_required = config.security.oauth2_required,
        "Configuration loaded"
    );

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "UDM SBI server terminated");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: UdmConfig) -> udm_sbi::Result<()> {
    let context = Arc::new(UdmContext::from_config(&config));
    let processor = Arc::new(Processor::new(
        Arc::new(InMemoryEeStore::new()),
        config.security.max_body_size,
    ));
    let registerer = Arc::new(NrfClient::new(&config, context.clone())?);

    let server = SbiServer::new(Arc::new(config), context, registerer, processor)?;
    server.run().await?;

    tokio::select! {
        result = server.wait() => result,
        _ = shutdown_signal() => {
            server.stop().await;
            Ok(())
        }
    }
}
