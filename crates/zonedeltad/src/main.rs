// # zonedeltad - record-set change worker
//
// Thin integration layer over `zonedelta-core`. The worker reads pending
// record-set changes as newline-delimited JSON on stdin, drives each one to
// its terminal status through the core handler, and echoes the decided
// change as a JSON line on stdout. Queue transport stays external: whatever
// feeds the pipe owns redelivery and per-record-set serialization.
//
// No business logic lives here; all processing is in zonedelta-core.
//
// ## Configuration
//
// All configuration is done via environment variables:
//
// ### Connector
// - `ZONEDELTA_CONNECTOR_TYPE`: connector type (pdns)
// - `ZONEDELTA_PDNS_URL`: PowerDNS API base URL
// - `ZONEDELTA_PDNS_API_KEY`: PowerDNS API key
// - `ZONEDELTA_PDNS_SERVER_ID`: PowerDNS server id (default "localhost")
//
// ### Store
// - `ZONEDELTA_STORE_TYPE`: store type (memory)
//
// ### Verification
// - `ZONEDELTA_VERIFY_MAX_ATTEMPTS`: resolve attempts before giving up
// - `ZONEDELTA_VERIFY_BACKOFF_MS`: wait between attempts
//
// ### Logging
// - `ZONEDELTA_LOG_LEVEL`: trace, debug, info, warn, error
//
// ## Example
//
// ```bash
// export ZONEDELTA_PDNS_URL=http://127.0.0.1:8081/api/v1
// export ZONEDELTA_PDNS_API_KEY=secret
//
// queue-consumer | zonedeltad > decided-changes.ndjson
// ```

use std::env;
use std::process::ExitCode;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_stream::wrappers::LinesStream;
use tokio_stream::StreamExt;
use tracing::{error, info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use zonedelta_core::config::{ConnectorConfig, HandlerConfig, StoreConfig, VerifyConfig};
use zonedelta_core::model::RecordSetChange;
use zonedelta_core::{ChangeHandler, ConnectorRegistry};

/// Exit codes for different termination scenarios
///
/// These codes follow systemd conventions:
/// - 0: Clean shutdown
/// - 1: Configuration or startup error
/// - 2: Runtime error (unexpected)
#[derive(Debug, Clone, Copy)]
enum WorkerExitCode {
    CleanShutdown = 0,
    ConfigError = 1,
    RuntimeError = 2,
}

impl From<WorkerExitCode> for ExitCode {
    fn from(code: WorkerExitCode) -> Self {
        ExitCode::from(code as u8)
    }
}

/// Application configuration
struct Config {
    connector_type: String,
    pdns_url: Option<String>,
    pdns_api_key: Option<String>,
    pdns_server_id: String,
    store_type: String,
    verify_max_attempts: Option<usize>,
    verify_backoff_ms: Option<u64>,
    log_level: String,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Result<Self> {
        Ok(Self {
            connector_type: env::var("ZONEDELTA_CONNECTOR_TYPE")
                .unwrap_or_else(|_| "pdns".to_string()),
            pdns_url: env::var("ZONEDELTA_PDNS_URL").ok(),
            pdns_api_key: env::var("ZONEDELTA_PDNS_API_KEY").ok(),
            pdns_server_id: env::var("ZONEDELTA_PDNS_SERVER_ID")
                .unwrap_or_else(|_| "localhost".to_string()),
            store_type: env::var("ZONEDELTA_STORE_TYPE").unwrap_or_else(|_| "memory".to_string()),
            verify_max_attempts: env::var("ZONEDELTA_VERIFY_MAX_ATTEMPTS")
                .ok()
                .map(|s| s.parse())
                .transpose()
                .map_err(|e| anyhow::anyhow!("ZONEDELTA_VERIFY_MAX_ATTEMPTS: {}", e))?,
            verify_backoff_ms: env::var("ZONEDELTA_VERIFY_BACKOFF_MS")
                .ok()
                .map(|s| s.parse())
                .transpose()
                .map_err(|e| anyhow::anyhow!("ZONEDELTA_VERIFY_BACKOFF_MS: {}", e))?,
            log_level: env::var("ZONEDELTA_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Validate the configuration
    fn validate(&self) -> Result<()> {
        match self.connector_type.as_str() {
            "pdns" => {
                let url = self.pdns_url.as_deref().unwrap_or_default();
                if url.is_empty() {
                    anyhow::bail!(
                        "ZONEDELTA_PDNS_URL is required. \
                        Set it via: export ZONEDELTA_PDNS_URL=http://127.0.0.1:8081/api/v1"
                    );
                }
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    anyhow::bail!("ZONEDELTA_PDNS_URL must use HTTP or HTTPS scheme. Got: {}", url);
                }
                if self.pdns_api_key.as_deref().unwrap_or_default().is_empty() {
                    anyhow::bail!(
                        "ZONEDELTA_PDNS_API_KEY is required. \
                        Set it via: export ZONEDELTA_PDNS_API_KEY=your_key"
                    );
                }
            }
            other => anyhow::bail!(
                "ZONEDELTA_CONNECTOR_TYPE '{}' is not supported. Supported connectors: pdns",
                other
            ),
        }

        match self.store_type.as_str() {
            "memory" => {}
            other => anyhow::bail!(
                "ZONEDELTA_STORE_TYPE '{}' is not supported. Supported stores: memory",
                other
            ),
        }

        if let Some(attempts) = self.verify_max_attempts {
            if !(1..=100).contains(&attempts) {
                anyhow::bail!(
                    "ZONEDELTA_VERIFY_MAX_ATTEMPTS must be between 1 and 100. Got: {}",
                    attempts
                );
            }
        }

        if let Some(backoff) = self.verify_backoff_ms {
            if !(1..=60_000).contains(&backoff) {
                anyhow::bail!(
                    "ZONEDELTA_VERIFY_BACKOFF_MS must be between 1 and 60000. Got: {}",
                    backoff
                );
            }
        }

        match self.log_level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => {}
            other => anyhow::bail!(
                "ZONEDELTA_LOG_LEVEL '{}' is not valid. \
                Valid levels: trace, debug, info, warn, error",
                other
            ),
        }

        Ok(())
    }

    /// Build the core handler configuration
    fn handler_config(&self) -> HandlerConfig {
        let defaults = VerifyConfig::default();
        HandlerConfig {
            connector: ConnectorConfig::Pdns {
                base_url: self.pdns_url.clone().unwrap_or_default(),
                api_key: self.pdns_api_key.clone().unwrap_or_default(),
                server_id: self.pdns_server_id.clone(),
            },
            store: StoreConfig::Memory,
            verify: VerifyConfig {
                max_attempts: self.verify_max_attempts.unwrap_or(defaults.max_attempts),
                backoff_ms: self.verify_backoff_ms.unwrap_or(defaults.backoff_ms),
            },
            ..HandlerConfig::default()
        }
    }
}

fn main() -> ExitCode {
    let config = match Config::from_env() {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return WorkerExitCode::ConfigError.into();
        }
    };

    if let Err(e) = config.validate() {
        eprintln!("Configuration validation error: {}", e);
        return WorkerExitCode::ConfigError.into();
    }

    let log_level = match config.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    // Logs go to stderr; stdout carries the decided changes.
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
        return WorkerExitCode::ConfigError.into();
    }

    info!("Starting zonedeltad worker");

    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to create tokio runtime: {}", e);
            return WorkerExitCode::RuntimeError.into();
        }
    };

    let result = rt.block_on(async {
        if let Err(e) = run_worker(config).await {
            error!("Worker error: {}", e);
            WorkerExitCode::RuntimeError
        } else {
            WorkerExitCode::CleanShutdown
        }
    });

    result.into()
}

/// Run the worker loop
async fn run_worker(config: Config) -> Result<()> {
    let registry = ConnectorRegistry::new();
    zonedelta_core::store::register(&registry);
    zonedelta_connector_pdns::register(&registry);

    let handler_config = config.handler_config();
    let connector = registry.create_connector(&handler_config.connector)?;
    let stores = registry.create_store(&handler_config.store)?;
    let (handler, mut events) = ChangeHandler::new(stores, handler_config)?;

    // Drain handler events into the log.
    tokio::spawn(async move {
        while let Some(event) = events.recv().await {
            tracing::debug!(?event, "handler event");
        }
    });

    info!(connector = connector.connector_name(), "worker ready, reading changes from stdin");

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = LinesStream::new(stdin.lines());

    let shutdown = shutdown_signal();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            maybe_line = lines.next() => {
                match maybe_line {
                    Some(Ok(line)) => {
                        if line.trim().is_empty() {
                            continue;
                        }
                        process_line(&handler, connector.as_ref(), &line).await;
                    }
                    Some(Err(e)) => return Err(e.into()),
                    None => {
                        info!("input closed, shutting down");
                        break;
                    }
                }
            }

            signal = &mut shutdown => {
                info!("received {}, shutting down", signal);
                break;
            }
        }
    }

    Ok(())
}

/// Decode and process one pending change
async fn process_line(
    handler: &ChangeHandler,
    connector: &dyn zonedelta_core::DnsConnector,
    line: &str,
) {
    let change: RecordSetChange = match serde_json::from_str(line) {
        Ok(change) => change,
        Err(e) => {
            warn!("skipping undecodable change: {}", e);
            return;
        }
    };

    match handler.handle(connector, change).await {
        Ok(decided) => match serde_json::to_string(&decided) {
            Ok(json) => println!("{}", json),
            Err(e) => error!(change_id = %decided.id, "failed encoding decided change: {}", e),
        },
        Err(e) => {
            // Infrastructure fault: nothing was persisted, the change stays
            // pending with whatever fed the pipe.
            error!("change left pending after infrastructure error: {}", e);
        }
    }
}

/// Wait for a shutdown signal (SIGTERM or SIGINT)
#[cfg(unix)]
async fn shutdown_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(e) => {
            warn!("failed to install SIGTERM handler: {}", e);
            let _ = tokio::signal::ctrl_c().await;
            return "SIGINT";
        }
    };

    tokio::select! {
        _ = sigterm.recv() => "SIGTERM",
        _ = tokio::signal::ctrl_c() => "SIGINT",
    }
}

/// Wait for a shutdown signal (SIGINT only on non-Unix platforms)
#[cfg(not(unix))]
async fn shutdown_signal() -> &'static str {
    let _ = tokio::signal::ctrl_c().await;
    "SIGINT"
}
