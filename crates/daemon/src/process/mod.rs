use std::net::SocketAddr;
use std::time::Duration;

use futures::future::join_all;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::timeout;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

const FINAL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(30);
/// How long in-flight requests get after SIGTERM before the server stops
const REQUEST_GRACE_PERIOD: Duration = Duration::from_secs(10);

use crate::http_server;
use crate::{ServiceConfig, ServiceState};

/// Handle for shutting down a running service.
///
/// Shutdown is triggered by SIGINT, SIGTERM or [`ShutdownHandle::shutdown`],
/// whichever comes first.
pub struct ShutdownHandle {
    signal_watcher: JoinHandle<()>,
    handles: Vec<JoinHandle<()>>,
    shutdown_tx: watch::Sender<()>,
    shutdown_rx: watch::Receiver<()>,
}

impl ShutdownHandle {
    /// Block until shutdown is triggered, then wait for the servers to drain.
    pub async fn wait(mut self) {
        let _ = self.shutdown_rx.changed().await;
        self.signal_watcher.abort();
        join_with_timeout(self.handles).await;
    }

    /// Trigger shutdown programmatically.
    pub fn shutdown(&self) {
        let _ = self.shutdown_tx.send(());
    }
}

/// Resolves with the signal name once SIGINT or SIGTERM arrives. SIGTERM
/// additionally waits out [`REQUEST_GRACE_PERIOD`].
async fn termination_signal() -> std::io::Result<&'static str> {
    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;

    tokio::select! {
        _ = sigint.recv() => Ok("SIGINT"),
        _ = sigterm.recv() => {
            tokio::time::sleep(REQUEST_GRACE_PERIOD).await;
            Ok("SIGTERM")
        }
    }
}

fn spawn_signal_watcher(shutdown_tx: watch::Sender<()>) -> JoinHandle<()> {
    tokio::spawn(async move {
        match termination_signal().await {
            Ok(name) => {
                tracing::info!("received {}, shutting down", name);
                let _ = shutdown_tx.send(());
            }
            Err(e) => {
                tracing::error!("failed to install signal handlers: {}", e);
            }
        }
    })
}

/// Route panics through `tracing` so they land in the log files too.
fn register_panic_logger() {
    std::panic::set_hook(Box::new(|panic| {
        let location = panic.location();
        tracing::error!(
            error = %panic,
            panic.file = location.map(|l| l.file()),
            panic.line = location.map(|l| l.line()),
            "daemon panicked"
        );
    }));
}

fn report_startup(service_config: &ServiceConfig) {
    let build = common::prelude::build_info();
    let database = service_config
        .sqlite_path
        .as_ref()
        .map(|path| path.display().to_string())
        .unwrap_or_else(|| "in-memory".to_string());

    tracing::info!(
        version = build.version,
        build_profile = build.build_profile,
        features = build.build_features,
        api_port = service_config.api_port,
        database = %database,
        tokens = service_config.tokens.len(),
        "cubby daemon starting up"
    );
}

/// Initialize logging, panic handler, and build info reporting.
/// Returns guards that must be kept alive for the duration of the program.
fn init_logging(
    service_config: &ServiceConfig,
) -> Vec<tracing_appender::non_blocking::WorkerGuard> {
    use tracing_subscriber::fmt::format::FmtSpan;

    let mut guards = Vec::new();

    // Stdout layer
    let (stdout_writer, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    guards.push(stdout_guard);

    let stdout_env_filter = EnvFilter::builder()
        .with_default_directive(service_config.log_level.into())
        .from_env_lossy();

    let stdout_layer = tracing_subscriber::fmt::layer()
        .compact()
        .with_writer(stdout_writer)
        .with_filter(stdout_env_filter);

    // File layer (if log_dir is set)
    if let Some(log_dir) = &service_config.log_dir {
        // Create the log directory if it doesn't exist
        if let Err(e) = std::fs::create_dir_all(log_dir) {
            eprintln!(
                "Warning: Failed to create log directory {:?}: {}",
                log_dir, e
            );
        }

        let file_appender = tracing_appender::rolling::daily(log_dir, "cubby.log");
        let (file_writer, file_guard) = tracing_appender::non_blocking(file_appender);
        guards.push(file_guard);

        let file_env_filter = EnvFilter::builder()
            .with_default_directive(service_config.log_level.into())
            .from_env_lossy();

        let file_layer = tracing_subscriber::fmt::layer()
            .with_writer(file_writer)
            .with_ansi(false)
            .with_span_events(FmtSpan::CLOSE)
            .with_filter(file_env_filter);

        tracing_subscriber::registry()
            .with(stdout_layer)
            .with(file_layer)
            .init();
    } else {
        tracing_subscriber::registry().with(stdout_layer).init();
    }

    register_panic_logger();
    report_startup(service_config);

    guards
}

/// Create service state from config, exiting on error.
async fn create_state(service_config: &ServiceConfig) -> ServiceState {
    match ServiceState::from_config(service_config).await {
        Ok(state) => state,
        Err(e) => {
            tracing::error!("error creating server state: {}", e);
            std::process::exit(3);
        }
    }
}

/// Join all handles, exiting the process if they take too long.
async fn join_with_timeout(handles: Vec<JoinHandle<()>>) {
    if timeout(FINAL_SHUTDOWN_TIMEOUT, join_all(handles))
        .await
        .is_err()
    {
        tracing::error!(
            "Failed to shut down within {} seconds",
            FINAL_SHUTDOWN_TIMEOUT.as_secs()
        );
        std::process::exit(4);
    }
}

/// Create state and spawn the API server, returning the state handle.
///
/// The returned `ShutdownHandle` must be kept alive; dropping it does not stop the service.
pub async fn start_service(service_config: &ServiceConfig) -> (ServiceState, ShutdownHandle) {
    let (shutdown_tx, shutdown_rx) = watch::channel(());
    let signal_watcher = spawn_signal_watcher(shutdown_tx.clone());
    let state = create_state(service_config).await;

    let mut handles = Vec::new();

    let api_port = service_config.api_port;
    let api_addr = SocketAddr::from(([0, 0, 0, 0], api_port));
    let api_state = state.clone();
    let mut api_config = http_server::Config::new(api_addr);
    api_config.log_level = service_config.log_level;
    let api_rx = shutdown_rx.clone();
    let api_handle = tokio::spawn(async move {
        if let Err(e) = http_server::run_api(api_config, api_state, api_rx).await {
            tracing::error!("API server error: {}", e);
        }
    });
    handles.push(api_handle);

    tracing::info!("Running: API on port {}", api_port);

    let handle = ShutdownHandle {
        signal_watcher,
        handles,
        shutdown_tx,
        shutdown_rx,
    };

    (state, handle)
}

/// Spawns the daemon service and blocks until a shutdown signal is received.
pub async fn spawn_service(service_config: &ServiceConfig) {
    let _guards = init_logging(service_config);
    let (_, handle) = start_service(service_config).await;
    handle.wait().await;
}
