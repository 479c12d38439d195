//! SBI server lifecycle.
//!
//! # Responsibilities
//! - Bind the listener at construction
//! - Register with the NRF once before serving
//! - Serve HTTP/2 (cleartext or TLS) from one dedicated task
//! - Report the serving task's outcome (stop, error, panic) over a channel
//! - Bounded graceful shutdown (drain in-flight requests, then close) and
//!   forced termination

use std::any::Any;
use std::net::{SocketAddr, TcpListener};
use std::panic::AssertUnwindSafe;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use axum::{middleware, response::IntoResponse, Router};
use axum_server::Handle;
use futures_util::FutureExt;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tower_http::catch_panic::CatchPanicLayer;

use crate::config::ConfigProvider;
use crate::consumer::Registerer;
use crate::context::SelfContextProvider;
use crate::error::{Result, SbiError};
use crate::http::middleware::in_flight_middleware;
use crate::http::router::build_router;
use crate::lifecycle::{panic_message, RequestTracker, ServeOutcome, ServerState};
use crate::models::ProblemDetails;
use crate::net::tls::load_tls_config;
use crate::net::{bind_listener, UriScheme};
use crate::processor::Processor;

/// Shutdown bound used when the configuration does not set one.
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(2);

/// Grace for connection teardown once requests are drained or force-closed.
const FORCE_CLOSE_GRACE: Duration = Duration::from_millis(500);

/// The UDM SBI server.
pub struct SbiServer {
    config: Arc<dyn ConfigProvider>,
    context: Arc<dyn SelfContextProvider>,
    registerer: Arc<dyn Registerer>,
    processor: Arc<Processor>,
    local_addr: SocketAddr,
    listener: Mutex<Option<TcpListener>>,
    handle: Handle,
    requests: RequestTracker,
    state: Arc<watch::Sender<ServerState>>,
    outcome_tx: mpsc::UnboundedSender<ServeOutcome>,
    outcome_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<ServeOutcome>>,
    task: tokio::sync::Mutex<Option<JoinHandle<()>>>,
}

impl SbiServer {
    /// Create the server and bind its listener.
    pub fn new(
        config: Arc<dyn ConfigProvider>,
        context: Arc<dyn SelfContextProvider>,
        registerer: Arc<dyn Registerer>,
        processor: Arc<Processor>,
    ) -> Result<Self> {
        tracing::info!(bind_address = config.bind_address(), "Binding addr");

        let listener = bind_listener(config.bind_address()).inspect_err(|err| {
            tracing::error!(error = %err, "Initialize HTTP server failed");
        })?;
        let local_addr = listener.local_addr().map_err(|source| SbiError::Bind {
            addr: config.bind_address().to_string(),
            source,
        })?;

        let (state, _) = watch::channel(ServerState::NotStarted);
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        Ok(Self {
            config,
            context,
            registerer,
            processor,
            local_addr,
            listener: Mutex::new(Some(listener)),
            handle: Handle::new(),
            requests: RequestTracker::new(),
            state: Arc::new(state),
            outcome_tx,
            outcome_rx: tokio::sync::Mutex::new(outcome_rx),
            task: tokio::sync::Mutex::new(None),
        })
    }

    /// Address the listener is bound to.
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn state(&self) -> ServerState {
        *self.state.borrow()
    }

    /// Requests currently inside a handler.
    pub fn in_flight(&self) -> usize {
        self.requests.active()
    }

    /// Register with the NRF, then start serving in a background task.
    ///
    /// Returns once the task is spawned. Registration failure is logged and
    /// serving proceeds.
    pub async fn run(&self) -> Result<()> {
        let listener = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
            .ok_or(SbiError::AlreadyStarted)?;

        tracing::info!("Starting server...");
        self.state.send_replace(ServerState::Registering);

        match self.registerer.register_nf_instance().await {
            Ok(registration) => {
                tracing::info!(
                    nf_instance_id = %registration.nf_instance_id,
                    location = registration.location.as_deref().unwrap_or_default(),
                    "UDM registered to NRF"
                );
                self.context.set_nf_instance_id(registration.nf_instance_id);
            }
            Err(err) => tracing::error!(error = %err, "UDM register to NRF Error"),
        }

        let app = build_router(
            Arc::clone(&self.processor),
            Arc::clone(&self.context),
            self.config.as_ref(),
        )
        .layer(middleware::from_fn_with_state(
            self.requests.clone(),
            in_flight_middleware,
        ))
        .layer(panic_reporter(self.outcome_tx.clone()));

        let serving = ServeTask {
            addr: self.local_addr,
            listener,
            config: Arc::clone(&self.config),
            app,
            handle: self.handle.clone(),
        };
        let addr = self.local_addr;
        let state = Arc::clone(&self.state);
        let outcome_tx = self.outcome_tx.clone();

        self.state.send_replace(ServerState::Serving);
        let task = tokio::spawn(async move {
            tracing::info!(address = %addr, "Start SBI server");

            let outcome = match AssertUnwindSafe(serving.serve()).catch_unwind().await {
                Ok(Ok(())) => ServeOutcome::Stopped,
                Ok(Err(err)) => {
                    tracing::error!(error = %err, "SBI server error");
                    ServeOutcome::Failed(err)
                }
                Err(payload) => ServeOutcome::Panicked(panic_message(payload.as_ref())),
            };

            let terminal = match outcome {
                ServeOutcome::Stopped => ServerState::Stopped,
                _ => ServerState::Failed,
            };
            tracing::warn!(address = %addr, state = %terminal, "SBI server stopped");
            // Report before publishing the terminal state so `wait` never
            // observes the state without the outcome.
            let _ = outcome_tx.send(outcome);
            state.send_replace(terminal);
        });
        *self.task.lock().await = Some(task);

        Ok(())
    }

    /// Wait for the next outcome reported by the serving side and apply the
    /// lifecycle policy to it.
    ///
    /// A panic terminates the server and is returned as
    /// [`SbiError::Panicked`]; the caller is expected to treat it as fatal.
    /// Resolves with `Ok(())` once the server is stopped or failed and every
    /// outcome has been reported; before [`run`](Self::run) it blocks.
    pub async fn wait(&self) -> Result<()> {
        let mut rx = self.outcome_rx.lock().await;
        let mut state = self.state.subscribe();
        let outcome = tokio::select! {
            biased;
            outcome = rx.recv() => outcome,
            _ = state.wait_for(ServerState::is_terminal) => rx.try_recv().ok(),
        };
        drop(rx);

        match outcome {
            None | Some(ServeOutcome::Stopped) => Ok(()),
            Some(ServeOutcome::Failed(err)) => Err(err),
            Some(ServeOutcome::Panicked(message)) => {
                tracing::error!(panic = %message, "SBI server panicked");
                self.terminate().await;
                self.state.send_replace(ServerState::Failed);
                Err(SbiError::Panicked(message))
            }
        }
    }

    /// Graceful shutdown bounded by the configured timeout.
    pub async fn stop(&self) {
        self.shutdown_with_timeout(self.config.shutdown_timeout()).await;
    }

    /// Graceful shutdown bounded by [`DEFAULT_SHUTDOWN_TIMEOUT`].
    pub async fn shutdown(&self) {
        self.shutdown_with_timeout(DEFAULT_SHUTDOWN_TIMEOUT).await;
    }

    /// Refuse new requests, wait up to `timeout` for in-flight ones, then
    /// close every connection. Always returns.
    pub async fn shutdown_with_timeout(&self, timeout: Duration) {
        let mut guard = self.task.lock().await;
        let Some(task) = guard.as_mut() else {
            return;
        };
        if task.is_finished() {
            guard.take();
            return;
        }

        tracing::info!(
            address = %self.local_addr,
            in_flight = self.requests.active(),
            "Stop SBI server"
        );
        self.state.send_replace(ServerState::ShuttingDown);
        self.requests.start_draining();

        if tokio::time::timeout(timeout, self.requests.drained()).await.is_ok() {
            self.handle.graceful_shutdown(Some(FORCE_CLOSE_GRACE));
        } else {
            tracing::error!(
                address = %self.local_addr,
                timeout_ms = timeout.as_millis() as u64,
                in_flight = self.requests.active(),
                connections = self.handle.connection_count(),
                "Could not close SBI server within shutdown timeout"
            );
            self.handle.shutdown();
        }

        if tokio::time::timeout(FORCE_CLOSE_GRACE * 2, &mut *task).await.is_err() {
            tracing::warn!("SBI serving task did not exit, aborting it");
            task.abort();
            self.report_aborted();
        }
        guard.take();
    }

    /// Forced, best-effort stop: close the listener and every connection
    /// without waiting for in-flight requests.
    ///
    /// Outcomes queued by the terminated task are discarded unless a
    /// concurrent [`wait`](Self::wait) is already receiving them.
    pub async fn terminate(&self) {
        tracing::info!(address = %self.local_addr, "Terminating SBI server");
        self.requests.start_draining();
        self.handle.shutdown();

        if let Some(mut task) = self.task.lock().await.take() {
            if tokio::time::timeout(FORCE_CLOSE_GRACE, &mut task).await.is_err() {
                tracing::warn!("SBI serving task did not exit, aborting it");
                task.abort();
                self.report_aborted();
            }
        }

        if let Ok(mut rx) = self.outcome_rx.try_lock() {
            while let Ok(outcome) = rx.try_recv() {
                tracing::debug!(outcome = ?outcome, "Discarding outcome after termination");
            }
        }
    }

    /// Stand in for the report an aborted serving task never sent.
    fn report_aborted(&self) {
        let _ = self.outcome_tx.send(ServeOutcome::Stopped);
        self.state.send_replace(ServerState::Stopped);
    }
}

/// Everything the serving task owns.
struct ServeTask {
    addr: SocketAddr,
    listener: TcpListener,
    config: Arc<dyn ConfigProvider>,
    app: Router,
    handle: Handle,
}

impl ServeTask {
    async fn serve(self) -> Result<()> {
        let addr = self.addr;
        let scheme: UriScheme = self.config.scheme().parse()?;
        let service = self.app.into_make_service();

        let served = match scheme {
            UriScheme::Http => {
                axum_server::from_tcp(self.listener)
                    .handle(self.handle)
                    .serve(service)
                    .await
            }
            UriScheme::Https => {
                let tls =
                    load_tls_config(self.config.cert_pem_path(), self.config.cert_key_path())
                        .await?;
                axum_server::tls_rustls::from_tcp_rustls(self.listener, tls)
                    .handle(self.handle)
                    .serve(service)
                    .await
            }
        };
        served.map_err(|source| SbiError::Serve { addr, source })
    }
}

/// Panic layer that reports handler panics to the lifecycle manager.
fn panic_reporter(
    outcome_tx: mpsc::UnboundedSender<ServeOutcome>,
) -> CatchPanicLayer<
    impl Fn(Box<dyn Any + Send + 'static>) -> axum::response::Response + Clone + Send + Sync + 'static,
> {
    CatchPanicLayer::custom(move |payload: Box<dyn Any + Send + 'static>| {
        let message = panic_message(payload.as_ref());
        tracing::error!(panic = %message, "Panic while handling SBI request");
        let _ = outcome_tx.send(ServeOutcome::Panicked(message));
        ProblemDetails::system_failure("request handler panicked").into_response()
    })
}
