//! Server lifecycle state and serving-task outcomes.

use std::any::Any;
use std::fmt;

use crate::error::SbiError;

/// Process-wide lifecycle state of the SBI server.
///
/// ```text
/// NotStarted → Registering → Serving → ShuttingDown → Stopped
///                   │            │
///                   └────────────┴──→ Failed (error exit or panic)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerState {
    NotStarted,
    Registering,
    Serving,
    ShuttingDown,
    Stopped,
    Failed,
}

impl ServerState {
    /// No serving task is left to report anything.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stopped | Self::Failed)
    }
}

impl fmt::Display for ServerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::NotStarted => "not-started",
            Self::Registering => "registering",
            Self::Serving => "serving",
            Self::ShuttingDown => "shutting-down",
            Self::Stopped => "stopped",
            Self::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// Report sent from the serving side to the lifecycle manager.
#[derive(Debug)]
pub enum ServeOutcome {
    /// The accept loop exited after a shutdown request.
    Stopped,
    /// The accept loop could not start or died with an error.
    Failed(SbiError),
    /// The serving task or a request handler panicked.
    Panicked(String),
}

/// Best-effort text of a panic payload.
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
