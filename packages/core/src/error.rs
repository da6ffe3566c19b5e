use crate::Lifecycle;

/// A call into the [`Host`](crate::Host) failed.
///
/// Hosts backed by a real window surface the underlying platform error as a message; the
/// [`ManualHost`](crate::ManualHost) never fails.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("host call `{call}` failed: {message}")]
pub struct HostError {
    /// The name of the host operation, e.g. `set_timeout`.
    pub call: &'static str,

    /// A human readable description of the failure.
    pub message: String,
}

impl HostError {
    /// Create a new host error for the given call.
    pub fn new(call: &'static str, message: impl Into<String>) -> Self {
        Self {
            call,
            message: message.into(),
        }
    }
}

/// Errors produced while configuring or driving a dimension reporter.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum ReporterError {
    /// The multiplier was NaN or infinite.
    #[error("multiplier must be finite, got {0}")]
    NonFiniteMultiplier(f64),

    /// A lifecycle event arrived in a state that cannot accept it.
    #[error("cannot {event} a reporter that is {from:?}")]
    InvalidTransition {
        /// The lifecycle the reporter was in.
        from: Lifecycle,
        /// The rejected event.
        event: &'static str,
    },

    /// The configuration could not be parsed.
    #[error("invalid reporter configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// The host environment rejected a call.
    #[error(transparent)]
    Host(#[from] HostError),
}

/// A result with [`ReporterError`] as the default error.
pub type Result<T, E = ReporterError> = std::result::Result<T, E>;
