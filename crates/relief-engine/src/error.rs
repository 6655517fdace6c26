//! Error types for the engine binary.
//!
//! [`EngineError`] wraps every failure mode during startup and the run so
//! that `main` can propagate with `?`.

/// Top-level error for the engine binary.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration loading failed.
    #[error("config error: {source}")]
    Config {
        /// The underlying config error.
        #[from]
        source: relief_core::ConfigError,
    },

    /// The hazard source could not be built or stopped abnormally.
    #[error("environment error: {source}")]
    World {
        /// The underlying world error.
        #[from]
        source: relief_world::WorldError,
    },

    /// The agent loop aborted.
    #[error("agent error: {source}")]
    Agent {
        /// The underlying agent error.
        #[from]
        source: relief_core::AgentError,
    },

    /// Logging could not be set up.
    #[error("logging error: {message}")]
    Logging {
        /// Description of the logging failure.
        message: String,
    },

    /// The environment task panicked or was cancelled.
    #[error("environment task failed: {source}")]
    Task {
        /// The underlying join error.
        #[from]
        source: tokio::task::JoinError,
    },
}
