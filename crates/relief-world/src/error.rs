//! Error types for the `relief-world` crate.

use relief_types::EventDecodeError;

/// Errors that can occur while generating or publishing hazard events.
#[derive(Debug, thiserror::Error)]
pub enum WorldError {
    /// The event probability is outside `[0, 1]` (or not a number).
    #[error("invalid event probability {value}: must be within [0, 1]")]
    InvalidProbability {
        /// The rejected probability.
        value: f64,
    },

    /// Every receiver of the transit queue has been dropped.
    #[error("transit queue closed: no agent is listening")]
    QueueClosed,

    /// A generated event could not be encoded as JSON.
    #[error("failed to encode hazard event: {source}")]
    Encode {
        /// The underlying encoding error.
        #[from]
        source: EventDecodeError,
    },
}
