//! Errors raised by the activity controllers.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ActivityError {
    /// A water cycle needs at least one phase to sequence.
    #[error("water cycle controller requires at least one phase")]
    EmptyPhaseList,

    #[error("phase `{phase}` has invalid duration {duration} (must be finite and > 0)")]
    InvalidDuration { phase: String, duration: f64 },

    #[error("unknown water cycle phase: {0}")]
    UnknownPhase(String),

    /// The phase name is valid but was not part of this controller's sequence.
    #[error("water cycle phase `{0}` is not configured on this controller")]
    PhaseNotConfigured(String),

    #[error("unknown robot command: {0}")]
    UnknownCommand(String),

    #[error("unknown region: {0}")]
    UnknownRegion(String),

    #[error("no region drag in progress")]
    NoActiveDrag,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}
