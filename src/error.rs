use thiserror::Error;

pub type Result<T> = std::result::Result<T, ExploreError>;

/// Errors surfaced synchronously by PMF construction, sampling and explorers.
///
/// A failed `choose_action` never reaches the recorder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExploreError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// An action (1-based) or index (0-based) outside the valid range.
    #[error("action {action} is out of range for {num_actions} actions")]
    ActionOutOfRange { action: u64, num_actions: u64 },

    #[error("invalid distribution: total probability mass is not positive")]
    InvalidDistribution,

    #[error("misconfigured explorer: {0}")]
    MisconfiguredExplorer(&'static str),
}

impl ExploreError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        ExploreError::InvalidArgument(msg.into())
    }

    pub(crate) fn out_of_range(action: usize, num_actions: usize) -> Self {
        ExploreError::ActionOutOfRange {
            action: action as u64,
            num_actions: num_actions as u64,
        }
    }

    /// True for the `InvalidArgument` class (including out-of-range actions).
    pub fn is_invalid_argument(&self) -> bool {
        matches!(
            self,
            ExploreError::InvalidArgument(_) | ExploreError::ActionOutOfRange { .. }
        )
    }
}
