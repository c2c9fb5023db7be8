//! Terminal outcome of a discovery call.

use crate::errors::DiscoveryError;
use serde::{Deserialize, Serialize};

/// How a discovery call ended.
///
/// A fully-failed keyword run is still [`DiscoveryOutcome::Completed`] with
/// empty groups; absence of results is not an error condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscoveryOutcome {
    /// Every branch was exhausted, capped or failed; the stream is done.
    Completed,
    /// The caller stopped consuming mid-flight.
    Cancelled,
    /// The strategy selector determined no discovery is possible.
    Unsupported,
}

impl DiscoveryOutcome {
    /// Whether the call ran to natural completion.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        matches!(self, Self::Completed)
    }

    /// Whether the call was cut short by the caller.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        matches!(self, Self::Cancelled)
    }
}

impl From<&DiscoveryError> for DiscoveryOutcome {
    /// Maps a call-level error to the outcome a stream consumer observes.
    /// Backend and internal errors are absorbed at the stream level, so
    /// they resolve to `Completed`.
    fn from(err: &DiscoveryError) -> Self {
        match err {
            DiscoveryError::Unsupported { .. } => Self::Unsupported,
            DiscoveryError::Cancelled(_) => Self::Cancelled,
            DiscoveryError::Backend(_) | DiscoveryError::Internal(_) => Self::Completed,
        }
    }
}
