//! Connection lifecycle state.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle phase of an event source client.
///
/// A successful run moves `Initializing -> Connecting -> Open -> Closed`;
/// a run whose connection attempts all fail moves `Connecting -> Closed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReadyState {
    /// Constructed, never streamed.
    Initializing,
    /// Opening the connection.
    Connecting,
    /// Receiving events.
    Open,
    /// Finished, successfully or not.
    Closed,
}

impl Default for ReadyState {
    fn default() -> Self {
        Self::Initializing
    }
}

impl ReadyState {
    /// Numeric code: -1, 0, 1 or 2.
    pub fn code(self) -> i8 {
        match self {
            Self::Initializing => -1,
            Self::Connecting => 0,
            Self::Open => 1,
            Self::Closed => 2,
        }
    }

    /// Whether no further events will be delivered in this run.
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Closed)
    }

    /// Whether `self -> next` is a forward transition.
    pub fn can_advance_to(self, next: ReadyState) -> bool {
        next > self
    }
}

impl fmt::Display for ReadyState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "initializing",
            Self::Connecting => "connecting",
            Self::Open => "open",
            Self::Closed => "closed",
        };
        f.write_str(name)
    }
}
