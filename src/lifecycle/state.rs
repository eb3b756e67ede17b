//! Component lifecycle states and the legal transition table.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of an [`Endpoint`](crate::Endpoint).
///
/// The machine is linear with a single cycle:
/// `Created → Started → Resumed ⇄ Paused → Stopped → Destroyed`.
/// Every state except `Resumed`/`Paused` is entered at most once, and
/// `Destroyed` is absorbing: nothing transitions out of it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum State {
    Created,
    Started,
    Resumed,
    Paused,
    Stopped,
    Destroyed,
}

impl State {
    /// True if `next` is a legal step transition out of `self`.
    ///
    /// Teardown is not a step: [`Endpoint::finish`](crate::Endpoint::finish)
    /// jumps to `Destroyed` from any live state regardless of this table.
    ///
    /// # Example
    /// ```
    /// use scopecast::State;
    ///
    /// assert!(State::Resumed.allows(State::Paused));
    /// assert!(State::Paused.allows(State::Resumed));
    /// assert!(!State::Created.allows(State::Resumed)); // must pass through Started
    /// assert!(!State::Destroyed.allows(State::Created)); // absorbing
    /// ```
    #[must_use]
    pub fn allows(self, next: State) -> bool {
        use State::*;
        matches!(
            (self, next),
            (Created, Started)
                | (Started, Resumed)
                | (Resumed, Paused)
                | (Paused, Resumed)
                | (Paused, Stopped)
                | (Stopped, Destroyed)
        )
    }

    /// True for the absorbing terminal state.
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, State::Destroyed)
    }

    /// Short stable label (snake_case) for logs/metrics.
    #[must_use]
    pub fn as_label(self) -> &'static str {
        match self {
            State::Created => "created",
            State::Started => "started",
            State::Resumed => "resumed",
            State::Paused => "paused",
            State::Stopped => "stopped",
            State::Destroyed => "destroyed",
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_label())
    }
}
