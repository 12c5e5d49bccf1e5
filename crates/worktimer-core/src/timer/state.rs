use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Lifecycle state of the shared timer.
///
/// `Fresh` is never written to disk: it is what an absent status record means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimerState {
    Fresh,
    Running,
    Paused,
    Stopped,
}

impl TimerState {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimerState::Fresh => "FRESH",
            TimerState::Running => "RUNNING",
            TimerState::Paused => "PAUSED",
            TimerState::Stopped => "STOPPED",
        }
    }
}

impl fmt::Display for TimerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerState {
    type Err = String;

    /// Parses the persisted names only; `FRESH` is never stored.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "RUNNING" => Ok(TimerState::Running),
            "PAUSED" => Ok(TimerState::Paused),
            "STOPPED" => Ok(TimerState::Stopped),
            other => Err(format!("unknown status {other:?}")),
        }
    }
}
