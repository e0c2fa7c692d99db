//! Command lifecycle states and origins

use serde::{Deserialize, Serialize};

/// Lifecycle states of a command instance.
///
/// `Queued` is the initial state. `Done`, `Error`, `Aborted`, `Cancelled`,
/// and `Expired` are terminal: no transition leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CommandState {
    Queued,
    InProgress,
    Paused,
    Done,
    Error,
    Aborted,
    Cancelled,
    Expired,
}

impl CommandState {
    /// Wire name of this state.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::InProgress => "inProgress",
            Self::Paused => "paused",
            Self::Done => "done",
            Self::Error => "error",
            Self::Aborted => "aborted",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
        }
    }

    /// Whether this state has no outgoing transitions.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Done | Self::Error | Self::Aborted | Self::Cancelled | Self::Expired
        )
    }
}

impl std::fmt::Display for CommandState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who submitted a command instance. The dispatcher uses this together with
/// the definition's minimal role when authorizing callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommandOrigin {
    Cloud,
    Local,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wire_names() {
        assert_eq!(CommandState::Queued.as_str(), "queued");
        assert_eq!(CommandState::InProgress.as_str(), "inProgress");
        assert_eq!(CommandState::Cancelled.as_str(), "cancelled");
    }

    #[test]
    fn exactly_five_states_are_terminal() {
        let terminal = [
            CommandState::Done,
            CommandState::Error,
            CommandState::Aborted,
            CommandState::Cancelled,
            CommandState::Expired,
        ];
        for state in terminal {
            assert!(state.is_terminal());
        }
        for state in [
            CommandState::Queued,
            CommandState::InProgress,
            CommandState::Paused,
        ] {
            assert!(!state.is_terminal());
        }
    }

    #[test]
    fn serde_uses_wire_names() {
        let json = serde_json::to_string(&CommandState::InProgress).unwrap();
        assert_eq!(json, "\"inProgress\"");
        let back: CommandState = serde_json::from_str("\"aborted\"").unwrap();
        assert_eq!(back, CommandState::Aborted);
    }
}
