use serde::{Deserialize, Serialize};

/// Lifecycle of a dump-loading session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionState {
    Idle,
    Reading {
        source: String,
    },
    /// Source hit end of stream
    Finished {
        frames: u64,
    },
    /// Decoding was cancelled by a stop request
    Stopped {
        frames: u64,
    },
    Failed {
        error_msg: String,
    },
}

impl SessionState {
    /// Check if transition from current state to target state is valid
    pub fn can_transition_to(&self, target: &SessionState) -> bool {
        use SessionState::*;

        matches!(
            (self, target),
            (Idle, Reading { .. })
                | (Reading { .. }, Finished { .. })
                | (Reading { .. }, Stopped { .. })
                | (Reading { .. }, Failed { .. })
                | (Finished { .. } | Stopped { .. } | Failed { .. }, Reading { .. })
                | (Finished { .. } | Stopped { .. } | Failed { .. }, Idle)
        )
    }

    pub fn is_reading(&self) -> bool {
        matches!(self, SessionState::Reading { .. })
    }

    pub fn name(&self) -> &str {
        match self {
            Self::Idle => "Idle",
            Self::Reading { .. } => "Reading",
            Self::Finished { .. } => "Finished",
            Self::Stopped { .. } => "Stopped",
            Self::Failed { .. } => "Failed",
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::Idle
    }
}
