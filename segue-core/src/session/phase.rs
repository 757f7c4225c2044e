use segue_model::{AccessState, VideoID};

/// Where a playback session is in its lifecycle.
///
/// `Loading → Ready → Ended`, terminal on navigation away. Loading a different
/// video restarts from `Loading` regardless of the current phase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionPhase {
    Loading,
    /// The initial fetch failed. Never retried automatically.
    Unavailable { reason: String },
    Ready(AccessState),
    Ended(EndedPhase),
    NavigatedAway { target: VideoID },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndedPhase {
    /// No overlay: no candidates, or the overlay was dismissed.
    NoDecision,
    CountingDown,
    IdleWaiting,
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            SessionPhase::Loading => "loading",
            SessionPhase::Unavailable { .. } => "unavailable",
            SessionPhase::Ready(AccessState::Locked) => "ready (locked)",
            SessionPhase::Ready(AccessState::Unlocked) => "ready (unlocked)",
            SessionPhase::Ended(EndedPhase::NoDecision) => "ended",
            SessionPhase::Ended(EndedPhase::CountingDown) => "counting down",
            SessionPhase::Ended(EndedPhase::IdleWaiting) => "waiting for confirmation",
            SessionPhase::NavigatedAway { .. } => "navigated away",
        }
    }

    pub fn access(&self) -> Option<AccessState> {
        match self {
            SessionPhase::Ready(access) => Some(*access),
            SessionPhase::Ended(_) => Some(AccessState::Unlocked),
            _ => None,
        }
    }

    pub fn is_counting_down(&self) -> bool {
        matches!(self, SessionPhase::Ended(EndedPhase::CountingDown))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            SessionPhase::Unavailable { .. } | SessionPhase::NavigatedAway { .. }
        )
    }
}
