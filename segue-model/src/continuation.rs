/// Whether the viewer may play a video right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum AccessState {
    Locked,
    Unlocked,
}

impl AccessState {
    pub fn from_entitled(entitled: bool) -> Self {
        if entitled {
            AccessState::Unlocked
        } else {
            AccessState::Locked
        }
    }

    pub fn is_unlocked(&self) -> bool {
        matches!(self, AccessState::Unlocked)
    }
}

/// What happens once the current video ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "SCREAMING_SNAKE_CASE"))]
pub enum ContinuationStatus {
    /// Head candidate already watched; land on the first unwatched one.
    SkippingWatched,
    /// Viewer already owns the head candidate.
    PlayingNext,
    /// Head candidate is within limit and balance; buy without asking.
    AutoBuying,
    /// Needs explicit confirmation. No countdown.
    WaitingConfirmation,
}

impl ContinuationStatus {
    pub fn starts_countdown(&self) -> bool {
        !matches!(self, ContinuationStatus::WaitingConfirmation)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ContinuationStatus::SkippingWatched => "skipping_watched",
            ContinuationStatus::PlayingNext => "playing_next",
            ContinuationStatus::AutoBuying => "auto_buying",
            ContinuationStatus::WaitingConfirmation => "waiting_confirmation",
        }
    }
}

impl std::fmt::Display for ContinuationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
