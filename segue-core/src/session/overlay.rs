use segue_model::{AccessState, ContinuationStatus, Credits};

/// Read-only snapshot for the surrounding UI.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OverlayView {
    /// `None` until the current video has loaded.
    pub lock: Option<AccessState>,
    pub status: Option<ContinuationStatus>,
    pub target_title: Option<String>,
    pub target_price: Option<Credits>,
    pub remaining_seconds: Option<u32>,
    /// Inline error for the manual buy affordance.
    pub purchase_error: Option<String>,
}

impl OverlayView {
    /// Whether the continuation overlay should be drawn at all.
    pub fn is_visible(&self) -> bool {
        self.status.is_some()
    }

    pub fn awaits_confirmation(&self) -> bool {
        self.status == Some(ContinuationStatus::WaitingConfirmation)
    }
}
